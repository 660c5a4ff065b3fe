use crate::interop::{new_obj, set_kv};
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn invalid_id(id: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "id", &JsValue::from_str(id));
    err("invalid_id", format!("no node with id '{}'", id), Some(d.into()))
}

#[inline]
pub fn parse_error(message: impl Into<String>) -> JsValue {
    err("parse_error", message, None)
}

#[inline]
pub fn invalid_patch(message: impl Into<String>) -> JsValue {
    err("invalid_patch", message, None)
}

#[inline]
pub fn invalid_record(message: impl Into<String>) -> JsValue {
    err("invalid_record", message, None)
}

#[inline]
pub fn unknown_item_type(got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "got", &JsValue::from_str(got));
    err(
        "unknown_item_type",
        "itemType must be Arc, Line, Scatterplot or GeoJson",
        Some(d.into()),
    )
}
