#![cfg(target_arch = "wasm32")]

use flowmap_wasm::Project;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_ok(v: &JsValue) -> bool {
    Reflect::get(v, &JsValue::from_str("ok"))
        .ok()
        .and_then(|x| x.as_bool())
        .unwrap_or(false)
}

fn err_code(v: &JsValue) -> Option<String> {
    if is_ok(v) {
        return None;
    }
    let err = Reflect::get(v, &JsValue::from_str("error")).ok()?;
    Reflect::get(&err, &JsValue::from_str("code"))
        .ok()?
        .as_string()
}

#[wasm_bindgen_test]
fn add_and_flatten_round_trip() {
    let mut p = Project::new();
    let group = p.add_group(None);
    let res = p.add_item_res(&group, "Arc");
    assert!(is_ok(&res));
    assert_eq!(p.node_count(), 2);

    let layers = p.layers();
    let len = Reflect::get(&layers, &JsValue::from_str("length"))
        .unwrap()
        .as_f64()
        .unwrap();
    assert_eq!(len, 1.0);

    p.set_visible(&group, false);
    let layers = p.layers();
    let len = Reflect::get(&layers, &JsValue::from_str("length"))
        .unwrap()
        .as_f64()
        .unwrap();
    assert_eq!(len, 0.0);
}

#[wasm_bindgen_test]
fn res_variants_report_stable_codes() {
    let mut p = Project::new();
    let group = p.add_group(None);

    let res = p.add_item_res(&group, "Hexbin");
    assert_eq!(err_code(&res).as_deref(), Some("unknown_item_type"));

    let res = p.add_item_res("ghost", "Arc");
    assert_eq!(err_code(&res).as_deref(), Some("invalid_id"));

    let res = p.load_json_res("{ not json");
    assert_eq!(err_code(&res).as_deref(), Some("parse_error"));
    // The failed load left the document alone.
    assert_eq!(p.node_count(), 1);
}

#[wasm_bindgen_test]
fn document_json_round_trips() {
    let mut p = Project::new();
    let group = p.add_group(None);
    p.add_item_res(&group, "Scatterplot");
    let text = p.to_json();

    let mut q = Project::new();
    assert!(p.revision() > 0);
    assert!(q.load_json(&text));
    assert_eq!(q.node_count(), 2);
    assert_eq!(q.to_json(), text);
}
