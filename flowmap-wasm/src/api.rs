use crate::error;
use crate::Project;
use flowmap::{FormRecord, ItemType, NodePatch};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[wasm_bindgen]
impl Project {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Project {
        Project::rs_new()
    }

    pub fn revision(&self) -> u64 {
        self.rs_revision()
    }

    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }

    /// The flattened descriptor array the rendering overlay consumes.
    pub fn layers(&self) -> JsValue {
        crate::interop::to_js(&self.inner.layers())
    }

    // Document surface
    pub fn to_json(&self) -> String {
        self.inner.to_json()
    }

    pub fn load_json(&mut self, text: &str) -> bool {
        self.inner.load_json(text).is_ok()
    }

    pub fn load_json_res(&mut self, text: &str) -> JsValue {
        match self.inner.load_json(text) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "project JSON rejected: {e}"
                )));
                error::parse_error(e.to_string())
            }
        }
    }

    // Node lookup / editing
    pub fn find(&self, id: &str) -> JsValue {
        match self.inner.find(id) {
            Some(node) => crate::interop::to_js(node),
            None => JsValue::NULL,
        }
    }

    pub fn update(&mut self, id: &str, patch: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<NodePatch>(patch) {
            Ok(patch) => {
                self.inner.update(id, &patch);
                true
            }
            Err(_) => false,
        }
    }

    pub fn update_res(&mut self, id: &str, patch: JsValue) -> JsValue {
        if self.inner.find(id).is_none() {
            return error::invalid_id(id);
        }
        match serde_wasm_bindgen::from_value::<NodePatch>(patch) {
            Ok(patch) => {
                self.inner.update(id, &patch);
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::invalid_patch(e.to_string()),
        }
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.inner.set_visible(id, visible);
    }

    pub fn remove_node(&mut self, id: &str) {
        self.inner.remove(id);
    }

    pub fn duplicate(&mut self, id: &str) {
        self.inner.duplicate(id, now_ms());
    }

    /// Add a default-seeded group; omit `parent_id` for a new top-level
    /// folder. Returns the new node's id.
    pub fn add_group(&mut self, parent_id: Option<String>) -> String {
        self.inner.add_group(parent_id.as_deref(), now_ms())
    }

    pub fn add_item(&mut self, parent_id: &str, item_type: &str) -> String {
        self.inner
            .add_item(parent_id, ItemType::from_str(item_type), now_ms())
    }

    pub fn add_item_res(&mut self, parent_id: &str, item_type: &str) -> JsValue {
        let parsed = ItemType::from_str(item_type);
        if parsed == ItemType::Unknown {
            return error::unknown_item_type(item_type);
        }
        if self.inner.find(parent_id).is_none() {
            return error::invalid_id(parent_id);
        }
        let id = self.inner.add_item(parent_id, parsed, now_ms());
        error::ok(JsValue::from_str(&id))
    }

    // Property-form surface
    pub fn form_record(&self, id: &str) -> JsValue {
        match self.inner.form_record(id) {
            Some(record) => crate::interop::to_js(&record),
            None => JsValue::NULL,
        }
    }

    pub fn apply_form(&mut self, id: &str, record: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<FormRecord>(record) {
            Ok(record) => {
                self.inner.apply_form(id, &record);
                true
            }
            Err(_) => false,
        }
    }

    pub fn apply_form_res(&mut self, id: &str, record: JsValue) -> JsValue {
        if self.inner.find(id).is_none() {
            return error::invalid_id(id);
        }
        match serde_wasm_bindgen::from_value::<FormRecord>(record) {
            Ok(record) => {
                self.inner.apply_form(id, &record);
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::invalid_record(e.to_string()),
        }
    }
}
