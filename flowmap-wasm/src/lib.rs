use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// JS-facing handle to one project document. The rendering host reads
/// `layers()` after every mutation and feeds the descriptor array to its
/// overlay; `revision()` is the cheap dirty check.
#[wasm_bindgen]
pub struct Project {
    pub(crate) inner: flowmap::Project,
}

impl Project {
    pub fn rs_new() -> Project {
        Project {
            inner: flowmap::Project::new(),
        }
    }

    pub fn rs_revision(&self) -> u64 {
        self.inner.revision()
    }
}
