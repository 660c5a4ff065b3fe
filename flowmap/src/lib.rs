pub mod flatten;
pub mod form;
pub mod geocode;
pub mod ids;
pub mod model;
pub mod picking;
pub mod tree;
mod json;

use std::cell::RefCell;

pub use flatten::{flatten as flatten_layers, DescriptorKind, LayerDescriptor};
pub use form::{from_form_record, to_form_record, FormRecord};
pub use json::DocumentError;
pub use model::{
    Color, Geometry, ItemType, LonLat, NodeKind, NodePatch, NodeRef, PointShape, ProjectNode,
};

/// The one document context owning the canonical project forest. Every
/// mutation replaces the root reference wholesale; readers between
/// mutations always observe a consistent snapshot. The flattened layer
/// list is recomputed per revision and cached, so repeated reads between
/// edits do not re-walk the tree.
pub struct Project {
    roots: Vec<NodeRef>,
    rev: u64,
    // (built_rev, layers) like a picking index: rebuilt lazily on read.
    layer_cache: RefCell<Option<(u64, Vec<LayerDescriptor>)>>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Project {
        Project::from_nodes(Vec::new())
    }

    pub fn from_nodes(roots: Vec<NodeRef>) -> Project {
        Project {
            roots,
            rev: 1,
            layer_cache: RefCell::new(None),
        }
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.roots
    }

    pub fn revision(&self) -> u64 {
        self.rev
    }

    pub fn node_count(&self) -> usize {
        fn count(nodes: &[NodeRef]) -> usize {
            nodes
                .iter()
                .map(|n| 1 + n.children().map(count).unwrap_or(0))
                .sum()
        }
        count(&self.roots)
    }

    pub fn find(&self, id: &str) -> Option<&NodeRef> {
        tree::find(&self.roots, id)
    }

    pub fn update(&mut self, id: &str, patch: &NodePatch) {
        self.replace(tree::update(&self.roots, id, patch));
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) {
        self.update(id, &NodePatch::visibility(visible));
    }

    pub fn remove(&mut self, id: &str) {
        self.replace(tree::remove(&self.roots, id));
    }

    pub fn insert_child(&mut self, parent_id: &str, node: ProjectNode) {
        self.replace(tree::insert_child(&self.roots, parent_id, node));
    }

    pub fn insert_root(&mut self, node: ProjectNode) {
        self.replace(tree::insert_root(&self.roots, node));
    }

    /// Add a default-seeded group, at the root or under a parent group.
    /// Returns the new node's id.
    pub fn add_group(&mut self, parent_id: Option<&str>, now_ms: u64) -> String {
        let group = tree::new_group(now_ms);
        let id = group.id.clone();
        match parent_id {
            Some(parent) => self.insert_child(parent, group),
            None => self.insert_root(group),
        }
        id
    }

    /// Add a default-seeded item under a parent group. Returns the new
    /// node's id.
    pub fn add_item(&mut self, parent_id: &str, item_type: ItemType, now_ms: u64) -> String {
        let item = tree::new_item(item_type, now_ms);
        let id = item.id.clone();
        self.insert_child(parent_id, item);
        id
    }

    pub fn duplicate(&mut self, id: &str, now_ms: u64) {
        self.replace(tree::duplicate(&self.roots, id, now_ms));
    }

    /// The flattened, render-ready layer list for the current revision.
    pub fn layers(&self) -> Vec<LayerDescriptor> {
        if let Some((built_rev, layers)) = &*self.layer_cache.borrow() {
            if *built_rev == self.rev {
                return layers.clone();
            }
        }
        let layers = flatten::flatten(&self.roots);
        *self.layer_cache.borrow_mut() = Some((self.rev, layers.clone()));
        layers
    }

    pub fn to_json(&self) -> String {
        json::to_json_impl(&self.roots)
    }

    /// Replace the whole document from JSON text. On a parse error the
    /// current document is left exactly as it was.
    pub fn load_json(&mut self, text: &str) -> Result<(), DocumentError> {
        let roots = json::from_json_impl(text)?;
        self.replace(roots);
        Ok(())
    }

    pub fn form_record(&self, id: &str) -> Option<FormRecord> {
        self.find(id).map(|node| form::to_form_record(node))
    }

    pub fn apply_form(&mut self, id: &str, record: &FormRecord) {
        self.update(id, &form::from_form_record(record));
    }

    fn replace(&mut self, roots: Vec<NodeRef>) {
        self.roots = roots;
        self.rev += 1;
    }
}
