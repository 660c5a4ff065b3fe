//! Interaction dispatch over flattened descriptors. The render engine
//! reports picks by descriptor id; routing goes through an explicit
//! handler object rather than callbacks captured inside the flatten walk,
//! so the flattener itself stays pure.

use crate::flatten::LayerDescriptor;

/// Host-side reactions to pointer events on rendered layers. The
/// descriptor handed over carries the originating node's id, name, info
/// and value alongside its geometry.
pub trait InteractionHandler {
    /// `None` means the pointer left every pickable object.
    fn on_hover(&mut self, descriptor: Option<&LayerDescriptor>);
    fn on_click(&mut self, descriptor: &LayerDescriptor);
}

pub fn descriptor<'a>(layers: &'a [LayerDescriptor], id: &str) -> Option<&'a LayerDescriptor> {
    layers.iter().find(|d| d.id == id)
}

/// Route a hover pick. An unknown or absent id clears the hover state.
pub fn hover(layers: &[LayerDescriptor], id: Option<&str>, handler: &mut dyn InteractionHandler) {
    let hit = id.and_then(|id| descriptor(layers, id));
    handler.on_hover(hit);
}

/// Route a click pick. Clicks on unknown ids are ignored.
pub fn click(layers: &[LayerDescriptor], id: &str, handler: &mut dyn InteractionHandler) {
    if let Some(hit) = descriptor(layers, id) {
        handler.on_click(hit);
    }
}
