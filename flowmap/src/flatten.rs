//! Projection of the project tree into render-ready layer descriptors.
//! Total and deterministic: one descriptor per visible leaf item, in
//! pre-order traversal sequence, so sibling order is draw order wherever
//! the render engine respects array order.

use serde::{Deserialize, Serialize};

use crate::model::{Color, Geometry, ItemType, LonLat, NodeKind, NodeRef, ProjectNode};

pub const DEFAULT_WIDTH: f64 = 3.0;
/// Default point radius in meters when an item carries no `size`.
pub const DEFAULT_RADIUS_M: f64 = 30_000.0;
/// `size` is authored in kilometers; descriptors carry meters.
pub const RADIUS_SCALE: f64 = 1_000.0;
/// Meters of column height per unit of `value` for 3D point shapes.
pub const ELEVATION_SCALE: f64 = 1_000.0;

/// Geometry half of a descriptor. The `kind` tag selects which layer the
/// render host instantiates; field names are camelCased for the JS side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DescriptorKind {
    #[serde(rename_all = "camelCase")]
    Arc {
        source: LonLat,
        target: LonLat,
        source_color: Color,
        target_color: Color,
        width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        source: LonLat,
        target: LonLat,
        color: Color,
        width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Path {
        path: Vec<LonLat>,
        color: Color,
        width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Scatter {
        position: LonLat,
        fill_color: Color,
        radius: f64,
        extruded: bool,
        elevation: f64,
    },
    #[serde(rename_all = "camelCase")]
    GeoJson {
        geometry: serde_json::Value,
        stroke_color: Color,
    },
}

/// A flattened, render-ready representation of one visible item. Carries
/// the originating node's metadata (not just geometry) so hover tooltips
/// and click detail views can show node-level information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Stable render key: the originating node's id.
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(flatten)]
    pub kind: DescriptorKind,
}

/// Walk the forest pre-order, pruning hidden subtrees, and emit one
/// descriptor per renderable item.
pub fn flatten(nodes: &[NodeRef]) -> Vec<LayerDescriptor> {
    let mut out = Vec::new();
    collect(nodes, &mut out);
    out
}

fn collect(nodes: &[NodeRef], out: &mut Vec<LayerDescriptor>) {
    for node in nodes {
        if !node.visible {
            continue;
        }
        match &node.kind {
            NodeKind::Group { children } => collect(children, out),
            NodeKind::Item { .. } => {
                if let Some(descriptor) = descriptor_for(node) {
                    out.push(descriptor);
                }
            }
        }
    }
}

/// Build the descriptor for a single item. Items with an unknown type,
/// no geometry, or a payload whose shape does not match their type are
/// excluded without error.
fn descriptor_for(node: &ProjectNode) -> Option<LayerDescriptor> {
    let NodeKind::Item {
        item_type,
        width,
        size,
        shape,
        value,
        data,
    } = &node.kind
    else {
        return None;
    };

    let color = node.color.unwrap_or(Color::FALLBACK);
    let width = width.unwrap_or(DEFAULT_WIDTH);

    let kind = match item_type {
        ItemType::Arc => match data {
            Some(Geometry::Endpoints { source, target }) => DescriptorKind::Arc {
                source: *source,
                target: *target,
                source_color: color,
                target_color: node.target_color.unwrap_or(color),
                width,
            },
            _ => return None,
        },
        ItemType::Line => match data {
            Some(Geometry::Endpoints { source, target }) => DescriptorKind::Line {
                source: *source,
                target: *target,
                color,
                width,
            },
            // Legacy multi-point lines persist as a `path` payload.
            Some(Geometry::Track { path }) => DescriptorKind::Path {
                path: path.clone(),
                color,
                width,
            },
            _ => return None,
        },
        ItemType::Scatterplot => match data {
            Some(Geometry::Point { coordinates }) => {
                let extruded = shape.map(|s| s.is_3d()).unwrap_or(false);
                DescriptorKind::Scatter {
                    position: *coordinates,
                    fill_color: color,
                    radius: size.map(|s| s * RADIUS_SCALE).unwrap_or(DEFAULT_RADIUS_M),
                    extruded,
                    elevation: if extruded {
                        value.unwrap_or(0.0) * ELEVATION_SCALE
                    } else {
                        0.0
                    },
                }
            }
            _ => return None,
        },
        ItemType::GeoJson => match data {
            // Pass the payload through verbatim, whatever typed variant it
            // landed in; stroke only, no fill.
            Some(geometry) => DescriptorKind::GeoJson {
                geometry: serde_json::to_value(geometry).unwrap_or(serde_json::Value::Null),
                stroke_color: color,
            },
            None => return None,
        },
        ItemType::Unknown => return None,
    };

    Some(LayerDescriptor {
        id: node.id.clone(),
        name: node.name.clone(),
        info: node.info.clone(),
        value: *value,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointShape;
    use std::rc::Rc;

    fn item(id: &str, item_type: ItemType, data: Option<Geometry>) -> ProjectNode {
        ProjectNode::item(id, id.to_uppercase(), item_type, data)
    }

    fn endpoints() -> Option<Geometry> {
        Some(Geometry::Endpoints {
            source: LonLat(-46.0, -23.0),
            target: LonLat(-43.0, -22.0),
        })
    }

    #[test]
    fn hidden_item_is_excluded() {
        let mut a = item("a", ItemType::Arc, endpoints());
        a.visible = false;
        let forest = vec![Rc::new(a), Rc::new(item("b", ItemType::Arc, endpoints()))];
        let layers = flatten(&forest);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, "b");
    }

    #[test]
    fn arc_defaults_follow_node_color() {
        let mut a = item("a", ItemType::Arc, endpoints());
        a.color = Some(Color(0, 200, 255));
        let layers = flatten(&[Rc::new(a)]);
        match &layers[0].kind {
            DescriptorKind::Arc {
                source_color,
                target_color,
                width,
                ..
            } => {
                assert_eq!(*source_color, Color(0, 200, 255));
                // No targetColor: falls back to the node color.
                assert_eq!(*target_color, Color(0, 200, 255));
                assert_eq!(*width, DEFAULT_WIDTH);
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn legacy_path_line_becomes_a_path_descriptor() {
        let a = item(
            "a",
            ItemType::Line,
            Some(Geometry::Track {
                path: vec![LonLat(-46.0, -23.0), LonLat(-43.0, -22.0)],
            }),
        );
        let layers = flatten(&[Rc::new(a)]);
        assert!(matches!(layers[0].kind, DescriptorKind::Path { .. }));
    }

    #[test]
    fn flat_shapes_never_extrude() {
        let mut a = item(
            "a",
            ItemType::Scatterplot,
            Some(Geometry::Point {
                coordinates: LonLat(-46.6, -23.5),
            }),
        );
        if let NodeKind::Item { shape, value, .. } = &mut a.kind {
            *shape = Some(PointShape::Circle2d);
            *value = Some(80.0);
        }
        let layers = flatten(&[Rc::new(a)]);
        match &layers[0].kind {
            DescriptorKind::Scatter {
                extruded,
                elevation,
                radius,
                ..
            } => {
                assert!(!extruded);
                assert_eq!(*elevation, 0.0);
                assert_eq!(*radius, DEFAULT_RADIUS_M);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn three_d_shape_takes_elevation_from_value() {
        let mut a = item(
            "a",
            ItemType::Scatterplot,
            Some(Geometry::Point {
                coordinates: LonLat(-46.6, -23.5),
            }),
        );
        if let NodeKind::Item {
            shape, value, size, ..
        } = &mut a.kind
        {
            *shape = Some(PointShape::Circle3d);
            *value = Some(80.0);
            *size = Some(60.0);
        }
        let layers = flatten(&[Rc::new(a)]);
        match &layers[0].kind {
            DescriptorKind::Scatter {
                extruded,
                elevation,
                radius,
                ..
            } => {
                assert!(extruded);
                assert_eq!(*elevation, 80.0 * ELEVATION_SCALE);
                assert_eq!(*radius, 60.0 * RADIUS_SCALE);
            }
            other => panic!("expected scatter, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_geometry_is_excluded() {
        let a = item(
            "a",
            ItemType::Arc,
            Some(Geometry::Point {
                coordinates: LonLat(0.0, 0.0),
            }),
        );
        assert!(flatten(&[Rc::new(a)]).is_empty());
    }

    #[test]
    fn unknown_item_type_is_excluded() {
        let a = item("a", ItemType::Unknown, endpoints());
        assert!(flatten(&[Rc::new(a)]).is_empty());
    }

    #[test]
    fn descriptor_carries_node_metadata() {
        let mut a = item("a", ItemType::Arc, endpoints());
        a.info = Some("**Soy** exports".to_string());
        if let NodeKind::Item { value, .. } = &mut a.kind {
            *value = Some(128.0);
        }
        let layers = flatten(&[Rc::new(a)]);
        assert_eq!(layers[0].info.as_deref(), Some("**Soy** exports"));
        assert_eq!(layers[0].value, Some(128.0));
    }
}
