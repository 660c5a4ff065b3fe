use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Shared handle to a node. Tree operations rebuild only the path from a
/// root down to the edited node; everything else is shared by reference,
/// so hosts doing identity-based change detection see untouched subtrees
/// as the same object.
pub type NodeRef = Rc<ProjectNode>;

/// RGB color, 0-255 per channel. Serialized as a `[r, g, b]` array to stay
/// wire-compatible with persisted documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Used when an item carries no color of its own.
    pub const FALLBACK: Color = Color(255, 0, 255);
}

/// A coordinate pair, ALWAYS `[longitude, latitude]`: in storage, on the
/// wire, and in every descriptor. Editors that display latitude first must
/// swap on input and swap back on write.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat(pub f64, pub f64);

impl LonLat {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }

    /// Build from human/geocoder order (lat first), re-swapping into
    /// storage order.
    pub fn from_lat_lon(lat: f64, lon: f64) -> LonLat {
        LonLat(lon, lat)
    }
}

/// Geometry kind of an item, matching the `itemType` wire strings.
/// Unrecognized strings map to `Unknown` so an imported document loads;
/// unknown items are simply never flattened into render output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemType {
    Arc,
    Line,
    Scatterplot,
    GeoJson,
    Unknown,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Arc => "Arc",
            ItemType::Line => "Line",
            ItemType::Scatterplot => "Scatterplot",
            ItemType::GeoJson => "GeoJson",
            ItemType::Unknown => "Unknown",
        }
    }

    pub fn from_str(s: &str) -> ItemType {
        match s {
            "Arc" => ItemType::Arc,
            "Line" => ItemType::Line,
            "Scatterplot" => ItemType::Scatterplot,
            "GeoJson" => ItemType::GeoJson,
            _ => ItemType::Unknown,
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ItemType::from_str(&s))
    }
}

/// Point rendering shape. 2D variants draw planar, 3D variants extrude a
/// column whose height comes from the item's `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointShape {
    Circle2d,
    Square2d,
    Circle3d,
    Square3d,
}

impl PointShape {
    pub fn is_3d(&self) -> bool {
        matches!(self, PointShape::Circle3d | PointShape::Square3d)
    }
}

/// Typed geometry payload of an item. Untagged: the wire format is the
/// bare object shape (`{source, target}`, `{path}`, `{coordinates}`), with
/// arbitrary GeoJSON falling through to `Raw`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Endpoints { source: LonLat, target: LonLat },
    Track { path: Vec<LonLat> },
    Point { coordinates: LonLat },
    Raw(serde_json::Value),
}

/// Group/item discriminator, internally tagged the way documents persist
/// it: `"type": "group"` or `"type": "item"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Group {
        #[serde(default)]
        children: Vec<NodeRef>,
    },
    Item {
        #[serde(rename = "itemType")]
        item_type: ItemType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shape: Option<PointShape>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Geometry>,
    },
}

/// One entry in the project tree: a Group (container) or an Item
/// (drawable). `id` is unique across the tree and stable for the node's
/// lifetime; only duplication mints a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub id: String,
    pub name: String,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(
        default,
        rename = "targetColor",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_color: Option<Color>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl ProjectNode {
    pub fn group(id: impl Into<String>, name: impl Into<String>) -> ProjectNode {
        ProjectNode {
            id: id.into(),
            name: name.into(),
            visible: true,
            info: None,
            color: None,
            target_color: None,
            kind: NodeKind::Group {
                children: Vec::new(),
            },
        }
    }

    pub fn item(
        id: impl Into<String>,
        name: impl Into<String>,
        item_type: ItemType,
        data: Option<Geometry>,
    ) -> ProjectNode {
        ProjectNode {
            id: id.into(),
            name: name.into(),
            visible: true,
            info: None,
            color: None,
            target_color: None,
            kind: NodeKind::Item {
                item_type,
                width: None,
                size: None,
                shape: None,
                value: None,
                data,
            },
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn children(&self) -> Option<&[NodeRef]> {
        match &self.kind {
            NodeKind::Group { children } => Some(children),
            NodeKind::Item { .. } => None,
        }
    }

    pub fn item_type(&self) -> Option<ItemType> {
        match &self.kind {
            NodeKind::Item { item_type, .. } => Some(*item_type),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Item { data, .. } => data.as_ref(),
            NodeKind::Group { .. } => None,
        }
    }
}

/// Partial-node record merged into an existing node by `tree::update`.
/// Present fields overwrite; absent fields leave the node untouched.
/// Item-only fields are ignored when the target is a group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub info: Option<String>,
    pub color: Option<Color>,
    #[serde(rename = "targetColor")]
    pub target_color: Option<Color>,
    #[serde(rename = "itemType")]
    pub item_type: Option<ItemType>,
    pub width: Option<f64>,
    pub size: Option<f64>,
    pub shape: Option<PointShape>,
    pub value: Option<f64>,
    pub data: Option<Geometry>,
}

impl NodePatch {
    pub fn visibility(visible: bool) -> NodePatch {
        NodePatch {
            visible: Some(visible),
            ..NodePatch::default()
        }
    }

    pub fn apply(&self, node: &mut ProjectNode) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(visible) = self.visible {
            node.visible = visible;
        }
        if let Some(info) = &self.info {
            node.info = Some(info.clone());
        }
        if let Some(color) = self.color {
            node.color = Some(color);
        }
        if let Some(target_color) = self.target_color {
            node.target_color = Some(target_color);
        }
        if let NodeKind::Item {
            item_type,
            width,
            size,
            shape,
            value,
            data,
        } = &mut node.kind
        {
            if let Some(t) = self.item_type {
                *item_type = t;
            }
            if let Some(w) = self.width {
                *width = Some(w);
            }
            if let Some(s) = self.size {
                *size = Some(s);
            }
            if let Some(sh) = self.shape {
                *shape = Some(sh);
            }
            if let Some(v) = self.value {
                *value = Some(v);
            }
            if let Some(d) = &self.data {
                *data = Some(d.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_serializes_as_rgb_array() {
        let json = serde_json::to_string(&Color(0, 200, 255)).unwrap();
        assert_eq!(json, "[0,200,255]");
    }

    #[test]
    fn lonlat_keeps_storage_order() {
        let p = LonLat::from_lat_lon(-23.5, -46.6);
        assert_eq!(p.lon(), -46.6);
        assert_eq!(p.lat(), -23.5);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[-46.6,-23.5]");
    }

    #[test]
    fn unknown_item_type_still_parses() {
        let t: ItemType = serde_json::from_str("\"Hexbin\"").unwrap();
        assert_eq!(t, ItemType::Unknown);
    }

    #[test]
    fn geometry_untagged_matches_by_shape() {
        let arc: Geometry =
            serde_json::from_str(r#"{"source":[-46.6,-23.5],"target":[-43.2,-22.9]}"#).unwrap();
        assert!(matches!(arc, Geometry::Endpoints { .. }));

        let track: Geometry =
            serde_json::from_str(r#"{"path":[[-46.0,-23.0],[-43.0,-22.0]]}"#).unwrap();
        assert!(matches!(track, Geometry::Track { .. }));

        let point: Geometry = serde_json::from_str(r#"{"coordinates":[-46.6,-23.5]}"#).unwrap();
        assert!(matches!(point, Geometry::Point { .. }));

        let raw: Geometry =
            serde_json::from_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(matches!(raw, Geometry::Raw(_)));
    }

    #[test]
    fn patch_ignores_item_fields_on_groups() {
        let mut group = ProjectNode::group("g1", "Routes");
        let patch = NodePatch {
            name: Some("Renamed".to_string()),
            width: Some(8.0),
            ..NodePatch::default()
        };
        patch.apply(&mut group);
        assert_eq!(group.name, "Renamed");
        assert!(group.is_group());
    }
}
