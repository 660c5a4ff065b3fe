//! Round-trip between a node and the flat record a property form binds
//! field-by-field. Node-level keys and geometry keys live side by side in
//! the record; the inverse projection pulls the node-level keys back out
//! and reassembles the rest into the item's `data` payload.

use serde::{Deserialize, Serialize};

use crate::model::{Color, Geometry, ItemType, LonLat, NodePatch, PointShape, ProjectNode};

/// One flat key-value record per node, as the editor form sees it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(rename = "itemType", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<PointShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    // Geometry fields, spread flat from `data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<LonLat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<serde_json::Value>,
}

pub fn to_form_record(node: &ProjectNode) -> FormRecord {
    let mut record = FormRecord {
        name: node.name.clone(),
        color: node.color,
        info: node.info.clone(),
        ..FormRecord::default()
    };
    if let crate::model::NodeKind::Item {
        item_type,
        width,
        size,
        shape,
        value,
        data,
    } = &node.kind
    {
        record.item_type = Some(*item_type);
        record.width = *width;
        record.size = *size;
        record.shape = *shape;
        record.value = *value;
        match data {
            Some(Geometry::Endpoints { source, target }) => {
                record.source = Some(*source);
                record.target = Some(*target);
            }
            Some(Geometry::Track { path }) => record.path = Some(path.clone()),
            Some(Geometry::Point { coordinates }) => record.coordinates = Some(*coordinates),
            Some(Geometry::Raw(value)) => record.geojson = Some(value.clone()),
            None => {}
        }
    }
    record
}

/// Inverse split: known node-level keys become patch fields, the geometry
/// keys are reassembled into a `data` payload keyed by the record's item
/// type. A record with no geometry fields leaves `data` untouched.
pub fn from_form_record(record: &FormRecord) -> NodePatch {
    NodePatch {
        name: Some(record.name.clone()),
        visible: None,
        info: record.info.clone(),
        color: record.color,
        target_color: None,
        item_type: record.item_type,
        width: record.width,
        size: record.size,
        shape: record.shape,
        value: record.value,
        data: assemble_geometry(record),
    }
}

fn assemble_geometry(record: &FormRecord) -> Option<Geometry> {
    match record.item_type {
        Some(ItemType::Arc) | Some(ItemType::Line) => endpoints_or_track(record),
        Some(ItemType::Scatterplot) => record
            .coordinates
            .map(|coordinates| Geometry::Point { coordinates }),
        Some(ItemType::GeoJson) => record.geojson.clone().map(Geometry::Raw),
        // No item type (groups, or a record that never carried one): take
        // whichever geometry fields are present, most specific first.
        Some(ItemType::Unknown) | None => endpoints_or_track(record)
            .or_else(|| {
                record
                    .coordinates
                    .map(|coordinates| Geometry::Point { coordinates })
            })
            .or_else(|| record.geojson.clone().map(Geometry::Raw)),
    }
}

fn endpoints_or_track(record: &FormRecord) -> Option<Geometry> {
    match (record.source, record.target, &record.path) {
        (Some(source), Some(target), _) => Some(Geometry::Endpoints { source, target }),
        (_, _, Some(path)) => Some(Geometry::Track { path: path.clone() }),
        _ => None,
    }
}
