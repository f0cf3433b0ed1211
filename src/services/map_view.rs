// src/services/map_view.rs
// DOCUMENTATION: Map viewport state and marker export
// PURPOSE: Keep the map pointed at the right place and hand markers to renderers

use geo_types::Point;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use serde_json::Value;

use crate::models::{Coordinates, LocationRecord};

/// Saquarema centro
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: -22.9249,
    lng: -42.5084,
};

pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom used when a single location is selected
pub const FOCUS_ZOOM: u8 = 16;

/// Anything that can be pointed at a center with a zoom level
pub trait MapController {
    fn set_view(&mut self, center: Coordinates, zoom: u8);
}

/// Server-side viewport, returned to clients so they can sync their map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapController for Viewport {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }
}

/// Center the map on `record` at focus zoom. A record without usable
/// coordinates sends the map back to the default view instead; returns
/// whether the record could be focused.
pub fn focus_on<M: MapController>(map: &mut M, record: &LocationRecord) -> bool {
    match record.usable_coordinates() {
        Some(point) => {
            map.set_view(point, FOCUS_ZOOM);
            true
        }
        None => {
            log::debug!("Location {} has no coordinates; resetting map", record.id);
            reset(map);
            false
        }
    }
}

/// Back to the town-wide view
pub fn reset<M: MapController>(map: &mut M) {
    map.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);
}

/// One point feature per plottable record
pub fn markers(records: &[LocationRecord]) -> FeatureCollection {
    let features = records
        .iter()
        .filter_map(|record| {
            let point = record.usable_coordinates()?;
            let geometry = Geometry::new(geojson::Value::from(&Point::new(point.lng, point.lat)));
            Some(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(Id::String(record.id.clone())),
                properties: Some(marker_properties(record)),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn marker_properties(record: &LocationRecord) -> JsonObject {
    let mut properties = JsonObject::new();
    if let Some(name) = &record.name {
        properties.insert("name".to_string(), Value::from(name.as_str()));
    }
    if let Some(description) = &record.description {
        properties.insert("description".to_string(), Value::from(description.as_str()));
    }
    if let Some(address) = &record.address {
        properties.insert("address".to_string(), Value::from(address.as_str()));
    }
    if let Some(rating) = record.rating {
        properties.insert("rating".to_string(), Value::from(rating));
    }
    properties
}
