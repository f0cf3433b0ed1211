// src/models/location.rs
// DOCUMENTATION: Normalized location entities
// PURPOSE: Shapes shared by the parser, the cache and every derived view

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::parser::parse_location;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_usable(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A place of interest as produced by the record parser
/// DOCUMENTATION: Optional fields stay `None` when the remote document
/// lacks them so renderers can rely on presence checks. Serialized in
/// camelCase, which is also the cache entry format. Reading one back goes
/// through the record parser, so mistyped fields kept in `extra` survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct LocationRecord {
    /// Remote document identifier
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Category label exactly as stored remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Present only when both components are finite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Remaining document fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    /// Record with only an identifier; used as the parser's starting point
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            address: None,
            category: None,
            coordinates: None,
            hours: None,
            phone: None,
            website: None,
            rating: None,
            image_url: None,
            extra: Map::new(),
        }
    }

    /// Coordinates that can be plotted and ranked
    pub fn usable_coordinates(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_usable)
    }
}

impl TryFrom<Map<String, Value>> for LocationRecord {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| "location record without a string id".to_string())?;
        Ok(parse_location(&fields, id))
    }
}

/// A location paired with its great-circle distance from an origin.
/// Derived per request, never written to the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLocation {
    #[serde(flatten)]
    pub location: LocationRecord,

    /// Kilometers from the origin
    #[serde(rename = "distance")]
    pub distance_km: f64,
}
