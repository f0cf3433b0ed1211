// src/models/responses.rs
// DOCUMENTATION: Request queries and response bodies for the HTTP API
// PURPOSE: Typed contract between handlers and clients

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Category, LocationRecord, RankedLocation};
use crate::services::geolocation::GeolocationError;
use crate::services::map_view::Viewport;
use crate::services::view::{CategoryView, LoadState};

/// Default size of the "nearest to you" strip
pub const DEFAULT_NEAREST_K: usize = 3;

/// Query parameters for text search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text term; missing means "everything"
    #[serde(default)]
    pub q: String,
}

/// Query parameters for the nearest endpoint.
/// The browser resolves its own position and forwards either the
/// coordinates or the reason it could not.
#[derive(Debug, Deserialize, Validate)]
pub struct NearestQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,

    /// How many locations to return (default 3)
    #[validate(range(min = 1, max = 50))]
    pub k: Option<usize>,

    /// `permission-denied`, `unavailable` or `timeout`
    pub geo_error: Option<String>,
}

/// Every category, in display order
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub data: &'static [Category],
    pub total_count: usize,
}

/// Category detail page
#[derive(Debug, Serialize)]
pub struct CategoryPageResponse {
    pub category: &'static Category,
    pub state: LoadState,
    pub total_count: usize,
    pub locations: Vec<LocationRecord>,
    pub viewport: Viewport,
}

impl CategoryPageResponse {
    /// Snapshot a view that has a category; `None` for a not-found view
    pub fn from_view(view: &CategoryView) -> Option<Self> {
        let category = view.category()?;
        Some(Self {
            category,
            state: view.state(),
            total_count: view.locations().len(),
            locations: view.locations().to_vec(),
            viewport: *view.map(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub category: &'static str,
    pub query: String,
    pub total_count: usize,
    pub data: Vec<LocationRecord>,
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub category: &'static str,
    pub data: Vec<RankedLocation>,
    /// Set when no position was available; `data` is then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation_error: Option<GeolocationError>,
    /// Inline notice for the user, paired with `geolocation_error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Map state after selecting a location
#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub location: LocationRecord,
    /// Id of the selected location, absent when it could not be plotted
    pub selected: Option<String>,
    pub viewport: Viewport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_query_bounds() {
        let ok = NearestQuery {
            lat: Some(-22.9),
            lng: Some(-42.5),
            k: Some(3),
            geo_error: None,
        };
        assert!(ok.validate().is_ok());

        let bad_lat = NearestQuery {
            lat: Some(91.0),
            ..ok
        };
        assert!(bad_lat.validate().is_err());

        let bad_k = NearestQuery {
            lat: None,
            lng: None,
            k: Some(0),
            geo_error: None,
        };
        assert!(bad_k.validate().is_err());
    }

    #[test]
    fn test_page_response_from_view() {
        let mut view = CategoryView::default();
        assert!(CategoryPageResponse::from_view(&view).is_none());

        let token = view.navigate("trilhas").unwrap();
        view.apply(&token, vec![LocationRecord::empty("pedra")]);

        let page = CategoryPageResponse::from_view(&view).unwrap();
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["category"]["id"], "trilhas");
        assert_eq!(value["state"], "loaded");
        assert_eq!(value["total_count"], 1);
        assert_eq!(value["viewport"]["zoom"], 13);
    }
}
