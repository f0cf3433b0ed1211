// src/services/ranker.rs
// DOCUMENTATION: Great-circle distance and "nearest to you" ranking

use crate::models::{Coordinates, LocationRecord, RankedLocation};

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate distance between two coordinates in kilometers
/// Uses Haversine formula
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// The `k` records closest to `origin`, nearest first.
///
/// Records without usable coordinates are left out entirely. The sort is
/// stable, so equal distances keep their input order.
pub fn nearest(origin: Coordinates, records: &[LocationRecord], k: usize) -> Vec<RankedLocation> {
    let mut ranked: Vec<RankedLocation> = records
        .iter()
        .filter_map(|record| {
            record.usable_coordinates().map(|point| RankedLocation {
                location: record.clone(),
                distance_km: haversine_km(origin, point),
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}
