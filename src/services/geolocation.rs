// src/services/geolocation.rs
// DOCUMENTATION: One-shot device position lookup
// PURPOSE: Give the ranker an origin, or a reason why there is none

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::models::Coordinates;

/// Why no position is available. Shown inline; never blocks the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "kebab-case")]
pub enum GeolocationError {
    #[error("permission-denied")]
    PermissionDenied,

    #[error("unavailable")]
    Unavailable,

    #[error("timeout")]
    Timeout,
}

impl GeolocationError {
    /// Parse the reason string reported by a browser client
    pub fn from_reason(reason: &str) -> Option<Self> {
        match reason.trim().to_ascii_lowercase().as_str() {
            "permission-denied" | "permission_denied" | "denied" => Some(Self::PermissionDenied),
            "unavailable" | "position-unavailable" | "position_unavailable" => {
                Some(Self::Unavailable)
            }
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }

    /// Inline message for the "nearest to you" strip
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission was denied; nearby places are hidden.",
            Self::Unavailable => "Your location is unavailable right now.",
            Self::Timeout => "Locating you took too long; try again.",
        }
    }
}

/// One-shot position source
pub trait Geolocator: Send + Sync {
    fn current_position(&self)
        -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// Ask `geolocator` once, giving up after `timeout`
pub async fn locate_once<G: Geolocator>(
    geolocator: &G,
    timeout: Duration,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(timeout, geolocator.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            log::debug!("Geolocation timed out after {}ms", timeout.as_millis());
            Err(GeolocationError::Timeout)
        }
    }
}

/// Position (or failure) reported by the browser alongside the request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPosition {
    reported: Result<Coordinates, GeolocationError>,
}

impl ClientPosition {
    /// A reported error wins over coordinates; missing or non-finite
    /// coordinates mean the position is unavailable.
    pub fn new(lat: Option<f64>, lng: Option<f64>, error: Option<GeolocationError>) -> Self {
        let reported = match (error, lat, lng) {
            (Some(error), _, _) => Err(error),
            (None, Some(lat), Some(lng)) => {
                let point = Coordinates::new(lat, lng);
                if point.is_usable() {
                    Ok(point)
                } else {
                    Err(GeolocationError::Unavailable)
                }
            }
            _ => Err(GeolocationError::Unavailable),
        };
        Self { reported }
    }
}

impl Geolocator for ClientPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverAnswers;

    impl Geolocator for NeverAnswers {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_reason_parsing() {
        assert_eq!(
            GeolocationError::from_reason("permission-denied"),
            Some(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            GeolocationError::from_reason(" TIMEOUT "),
            Some(GeolocationError::Timeout)
        );
        assert_eq!(GeolocationError::from_reason("what"), None);
    }

    #[test]
    fn test_serializes_kebab_case() {
        let value = serde_json::to_value(GeolocationError::PermissionDenied).unwrap();
        assert_eq!(value, "permission-denied");
    }

    #[test]
    fn test_client_position_ok() {
        let position = ClientPosition::new(Some(-22.92), Some(-42.51), None);
        let result = tokio_test::block_on(position.current_position());
        assert_eq!(result, Ok(Coordinates::new(-22.92, -42.51)));
    }

    #[test]
    fn test_client_position_reported_error_wins() {
        let position = ClientPosition::new(
            Some(-22.92),
            Some(-42.51),
            Some(GeolocationError::PermissionDenied),
        );
        let result = tokio_test::block_on(position.current_position());
        assert_eq!(result, Err(GeolocationError::PermissionDenied));
    }

    #[test]
    fn test_client_position_missing_coordinates() {
        let position = ClientPosition::new(Some(-22.92), None, None);
        let result = tokio_test::block_on(position.current_position());
        assert_eq!(result, Err(GeolocationError::Unavailable));
    }

    #[tokio::test]
    async fn test_locate_once_times_out() {
        let result = locate_once(&NeverAnswers, Duration::from_millis(20)).await;
        assert_eq!(result, Err(GeolocationError::Timeout));
    }

    #[tokio::test]
    async fn test_locate_once_passes_through() {
        let position = ClientPosition::new(Some(1.0), Some(2.0), None);
        let result = locate_once(&position, Duration::from_secs(1)).await;
        assert_eq!(result, Ok(Coordinates::new(1.0, 2.0)));
    }
}
