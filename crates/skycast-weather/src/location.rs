//! Device geolocation seam.
//!
//! Hosts plug in their platform's location service by implementing
//! [`Geolocator`]. A request is single-shot; timeouts are the platform's.

use std::future::Future;

use crate::types::{Coordinates, LocationError};

pub trait Geolocator: Send + Sync {
    /// Request the current position once.
    fn locate(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;

    /// Whether a location backend exists at all.
    ///
    /// When this is false, callers report [`LocationError::Unsupported`]
    /// without calling [`Geolocator::locate`].
    fn is_available(&self) -> bool {
        true
    }
}

/// Platform location service. No backend is wired up yet, so every request
/// reports that geolocation is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGeolocator;

impl Geolocator for SystemGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        get_current_location().await
    }

    fn is_available(&self) -> bool {
        is_available()
    }
}

pub async fn get_current_location() -> Result<Coordinates, LocationError> {
    Err(LocationError::Unsupported)
}

pub fn is_available() -> bool {
    false
}

/// Always answers with the same outcome. Useful for hosts with a fixed
/// home location and for tests.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    outcome: Result<Coordinates, LocationError>,
}

impl FixedGeolocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            outcome: Ok(Coordinates::new(latitude, longitude)),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_geolocator_reports_unsupported() {
        let locator = SystemGeolocator;
        assert!(!locator.is_available());
        assert_eq!(locator.locate().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn test_fixed_geolocator() {
        let locator = FixedGeolocator::at(51.5, -0.12);
        assert!(locator.is_available());
        assert_eq!(locator.locate().await, Ok(Coordinates::new(51.5, -0.12)));

        let denied = FixedGeolocator::failing(LocationError::PermissionDenied);
        assert_eq!(denied.locate().await, Err(LocationError::PermissionDenied));
    }
}
