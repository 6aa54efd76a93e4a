//! User position for the nearby-store lookup.

use async_trait::async_trait;
use cropsage_core::Coordinates;

use crate::error::GeoError;

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeoError>;
}

/// Reports a position known ahead of time (from configuration).
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

/// Position never available; behaves like a denied permission prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::Unavailable)
    }
}

/// Locates the user, substituting [`Coordinates::FALLBACK`] on any failure.
///
/// The user is not told about the substitution.
pub async fn resolve_coordinates(geolocator: &dyn Geolocator) -> Coordinates {
    match geolocator.locate().await {
        Ok(coords) => coords,
        Err(e) => {
            tracing::debug!(error = %e, "geolocation unavailable, using fallback position");
            Coordinates::FALLBACK
        }
    }
}
