//! Device position lookup.

use std::future::Future;

use fitmap_core::Coordinate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out waiting for a position fix")]
    Timeout,
    #[error("geolocation failed: {0}")]
    Unknown(String),
}

pub trait GeolocationProvider {
    fn current_position(&self)
        -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// A position known up front, e.g. from command-line flags.
///
/// With no position every lookup fails with
/// [`GeolocationError::PositionUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGeolocation {
    position: Option<Coordinate>,
}

impl StaticGeolocation {
    #[must_use]
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

impl GeolocationProvider for StaticGeolocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.position.ok_or(GeolocationError::PositionUnavailable)
    }
}
