use std::future::Future;
use std::time::Duration;

use pharmaloc_core::{Coordinate, CoreError};

use crate::error::GeolocationError;

/// Options forwarded to a provider for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest fix the provider itself may hand back from its own cache.
    pub maximum_age: Duration,
}

/// A source of the caller's current position.
///
/// Providers report failures; they never substitute a default coordinate.
/// That is the resolver's job.
pub trait GeolocationProvider: Send + Sync {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// A position the client already obtained from its own device and sent along
/// with the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportedPosition {
    Fix(Coordinate),
    Error(GeolocationError),
    /// The client sent neither a position nor an error.
    Missing,
}

impl ReportedPosition {
    /// Interpret query parameters sent by a browser client.
    ///
    /// A device error code wins over any coordinates. Coordinates are used only
    /// when both halves are present.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if both halves are present but
    /// out of range.
    pub fn from_query(
        lat: Option<f64>,
        lng: Option<f64>,
        error_code: Option<u16>,
    ) -> Result<Self, CoreError> {
        if let Some(code) = error_code {
            return Ok(ReportedPosition::Error(GeolocationError::from_code(code)));
        }
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(ReportedPosition::Fix(Coordinate::new(lat, lng)?)),
            _ => Ok(ReportedPosition::Missing),
        }
    }
}

impl GeolocationProvider for ReportedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        match self {
            ReportedPosition::Fix(coordinate) => Ok(*coordinate),
            ReportedPosition::Error(error) => Err(error.clone()),
            ReportedPosition::Missing => Err(GeolocationError::Unavailable(
                "client did not report a position".to_string(),
            )),
        }
    }
}
