use std::time::Duration;

use thiserror::Error;

/// Failures from the catalog store. All of them route the retriever to the
/// fallback dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog store is disabled")]
    Disabled,

    #[error("catalog store query timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("catalog store query failed: {0}")]
    Db(#[from] sqlx::Error),

    #[error("catalog store unavailable: {0}")]
    Unavailable(String),
}

/// Why a position fix could not be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for a position fix")]
    Timeout,
}

impl GeolocationError {
    /// Map a W3C `GeolocationPositionError.code` (1 denied, 2 unavailable,
    /// 3 timeout) onto an error. Unknown codes count as unavailable.
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            3 => GeolocationError::Timeout,
            other => GeolocationError::Unavailable(format!("device error code {other}")),
        }
    }
}
