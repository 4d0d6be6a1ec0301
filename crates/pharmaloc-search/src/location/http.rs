use std::time::Duration;

use pharmaloc_core::Coordinate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::provider::{GeolocationProvider, PositionOptions};
use crate::error::GeolocationError;

/// Position adapter for an HTTP geolocation endpoint (IP lookup services,
/// a device daemon, a test double).
///
/// The endpoint must answer `GET` with a JSON object carrying `latitude` and
/// `longitude` (`lat`, `lng` and `lon` are accepted as well). `401`/`403`
/// count as a refused permission; anything else that is not a usable fix is
/// "unavailable".
#[derive(Debug, Clone)]
pub struct HttpGeolocationProvider {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PositionBody {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
}

impl HttpGeolocationProvider {
    /// # Errors
    ///
    /// Returns [`GeolocationError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, GeolocationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeolocationError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GeolocationProvider for HttpGeolocationProvider {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinate, GeolocationError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("high_accuracy", options.high_accuracy)])
            .timeout(options.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeolocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(GeolocationError::Unavailable(format!(
                "geolocation endpoint returned {status}"
            )));
        }

        let body: PositionBody = response.json().await.map_err(map_transport_error)?;
        Coordinate::new(body.latitude, body.longitude)
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> GeolocationError {
    if error.is_timeout() {
        GeolocationError::Timeout
    } else {
        GeolocationError::Unavailable(error.to_string())
    }
}
