//! Location Resolver: turns a provider's answer into a coordinate the search
//! can always use.

mod http;
mod provider;

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use pharmaloc_core::{AppConfig, Coordinate};
use serde::Serialize;

use crate::error::GeolocationError;

pub use http::HttpGeolocationProvider;
pub use provider::{GeolocationProvider, PositionOptions, ReportedPosition};

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);
const DEFAULT_MAX_AGE: Duration = Duration::from_millis(60_000);

/// How a resolved coordinate was obtained. Advisory only: the search proceeds
/// the same way for every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    /// A live (or recently cached) fix from the provider.
    Granted,
    /// The provider refused access; the default coordinate is used.
    Denied,
    /// No fix could be obtained; the default coordinate is used.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub status: LocationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub timeout: Duration,
    /// Cached fixes younger than this are reused.
    pub max_age: Duration,
    /// Skip the cache and always ask the provider.
    pub force_refresh: bool,
    pub high_accuracy: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_age: DEFAULT_MAX_AGE,
            force_refresh: false,
            high_accuracy: true,
        }
    }
}

impl ResolveOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.geo_timeout_ms),
            max_age: Duration::from_millis(config.geo_max_age_ms),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn refreshed(self) -> Self {
        Self {
            force_refresh: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedFix {
    coordinate: Coordinate,
    obtained_at: Instant,
}

/// Resolves the caller's coordinate, never failing.
///
/// Only successful fixes are cached. The provider is asked at most once per
/// call; there are no internal retries.
pub struct LocationResolver<P> {
    provider: P,
    fallback: Coordinate,
    cache: Mutex<Option<CachedFix>>,
}

impl<P: GeolocationProvider> LocationResolver<P> {
    pub fn new(provider: P, fallback: Coordinate) -> Self {
        Self {
            provider,
            fallback,
            cache: Mutex::new(None),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    pub async fn resolve(&self, options: &ResolveOptions) -> ResolvedLocation {
        if !options.force_refresh {
            if let Some(coordinate) = self.cached(options.max_age) {
                tracing::debug!(lat = coordinate.lat, lng = coordinate.lng, "using cached fix");
                return ResolvedLocation {
                    coordinate,
                    status: LocationStatus::Granted,
                };
            }
        }

        let position_options = PositionOptions {
            high_accuracy: options.high_accuracy,
            timeout: options.timeout,
            maximum_age: options.max_age,
        };
        let outcome = tokio::time::timeout(
            options.timeout,
            self.provider.current_position(&position_options),
        )
        .await
        .unwrap_or(Err(GeolocationError::Timeout));

        match outcome {
            Ok(coordinate) => {
                self.store(coordinate);
                ResolvedLocation {
                    coordinate,
                    status: LocationStatus::Granted,
                }
            }
            Err(error) => {
                let status = match error {
                    GeolocationError::PermissionDenied => LocationStatus::Denied,
                    GeolocationError::Unavailable(_) | GeolocationError::Timeout => {
                        LocationStatus::Default
                    }
                };
                tracing::warn!(
                    %error,
                    lat = self.fallback.lat,
                    lng = self.fallback.lng,
                    "location unavailable; using default coordinate"
                );
                ResolvedLocation {
                    coordinate: self.fallback,
                    status,
                }
            }
        }
    }

    pub fn clear_cache(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cached(&self, max_age: Duration) -> Option<Coordinate> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        (*cache)
            .filter(|fix| fix.obtained_at.elapsed() < max_age)
            .map(|fix| fix.coordinate)
    }

    fn store(&self, coordinate: Coordinate) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedFix {
            coordinate,
            obtained_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const HERE: Coordinate = Coordinate {
        lat: 12.40,
        lng: -1.50,
    };

    /// Answers with a fixed result and counts how often it was asked.
    struct CountingProvider {
        answer: Result<Coordinate, GeolocationError>,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new(answer: Result<Coordinate, GeolocationError>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GeolocationProvider for CountingProvider {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinate, GeolocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    struct SlowProvider;

    impl GeolocationProvider for SlowProvider {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinate, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(HERE)
        }
    }

    fn resolver(answer: Result<Coordinate, GeolocationError>) -> LocationResolver<CountingProvider> {
        LocationResolver::new(CountingProvider::new(answer), Coordinate::OUAGADOUGOU)
    }

    #[tokio::test]
    async fn granted_fix_is_returned() {
        let resolver = resolver(Ok(HERE));
        let resolved = resolver.resolve(&ResolveOptions::default()).await;
        assert_eq!(resolved.coordinate, HERE);
        assert_eq!(resolved.status, LocationStatus::Granted);
    }

    #[tokio::test]
    async fn denied_falls_back_with_denied_status() {
        let resolver = resolver(Err(GeolocationError::PermissionDenied));
        let resolved = resolver.resolve(&ResolveOptions::default()).await;
        assert_eq!(resolved.coordinate, Coordinate::OUAGADOUGOU);
        assert_eq!(resolved.status, LocationStatus::Denied);
    }

    #[tokio::test]
    async fn unavailable_falls_back_with_default_status() {
        let resolver = resolver(Err(GeolocationError::Unavailable("no gps".to_string())));
        let resolved = resolver.resolve(&ResolveOptions::default()).await;
        assert_eq!(resolved.coordinate, Coordinate::OUAGADOUGOU);
        assert_eq!(resolved.status, LocationStatus::Default);
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_default() {
        let resolver = LocationResolver::new(SlowProvider, Coordinate::OUAGADOUGOU);
        let options = ResolveOptions {
            timeout: Duration::from_millis(20),
            ..ResolveOptions::default()
        };
        let resolved = resolver.resolve(&options).await;
        assert_eq!(resolved.coordinate, Coordinate::OUAGADOUGOU);
        assert_eq!(resolved.status, LocationStatus::Default);
    }

    #[tokio::test]
    async fn fresh_fix_is_served_from_cache() {
        let resolver = resolver(Ok(HERE));
        let options = ResolveOptions::default();
        resolver.resolve(&options).await;
        let second = resolver.resolve(&options).await;
        assert_eq!(second.coordinate, HERE);
        assert_eq!(resolver.provider().calls(), 1);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_cache() {
        let resolver = resolver(Ok(HERE));
        let options = ResolveOptions::default();
        resolver.resolve(&options).await;
        resolver.resolve(&options.refreshed()).await;
        assert_eq!(resolver.provider().calls(), 2);
    }

    #[tokio::test]
    async fn zero_max_age_never_reuses_a_fix() {
        let resolver = resolver(Ok(HERE));
        let options = ResolveOptions {
            max_age: Duration::ZERO,
            ..ResolveOptions::default()
        };
        resolver.resolve(&options).await;
        resolver.resolve(&options).await;
        assert_eq!(resolver.provider().calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let resolver = resolver(Err(GeolocationError::Timeout));
        let options = ResolveOptions::default();
        resolver.resolve(&options).await;
        resolver.resolve(&options).await;
        assert_eq!(resolver.provider().calls(), 2);
    }

    #[tokio::test]
    async fn clear_cache_forces_a_new_request() {
        let resolver = resolver(Ok(HERE));
        let options = ResolveOptions::default();
        resolver.resolve(&options).await;
        resolver.clear_cache();
        resolver.resolve(&options).await;
        assert_eq!(resolver.provider().calls(), 2);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LocationStatus::Denied).unwrap(),
            "\"denied\""
        );
    }
}
