//! Location picking: geolocation and geocoding capabilities.
//!
//! Both capabilities are external and one-shot. A [`Geolocator`] answers
//! with a position, an error, or "unsupported"; a [`Geocoder`] turns a
//! free-text query into a coordinate. The [`LocationPicker`] holds the
//! currently selected location for a form.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, Result};
use crate::models::{GeoPoint, Notification};
use crate::submit::Busy;

/// Centre of New Delhi, used by the mock geocoder.
pub const DELHI: GeoPoint = GeoPoint::new(28.6139, 77.209);

// ---

/// A chosen location, optionally with the address it was searched by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickedLocation {
    #[serde(flatten)]
    pub point: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("{0}")]
    Failed(String),
}

impl From<GeolocationError> for AppError {
    fn from(err: GeolocationError) -> Self {
        // ---
        match err {
            GeolocationError::Unsupported => AppError::unsupported(
                "Geolocation not supported",
                "Your browser does not support geolocation",
            ),
            GeolocationError::Failed(msg) => AppError::operation("Error getting location", msg),
        }
    }
}

/// Confirmation shown after the device position was used.
pub fn detected(point: GeoPoint) -> Notification {
    Notification::success(
        "Location detected",
        format!("Latitude: {:.4}, Longitude: {:.4}", point.lat, point.lng),
    )
}

/// One-shot "where am I" capability.
pub trait Geolocator {
    fn current_position(&self) -> std::result::Result<GeoPoint, GeolocationError>;
}

/// Geolocation result reported by the client device.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPosition {
    pub position: Option<GeoPoint>,
    pub error: Option<String>,
}

impl Geolocator for ClientPosition {
    fn current_position(&self) -> std::result::Result<GeoPoint, GeolocationError> {
        // ---
        match (&self.position, &self.error) {
            (Some(p), _) => Ok(*p),
            (None, Some(msg)) => Err(GeolocationError::Failed(msg.clone())),
            (None, None) => Err(GeolocationError::Unsupported),
        }
    }
}

/// Free-text location search.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<PickedLocation>;
}

/// Pretends to geocode: answers near Delhi after a delay.
#[derive(Debug, Clone)]
pub struct MockGeocoder {
    pub delay: Duration,
    pub origin: GeoPoint,
    /// Maximum offset in degrees applied to each axis.
    pub jitter: f64,
}

impl MockGeocoder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            origin: DELHI,
            jitter: 0.05,
        }
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, query: &str) -> Result<PickedLocation> {
        // ---
        tokio::time::sleep(self.delay).await;

        let (dlat, dlng) = if self.jitter > 0.0 {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(-self.jitter..=self.jitter),
                rng.gen_range(-self.jitter..=self.jitter),
            )
        } else {
            (0.0, 0.0)
        };

        Ok(PickedLocation {
            point: GeoPoint::new(self.origin.lat + dlat, self.origin.lng + dlng),
            address: Some(query.to_string()),
        })
    }
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl HttpGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn lookup(&self, query: &str) -> anyhow::Result<Option<PickedLocation>> {
        // ---
        tracing::debug!("Geocoding '{}' via {}", query, self.base_url);

        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, "riverguard")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let lat = place.lat.parse().context("invalid latitude")?;
        let lng = place.lon.parse().context("invalid longitude")?;

        Ok(Some(PickedLocation {
            point: GeoPoint::new(lat, lng),
            address: Some(place.display_name),
        }))
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn search(&self, query: &str) -> Result<PickedLocation> {
        // ---
        match self.lookup(query).await {
            Ok(Some(found)) => Ok(found),
            Ok(None) => Err(AppError::NotFound("location", query.to_string())),
            Err(e) => {
                tracing::error!("Geocoding '{}' failed: {:#}", query, e);
                Err(AppError::operation("Error searching location", e.to_string()))
            }
        }
    }
}

/// Selected location of a form plus its search state.
#[derive(Debug, Clone, Default)]
pub struct LocationPicker {
    current: Option<PickedLocation>,
    loading: Busy,
}

impl LocationPicker {
    pub fn new(initial: Option<GeoPoint>) -> Self {
        Self {
            current: initial.map(|point| PickedLocation {
                point,
                address: None,
            }),
            loading: Busy::default(),
        }
    }

    pub fn current(&self) -> Option<&PickedLocation> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    pub fn select(&mut self, location: PickedLocation) {
        self.current = Some(location);
    }

    /// Ask the device for its position and select it.
    pub fn use_current_location(&mut self, locator: &dyn Geolocator) -> Result<GeoPoint> {
        // ---
        let point = locator.current_position().map_err(|e| {
            tracing::warn!("Error getting location: {}", e);
            AppError::from(e)
        })?;
        self.select(PickedLocation {
            point,
            address: None,
        });
        Ok(point)
    }

    /// Validate a search query and hand out the loading token.
    ///
    /// The caller runs the geocoder while holding the token and then calls
    /// [`LocationPicker::select`] with the result.
    pub fn begin_search(&self, query: &str) -> Result<(String, crate::submit::BusyToken)> {
        // ---
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation(
                "Missing search",
                "Enter a place to search for.",
            ));
        }
        let token = self
            .loading
            .try_acquire()
            .ok_or_else(|| AppError::Conflict("A location search is already running".into()))?;
        Ok((query.to_string(), token))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_client_position_branches() {
        // ---
        let ok = ClientPosition {
            position: Some(GeoPoint::new(28.7, 77.2)),
            error: None,
        };
        assert_eq!(ok.current_position(), Ok(GeoPoint::new(28.7, 77.2)));

        let denied = ClientPosition {
            position: None,
            error: Some("User denied Geolocation".into()),
        };
        assert_eq!(
            AppError::from(denied.current_position().unwrap_err()),
            AppError::operation("Error getting location", "User denied Geolocation")
        );

        let unsupported = ClientPosition::default();
        assert!(matches!(
            AppError::from(unsupported.current_position().unwrap_err()),
            AppError::Unsupported { .. }
        ));
    }

    #[test]
    fn test_use_current_location_selects_point() {
        // ---
        let mut picker = LocationPicker::default();
        let locator = ClientPosition {
            position: Some(DELHI),
            error: None,
        };
        assert_eq!(picker.use_current_location(&locator).unwrap(), DELHI);
        assert_eq!(picker.current().unwrap().point, DELHI);

        // a failed request leaves the previous selection alone
        assert!(picker.use_current_location(&ClientPosition::default()).is_err());
        assert_eq!(picker.current().unwrap().point, DELHI);
    }

    #[test]
    fn test_begin_search_rejects_blank_and_concurrent() {
        // ---
        let picker = LocationPicker::new(None);
        assert!(matches!(picker.begin_search("   "), Err(AppError::Validation { .. })));

        let (query, token) = picker.begin_search("  Okhla Barrage ").unwrap();
        assert_eq!(query, "Okhla Barrage");
        assert!(picker.is_loading());
        assert!(matches!(picker.begin_search("ITO"), Err(AppError::Conflict(_))));

        drop(token);
        assert!(!picker.is_loading());
    }

    #[tokio::test]
    async fn test_mock_geocoder_stays_near_delhi() {
        // ---
        let geocoder = MockGeocoder::new(Duration::ZERO);
        for _ in 0..20 {
            let found = geocoder.search("Kalindi Kunj").await.unwrap();
            assert!((found.point.lat - DELHI.lat).abs() <= 0.05 + 1e-9);
            assert!((found.point.lng - DELHI.lng).abs() <= 0.05 + 1e-9);
            assert_eq!(found.address.as_deref(), Some("Kalindi Kunj"));
        }
    }
}
