//! Layer response envelope shared by every geospatial endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known layer providers reported in the envelope's `provider` field.
///
/// The envelope keeps `provider` as a plain string because servers are free
/// to report providers this client does not know about yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerProvider {
    Volcanoes,
    ActiveVolcanoes,
    Wildfires,
    ActiveStorms,
    RecentStorms,
    Earthquakes,
    BuoysRecent,
    BuoysLatest,
    BuoyStations,
    BuoyObservations,
    #[serde(rename = "nws-weather-stations")]
    NwsStations,
    #[serde(rename = "azos-weather-network")]
    AzosNetwork,
    #[serde(rename = "wis2-stations")]
    Wis2Stations,
    GlobalFlights,
    LiveFlights,
}

impl LayerProvider {
    /// Wire name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerProvider::Volcanoes => "volcanoes",
            LayerProvider::ActiveVolcanoes => "active-volcanoes",
            LayerProvider::Wildfires => "wildfires",
            LayerProvider::ActiveStorms => "active-storms",
            LayerProvider::RecentStorms => "recent-storms",
            LayerProvider::Earthquakes => "earthquakes",
            LayerProvider::BuoysRecent => "buoys-recent",
            LayerProvider::BuoysLatest => "buoys-latest",
            LayerProvider::BuoyStations => "buoy-stations",
            LayerProvider::BuoyObservations => "buoy-observations",
            LayerProvider::NwsStations => "nws-weather-stations",
            LayerProvider::AzosNetwork => "azos-weather-network",
            LayerProvider::Wis2Stations => "wis2-stations",
            LayerProvider::GlobalFlights => "global-flights",
            LayerProvider::LiveFlights => "live-flights",
        }
    }
}

impl fmt::Display for LayerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache metadata attached by the server to an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetadata {
    /// Upstream data source name.
    pub source: String,

    /// Cache lifetime in seconds.
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: f64,

    /// Whether the payload was served from cache.
    pub cached: bool,

    /// Snapshot identifier, when served from a stored snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

/// The canonical envelope every geospatial accessor returns.
///
/// `count` is passed through verbatim from server envelopes. When the
/// envelope was synthesized client-side it always equals the number of
/// features in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResponse<T> {
    pub provider: String,
    pub data: T,
    /// ISO 8601 timestamp of the payload.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LayerMetadata>,
}

impl<T> LayerResponse<T> {
    /// Provider parsed into a known [`LayerProvider`], if it is one.
    pub fn known_provider(&self) -> Option<LayerProvider> {
        serde_json::from_value(serde_json::Value::String(self.provider.clone())).ok()
    }

    /// Whether the payload was served from the server cache.
    pub fn is_cached(&self) -> bool {
        self.metadata.as_ref().is_some_and(|m| m.cached)
    }
}
