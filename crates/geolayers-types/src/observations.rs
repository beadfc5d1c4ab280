//! Station observation records and data warehouse query results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Providers the data warehouse stores observations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationProvider {
    Wis2,
    Iem,
    Buoy,
    Openmeteo,
    Nws,
}

impl ObservationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationProvider::Wis2 => "wis2",
            ObservationProvider::Iem => "iem",
            ObservationProvider::Buoy => "buoy",
            ObservationProvider::Openmeteo => "openmeteo",
            ObservationProvider::Nws => "nws",
        }
    }
}

impl fmt::Display for ObservationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wis2" => Ok(ObservationProvider::Wis2),
            "iem" => Ok(ObservationProvider::Iem),
            "buoy" => Ok(ObservationProvider::Buoy),
            "openmeteo" => Ok(ObservationProvider::Openmeteo),
            "nws" => Ok(ObservationProvider::Nws),
            other => Err(format!("unknown observation provider: {}", other)),
        }
    }
}

/// Source tag on data warehouse results. Only one value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    #[serde(rename = "data-warehouse")]
    DataWarehouse,
}

/// Quality flag attached to a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementQuality {
    Good,
    Suspect,
    Estimated,
    Missing,
}

/// One measured quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementValue {
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<MeasurementQuality>,
}

/// A normalized observation from any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardObservation {
    /// ISO 8601 observation time.
    pub timestamp: String,
    pub station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Measurements keyed by quantity name (`airTemperature`, `windSpeed`, ...).
    pub measurements: HashMap<String, MeasurementValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl StandardObservation {
    /// Look up a measurement by quantity name.
    pub fn measurement(&self, name: &str) -> Option<&MeasurementValue> {
        self.measurements.get(name)
    }
}

/// Inclusive time window as ISO 8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

/// Result of a per-network historical observation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationQueryResult {
    pub station_id: String,
    pub observations: Vec<StandardObservation>,
    pub count: f64,
    pub time_range: TimeWindow,
    pub provider: String,
    pub cached: bool,
}

/// Result of `/observations/station/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationObservationsResult {
    pub station_id: String,
    pub provider: ObservationProvider,
    pub observations: Vec<StandardObservation>,
    pub count: f64,
    pub time_range: TimeWindow,
    pub source: DataSource,
}

/// Result of `/observations/station/{id}/latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestObservationResult {
    pub station_id: String,
    pub provider: ObservationProvider,
    /// `None` when the station has no stored observation.
    pub observation: Option<StandardObservation>,
    pub source: DataSource,
}

/// Result of `/observations/bbox`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BboxObservationsResult {
    /// `[minLon, minLat, maxLon, maxLat]`.
    pub bbox: [f64; 4],
    pub provider: ObservationProvider,
    pub observations: Vec<StandardObservation>,
    pub count: f64,
    pub time_range: TimeWindow,
    pub source: DataSource,
}

/// Result of `/observations/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationStatsResult {
    /// A provider name, or an aggregate label when unfiltered.
    pub provider: String,
    pub total_observations: f64,
    pub source: DataSource,
}

/// One row of chart data: flat measurement values keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub station_id: String,
    pub timestamp: String,
    /// Missing readings arrive as `null`.
    pub measurements: HashMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub station_id: String,
    pub time_range: TimeWindow,
    pub count: f64,
}

/// Result of `/observations/{id}/chart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResponse {
    pub data: Vec<ChartPoint>,
    pub meta: ChartMeta,
}

impl ChartResponse {
    /// Time series for one measurement, skipping rows where it is absent.
    pub fn series(&self, name: &str) -> Vec<(&str, f64)> {
        self.data
            .iter()
            .filter_map(|point| {
                point
                    .measurements
                    .get(name)
                    .copied()
                    .flatten()
                    .map(|v| (point.timestamp.as_str(), v))
            })
            .collect()
    }
}
