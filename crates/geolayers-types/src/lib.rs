//! GeoLayers API payload types.
//!
//! This crate describes every payload shape the GeoLayers API returns:
//! GeoJSON geometries and features, the layer response envelope, the
//! provider-specific property sets carried by features, observation
//! records from the data warehouse, and real-time event payloads.
//!
//! The serde derives are the validation schema: decoding a `serde_json::Value`
//! into one of these types either yields a fully typed value or a decode
//! error naming the offending field.
//!
//! # Example
//!
//! ```rust
//! use geolayers_types::{EarthquakeProps, FeatureCollection, LayerResponse};
//!
//! let raw = serde_json::json!({
//!     "provider": "earthquakes",
//!     "data": { "type": "FeatureCollection", "features": [] },
//!     "timestamp": "2024-01-01T00:00:00.000Z",
//!     "count": 0
//! });
//!
//! let layer: LayerResponse<FeatureCollection<EarthquakeProps>> =
//!     serde_json::from_value(raw).unwrap();
//! assert!(layer.data.is_empty());
//! ```

pub mod aviation;
pub mod bbox;
pub mod events;
pub mod geojson;
pub mod layer;
pub mod observations;
pub mod properties;
pub mod time;
pub mod units;

pub use aviation::FlightScheduleResponse;
pub use bbox::{BboxParseError, BoundingBox};
pub use events::{EventAction, EventPayload, EventType, EventTypesResponse, PayloadKind};
pub use geojson::{Feature, FeatureCollection, FeatureId, Geometry, Position};
pub use layer::{LayerMetadata, LayerProvider, LayerResponse};
pub use observations::{
    BboxObservationsResult, ChartMeta, ChartPoint, ChartResponse, DataSource,
    LatestObservationResult, MeasurementQuality, MeasurementValue, ObservationProvider,
    ObservationQueryResult, ObservationStatsResult, StandardObservation,
    StationObservationsResult, TimeWindow,
};
pub use properties::{
    ActiveVolcanoProps, EarthquakeProps, FlightProps, NumberOrString, StationMeasurement,
    StormProps, VolcanoProps, WeatherStationProps, WildfireProps,
};
pub use time::{format_iso8601, parse_iso8601, TimeParseError, TimePreset, TimeRange};
