//! Real-time event payloads and event type metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Which GeoJSON object the payload's `data` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadKind {
    Feature,
    FeatureCollection,
}

/// What happened to the carried object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
}

/// A single message from the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Provider that produced the event; also the fan-out topic name.
    pub provider: String,

    #[serde(rename = "type")]
    pub kind: PayloadKind,

    /// GeoJSON Feature or FeatureCollection, left undecoded.
    #[serde(default)]
    pub data: Value,

    pub timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EventAction>,
}

/// Event type names advertised by `/events/types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "earthquake.new")]
    EarthquakeNew,
    #[serde(rename = "earthquake.updated")]
    EarthquakeUpdated,
    #[serde(rename = "storm.new")]
    StormNew,
    #[serde(rename = "storm.updated")]
    StormUpdated,
    #[serde(rename = "wildfire.new")]
    WildfireNew,
    #[serde(rename = "wildfire.updated")]
    WildfireUpdated,
    #[serde(rename = "volcano.alert")]
    VolcanoAlert,
    #[serde(rename = "snapshot.completed")]
    SnapshotCompleted,
    #[serde(rename = "snapshot.failed")]
    SnapshotFailed,
    #[serde(rename = "observation.batch")]
    ObservationBatch,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::EarthquakeNew => "earthquake.new",
            EventType::EarthquakeUpdated => "earthquake.updated",
            EventType::StormNew => "storm.new",
            EventType::StormUpdated => "storm.updated",
            EventType::WildfireNew => "wildfire.new",
            EventType::WildfireUpdated => "wildfire.updated",
            EventType::VolcanoAlert => "volcano.alert",
            EventType::SnapshotCompleted => "snapshot.completed",
            EventType::SnapshotFailed => "snapshot.failed",
            EventType::ObservationBatch => "observation.batch",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of `/events/types`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTypesResponse {
    pub types: Vec<EventType>,
    /// Human-readable description keyed by event type name.
    pub descriptions: HashMap<String, String>,
}

impl EventTypesResponse {
    pub fn description(&self, event_type: EventType) -> Option<&str> {
        self.descriptions.get(event_type.as_str()).map(String::as_str)
    }
}
