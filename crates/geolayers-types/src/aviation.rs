//! Flight schedule response.

use crate::layer::LayerMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flight schedule lookup result.
///
/// The upstream schedule provider returns a loosely structured object, so
/// `data` is kept as a JSON map rather than a typed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightScheduleResponse {
    pub provider: String,
    pub data: Map<String, Value>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LayerMetadata>,
}

impl FlightScheduleResponse {
    /// Field of the schedule record, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_keeps_arbitrary_data() {
        let schedule: FlightScheduleResponse = serde_json::from_value(json!({
            "provider": "aerodatabox",
            "data": {
                "number": "UA 1234",
                "departure": { "airport": { "iata": "SFO" } }
            },
            "timestamp": "2024-01-01T00:00:00.000Z",
            "metadata": { "source": "AeroDataBox", "cacheTTL": 600, "cached": true }
        }))
        .unwrap();

        assert_eq!(schedule.field("number"), Some(&json!("UA 1234")));
        assert_eq!(schedule.data["departure"]["airport"]["iata"], "SFO");
        assert!(schedule.metadata.unwrap().cached);
    }

    #[test]
    fn test_schedule_data_must_be_object() {
        let raw = json!({
            "provider": "aerodatabox",
            "data": [1, 2, 3],
            "timestamp": "2024-01-01T00:00:00.000Z"
        });
        assert!(serde_json::from_value::<FlightScheduleResponse>(raw).is_err());
    }
}
