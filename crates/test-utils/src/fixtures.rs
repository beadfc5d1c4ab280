//! JSON fixtures shaped like real GeoLayers API responses.
//!
//! Every fixture is a `serde_json::Value` so tests can serve it from a
//! mock server, mutate it, or decode it directly.

use serde_json::{json, Value};

/// Fixed timestamp used by envelope fixtures.
pub const TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

/// Common bounding boxes as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    pub const CONUS: (f64, f64, f64, f64) = (-130.0, 20.0, -60.0, 55.0);

    /// US east coast buoy field.
    pub const ATLANTIC_COAST: (f64, f64, f64, f64) = (-80.0, 30.0, -65.0, 45.0);
}

/// USGS earthquake feature and envelopes.
pub mod earthquake {
    use super::*;

    pub fn feature() -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-122.714, 38.8128, 2.48] },
            "properties": {
                "mag": 4.2,
                "place": "10km NW of The Geysers, CA",
                "time": 1704067200000i64,
                "updated": 1704070800000i64,
                "tz": null,
                "url": "https://earthquake.usgs.gov/earthquakes/eventpage/nc73123456",
                "detail": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/detail/nc73123456.geojson",
                "felt": 125,
                "cdi": 4.5,
                "mmi": 3.8,
                "alert": "green",
                "status": "reviewed",
                "tsunami": 0,
                "sig": 271,
                "net": "nc",
                "code": "73123456",
                "ids": ",nc73123456,",
                "sources": ",nc,",
                "types": ",dyfi,origin,phase-data,",
                "nst": 42,
                "dmin": 0.008,
                "rms": 0.05,
                "gap": 36,
                "magType": "ml",
                "type": "earthquake",
                "title": "M 4.2 - 10km NW of The Geysers, CA"
            },
            "id": "nc73123456"
        })
    }

    pub fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [feature()],
            "bbox": [-180, -90, 180, 90]
        })
    }

    /// Server envelope with cache metadata.
    pub fn envelope() -> Value {
        json!({
            "provider": "earthquakes",
            "data": collection(),
            "timestamp": TIMESTAMP,
            "count": 1,
            "metadata": {
                "source": "USGS Earthquake Hazards Program",
                "cacheTTL": 86400,
                "cached": false
            }
        })
    }

    /// A feature whose properties fail validation.
    pub fn invalid_feature() -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "mag": "not-a-number", "place": 123 }
        })
    }
}

/// Weather, buoy and active station collections.
pub mod stations {
    use super::*;

    pub fn feature(id: &str, provider: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-73.9654, 40.7829] },
            "properties": {
                "id": id,
                "name": "Central Park",
                "provider": provider,
                "country": "USA",
                "measurements": {
                    "temperature": { "value": 21.5, "unit": "°C" }
                }
            },
            "id": id
        })
    }

    /// Bare collection as served by the current API generation.
    pub fn bare_collection(provider: &str) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [feature("0-20000-0-72503", provider), feature("0-20000-0-72505", provider)]
        })
    }

    pub fn envelope(provider: &str) -> Value {
        json!({
            "provider": provider,
            "data": bare_collection("wis2"),
            "timestamp": TIMESTAMP,
            "count": 2
        })
    }

    /// Active stations collection where one feature has no properties.
    pub fn active_collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                feature("KJFK", "iem"),
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-87.9, 41.97] },
                    "id": 17
                }
            ]
        })
    }
}

/// Holocene volcano list (array of features inside the envelope).
pub mod volcanoes {
    use super::*;

    pub fn feature() -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-155.287, 19.421, 1222] },
            "properties": {
                "volcanoNumber": 332010,
                "volcanoName": "Kilauea",
                "primaryVolcanoType": "Shield",
                "lastEruptionYear": 2023,
                "country": "United States",
                "region": "Hawaii and Pacific Ocean"
            },
            "id": 332010
        })
    }

    pub fn array_envelope() -> Value {
        json!({
            "provider": "volcanoes",
            "data": [feature()],
            "timestamp": TIMESTAMP,
            "count": 1,
            "metadata": { "source": "Smithsonian GVP", "cacheTTL": 604800, "cached": true }
        })
    }
}

/// Aircraft state collections.
pub mod flights {
    use super::*;

    pub fn bare_collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-73.78, 40.64] },
                "properties": {
                    "icao24": "a1b2c3",
                    "callsign": "UAL1234",
                    "originCountry": "United States",
                    "baroAltitude": 10668.0,
                    "onGround": false,
                    "velocity": 231.5,
                    "trueTrack": 271.0
                }
            }]
        })
    }

    pub fn schedule() -> Value {
        json!({
            "provider": "aerodatabox",
            "data": { "number": "UA 1234", "status": "Expected" },
            "timestamp": TIMESTAMP,
            "metadata": { "source": "AeroDataBox", "cacheTTL": 600, "cached": false }
        })
    }
}

/// Observation records and data warehouse results.
pub mod observations {
    use super::*;

    pub fn standard() -> Value {
        json!({
            "timestamp": "2024-01-01T12:00:00.000Z",
            "stationId": "WIGOS-0-20000-0-12345",
            "latitude": 40.7128,
            "longitude": -74.006,
            "measurements": {
                "airTemperature": { "value": 22.5, "unit": "°C", "quality": "good" },
                "windSpeed": { "value": 5.2, "unit": "m/s", "quality": "good" },
                "pressure": { "value": 1013.25, "unit": "hPa" }
            },
            "metadata": { "provider": "wis2", "collection": "synop" }
        })
    }

    pub fn query_result() -> Value {
        json!({
            "stationId": "WIGOS-0-20000-0-12345",
            "observations": [standard()],
            "count": 1,
            "timeRange": {
                "start": "2024-01-01T00:00:00.000Z",
                "end": "2024-01-01T23:59:59.000Z"
            },
            "provider": "wis2",
            "cached": false
        })
    }

    pub fn station_result(provider: &str) -> Value {
        json!({
            "stationId": "KJFK",
            "provider": provider,
            "observations": [standard()],
            "count": 1,
            "timeRange": {
                "start": "2024-01-01T00:00:00.000Z",
                "end": "2024-01-01T23:59:59.000Z"
            },
            "source": "data-warehouse"
        })
    }

    pub fn latest_result() -> Value {
        json!({
            "stationId": "KJFK",
            "provider": "iem",
            "observation": standard(),
            "source": "data-warehouse"
        })
    }

    pub fn bbox_result() -> Value {
        json!({
            "bbox": [-80.0, 30.0, -65.0, 45.0],
            "provider": "buoy",
            "observations": [standard()],
            "count": 1,
            "timeRange": {
                "start": "2024-01-01T00:00:00.000Z",
                "end": "2024-01-01T23:59:59.000Z"
            },
            "source": "data-warehouse"
        })
    }

    pub fn stats_result() -> Value {
        json!({
            "provider": "all",
            "totalObservations": 125000,
            "source": "data-warehouse"
        })
    }

    pub fn chart() -> Value {
        json!({
            "data": [
                {
                    "stationId": "wis2:0-123-456",
                    "timestamp": "2024-01-01T12:00:00.000Z",
                    "measurements": { "temperature": 22.5, "windSpeed": 5.2, "humidity": 65 }
                },
                {
                    "stationId": "wis2:0-123-456",
                    "timestamp": "2024-01-01T13:00:00.000Z",
                    "measurements": { "temperature": 23.1, "windSpeed": 4.8, "humidity": 62 }
                }
            ],
            "meta": {
                "stationId": "wis2:0-123-456",
                "timeRange": {
                    "start": "2024-01-01T00:00:00.000Z",
                    "end": "2024-01-01T23:59:59.000Z"
                },
                "count": 2
            }
        })
    }
}

/// Event stream payloads and event type metadata.
pub mod events {
    use super::*;

    pub fn payload(provider: &str) -> Value {
        json!({
            "provider": provider,
            "type": "Feature",
            "data": super::earthquake::feature(),
            "timestamp": TIMESTAMP,
            "action": "created"
        })
    }

    pub fn types() -> Value {
        json!({
            "types": ["earthquake.new", "storm.new", "volcano.alert"],
            "descriptions": {
                "earthquake.new": "New earthquake detected",
                "storm.new": "New tropical storm tracked",
                "volcano.alert": "Volcano alert level change"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_count_matches_features() {
        let env = earthquake::envelope();
        let features = env["data"]["features"].as_array().unwrap();
        assert_eq!(env["count"], features.len());
    }

    #[test]
    fn test_active_collection_has_feature_without_properties() {
        let fc = stations::active_collection();
        assert!(fc["features"][1].get("properties").is_none());
    }
}
