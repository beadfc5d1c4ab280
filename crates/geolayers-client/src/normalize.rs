//! Response shape normalization.
//!
//! The server answers geospatial queries in one of three shapes: the layer
//! envelope (legacy API), a bare FeatureCollection (current API), or an
//! envelope whose `data` is a plain array of features. Everything here turns
//! those into one canonical [`LayerResponse`].
//!
//! Feature validation keeps going after the first failure so callers see
//! every offending feature, each located by a JSON path.

use chrono::Utc;
use geolayers_types::{
    format_iso8601, Feature, FeatureCollection, FeatureId, Geometry, LayerMetadata, LayerResponse,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FieldError, GeoLayersResult, ValidationError};

/// Canonical envelope around a typed FeatureCollection.
pub type LayerCollection<P> = LayerResponse<FeatureCollection<P>>;

/// Accept either an envelope or a bare FeatureCollection.
///
/// A body with truthy `provider`, `data` and `timestamp` is an envelope.
/// Otherwise a body with `type: "FeatureCollection"` and a `features` array
/// is wrapped in a synthesized envelope tagged with `fallback_provider`.
/// Anything else is parsed as an envelope so the caller gets its errors.
pub fn normalize_layer_response<P: DeserializeOwned>(
    raw: Value,
    fallback_provider: &str,
) -> GeoLayersResult<LayerCollection<P>> {
    if is_envelope(&raw) {
        return parse_layer_response(raw);
    }

    if is_bare_collection(&raw) {
        let mut errors = Collector::default();
        let data = parse_collection::<P>(raw, "", &mut errors);
        let data = errors.finish("feature collection", data)?;
        return Ok(synthesize(fallback_provider, data));
    }

    parse_layer_response(raw)
}

/// Parse the envelope shape only. An envelope without `count` gets the
/// number of features it carries.
pub fn parse_layer_response<P: DeserializeOwned>(raw: Value) -> GeoLayersResult<LayerCollection<P>> {
    let mut layer = parse_envelope(raw, "layer response", |data, errors| {
        parse_collection::<P>(data, "data", errors)
    })?;
    layer.count.get_or_insert(layer.data.len() as f64);
    Ok(layer)
}

/// Parse an envelope whose `data` is an array of features and rewrap it as a
/// FeatureCollection. Envelope fields pass through unchanged.
pub fn parse_feature_array_response<P: DeserializeOwned>(
    raw: Value,
) -> GeoLayersResult<LayerCollection<P>> {
    let layer = parse_envelope(raw, "feature list response", |data, errors| match data {
        Value::Array(items) => {
            parse_features::<P>(items, "data", errors).map(FeatureCollection::from_features)
        }
        other => {
            errors.push("data", format!("expected an array of features, got {}", kind_of(&other)));
            None
        }
    })?;
    Ok(layer)
}

/// Rebuild a FeatureCollection feature by feature, tagging it with
/// `provider`. Missing or null `properties` decode from `{}`. Geometry is
/// optional here: a null, missing or unrecognized geometry leaves the feature
/// without one instead of failing the collection. Bodies that are not FeatureCollections are parsed as
/// envelopes.
pub fn rebuild_feature_collection<P: DeserializeOwned>(
    raw: Value,
    provider: &str,
) -> GeoLayersResult<LayerCollection<P>> {
    if !has_type(&raw, "FeatureCollection") {
        return parse_layer_response(raw);
    }

    let mut errors = Collector::default();
    let items = match raw {
        Value::Object(mut obj) => match obj.remove("features") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                errors.push("features", format!("expected an array, got {}", kind_of(&other)));
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    let mut features = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let path = format!("features[{}]", i);
        let mut obj = match item {
            Value::Object(obj) => obj,
            other => {
                errors.push(path, format!("expected a feature object, got {}", kind_of(&other)));
                continue;
            }
        };

        let geometry = lenient_geometry(obj.remove("geometry"), &path);
        let properties = match obj.remove("properties") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };
        let properties = errors.decode::<P>(properties, &join(&path, "properties"));
        let id = errors.optional::<FeatureId>(&mut obj, &path, "id");

        if let Some(properties) = properties {
            let mut feature = Feature::without_geometry(properties);
            feature.geometry = geometry;
            feature.id = id;
            features.push(feature);
        }
    }

    let data = errors.finish("feature collection", Some(FeatureCollection::from_features(features)))?;
    Ok(synthesize(provider, data))
}

fn lenient_geometry(value: Option<Value>, path: &str) -> Option<Geometry> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                debug!(path, error = %e, "Dropping unrecognized geometry");
                None
            }
        },
    }
}

/// Decode any non-GeoJSON payload into its typed form.
pub fn parse_payload<T: DeserializeOwned>(raw: Value, what: &str) -> GeoLayersResult<T> {
    serde_json::from_value(raw).map_err(|e| ValidationError::single(what, "", e.to_string()).into())
}

/// JavaScript truthiness, used for envelope detection.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(_) => true,
    }
}

fn is_envelope(raw: &Value) -> bool {
    is_truthy(raw.get("provider")) && is_truthy(raw.get("data")) && is_truthy(raw.get("timestamp"))
}

fn is_bare_collection(raw: &Value) -> bool {
    has_type(raw, "FeatureCollection") && raw.get("features").is_some_and(Value::is_array)
}

fn has_type(raw: &Value, expected: &str) -> bool {
    raw.get("type").and_then(Value::as_str) == Some(expected)
}

fn synthesize<P>(provider: &str, data: FeatureCollection<P>) -> LayerCollection<P> {
    LayerResponse {
        provider: provider.to_string(),
        count: Some(data.len() as f64),
        timestamp: format_iso8601(&Utc::now()),
        metadata: None,
        data,
    }
}

fn parse_envelope<T>(
    raw: Value,
    what: &str,
    parse_data: impl FnOnce(Value, &mut Collector) -> Option<T>,
) -> Result<LayerResponse<T>, ValidationError> {
    let mut obj = match raw {
        Value::Object(obj) => obj,
        other => {
            return Err(ValidationError::single(
                what,
                "",
                format!("expected an object, got {}", kind_of(&other)),
            ))
        }
    };

    let mut errors = Collector::default();
    let provider = errors.required::<String>(&mut obj, "", "provider");
    let timestamp = errors.required::<String>(&mut obj, "", "timestamp");
    let count = errors.optional::<f64>(&mut obj, "", "count");
    let metadata = errors.optional::<LayerMetadata>(&mut obj, "", "metadata");
    let data = match obj.remove("data") {
        None | Some(Value::Null) => {
            errors.push("data", "is required");
            None
        }
        Some(value) => parse_data(value, &mut errors),
    };

    let parts = match (provider, timestamp, data) {
        (Some(provider), Some(timestamp), Some(data)) => Some((provider, timestamp, data)),
        _ => None,
    };
    let (provider, timestamp, data) = errors.finish(what, parts)?;

    Ok(LayerResponse {
        provider,
        data,
        timestamp,
        count,
        metadata,
    })
}

fn parse_collection<P: DeserializeOwned>(
    value: Value,
    path: &str,
    errors: &mut Collector,
) -> Option<FeatureCollection<P>> {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            errors.push(
                path,
                format!("expected a FeatureCollection, got {}", kind_of(&other)),
            );
            return None;
        }
    };

    if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        errors.push(join(path, "type"), "expected \"FeatureCollection\"");
    }
    let bbox = errors.optional::<Vec<f64>>(&mut obj, path, "bbox");

    let features_path = join(path, "features");
    let features = match obj.remove("features") {
        Some(Value::Array(items)) => parse_features::<P>(items, &features_path, errors),
        None | Some(Value::Null) => {
            errors.push(features_path, "is required");
            None
        }
        Some(other) => {
            errors.push(features_path, format!("expected an array, got {}", kind_of(&other)));
            None
        }
    }?;

    let mut collection = FeatureCollection::from_features(features);
    collection.bbox = bbox;
    Some(collection)
}

fn parse_features<P: DeserializeOwned>(
    items: Vec<Value>,
    path: &str,
    errors: &mut Collector,
) -> Option<Vec<Feature<P>>> {
    let before = errors.len();
    let mut features = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        if let Some(feature) = errors.decode::<Feature<P>>(item, &format!("{}[{}]", path, i)) {
            features.push(feature);
        }
    }
    (errors.len() == before).then_some(features)
}

/// Accumulates field errors while a payload is walked.
#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    fn len(&self) -> usize {
        self.errors.len()
    }

    fn decode<T: DeserializeOwned>(&mut self, value: Value, path: &str) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                self.push(path, e.to_string());
                None
            }
        }
    }

    fn required<T: DeserializeOwned>(
        &mut self,
        obj: &mut Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<T> {
        let path = join(parent, key);
        match obj.remove(key) {
            None | Some(Value::Null) => {
                self.push(path, "is required");
                None
            }
            Some(value) => self.decode(value, &path),
        }
    }

    fn optional<T: DeserializeOwned>(
        &mut self,
        obj: &mut Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<T> {
        match obj.remove(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.decode(value, &join(parent, key)),
        }
    }

    fn finish<T>(self, what: &str, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ValidationError::new(what, self.errors)),
        }
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayers_types::{
        parse_iso8601, EarthquakeProps, VolcanoProps, WeatherStationProps,
    };
    use serde_json::json;
    use test_utils::fixtures::{earthquake, stations, volcanoes, TIMESTAMP};

    #[test]
    fn test_envelope_passes_through() {
        let layer: LayerCollection<EarthquakeProps> =
            normalize_layer_response(earthquake::envelope(), "fallback").unwrap();

        assert_eq!(layer.provider, "earthquakes");
        assert_eq!(layer.timestamp, TIMESTAMP);
        assert_eq!(layer.count, Some(1.0));
        assert_eq!(layer.data.len(), 1);
        assert_eq!(layer.data.bbox, Some(vec![-180.0, -90.0, 180.0, 90.0]));
        assert!(!layer.is_cached());
        assert_eq!(
            layer.metadata.unwrap().source,
            "USGS Earthquake Hazards Program"
        );
    }

    #[test]
    fn test_bare_collection_gets_synthesized_envelope() {
        let before = Utc::now();
        let layer: LayerCollection<WeatherStationProps> =
            normalize_layer_response(stations::bare_collection("wis2"), "wis2-stations").unwrap();

        assert_eq!(layer.provider, "wis2-stations");
        assert_eq!(layer.count, Some(2.0));
        assert!(layer.metadata.is_none());
        assert!(layer.timestamp.ends_with('Z'));

        let ts = parse_iso8601(&layer.timestamp).unwrap();
        assert!(ts >= before - chrono::Duration::milliseconds(1));
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let layer: LayerCollection<WeatherStationProps> = normalize_layer_response(
            json!({ "type": "FeatureCollection", "features": [] }),
            "buoy-stations",
        )
        .unwrap();
        assert_eq!(layer.count, Some(0.0));
        assert!(layer.data.is_empty());
    }

    #[test]
    fn test_legacy_envelope_with_empty_collection() {
        let raw = json!({
            "provider": "earthquakes",
            "data": { "type": "FeatureCollection", "features": [] },
            "timestamp": TIMESTAMP
        });
        let layer: LayerCollection<EarthquakeProps> =
            normalize_layer_response(raw, "fallback").unwrap();

        assert_eq!(layer.provider, "earthquakes");
        assert_eq!(layer.timestamp, TIMESTAMP);
        assert_eq!(layer.count, Some(0.0));
        assert!(layer.data.is_empty());
    }

    #[test]
    fn test_fractional_and_negative_numbers_accepted() {
        let mut raw = earthquake::envelope();
        raw["count"] = json!(1.5);
        raw["metadata"]["cacheTTL"] = json!(-1);
        raw["data"]["features"][0]["properties"]["sig"] = json!(271.5);
        raw["data"]["features"][0]["properties"]["tsunami"] = json!(0.5);

        let layer: LayerCollection<EarthquakeProps> =
            normalize_layer_response(raw, "fallback").unwrap();

        assert_eq!(layer.count, Some(1.5));
        assert_eq!(layer.metadata.unwrap().cache_ttl, -1.0);
        let props = &layer.data.features[0].properties;
        assert_eq!(props.sig, 271.5);
        assert_eq!(props.tsunami, 0.5);
    }

    #[test]
    fn test_falsy_envelope_fields_fall_through_to_bare_detection() {
        // Empty provider is falsy, so this is treated as a bare collection.
        let raw = json!({
            "provider": "",
            "data": {},
            "timestamp": TIMESTAMP,
            "type": "FeatureCollection",
            "features": []
        });
        let layer: LayerCollection<WeatherStationProps> =
            normalize_layer_response(raw, "nws-weather-stations").unwrap();
        assert_eq!(layer.provider, "nws-weather-stations");
    }

    #[test]
    fn test_unrecognized_shape_reports_envelope_errors() {
        let err = normalize_layer_response::<EarthquakeProps>(json!({ "foo": 1 }), "x").unwrap_err();
        let validation = err.as_validation().unwrap();
        let paths: Vec<_> = validation.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["provider", "timestamp", "data"]);
    }

    #[test]
    fn test_all_feature_errors_are_collected() {
        let mut raw = earthquake::envelope();
        raw["data"]["features"] = json!([
            earthquake::invalid_feature(),
            earthquake::feature(),
            earthquake::invalid_feature()
        ]);

        let err = parse_layer_response::<EarthquakeProps>(raw).unwrap_err();
        let validation = err.as_validation().unwrap();
        let paths: Vec<_> = validation.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["data.features[0]", "data.features[2]"]);
        assert!(validation.message.contains("(and 1 more)"));
    }

    #[test]
    fn test_non_object_is_validation_error() {
        let err = parse_layer_response::<EarthquakeProps>(json!([1, 2])).unwrap_err();
        assert!(err.is_validation());
        assert!(err.message().contains("expected an object"));
    }

    #[test]
    fn test_feature_array_is_rewrapped() {
        let layer: LayerCollection<VolcanoProps> =
            parse_feature_array_response(volcanoes::array_envelope()).unwrap();

        assert_eq!(layer.provider, "volcanoes");
        assert_eq!(layer.timestamp, TIMESTAMP);
        assert_eq!(layer.count, Some(1.0));
        assert!(layer.is_cached());
        assert_eq!(layer.data.len(), 1);
        assert_eq!(layer.data.features[0].id, Some(FeatureId::from(332010)));
    }

    #[test]
    fn test_feature_array_rejects_collection_data() {
        let mut raw = volcanoes::array_envelope();
        raw["data"] = json!({ "type": "FeatureCollection", "features": [] });

        let err = parse_feature_array_response::<VolcanoProps>(raw).unwrap_err();
        assert_eq!(err.as_validation().unwrap().errors[0].path, "data");
    }

    #[test]
    fn test_rebuild_tags_provider_and_defaults_properties() {
        let layer: LayerCollection<WeatherStationProps> =
            rebuild_feature_collection(stations::active_collection(), "active-stations-iem").unwrap();

        assert_eq!(layer.provider, "active-stations-iem");
        assert_eq!(layer.count, Some(2.0));
        assert_eq!(layer.data.features[0].id, Some(FeatureId::from("KJFK")));
        assert_eq!(layer.data.features[1].id, Some(FeatureId::from(17)));
        assert_eq!(layer.data.features[1].properties, WeatherStationProps::default());
    }

    #[test]
    fn test_rebuild_missing_features_is_empty() {
        let layer: LayerCollection<WeatherStationProps> =
            rebuild_feature_collection(json!({ "type": "FeatureCollection" }), "active-stations-wis2")
                .unwrap();
        assert_eq!(layer.count, Some(0.0));
    }

    #[test]
    fn test_rebuild_falls_back_to_envelope() {
        let layer: LayerCollection<WeatherStationProps> =
            rebuild_feature_collection(stations::envelope("wis2-stations"), "active-stations-wis2")
                .unwrap();
        assert_eq!(layer.provider, "wis2-stations");
        assert_eq!(layer.timestamp, TIMESTAMP);
    }

    #[test]
    fn test_rebuild_keeps_features_without_geometry() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-73.78, 40.64] }, "properties": {} },
                { "type": "Feature", "geometry": null, "properties": { "name": "Unsited" }, "id": "X1" },
                { "type": "Feature", "properties": {} },
                { "type": "Feature", "geometry": { "type": "Circle" }, "properties": {} }
            ]
        });
        let layer: LayerCollection<WeatherStationProps> =
            rebuild_feature_collection(raw, "active-stations-wis2").unwrap();

        assert_eq!(layer.count, Some(4.0));
        let features = &layer.data.features;
        assert_eq!(features[0].geometry, Some(Geometry::point(-73.78, 40.64)));
        assert!(features[1].geometry.is_none());
        assert_eq!(features[1].id, Some(FeatureId::from("X1")));
        assert_eq!(features[1].properties.name.as_deref(), Some("Unsited"));
        assert!(features[2].geometry.is_none());
        assert!(features[3].geometry.is_none());

        let back = serde_json::to_value(&layer.data).unwrap();
        assert!(back["features"][1]["geometry"].is_null());
    }

    #[test]
    fn test_rebuild_still_rejects_bad_properties() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "geometry": null, "properties": { "name": 5 } }]
        });
        let err = rebuild_feature_collection::<WeatherStationProps>(raw, "p").unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().errors[0].path,
            "features[0].properties"
        );
    }

    #[test]
    fn test_parse_payload_typed() {
        #[derive(Debug, serde::Deserialize)]
        struct Stats {
            total: u64,
        }
        let stats: Stats = parse_payload(json!({ "total": 3 }), "stats").unwrap();
        assert_eq!(stats.total, 3);

        let err = parse_payload::<Stats>(json!({}), "stats").unwrap_err();
        assert!(err.message().starts_with("Invalid stats"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!({}))));
        assert!(is_truthy(Some(&json!(1.5))));
    }
}
