//! Earthquakes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geolayers_types::{EarthquakeProps, TimePreset};

use super::iso;
use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{parse_layer_response, LayerCollection};
use crate::resolver::VersionedEndpoint;

/// Earthquake query filters.
///
/// An explicit range needs both `start_time` and `end_time`; otherwise the
/// preset (default last 24 hours) is resolved against the current time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarthquakeFilters {
    pub time_preset: Option<TimePreset>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub min_magnitude: Option<f64>,
}

impl EarthquakeFilters {
    pub fn preset(preset: TimePreset) -> Self {
        Self {
            time_preset: Some(preset),
            ..Self::default()
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Self::default()
        }
    }

    pub fn with_min_magnitude(mut self, magnitude: f64) -> Self {
        self.min_magnitude = Some(magnitude);
        self
    }

    pub(crate) fn to_params(&self, now: DateTime<Utc>) -> QueryParams {
        let (start, end) = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                let window = self.time_preset.unwrap_or_default().window_ending(now);
                (window.start, window.end)
            }
        };

        let mut params = QueryParams::new();
        params
            .push("startTime", iso(&start))
            .push("endTime", iso(&end))
            .push_opt("minMagnitude", self.min_magnitude);
        params
    }
}

/// USGS earthquake feed.
#[derive(Debug, Clone)]
pub struct SeismicApi {
    executor: Arc<RequestExecutor>,
}

impl SeismicApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Earthquakes in a time window, optionally above a magnitude.
    pub async fn earthquakes(
        &self,
        filters: EarthquakeFilters,
    ) -> GeoLayersResult<LayerCollection<EarthquakeProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/earthquakes"))?;
        let params = filters.to_params(Utc::now());

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_layer_response(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use geolayers_types::parse_iso8601;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_is_last_24_hours() {
        let params = EarthquakeFilters::default().to_params(now());

        assert_eq!(params.get("endTime"), Some("2024-03-10T12:00:00.000Z"));
        assert_eq!(params.get("startTime"), Some("2024-03-09T12:00:00.000Z"));
        assert_eq!(params.get("minMagnitude"), None);
    }

    #[test]
    fn test_preset_window_length() {
        for preset in [
            TimePreset::LastHour,
            TimePreset::LastDay,
            TimePreset::LastWeek,
            TimePreset::LastMonth,
        ] {
            let params = EarthquakeFilters::preset(preset).to_params(now());
            let start = parse_iso8601(params.get("startTime").unwrap()).unwrap();
            let end = parse_iso8601(params.get("endTime").unwrap()).unwrap();
            assert_eq!(end - start, preset.duration(), "{}", preset);
        }
    }

    #[test]
    fn test_explicit_range_overrides_preset() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let filters = EarthquakeFilters {
            time_preset: Some(TimePreset::LastHour),
            ..EarthquakeFilters::between(start, end)
        }
        .with_min_magnitude(4.5);

        let params = filters.to_params(now());
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("startTime", "2024-01-01T00:00:00.000Z"),
                ("endTime", "2024-01-31T23:59:59.000Z"),
                ("minMagnitude", "4.5"),
            ]
        );
    }

    #[test]
    fn test_half_range_uses_preset() {
        let filters = EarthquakeFilters {
            start_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            time_preset: Some(TimePreset::LastHour),
            ..EarthquakeFilters::default()
        };
        let params = filters.to_params(now());
        assert_eq!(params.get("startTime"), Some("2024-03-10T11:00:00.000Z"));
    }
}
