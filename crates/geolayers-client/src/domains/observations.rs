//! Active stations and data warehouse observation queries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geolayers_types::{
    BboxObservationsResult, BoundingBox, ChartResponse, LatestObservationResult,
    ObservationProvider, ObservationStatsResult, StationObservationsResult, TimePreset,
    WeatherStationProps,
};

use super::weather::StationNetwork;
use super::{encode_segment, iso};
use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{parse_payload, rebuild_feature_collection, LayerCollection};
use crate::resolver::VersionedEndpoint;

/// Data warehouse query for one provider.
///
/// `start` and `end` win when both are set; otherwise `time_preset` is
/// resolved at call time. With neither, the server picks the window.
#[derive(Debug, Clone, PartialEq)]
pub struct StationObservationFilters {
    pub provider: ObservationProvider,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub time_preset: Option<TimePreset>,
    pub limit: Option<u32>,
}

impl StationObservationFilters {
    pub fn new(provider: ObservationProvider) -> Self {
        Self {
            provider,
            start: None,
            end: None,
            time_preset: None,
            limit: None,
        }
    }

    pub fn with_preset(mut self, preset: TimePreset) -> Self {
        self.time_preset = Some(preset);
        self
    }

    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_params(&self, now: DateTime<Utc>) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("provider", self.provider)
            .push_opt("limit", self.limit);

        match (self.start, self.end, self.time_preset) {
            (Some(start), Some(end), _) => {
                params.push("start", iso(&start)).push("end", iso(&end));
            }
            (_, _, Some(preset)) => {
                let window = preset.window_ending(now);
                params
                    .push("start", window.start_iso())
                    .push("end", window.end_iso());
            }
            _ => {}
        }
        params
    }
}

/// Data warehouse query over a geographic box.
#[derive(Debug, Clone, PartialEq)]
pub struct BboxObservationFilters {
    pub bbox: BoundingBox,
    pub query: StationObservationFilters,
}

impl BboxObservationFilters {
    pub fn new(bbox: BoundingBox, query: StationObservationFilters) -> Self {
        Self { bbox, query }
    }

    pub(crate) fn to_params(&self, now: DateTime<Utc>) -> QueryParams {
        let mut params = self.query.to_params(now);
        let corners = ["minLon", "minLat", "maxLon", "maxLat"];
        for (key, value) in corners.into_iter().zip(self.bbox.to_array()) {
            params.push(key, value);
        }
        params
    }
}

/// Optional bounds for chart data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartFilters {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ChartFilters {
    pub(crate) fn to_params(self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push_opt("start", self.start.as_ref().map(iso))
            .push_opt("end", self.end.as_ref().map(iso));
        params
    }
}

#[derive(Debug, Clone)]
pub struct ObservationsApi {
    executor: Arc<RequestExecutor>,
}

impl ObservationsApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// WIS2 stations that reported in the last 24 hours.
    pub async fn active_wis2_stations(
        &self,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        self.active_stations("/observations/wis2/stations/active", StationNetwork::Wis2)
            .await
    }

    /// IEM/AZOS stations that reported in the last 24 hours.
    pub async fn active_iem_stations(
        &self,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        self.active_stations("/observations/iem/stations/active", StationNetwork::Iem)
            .await
    }

    /// Observation history for one station from the data warehouse.
    pub async fn station_observations(
        &self,
        station_id: &str,
        filters: &StationObservationFilters,
    ) -> GeoLayersResult<StationObservationsResult> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::legacy_only(format!(
            "/observations/station/{}",
            encode_segment(station_id)
        )))?;
        let params = filters.to_params(Utc::now());

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "station observations result")
    }

    /// Most recent observation of one station.
    pub async fn latest_observation(
        &self,
        station_id: &str,
        provider: ObservationProvider,
    ) -> GeoLayersResult<LatestObservationResult> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::legacy_only(format!(
            "/observations/station/{}/latest",
            encode_segment(station_id)
        )))?;
        let mut params = QueryParams::new();
        params.push("provider", provider);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "latest observation result")
    }

    /// Observations from every station inside a box.
    pub async fn observations_by_bbox(
        &self,
        filters: &BboxObservationFilters,
    ) -> GeoLayersResult<BboxObservationsResult> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/observations/bbox"))?;
        let params = filters.to_params(Utc::now());

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "bbox observations result")
    }

    /// Warehouse totals, for one provider or all of them.
    pub async fn stats(
        &self,
        provider: Option<ObservationProvider>,
    ) -> GeoLayersResult<ObservationStatsResult> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/observations/stats"))?;
        let mut params = QueryParams::new();
        params.push_opt("provider", provider);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "observation stats result")
    }

    /// Flattened time series for charting. Only the current API serves it.
    pub async fn chart_data(
        &self,
        station_id: &str,
        filters: ChartFilters,
    ) -> GeoLayersResult<ChartResponse> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::current_only(format!(
            "/observations/{}/chart",
            encode_segment(station_id)
        )))?;
        let params = filters.to_params();

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "chart response")
    }

    async fn active_stations(
        &self,
        legacy: &str,
        network: StationNetwork,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only(legacy))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        rebuild_feature_collection(raw, &network.active_provider())
    }
}
