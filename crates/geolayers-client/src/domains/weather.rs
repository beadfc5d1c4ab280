//! Weather stations and their observations (WIS2, IEM/AZOS, NWS).

use std::fmt;
use std::sync::Arc;

use geolayers_types::{ObservationQueryResult, TimePreset, TimeRange, WeatherStationProps};

use super::encode_segment;
use crate::config::ApiVersion;
use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{
    normalize_layer_response, parse_payload, rebuild_feature_collection, LayerCollection,
};
use crate::resolver::VersionedEndpoint;

pub const DEFAULT_WIS2_LIMIT: u32 = 100;
pub const DEFAULT_WIS2_OFFSET: u32 = 0;

/// Date range for a per-station observation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationFilters {
    pub range: TimeRange,
    /// Bypass the server cache.
    pub force_refresh: Option<bool>,
}

impl ObservationFilters {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            force_refresh: None,
        }
    }

    /// The preset window ending now.
    pub fn last(preset: TimePreset) -> Self {
        Self::new(preset.window())
    }

    pub fn with_force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = Some(force);
        self
    }

    pub(crate) fn push_params(&self, params: &mut QueryParams) {
        params
            .push("start", self.range.start_iso())
            .push("end", self.range.end_iso())
            .push_opt("forceRefresh", self.force_refresh);
    }
}

/// WIS2 history filters; the node and collection can be pinned.
#[derive(Debug, Clone, PartialEq)]
pub struct Wis2ObservationFilters {
    pub base: ObservationFilters,
    /// WIS2 global broker or node URL.
    pub base_url: Option<String>,
    pub collection_id: Option<String>,
}

impl Wis2ObservationFilters {
    pub fn new(range: TimeRange) -> Self {
        Self::from(ObservationFilters::new(range))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.base.push_params(&mut params);
        params
            .push_opt("baseUrl", self.base_url.as_deref())
            .push_opt("collectionId", self.collection_id.as_deref());
        params
    }
}

impl From<ObservationFilters> for Wis2ObservationFilters {
    fn from(base: ObservationFilters) -> Self {
        Self {
            base,
            base_url: None,
            collection_id: None,
        }
    }
}

/// Pagination for the WIS2 station list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wis2StationFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Wis2StationFilters {
    /// The legacy endpoint always paginates; the current one only when asked.
    pub(crate) fn to_params(self, version: ApiVersion) -> QueryParams {
        let mut params = QueryParams::new();
        match version {
            ApiVersion::Legacy => {
                params
                    .push("limit", self.limit.unwrap_or(DEFAULT_WIS2_LIMIT))
                    .push("offset", self.offset.unwrap_or(DEFAULT_WIS2_OFFSET));
            }
            ApiVersion::Current => {
                params
                    .push_opt("limit", self.limit)
                    .push_opt("offset", self.offset);
            }
        }
        params
    }
}

/// Station networks with an "active stations" listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationNetwork {
    Wis2,
    Iem,
}

impl StationNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationNetwork::Wis2 => "wis2",
            StationNetwork::Iem => "iem",
        }
    }

    /// Provider tag given to rebuilt active-station collections.
    pub fn active_provider(&self) -> String {
        format!("active-stations-{}", self.as_str())
    }
}

impl fmt::Display for StationNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WeatherApi {
    executor: Arc<RequestExecutor>,
}

impl WeatherApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// WMO WIS2 stations.
    pub async fn wis2_stations(
        &self,
        filters: Wis2StationFilters,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::both(
            "/geojson/stations/wis2",
            "/stations?provider=wis2",
        ))?;
        let params = filters.to_params(endpoint.version);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        normalize_layer_response(raw, "wis2-stations")
    }

    /// Observation history for one WIS2 station.
    pub async fn wis2_observations(
        &self,
        station_id: &str,
        filters: &Wis2ObservationFilters,
    ) -> GeoLayersResult<ObservationQueryResult> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::legacy_only(format!(
            "/observations/wis2/{}",
            encode_segment(station_id)
        )))?;
        let params = filters.to_params();

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "observation query result")
    }

    /// IEM/AZOS airport weather stations.
    pub async fn iem_stations(&self) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::both(
            "/geojson/stations/azos",
            "/stations?provider=iem",
        ))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, "iem-stations")
    }

    /// Observation history for one IEM station.
    pub async fn iem_observations(
        &self,
        station_id: &str,
        filters: &ObservationFilters,
    ) -> GeoLayersResult<ObservationQueryResult> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::legacy_only(format!(
            "/observations/iem/{}",
            encode_segment(station_id)
        )))?;
        let mut params = QueryParams::new();
        filters.push_params(&mut params);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "observation query result")
    }

    /// National Weather Service stations.
    pub async fn nws_stations(&self) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/stations/nws"))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, "nws-weather-stations")
    }

    /// Stations of one network that reported in the last 24 hours.
    pub async fn active_stations(
        &self,
        network: StationNetwork,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/stations/active"))?;
        let mut params = QueryParams::new();
        params.push("type", network);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        rebuild_feature_collection(raw, &network.active_provider())
    }
}
