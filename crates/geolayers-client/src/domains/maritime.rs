//! NOAA buoys.

use std::sync::Arc;

use geolayers_types::{ObservationQueryResult, WeatherStationProps};

use super::encode_segment;
use super::weather::ObservationFilters;
use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{normalize_layer_response, parse_payload, LayerCollection};
use crate::resolver::VersionedEndpoint;

#[derive(Debug, Clone)]
pub struct MaritimeApi {
    executor: Arc<RequestExecutor>,
}

impl MaritimeApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Buoy locations.
    pub async fn buoy_stations(&self) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::both(
            "/geojson/buoys/stations",
            "/stations?provider=buoy",
        ))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, "buoy-stations")
    }

    /// Most recent reading of every buoy.
    pub async fn latest_buoy_observations(
        &self,
    ) -> GeoLayersResult<LayerCollection<WeatherStationProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/buoys/observations"))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, "buoy-observations")
    }

    /// Observation history for one buoy.
    pub async fn buoy_observations(
        &self,
        buoy_id: &str,
        filters: &ObservationFilters,
    ) -> GeoLayersResult<ObservationQueryResult> {
        let endpoint = self.executor.resolve(&VersionedEndpoint::legacy_only(format!(
            "/observations/buoy/{}",
            encode_segment(buoy_id)
        )))?;
        let mut params = QueryParams::new();
        filters.push_params(&mut params);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "observation query result")
    }
}
