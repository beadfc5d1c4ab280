//! Aircraft positions and flight schedules.

use std::sync::Arc;

use geolayers_types::{FlightProps, FlightScheduleResponse};

use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{normalize_layer_response, parse_payload, LayerCollection};
use crate::resolver::VersionedEndpoint;

/// Default live-flight search centre: New York.
pub const DEFAULT_CENTER: (f64, f64) = (40.7128, -74.006);
/// Default live-flight search radius in nautical miles.
pub const DEFAULT_RADIUS_NM: f64 = 250.0;

/// Bounding box for the global flight list. Unset edges cover the world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightFilters {
    pub lamin: Option<f64>,
    pub lomin: Option<f64>,
    pub lamax: Option<f64>,
    pub lomax: Option<f64>,
}

impl FlightFilters {
    pub fn bbox(lamin: f64, lomin: f64, lamax: f64, lomax: f64) -> Self {
        Self {
            lamin: Some(lamin),
            lomin: Some(lomin),
            lamax: Some(lamax),
            lomax: Some(lomax),
        }
    }

    pub(crate) fn to_params(self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("lamin", self.lamin.unwrap_or(-90.0))
            .push("lomin", self.lomin.unwrap_or(-180.0))
            .push("lamax", self.lamax.unwrap_or(90.0))
            .push("lomax", self.lomax.unwrap_or(180.0));
        params
    }
}

/// Circle around a point for the live flight list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveFlightFilters {
    pub lat: f64,
    pub lng: f64,
    /// Nautical miles (1-1000). Defaults to 250.
    pub radius: Option<f64>,
}

impl LiveFlightFilters {
    pub fn around(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius_nm: f64) -> Self {
        self.radius = Some(radius_nm);
        self
    }

    pub(crate) fn to_params(self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("lat", self.lat)
            .push("lng", self.lng)
            .push("radius", self.radius.unwrap_or(DEFAULT_RADIUS_NM));
        params
    }
}

impl Default for LiveFlightFilters {
    fn default() -> Self {
        Self::around(DEFAULT_CENTER.0, DEFAULT_CENTER.1)
    }
}

#[derive(Debug, Clone)]
pub struct AviationApi {
    executor: Arc<RequestExecutor>,
}

impl AviationApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Every tracked aircraft inside the box (OpenSky).
    pub async fn global_flights(
        &self,
        filters: FlightFilters,
    ) -> GeoLayersResult<LayerCollection<FlightProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/flights/global"))?;
        let params = filters.to_params();

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        normalize_layer_response(raw, "global-flights")
    }

    /// Aircraft within a radius of a point.
    pub async fn live_flights(
        &self,
        filters: LiveFlightFilters,
    ) -> GeoLayersResult<LayerCollection<FlightProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/flights/live"))?;
        let params = filters.to_params();

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        normalize_layer_response(raw, "live-flights")
    }

    /// Schedule and status for a callsign such as `UAL1234`.
    pub async fn flight_schedule(&self, callsign: &str) -> GeoLayersResult<FlightScheduleResponse> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/flights/schedule"))?;
        let mut params = QueryParams::new();
        params.push("callsign", callsign);

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        parse_payload(raw, "flight schedule response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_defaults_cover_world() {
        let params = FlightFilters::default().to_params();
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("lamin", "-90"), ("lomin", "-180"), ("lamax", "90"), ("lomax", "180")]
        );
    }

    #[test]
    fn test_partial_bbox_keeps_defaults() {
        let params = FlightFilters {
            lamin: Some(20.0),
            ..FlightFilters::default()
        }
        .to_params();
        assert_eq!(params.get("lamin"), Some("20"));
        assert_eq!(params.get("lomax"), Some("180"));
    }

    #[test]
    fn test_live_defaults_to_new_york() {
        let params = LiveFlightFilters::default().to_params();
        assert_eq!(params.get("lat"), Some("40.7128"));
        assert_eq!(params.get("lng"), Some("-74.006"));
        assert_eq!(params.get("radius"), Some("250"));

        let custom = LiveFlightFilters::around(51.47, -0.4543).with_radius(50.0);
        assert_eq!(custom.to_params().get("radius"), Some("50"));
    }
}
