//! Top-level client.

use std::sync::Arc;

use crate::config::GeoLayersConfig;
use crate::domains::{
    AviationApi, EventsMetaApi, FireApi, MaritimeApi, ObservationsApi, SeismicApi, TropicalApi,
    VolcanicApi, WeatherApi,
};
use crate::error::{ConfigError, GeoLayersResult};
use crate::executor::RequestExecutor;
use crate::stream::EventStream;

/// Entry point: one shared executor behind every domain accessor.
///
/// ```no_run
/// use geolayers_client::{EarthquakeFilters, GeoLayersClient, GeoLayersConfig};
/// use geolayers_types::TimePreset;
///
/// # async fn demo() -> Result<(), geolayers_client::GeoLayersError> {
/// let client = GeoLayersClient::new(GeoLayersConfig::new("https://geolayers.example.com", "key"))?;
/// let quakes = client
///     .seismic()
///     .earthquakes(EarthquakeFilters::preset(TimePreset::LastWeek).with_min_magnitude(4.0))
///     .await?;
/// println!("{} earthquakes", quakes.data.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GeoLayersClient {
    executor: Arc<RequestExecutor>,
    seismic: SeismicApi,
    volcanic: VolcanicApi,
    tropical: TropicalApi,
    fire: FireApi,
    weather: WeatherApi,
    maritime: MaritimeApi,
    aviation: AviationApi,
    observations: ObservationsApi,
    events_meta: EventsMetaApi,
}

impl GeoLayersClient {
    pub fn new(config: GeoLayersConfig) -> GeoLayersResult<Self> {
        let executor = RequestExecutor::new(config)?;
        Ok(Self::from_executor(Arc::new(executor)))
    }

    /// Build from `GEOLAYERS_*` environment variables.
    pub fn from_env() -> GeoLayersResult<Self> {
        Self::new(GeoLayersConfig::from_env()?)
    }

    /// Wrap an executor built elsewhere, e.g. with a custom transport.
    pub fn from_executor(executor: Arc<RequestExecutor>) -> Self {
        Self {
            seismic: SeismicApi::new(executor.clone()),
            volcanic: VolcanicApi::new(executor.clone()),
            tropical: TropicalApi::new(executor.clone()),
            fire: FireApi::new(executor.clone()),
            weather: WeatherApi::new(executor.clone()),
            maritime: MaritimeApi::new(executor.clone()),
            aviation: AviationApi::new(executor.clone()),
            observations: ObservationsApi::new(executor.clone()),
            events_meta: EventsMetaApi::new(executor.clone()),
            executor,
        }
    }

    pub fn seismic(&self) -> &SeismicApi {
        &self.seismic
    }

    pub fn volcanic(&self) -> &VolcanicApi {
        &self.volcanic
    }

    pub fn tropical(&self) -> &TropicalApi {
        &self.tropical
    }

    pub fn fire(&self) -> &FireApi {
        &self.fire
    }

    pub fn weather(&self) -> &WeatherApi {
        &self.weather
    }

    pub fn maritime(&self) -> &MaritimeApi {
        &self.maritime
    }

    pub fn aviation(&self) -> &AviationApi {
        &self.aviation
    }

    pub fn observations(&self) -> &ObservationsApi {
        &self.observations
    }

    pub fn events_meta(&self) -> &EventsMetaApi {
        &self.events_meta
    }

    /// A new, unconnected event stream for this client's server and key.
    pub fn events(&self) -> Result<EventStream, ConfigError> {
        EventStream::new(self.executor.config())
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    pub fn config(&self) -> &GeoLayersConfig {
        self.executor.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_share_one_executor() {
        let client =
            GeoLayersClient::new(GeoLayersConfig::new("https://api.test.com", "k")).unwrap();

        // The client and nine accessors each hold a handle.
        assert_eq!(Arc::strong_count(client.executor()), 10);
        assert_eq!(client.config().base_url, "https://api.test.com");
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let err = GeoLayersClient::new(GeoLayersConfig::new("https://api.test.com", "")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_events_builds_stream_url() {
        let client =
            GeoLayersClient::new(GeoLayersConfig::new("https://api.test.com", "k")).unwrap();
        let stream = client.events().unwrap();
        assert!(!stream.is_connected());
    }
}
