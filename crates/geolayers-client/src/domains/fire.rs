//! Wildfires and heat anomalies.

use std::sync::Arc;

use geolayers_types::WildfireProps;

use crate::error::GeoLayersResult;
use crate::executor::{QueryParams, RequestExecutor};
use crate::normalize::{normalize_layer_response, LayerCollection};
use crate::resolver::VersionedEndpoint;

/// Default look-back in days.
pub const DEFAULT_WILDFIRE_DAYS: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WildfireFilters {
    /// Days of detections to return (1-30). Defaults to 1.
    pub days: Option<u32>,
}

impl WildfireFilters {
    pub fn days(days: u32) -> Self {
        Self { days: Some(days) }
    }

    pub(crate) fn to_params(self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("days", self.days.unwrap_or(DEFAULT_WILDFIRE_DAYS));
        params
    }
}

#[derive(Debug, Clone)]
pub struct FireApi {
    executor: Arc<RequestExecutor>,
}

impl FireApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Active fire detections.
    pub async fn wildfires(
        &self,
        filters: WildfireFilters,
    ) -> GeoLayersResult<LayerCollection<WildfireProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/wildfires"))?;
        let params = filters.to_params();

        let raw = self.executor.get(&endpoint.path, Some(&params)).await?;
        normalize_layer_response(raw, "wildfires")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_default() {
        assert_eq!(WildfireFilters::default().to_params().get("days"), Some("1"));
        assert_eq!(WildfireFilters::days(7).to_params().get("days"), Some("7"));
    }
}
