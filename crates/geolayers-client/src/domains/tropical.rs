//! Tropical storms.

use std::sync::Arc;

use geolayers_types::StormProps;

use crate::error::GeoLayersResult;
use crate::executor::RequestExecutor;
use crate::normalize::{normalize_layer_response, LayerCollection};
use crate::resolver::VersionedEndpoint;

#[derive(Debug, Clone)]
pub struct TropicalApi {
    executor: Arc<RequestExecutor>,
}

impl TropicalApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Storms and hurricanes currently being tracked.
    pub async fn active_storms(&self) -> GeoLayersResult<LayerCollection<StormProps>> {
        self.fetch("/geojson/storms/active", "active-storms").await
    }

    /// Storms from the recent past, including dissipated ones.
    pub async fn recent_storms(&self) -> GeoLayersResult<LayerCollection<StormProps>> {
        self.fetch("/geojson/storms/recent", "recent-storms").await
    }

    async fn fetch(
        &self,
        legacy: &str,
        fallback_provider: &str,
    ) -> GeoLayersResult<LayerCollection<StormProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only(legacy))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, fallback_provider)
    }
}
