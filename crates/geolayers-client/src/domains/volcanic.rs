//! Volcanoes.

use std::sync::Arc;

use geolayers_types::{ActiveVolcanoProps, VolcanoProps};

use crate::error::GeoLayersResult;
use crate::executor::RequestExecutor;
use crate::normalize::{normalize_layer_response, parse_feature_array_response, LayerCollection};
use crate::resolver::VersionedEndpoint;

/// Holocene volcano list and GDACS activity alerts.
#[derive(Debug, Clone)]
pub struct VolcanicApi {
    executor: Arc<RequestExecutor>,
}

impl VolcanicApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// All known volcanoes. The server sends a plain feature array inside
    /// the envelope; it comes back as a FeatureCollection.
    pub async fn volcanoes(&self) -> GeoLayersResult<LayerCollection<VolcanoProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/volcanoes"))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        parse_feature_array_response(raw)
    }

    /// Volcanoes with current GDACS alerts.
    pub async fn active_volcanoes(&self) -> GeoLayersResult<LayerCollection<ActiveVolcanoProps>> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/geojson/volcanoes/active"))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        normalize_layer_response(raw, "active-volcanoes")
    }
}
