//! Event type metadata.

use std::sync::Arc;

use geolayers_types::EventTypesResponse;

use crate::error::GeoLayersResult;
use crate::executor::RequestExecutor;
use crate::normalize::parse_payload;
use crate::resolver::VersionedEndpoint;

/// Describes the events the push stream can emit.
#[derive(Debug, Clone)]
pub struct EventsMetaApi {
    executor: Arc<RequestExecutor>,
}

impl EventsMetaApi {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    pub async fn event_types(&self) -> GeoLayersResult<EventTypesResponse> {
        let endpoint = self
            .executor
            .resolve(&VersionedEndpoint::legacy_only("/events/types"))?;

        let raw = self.executor.get(&endpoint.path, None).await?;
        parse_payload(raw, "event types response")
    }
}
