//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use geolayers_client::{
    ApiVersion, CredentialProvider, GeoLayersClient, GeoLayersConfig, HttpRequest, HttpResponse,
    RequestExecutor, Transport, TransportError,
};
use serde_json::Value;
use tokio::time::Instant;
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

/// Transport that replays a fixed script and records every request with
/// the (possibly paused) tokio clock.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Milliseconds between consecutive calls.
    pub fn gaps_ms(&self) -> Vec<u128> {
        let calls = self.calls.lock().unwrap();
        calls
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].0).as_millis())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push((Instant::now(), request));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connect("script exhausted")))
    }
}

pub fn status(code: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(code, ""))
}

pub fn json(code: u16, body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::json(code, &body))
}

pub fn refused() -> Result<HttpResponse, TransportError> {
    Err(TransportError::connect("connect ECONNREFUSED 127.0.0.1:443"))
}

pub fn scripted_executor(
    transport: Arc<ScriptedTransport>,
    retries: u32,
    credentials: Option<Arc<dyn CredentialProvider>>,
) -> RequestExecutor {
    let config = GeoLayersConfig::new("https://api.test.com", API_KEY).with_retries(retries);
    let mut builder = RequestExecutor::builder(config).with_transport(transport);
    if let Some(credentials) = credentials {
        builder = builder.with_credentials(credentials);
    }
    builder.build().unwrap()
}

/// Client talking to a wiremock server.
pub fn client_for(server: &MockServer, version: ApiVersion) -> GeoLayersClient {
    let config = GeoLayersConfig::new(server.uri(), API_KEY)
        .with_retries(0)
        .with_api_version(version);
    GeoLayersClient::new(config).unwrap()
}
