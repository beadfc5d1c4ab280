//! Request execution with credential injection, retries and error mapping.
//!
//! Every domain accessor shares one [`RequestExecutor`]. A logical request is
//! at most `retries + 1` transport calls; only "no response", 429 and 5xx are
//! retried, with exponential backoff between attempts.

use std::sync::Arc;

use reqwest::header::HeaderValue;
use serde_json::Value;
use tracing::{debug, field::Empty, instrument, warn, Span};
use url::Url;

use crate::auth::{CredentialProvider, StaticApiKey, API_KEY_HEADER};
use crate::config::GeoLayersConfig;
use crate::error::{ApiError, ConfigError, GeoLayersResult, ValidationError};
use crate::resolver::{EndpointResolver, ResolvedEndpoint, VersionedEndpoint};
use crate::retry::{is_retryable_status, RetryPolicy};
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};

/// Ordered query parameters. Insertion order is the wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    /// Push only when a value is present.
    pub fn push_opt<T: ToString>(&mut self, key: impl Into<String>, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// Builder for [`RequestExecutor`].
pub struct RequestExecutorBuilder {
    config: GeoLayersConfig,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    retry: Option<RetryPolicy>,
}

impl RequestExecutorBuilder {
    /// Replace the HTTP transport. Tests use this to script responses.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the key source. Defaults to the configured key.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the retry policy derived from the configuration.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn build(self) -> Result<RequestExecutor, ConfigError> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.timeout)?),
        };
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(StaticApiKey::new(self.config.api_key.clone())));
        let retry = self
            .retry
            .unwrap_or_else(|| RetryPolicy::from_config(&self.config));
        let resolver = EndpointResolver::from_config(&self.config);

        Ok(RequestExecutor {
            config: Arc::new(self.config),
            transport,
            credentials,
            retry,
            resolver,
        })
    }
}

/// Shared HTTP executor used by every domain accessor.
pub struct RequestExecutor {
    config: Arc<GeoLayersConfig>,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    retry: RetryPolicy,
    resolver: EndpointResolver,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Why one attempt did not produce a usable response.
enum Failure {
    NoResponse(TransportError),
    Status(HttpResponse),
}

impl Failure {
    fn is_retryable(&self) -> bool {
        match self {
            Failure::NoResponse(_) => true,
            Failure::Status(response) => is_retryable_status(response.status),
        }
    }

    fn into_error(self) -> ApiError {
        match self {
            Failure::NoResponse(e) => ApiError::no_response(e.message),
            Failure::Status(response) => {
                let transport_message =
                    format!("Request failed with status code {}", response.status);
                ApiError::from_response(
                    response.status,
                    decode_error_body(&response),
                    &transport_message,
                )
            }
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::NoResponse(e) => write!(f, "{}", e),
            Failure::Status(response) => write!(f, "status code {}", response.status),
        }
    }
}

impl RequestExecutor {
    /// Build an executor with the production transport.
    pub fn new(config: GeoLayersConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn builder(config: GeoLayersConfig) -> RequestExecutorBuilder {
        RequestExecutorBuilder {
            config,
            transport: None,
            credentials: None,
            retry: None,
        }
    }

    pub fn config(&self) -> &GeoLayersConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Pick the concrete path for an endpoint descriptor.
    pub fn resolve(&self, endpoint: &VersionedEndpoint) -> Result<ResolvedEndpoint, ConfigError> {
        self.resolver.resolve(endpoint)
    }

    /// GET `path` (relative to the base URL) and return the decoded JSON body.
    #[instrument(
        name = "api_request",
        skip(self, params),
        fields(
            http.method = "GET",
            http.url = Empty,
            http.status_code = Empty,
            otel.kind = "client",
        )
    )]
    pub async fn get(&self, path: &str, params: Option<&QueryParams>) -> GeoLayersResult<Value> {
        let url = self.build_url(path, params)?;
        Span::current().record("http.url", url.as_str());
        self.execute(HttpMethod::Get, url, None).await
    }

    /// POST a JSON body to `path` and return the decoded JSON body.
    #[instrument(
        name = "api_request",
        skip(self, body),
        fields(
            http.method = "POST",
            http.url = Empty,
            http.status_code = Empty,
            otel.kind = "client",
        )
    )]
    pub async fn post(&self, path: &str, body: Option<&Value>) -> GeoLayersResult<Value> {
        let url = self.build_url(path, None)?;
        Span::current().record("http.url", url.as_str());
        self.execute(HttpMethod::Post, url, body).await
    }

    /// Join base URL and path, then append parameters after any query the
    /// path already carries.
    pub fn build_url(&self, path: &str, params: Option<&QueryParams>) -> Result<Url, ConfigError> {
        let raw = format!("{}{}", self.config.base_url_trimmed(), path);
        let mut url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            message: format!("cannot build request URL '{}': {}", raw, e),
        })?;

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<HttpRequest, ConfigError> {
        let key = self.credentials.api_key();
        HeaderValue::from_str(&key).map_err(|e| ConfigError::InvalidHeader(e.to_string()))?;

        Ok(HttpRequest {
            method,
            url: url.clone(),
            headers: vec![
                (API_KEY_HEADER.to_string(), key),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body: body.cloned(),
        })
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<&Value>,
    ) -> GeoLayersResult<Value> {
        let mut attempt: u32 = 0;

        loop {
            // Built per attempt so a rotated key is picked up.
            let request = self.build_request(method, &url, body)?;

            debug!(
                attempt = attempt + 1,
                max_attempts = self.retry.max_attempts(),
                "Sending request"
            );

            let failure = match self.transport.send(request).await {
                Ok(response) if response.is_success() => {
                    Span::current().record("http.status_code", response.status);
                    return decode_success(&response);
                }
                Ok(response) => {
                    Span::current().record("http.status_code", response.status);
                    Failure::Status(response)
                }
                Err(e) => Failure::NoResponse(e),
            };

            if !failure.is_retryable() || !self.retry.has_attempts_left(attempt) {
                let error = failure.into_error();
                debug!(
                    status_code = error.status_code,
                    attempts = attempt + 1,
                    "Request failed"
                );
                return Err(error.into());
            }

            let delay = self.retry.delay_for(attempt);
            warn!(
                error = %failure,
                attempt = attempt + 1,
                max_retries = self.retry.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn decode_success(response: &HttpResponse) -> GeoLayersResult<Value> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        ValidationError::single("response body", "", format!("not valid JSON: {}", e)).into()
    })
}

/// JSON when possible, raw text otherwise, nothing for an empty body.
fn decode_error_body(response: &HttpResponse) -> Option<Value> {
    if response.body.is_empty() {
        return None;
    }
    match serde_json::from_slice(&response.body) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(
            String::from_utf8_lossy(&response.body).into_owned(),
        )),
    }
}
