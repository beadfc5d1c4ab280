//! Endpoint resolution across the two API generations.

use crate::config::{ApiVersion, GeoLayersConfig};
use crate::error::ConfigError;

/// Path fragments for one logical endpoint on each API generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedEndpoint {
    pub legacy: Option<String>,
    pub current: Option<String>,
}

impl VersionedEndpoint {
    pub fn new(legacy: Option<String>, current: Option<String>) -> Self {
        Self { legacy, current }
    }

    /// Endpoint not yet migrated to the current generation.
    pub fn legacy_only(path: impl Into<String>) -> Self {
        Self::new(Some(path.into()), None)
    }

    pub fn current_only(path: impl Into<String>) -> Self {
        Self::new(None, Some(path.into()))
    }

    pub fn both(legacy: impl Into<String>, current: impl Into<String>) -> Self {
        Self::new(Some(legacy.into()), Some(current.into()))
    }
}

/// The concrete path chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    /// Path relative to the base URL, e.g. `/api/v1/geojson/earthquakes`.
    pub path: String,
    pub version: ApiVersion,
}

/// Chooses between legacy and current paths according to the preferred
/// version and what the endpoint supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base_path: String,
    preferred: ApiVersion,
}

impl EndpointResolver {
    pub fn new(base_path: &str, preferred: ApiVersion) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        let base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            base_path,
            preferred,
        }
    }

    pub fn from_config(config: &GeoLayersConfig) -> Self {
        Self::new(&config.api_base_path, config.api_version)
    }

    pub fn preferred(&self) -> ApiVersion {
        self.preferred
    }

    /// Resolve an endpoint.
    ///
    /// 1. preferred is current and a current path exists: current
    /// 2. a legacy path exists: legacy
    /// 3. a current path exists: current
    /// 4. otherwise [`ConfigError::NoEndpointAvailable`]
    pub fn resolve(&self, endpoint: &VersionedEndpoint) -> Result<ResolvedEndpoint, ConfigError> {
        if self.preferred == ApiVersion::Current {
            if let Some(current) = &endpoint.current {
                return Ok(self.resolved(ApiVersion::Current, current));
            }
        }

        if let Some(legacy) = &endpoint.legacy {
            return Ok(self.resolved(ApiVersion::Legacy, legacy));
        }

        if let Some(current) = &endpoint.current {
            return Ok(self.resolved(ApiVersion::Current, current));
        }

        Err(ConfigError::NoEndpointAvailable)
    }

    /// Same as [`resolve`](Self::resolve) but only the path.
    pub fn resolve_url(&self, endpoint: &VersionedEndpoint) -> Result<String, ConfigError> {
        self.resolve(endpoint).map(|resolved| resolved.path)
    }

    /// `{base_path}/{segment}/{fragment}` with single slashes at the joins.
    pub fn build_path(&self, version: ApiVersion, fragment: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_path,
            version.segment(),
            fragment.trim_start_matches('/')
        )
    }

    fn resolved(&self, version: ApiVersion, fragment: &str) -> ResolvedEndpoint {
        ResolvedEndpoint {
            path: self.build_path(version, fragment),
            version,
        }
    }
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_API_BASE_PATH, ApiVersion::default())
    }
}
