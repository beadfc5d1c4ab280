//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Default per-attempt request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 2;
/// Default API base path.
pub const DEFAULT_API_BASE_PATH: &str = "/api";

/// The two API generations the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    /// `v1`: enveloped responses.
    #[default]
    Legacy,
    /// `v2`: bare FeatureCollections.
    Current,
}

impl ApiVersion {
    /// Path segment used on the wire.
    pub fn segment(&self) -> &'static str {
        match self {
            ApiVersion::Legacy => "v1",
            ApiVersion::Current => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Ok(ApiVersion::Legacy),
            "v2" | "current" => Ok(ApiVersion::Current),
            other => Err(ConfigError::Invalid {
                field: "api_version",
                message: format!("expected v1, v2, legacy or current, got '{}'", other),
            }),
        }
    }
}

/// Immutable client configuration, shared by every accessor.
#[derive(Clone)]
pub struct GeoLayersConfig {
    /// Server origin, e.g. `https://geolayers.example.com`.
    pub base_url: String,
    /// Sent as `X-API-Key` on every request.
    pub api_key: String,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub retries: u32,
    /// Prefix before the version segment.
    pub api_base_path: String,
    /// Preferred API generation.
    pub api_version: ApiVersion,
}

impl GeoLayersConfig {
    /// Create a configuration with defaults for everything but the address
    /// and the key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            api_version: ApiVersion::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_api_base_path(mut self, path: impl Into<String>) -> Self {
        self.api_base_path = path.into();
        self
    }

    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// Reads `GEOLAYERS_BASE_URL` and `GEOLAYERS_API_KEY` (required) and
    /// `GEOLAYERS_TIMEOUT_MS`, `GEOLAYERS_RETRIES`, `GEOLAYERS_API_BASE_PATH`,
    /// `GEOLAYERS_API_VERSION` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("GEOLAYERS_BASE_URL").ok_or(ConfigError::Missing("GEOLAYERS_BASE_URL"))?;
        let api_key = get("GEOLAYERS_API_KEY").ok_or(ConfigError::Missing("GEOLAYERS_API_KEY"))?;
        let mut config = Self::new(base_url, api_key);

        if let Some(ms) = get("GEOLAYERS_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "timeout",
                message: format!("GEOLAYERS_TIMEOUT_MS is not a number: '{}'", ms),
            })?;
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(retries) = get("GEOLAYERS_RETRIES") {
            config.retries = retries.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "retries",
                message: format!("GEOLAYERS_RETRIES is not a number: '{}'", retries),
            })?;
        }

        if let Some(path) = get("GEOLAYERS_API_BASE_PATH") {
            config.api_base_path = path;
        }

        if let Some(version) = get("GEOLAYERS_API_VERSION") {
            config.api_version = version.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check required values before any request is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "base_url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl fmt::Debug for GeoLayersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoLayersConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("api_base_path", &self.api_base_path)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeoLayersConfig::new("https://api.test.com", "key");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.retries, 2);
        assert_eq!(config.api_base_path, "/api");
        assert_eq!(config.api_version, ApiVersion::Legacy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = GeoLayersConfig::new("https://api.test.com/", "key")
            .with_timeout(Duration::from_secs(5))
            .with_retries(0)
            .with_api_base_path("/custom-api")
            .with_api_version(ApiVersion::Current);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retries, 0);
        assert_eq!(config.api_base_path, "/custom-api");
        assert_eq!(config.api_version, ApiVersion::Current);
        assert_eq!(config.base_url_trimmed(), "https://api.test.com");
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v1".parse::<ApiVersion>(), Ok(ApiVersion::Legacy));
        assert_eq!("legacy".parse::<ApiVersion>(), Ok(ApiVersion::Legacy));
        assert_eq!("V2".parse::<ApiVersion>(), Ok(ApiVersion::Current));
        assert_eq!("current".parse::<ApiVersion>(), Ok(ApiVersion::Current));
        assert!("v3".parse::<ApiVersion>().is_err());
        assert_eq!(ApiVersion::Current.to_string(), "v2");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            GeoLayersConfig::new("", "key").validate(),
            Err(ConfigError::Missing("base_url"))
        );
        assert_eq!(
            GeoLayersConfig::new("https://api.test.com", "").validate(),
            Err(ConfigError::Missing("api_key"))
        );
        assert!(matches!(
            GeoLayersConfig::new("not a url", "key").validate(),
            Err(ConfigError::Invalid { field: "base_url", .. })
        ));
        assert!(matches!(
            GeoLayersConfig::new("ftp://api.test.com", "key").validate(),
            Err(ConfigError::Invalid { field: "base_url", .. })
        ));
    }

    #[test]
    fn test_from_lookup_full() {
        let config = GeoLayersConfig::from_lookup(lookup(&[
            ("GEOLAYERS_BASE_URL", "https://api.test.com"),
            ("GEOLAYERS_API_KEY", "secret"),
            ("GEOLAYERS_TIMEOUT_MS", "1500"),
            ("GEOLAYERS_RETRIES", "4"),
            ("GEOLAYERS_API_BASE_PATH", "/geo"),
            ("GEOLAYERS_API_VERSION", "v2"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.retries, 4);
        assert_eq!(config.api_base_path, "/geo");
        assert_eq!(config.api_version, ApiVersion::Current);
    }

    #[test]
    fn test_from_lookup_missing_and_invalid() {
        assert_eq!(
            GeoLayersConfig::from_lookup(lookup(&[("GEOLAYERS_API_KEY", "k")])).unwrap_err(),
            ConfigError::Missing("GEOLAYERS_BASE_URL")
        );

        let err = GeoLayersConfig::from_lookup(lookup(&[
            ("GEOLAYERS_BASE_URL", "https://api.test.com"),
            ("GEOLAYERS_API_KEY", "k"),
            ("GEOLAYERS_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "retries", .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeoLayersConfig::new("https://api.test.com", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
