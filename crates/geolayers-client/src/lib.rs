//! Typed async client for the GeoLayers geospatial data API.
//!
//! [`GeoLayersClient`] groups the API into domain accessors (seismic,
//! volcanic, tropical, fire, weather, maritime, aviation, observations and
//! event metadata). They share one [`RequestExecutor`], which injects the API
//! key, retries transient failures with exponential backoff and maps every
//! failure onto [`GeoLayersError`]. Responses are validated into the types
//! from `geolayers-types`, whichever API generation served them.
//!
//! [`EventStream`] subscribes to real-time events and fans them out by
//! provider over broadcast channels.

pub mod auth;
pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod resolver;
pub mod retry;
pub mod stream;
pub mod transport;

pub use geolayers_types as types;

pub use auth::{CredentialProvider, StaticApiKey, API_KEY_HEADER};
pub use client::GeoLayersClient;
pub use config::{ApiVersion, GeoLayersConfig, DEFAULT_API_BASE_PATH, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
pub use domains::{
    AviationApi, BboxObservationFilters, ChartFilters, EarthquakeFilters, EventsMetaApi, FireApi,
    FlightFilters, LiveFlightFilters, MaritimeApi, ObservationFilters, ObservationsApi,
    SeismicApi, StationNetwork, StationObservationFilters, TropicalApi, VolcanicApi, WeatherApi,
    WildfireFilters, Wis2ObservationFilters, Wis2StationFilters,
};
pub use error::{
    ApiError, ConfigError, FieldError, GeoLayersError, GeoLayersResult, ValidationError,
};
pub use executor::{QueryParams, RequestExecutor, RequestExecutorBuilder};
pub use normalize::LayerCollection;
pub use resolver::{EndpointResolver, ResolvedEndpoint, VersionedEndpoint};
pub use retry::RetryPolicy;
pub use stream::{EventStream, StreamError, StreamMessage, Topic};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
    TransportErrorKind,
};
