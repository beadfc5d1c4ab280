//! Domain accessors.
//!
//! Each accessor is a thin struct around the shared
//! [`RequestExecutor`](crate::executor::RequestExecutor): it
//! declares its endpoints, shapes query parameters and picks the decoder for
//! the response.

pub mod aviation;
pub mod events_meta;
pub mod fire;
pub mod maritime;
pub mod observations;
pub mod seismic;
pub mod tropical;
pub mod volcanic;
pub mod weather;

pub use aviation::{AviationApi, FlightFilters, LiveFlightFilters};
pub use events_meta::EventsMetaApi;
pub use fire::{FireApi, WildfireFilters};
pub use maritime::MaritimeApi;
pub use observations::{
    BboxObservationFilters, ChartFilters, ObservationsApi, StationObservationFilters,
};
pub use seismic::{EarthquakeFilters, SeismicApi};
pub use tropical::TropicalApi;
pub use volcanic::VolcanicApi;
pub use weather::{
    ObservationFilters, StationNetwork, WeatherApi, Wis2ObservationFilters, Wis2StationFilters,
};

use chrono::{DateTime, Utc};
use geolayers_types::format_iso8601;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in ids placed in a URL path. `:` is kept so
/// provider-prefixed ids like `wis2:0-123-456` read naturally.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':');

/// Percent-encode a caller-supplied id for use as one path segment.
pub(crate) fn encode_segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

pub(crate) fn iso(dt: &DateTime<Utc>) -> String {
    format_iso8601(dt)
}
