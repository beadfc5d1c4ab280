//! Provider-specific feature property sets.
//!
//! Each struct is the `P` in `Feature<P>` for one data domain. Fields the
//! upstream feeds may omit or null out are `Option`; unknown fields are
//! ignored on decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A value some feeds send as a number and others as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    /// Numeric value, parsing strings when possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::String(s) => s.trim().parse().ok(),
        }
    }
}

/// USGS earthquake properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeProps {
    pub mag: f64,
    pub place: String,
    /// Origin time, epoch milliseconds.
    pub time: f64,
    /// Last update, epoch milliseconds.
    pub updated: f64,
    pub tz: Option<f64>,
    pub url: String,
    pub detail: String,
    pub felt: Option<f64>,
    pub cdi: Option<f64>,
    pub mmi: Option<f64>,
    pub alert: Option<String>,
    pub status: String,
    pub tsunami: f64,
    pub sig: f64,
    pub net: String,
    pub code: String,
    pub ids: String,
    pub sources: String,
    pub types: String,
    pub nst: Option<f64>,
    pub dmin: Option<f64>,
    pub rms: Option<f64>,
    pub gap: Option<f64>,
    pub mag_type: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

/// Smithsonian Holocene volcano properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoProps {
    pub volcano_number: Option<f64>,
    pub volcano_name: String,
    pub volcanic_landform: Option<String>,
    pub primary_volcano_type: Option<String>,
    pub last_eruption_year: Option<NumberOrString>,
    pub country: String,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub geological_summary: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub tectonic_setting: Option<String>,
    pub geologic_epoch: Option<String>,
    pub evidence_category: Option<String>,
    pub primary_photo_link: Option<String>,
    pub primary_photo_caption: Option<String>,
    pub primary_photo_credit: Option<String>,
    pub major_rock_type: Option<String>,
}

/// Links attached to a GDACS event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GdacsLinks {
    pub geometry: Option<String>,
    pub report: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffectedCountry {
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub countryname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityData {
    pub severity: Option<f64>,
    pub severitytext: Option<String>,
    pub severityunit: Option<String>,
}

/// GDACS active volcano alert properties.
///
/// GDACS uses all-lowercase field names, so no renaming applies except
/// for `class`, `marketType` and `volcname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveVolcanoProps {
    pub name: String,
    pub eventtype: Option<String>,
    pub eventid: Option<f64>,
    pub episodeid: Option<f64>,
    pub eventname: Option<String>,
    pub glide: Option<String>,
    pub description: Option<String>,
    pub htmldescription: Option<String>,
    pub icon: Option<String>,
    pub iconoverall: Option<String>,
    pub url: Option<GdacsLinks>,
    pub alertlevel: Option<String>,
    pub alertscore: Option<f64>,
    pub episodealertlevel: Option<String>,
    pub episodealertscore: Option<f64>,
    pub istemporary: Option<String>,
    pub iscurrent: Option<String>,
    pub country: Option<String>,
    pub fromdate: Option<String>,
    pub todate: Option<String>,
    pub datemodified: Option<String>,
    pub iso3: Option<String>,
    pub source: Option<String>,
    pub sourceid: Option<String>,
    pub polygonlabel: Option<String>,
    #[serde(rename = "class")]
    pub class_: Option<String>,
    pub affectedcountries: Option<Vec<AffectedCountry>>,
    pub severitydata: Option<SeverityData>,
    #[serde(rename = "marketType")]
    pub market_type: Option<VolcanoMarketType>,
    pub volcname: Option<String>,
}

/// The only market type GDACS volcano alerts carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolcanoMarketType {
    Volcano,
}

/// A single station measurement. Value may be numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMeasurement {
    pub value: NumberOrString,
    pub unit: Option<String>,
}

/// Weather, buoy and observing station properties (WIS2, IEM, NWS, NDBC).
///
/// Networks disagree on identifier and name fields, so fallbacks are kept
/// side by side. Use [`WeatherStationProps::station_id`] and
/// [`WeatherStationProps::display_name`] to pick the first one present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherStationProps {
    pub id: Option<String>,
    pub wigos_station_identifier: Option<String>,
    pub station_identifier: Option<String>,
    pub name: Option<String>,
    pub station_name: Option<String>,
    pub provider: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "wis2CollectionId")]
    pub wis2_collection_id: Option<String>,
    #[serde(rename = "marketType")]
    pub market_type: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub measurements: Option<HashMap<String, StationMeasurement>>,
}

impl WeatherStationProps {
    /// First available station identifier.
    pub fn station_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.wigos_station_identifier.as_deref())
            .or(self.station_identifier.as_deref())
    }

    /// First available station name.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.station_name.as_deref())
    }
}

/// Tropical cyclone track and forecast properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StormProps {
    pub objectid: Option<f64>,
    pub stormname: Option<String>,
    pub stormid: Option<String>,
    pub stormnum: Option<f64>,
    pub stormtype: Option<String>,
    pub dtg: Option<f64>,
    pub year: Option<f64>,
    pub month: Option<String>,
    pub day: Option<f64>,
    pub hhmm: Option<String>,
    pub tau: Option<f64>,
    pub mslp: Option<f64>,
    pub basin: Option<String>,
    pub intensity: Option<f64>,
    pub ss: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    // Aliases some feeds use for the same quantities.
    pub category: Option<f64>,
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub status: Option<String>,
}

/// NASA FIRMS active fire / thermal anomaly properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildfireProps {
    pub brightness: f64,
    pub bright_ti4: Option<f64>,
    pub bright_ti5: Option<f64>,
    pub scan: Option<f64>,
    pub track: Option<f64>,
    pub acq_date: String,
    pub acq_time: String,
    pub satellite: Option<String>,
    pub instrument: Option<String>,
    /// Percent for MODIS, `l`/`n`/`h` for VIIRS.
    pub confidence: Option<NumberOrString>,
    pub version: Option<String>,
    pub frp: Option<f64>,
    pub daynight: Option<String>,
}

/// Aircraft state properties (OpenSky and Airplanes.live).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightProps {
    // OpenSky
    pub icao24: Option<String>,
    pub callsign: Option<String>,
    pub origin_country: Option<String>,

    // Airplanes.live
    pub hex: Option<String>,
    pub flight: Option<String>,
    pub registration: Option<String>,
    #[serde(rename = "type")]
    pub aircraft_type: Option<String>,

    pub velocity: Option<f64>,
    pub geo_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub vertical_rate: Option<f64>,
    /// Feet, or the string `"ground"`.
    pub baro_altitude: Option<NumberOrString>,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    pub position_source: Option<f64>,
    pub ground_speed: Option<f64>,
    pub track: Option<f64>,
    pub true_track: Option<f64>,
    pub emergency: Option<String>,
    pub category: Option<String>,

    /// Unix seconds.
    pub time_position: Option<f64>,
    /// Unix seconds.
    pub last_contact: Option<f64>,

    pub sensors: Option<Vec<f64>>,
}

impl FlightProps {
    /// Heading in degrees, whichever feed supplied it.
    pub fn heading(&self) -> Option<f64> {
        self.true_track.or(self.track)
    }

    /// Trimmed callsign or flight number.
    pub fn ident(&self) -> Option<&str> {
        self.callsign
            .as_deref()
            .or(self.flight.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_earthquake_props_nullable_fields() {
        let props: EarthquakeProps = serde_json::from_value(json!({
            "mag": 4.5,
            "place": "10 km SW of Somewhere",
            "time": 1704067200000i64,
            "updated": 1704067300000i64,
            "tz": null,
            "url": "https://earthquake.usgs.gov/x",
            "detail": "https://earthquake.usgs.gov/x.geojson",
            "felt": null,
            "cdi": null,
            "mmi": null,
            "alert": null,
            "status": "reviewed",
            "tsunami": 0,
            "sig": 312,
            "net": "us",
            "code": "7000abcd",
            "ids": ",us7000abcd,",
            "sources": ",us,",
            "types": ",origin,phase-data,",
            "nst": null,
            "dmin": 1.2,
            "rms": 0.8,
            "gap": 45.0,
            "magType": "mb",
            "type": "earthquake",
            "title": "M 4.5 - 10 km SW of Somewhere"
        }))
        .unwrap();

        assert_eq!(props.mag_type, "mb");
        assert_eq!(props.kind, "earthquake");
        assert!(props.felt.is_none());
        assert_eq!(props.dmin, Some(1.2));
    }

    #[test]
    fn test_earthquake_props_missing_required_field() {
        let err = serde_json::from_value::<EarthquakeProps>(json!({ "mag": 1.0 })).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_volcano_eruption_year_number_or_string() {
        let numeric: VolcanoProps = serde_json::from_value(json!({
            "volcanoName": "Kilauea",
            "country": "United States",
            "lastEruptionYear": 2023
        }))
        .unwrap();
        assert_eq!(
            numeric.last_eruption_year.and_then(|y| y.as_f64()),
            Some(2023.0)
        );

        let text: VolcanoProps = serde_json::from_value(json!({
            "volcanoName": "Etna",
            "country": "Italy",
            "lastEruptionYear": "Unknown"
        }))
        .unwrap();
        assert_eq!(
            text.last_eruption_year,
            Some(NumberOrString::String("Unknown".to_string()))
        );
    }

    #[test]
    fn test_active_volcano_market_type_literal() {
        let ok = serde_json::from_value::<ActiveVolcanoProps>(json!({
            "name": "Merapi",
            "class": "Poly_Green",
            "marketType": "volcano"
        }))
        .unwrap();
        assert_eq!(ok.class_.as_deref(), Some("Poly_Green"));
        assert_eq!(ok.market_type, Some(VolcanoMarketType::Volcano));

        let bad = serde_json::from_value::<ActiveVolcanoProps>(json!({
            "name": "Merapi",
            "marketType": "earthquake"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_station_props_empty_object_is_valid() {
        let props: WeatherStationProps = serde_json::from_value(json!({})).unwrap();
        assert_eq!(props, WeatherStationProps::default());
    }

    #[test]
    fn test_station_id_and_name_fallbacks() {
        let props: WeatherStationProps = serde_json::from_value(json!({
            "wigos_station_identifier": "0-20000-0-12345",
            "station_name": "Central Park",
            "measurements": {
                "temperature": { "value": 21.5, "unit": "C" },
                "weather": { "value": "clear" }
            }
        }))
        .unwrap();

        assert_eq!(props.station_id(), Some("0-20000-0-12345"));
        assert_eq!(props.display_name(), Some("Central Park"));

        let measurements = props.measurements.unwrap();
        assert_eq!(measurements["temperature"].value.as_f64(), Some(21.5));
        assert_eq!(measurements["weather"].unit, None);
    }

    #[test]
    fn test_wildfire_confidence_variants() {
        let modis: WildfireProps = serde_json::from_value(json!({
            "brightness": 320.5,
            "acq_date": "2024-01-01",
            "acq_time": "0130",
            "confidence": 85
        }))
        .unwrap();
        assert_eq!(modis.confidence.and_then(|c| c.as_f64()), Some(85.0));

        let viirs: WildfireProps = serde_json::from_value(json!({
            "brightness": 330.1,
            "acq_date": "2024-01-01",
            "acq_time": "0130",
            "confidence": "h"
        }))
        .unwrap();
        assert_eq!(viirs.confidence, Some(NumberOrString::String("h".into())));
    }

    #[test]
    fn test_flight_props_heading_and_ident() {
        let props: FlightProps = serde_json::from_value(json!({
            "icao24": "a1b2c3",
            "callsign": "UAL1234 ",
            "originCountry": "United States",
            "baroAltitude": "ground",
            "onGround": true,
            "trueTrack": 271.0,
            "type": "B738"
        }))
        .unwrap();

        assert_eq!(props.heading(), Some(271.0));
        assert_eq!(props.ident(), Some("UAL1234"));
        assert_eq!(props.aircraft_type.as_deref(), Some("B738"));
        assert_eq!(props.baro_altitude.unwrap().as_f64(), None);
    }

    #[test]
    fn test_storm_props_alias_fields() {
        let props: StormProps = serde_json::from_value(json!({
            "stormname": "ALPHA",
            "windSpeed": 85.0,
            "category": 1
        }))
        .unwrap();
        assert_eq!(props.wind_speed, Some(85.0));
        assert_eq!(props.category, Some(1.0));
    }
}
