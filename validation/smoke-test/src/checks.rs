//! One check per API operation, run sequentially against a live server.

use std::future::Future;
use std::time::Instant;

use geolayers_client::{
    BboxObservationFilters, ChartFilters, EarthquakeFilters, FlightFilters, GeoLayersClient,
    GeoLayersResult, LiveFlightFilters, ObservationFilters, StationNetwork,
    StationObservationFilters, WildfireFilters, Wis2ObservationFilters, Wis2StationFilters,
};
use geolayers_types::{BboxObservationsResult, BoundingBox, ObservationProvider, TimePreset};
use serde::Serialize;
use tracing::{info, warn};

/// Station and flight identifiers used by the per-station checks.
#[derive(Debug, Clone)]
pub struct Targets {
    pub wis2_station: String,
    pub iem_station: String,
    pub buoy: String,
    pub callsign: String,
    pub bbox: BoundingBox,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            wis2_station: "0-20000-0-72503".to_string(),
            iem_station: "KJFK".to_string(),
            buoy: "41001".to_string(),
            callsign: "UAL1234".to_string(),
            bbox: BoundingBox::new(-80.0, 30.0, -65.0, 45.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub duration_ms: f64,
    /// Item count on success, error message on failure.
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

async fn check<T, Fut>(name: &'static str, fut: Fut, describe: impl FnOnce(&T) -> String) -> CheckResult
where
    Fut: Future<Output = GeoLayersResult<T>>,
{
    let start = Instant::now();
    let outcome = fut.await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(value) => {
            let detail = describe(&value);
            info!(check = name, duration_ms, %detail, "Check passed");
            CheckResult {
                name,
                passed: true,
                duration_ms,
                detail,
                status_code: None,
            }
        }
        Err(e) => {
            warn!(check = name, duration_ms, error = %e, "Check failed");
            CheckResult {
                name,
                passed: false,
                duration_ms,
                detail: e.message(),
                status_code: e.status_code(),
            }
        }
    }
}

fn features(n: usize) -> String {
    format!("{} features", n)
}

fn observations(n: usize) -> String {
    format!("{} observations", n)
}

/// Observation count, flagging any located outside the requested box.
fn bbox_observations(bbox: &BoundingBox, result: &BboxObservationsResult) -> String {
    let outside = result
        .observations
        .iter()
        .filter(|o| match (o.longitude, o.latitude) {
            (Some(lon), Some(lat)) => !bbox.contains_point(lon, lat),
            _ => false,
        })
        .count();
    if outside == 0 {
        observations(result.observations.len())
    } else {
        format!("{} ({} outside bbox)", observations(result.observations.len()), outside)
    }
}

/// Run every check. Failures are recorded, never short-circuit.
pub async fn run_all(client: &GeoLayersClient, targets: &Targets) -> Vec<CheckResult> {
    let history = ObservationFilters::last(TimePreset::LastDay);
    let mut results = Vec::new();

    results.push(
        check(
            "seismic.earthquakes",
            client.seismic().earthquakes(EarthquakeFilters::default()),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(check("volcanic.volcanoes", client.volcanic().volcanoes(), |l| features(l.data.len())).await);
    results.push(
        check("volcanic.active_volcanoes", client.volcanic().active_volcanoes(), |l| {
            features(l.data.len())
        })
        .await,
    );
    results.push(check("tropical.active_storms", client.tropical().active_storms(), |l| features(l.data.len())).await);
    results.push(check("tropical.recent_storms", client.tropical().recent_storms(), |l| features(l.data.len())).await);
    results.push(
        check(
            "fire.wildfires",
            client.fire().wildfires(WildfireFilters::default()),
            |l| features(l.data.len()),
        )
        .await,
    );

    results.push(
        check(
            "weather.wis2_stations",
            client.weather().wis2_stations(Wis2StationFilters::default()),
            |l| features(l.data.len()),
        )
        .await,
    );
    let wis2_history = Wis2ObservationFilters::from(history);
    results.push(
        check(
            "weather.wis2_observations",
            client
                .weather()
                .wis2_observations(&targets.wis2_station, &wis2_history),
            |r| observations(r.observations.len()),
        )
        .await,
    );
    results.push(check("weather.iem_stations", client.weather().iem_stations(), |l| features(l.data.len())).await);
    results.push(
        check(
            "weather.iem_observations",
            client.weather().iem_observations(&targets.iem_station, &history),
            |r| observations(r.observations.len()),
        )
        .await,
    );
    results.push(check("weather.nws_stations", client.weather().nws_stations(), |l| features(l.data.len())).await);
    results.push(
        check(
            "weather.active_stations",
            client.weather().active_stations(StationNetwork::Wis2),
            |l| features(l.data.len()),
        )
        .await,
    );

    results.push(check("maritime.buoy_stations", client.maritime().buoy_stations(), |l| features(l.data.len())).await);
    results.push(
        check(
            "maritime.latest_buoy_observations",
            client.maritime().latest_buoy_observations(),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(
        check(
            "maritime.buoy_observations",
            client.maritime().buoy_observations(&targets.buoy, &history),
            |r| observations(r.observations.len()),
        )
        .await,
    );

    results.push(
        check(
            "aviation.global_flights",
            client.aviation().global_flights(FlightFilters::default()),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(
        check(
            "aviation.live_flights",
            client.aviation().live_flights(LiveFlightFilters::default()),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(
        check(
            "aviation.flight_schedule",
            client.aviation().flight_schedule(&targets.callsign),
            |s| format!("{} fields", s.data.len()),
        )
        .await,
    );

    let warehouse = StationObservationFilters::new(ObservationProvider::Iem)
        .with_preset(TimePreset::LastDay)
        .with_limit(100);
    results.push(
        check(
            "observations.active_wis2_stations",
            client.observations().active_wis2_stations(),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(
        check(
            "observations.active_iem_stations",
            client.observations().active_iem_stations(),
            |l| features(l.data.len()),
        )
        .await,
    );
    results.push(
        check(
            "observations.station_observations",
            client
                .observations()
                .station_observations(&targets.iem_station, &warehouse),
            |r| observations(r.observations.len()),
        )
        .await,
    );
    results.push(
        check(
            "observations.latest_observation",
            client
                .observations()
                .latest_observation(&targets.iem_station, ObservationProvider::Iem),
            |r| observations(usize::from(r.observation.is_some())),
        )
        .await,
    );
    let bbox = BboxObservationFilters::new(
        targets.bbox,
        StationObservationFilters::new(ObservationProvider::Buoy).with_preset(TimePreset::LastDay),
    );
    results.push(
        check(
            "observations.observations_by_bbox",
            client.observations().observations_by_bbox(&bbox),
            |r| bbox_observations(&targets.bbox, r),
        )
        .await,
    );
    results.push(
        check("observations.stats", client.observations().stats(None), |s| {
            format!("{} total", s.total_observations)
        })
        .await,
    );
    let chart_id = format!("wis2:{}", targets.wis2_station);
    results.push(
        check(
            "observations.chart_data",
            client.observations().chart_data(&chart_id, ChartFilters::default()),
            |c| format!("{} points", c.data.len()),
        )
        .await,
    );

    results.push(
        check("events.event_types", client.events_meta().event_types(), |t| {
            format!("{} types", t.types.len())
        })
        .await,
    );

    results
}
