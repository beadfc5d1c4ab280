//! Unit conversions and display formatting for observation values.

const KNOTS_TO_MS: f64 = 0.514444;
const KMH_PER_MS: f64 = 3.6;
const HPA_PER_INHG: f64 = 33.8639;

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * (5.0 / 9.0)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * (9.0 / 5.0) + 32.0
}

pub fn knots_to_ms(knots: f64) -> f64 {
    knots * KNOTS_TO_MS
}

pub fn ms_to_knots(ms: f64) -> f64 {
    ms / KNOTS_TO_MS
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / KMH_PER_MS
}

pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * KMH_PER_MS
}

pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * HPA_PER_INHG
}

pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa / HPA_PER_INHG
}

/// Format a coordinate pair as `"lat°, lon°"` with four decimals.
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    format!("{:.4}°, {:.4}°", lat, lon)
}

/// Turn a provider slug such as `active-storms` into `Active Storms`.
pub fn format_provider_name(provider: &str) -> String {
    provider
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
