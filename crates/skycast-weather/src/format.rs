//! Display helpers: city-local times, unit labels, rounded readings.
//!
//! City-local time is computed by adding the location's UTC offset to the
//! UTC timestamp and formatting the result as if it were UTC. No timezone
//! database is consulted, so output depends only on the two inputs.

use chrono::DateTime;

use crate::types::{CurrentConditions, DailySummary, UnitSystem};

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Render `utc_seconds` shifted by `offset_seconds` as a wall-clock string,
/// e.g. `Sat, 01 Jun 2024 12:34:56`.
///
/// Returns `"-"` when the shifted timestamp is out of range.
pub fn format_local_time(utc_seconds: i64, offset_seconds: i64) -> String {
    utc_seconds
        .checked_add(offset_seconds)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn temperature_symbol(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "°C",
        UnitSystem::Imperial => "°F",
    }
}

pub fn wind_speed_label(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "m/s",
        UnitSystem::Imperial => "mph",
    }
}

/// `21.6` in metric becomes `"22°C"`
pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    format!("{}{}", round_display(value), temperature_symbol(units))
}

pub fn format_wind_speed(value: f64, units: UnitSystem) -> String {
    format!("{} {}", round_display(value), wind_speed_label(units))
}

pub fn format_humidity(percent: u8) -> String {
    format!("{}%", percent)
}

pub fn icon_url(icon: &str) -> String {
    format!("{}/{}@2x.png", ICON_URL_BASE, icon)
}

/// `"Paris, FR"`, or just the city when no country code was reported
pub fn display_name(current: &CurrentConditions) -> String {
    match current.country.as_deref() {
        Some(country) if !country.is_empty() => format!("{}, {}", current.city, country),
        _ => current.city.clone(),
    }
}

/// Forecast card heading, e.g. `"Sat • Jun 1"`
pub fn day_label(day: &DailySummary) -> String {
    day.date.format("%a • %b %-d").to_string()
}

/// Halves round up toward positive infinity, so `-2.5` displays as `-2`
/// and `2.5` as `3`; `-0.4` displays as `0`, never `-0`
fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
