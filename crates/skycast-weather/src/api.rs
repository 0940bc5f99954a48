//! OpenWeatherMap 2.5 response shapes and their mapping into domain types.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::format::format_local_time;
use crate::types::{CurrentConditions, ForecastSample, DEFAULT_ICON};

/// Layout of the forecast feed's `dt_txt` field
const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `GET /weather` body
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    #[serde(default)]
    pub sys: Option<SysInfo>,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub wind: Option<WindInfo>,
    pub dt: i64,
    /// Shift from UTC in seconds
    #[serde(default)]
    pub timezone: i64,
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionInfo {
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
}

/// `GET /forecast` body
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastItem {
    pub dt_txt: String,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
}

/// Icon and description of the first condition entry, with fallbacks
fn primary_condition(weather: &[ConditionInfo]) -> (String, String) {
    let first = weather.first();
    let icon = first
        .and_then(|w| w.icon.as_deref())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ICON)
        .to_string();
    let description = first
        .and_then(|w| w.description.clone())
        .unwrap_or_default();
    (icon, description)
}

impl CurrentResponse {
    pub fn into_conditions(self) -> CurrentConditions {
        let (icon, description) = primary_condition(&self.weather);
        let offset = self.timezone;

        let (country, sunrise, sunset) = match self.sys {
            Some(sys) => {
                let times = match (sys.sunrise, sys.sunset) {
                    (Some(rise), Some(set)) if rise != 0 && set != 0 => (
                        Some(format_local_time(rise, offset)),
                        Some(format_local_time(set, offset)),
                    ),
                    _ => (None, None),
                };
                (sys.country.filter(|c| !c.is_empty()), times.0, times.1)
            }
            None => (None, None, None),
        };

        CurrentConditions {
            city: self.name,
            country,
            temperature: self.main.temp,
            feels_like: self.main.feels_like.unwrap_or(self.main.temp),
            humidity: self.main.humidity.unwrap_or_default(),
            wind_speed: self.wind.map(|w| w.speed).unwrap_or_default(),
            icon,
            description,
            observed_at: format_local_time(self.dt, offset),
            sunrise,
            sunset,
        }
    }
}

impl ForecastItem {
    /// `None` when `dt_txt` is not a `YYYY-MM-DD HH:MM:SS` timestamp
    pub fn into_sample(self) -> Option<ForecastSample> {
        let time = match NaiveDateTime::parse_from_str(self.dt_txt.trim(), FEED_TIMESTAMP_FORMAT) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping forecast entry with bad timestamp {:?}: {}", self.dt_txt, e);
                return None;
            }
        };
        let (icon, description) = primary_condition(&self.weather);
        let temp = self.main.temp;

        Some(ForecastSample {
            time,
            temperature: temp,
            temp_min: self.main.temp_min.unwrap_or(temp),
            temp_max: self.main.temp_max.unwrap_or(temp),
            icon,
            description,
        })
    }
}

impl ForecastResponse {
    pub fn into_samples(self) -> Vec<ForecastSample> {
        self.list
            .into_iter()
            .filter_map(ForecastItem::into_sample)
            .collect()
    }
}
