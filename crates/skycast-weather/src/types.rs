use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Icon code used when the feed omits one
pub const DEFAULT_ICON: &str = "01d";

/// Unit system requested from the weather API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Parse a stored value; anything unrecognised yields `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "metric" => Some(Self::Metric),
            "imperial" => Some(Self::Imperial),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What a query is resolved against
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Location-specific query parameters for both API endpoints
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

/// One 3-hour entry of the forecast feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// City-local timestamp as reported by the feed
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub icon: String,
    pub description: String,
}

impl ForecastSample {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

/// One aggregated forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub icon: String,
    pub description: String,
}

/// Current conditions, already shaped for display.
///
/// Times are city-local wall-clock strings (see [`crate::format::format_local_time`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City name as resolved by the API
    pub city: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: String,
    pub description: String,
    pub observed_at: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Complete result of one successful query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub daily: Vec<DailySummary>,
    pub units: UnitSystem,
}

impl WeatherReport {
    /// False when the feed had no samples; the forecast section is hidden then
    pub fn has_forecast(&self) -> bool {
        !self.daily.is_empty()
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Coarse classification of [`WeatherError`] for hosts deciding what to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    NotFound,
    Network,
    Geolocation,
    Superseded,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured")]
    MissingApiKey,
    #[error("Weather API key was rejected")]
    InvalidApiKey,
    #[error("City name is empty")]
    EmptyQuery,
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Query superseded by a newer one")]
    Superseded,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey => ErrorKind::Configuration,
            Self::EmptyQuery => ErrorKind::InvalidInput,
            Self::CityNotFound(_) => ErrorKind::NotFound,
            Self::Network(_) | Self::Api { .. } | Self::Parse(_) => ErrorKind::Network,
            Self::Location(_) => ErrorKind::Geolocation,
            Self::Superseded => ErrorKind::Superseded,
        }
    }

    /// Superseded results are dropped without telling the user
    pub fn is_silent(&self) -> bool {
        self.kind() == ErrorKind::Superseded
    }

    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Please set your OpenWeatherMap API key in the configuration.",
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::EmptyQuery => "Enter a city name to search.",
            Self::CityNotFound(_) => "City not found. Please try again.",
            Self::Network(_) | Self::Api { .. } | Self::Parse(_) => {
                "Failed to fetch weather. Check your network and try again."
            }
            Self::Location(LocationError::Unsupported) => {
                "Geolocation is not supported on this device."
            }
            Self::Location(_) => {
                "Unable to retrieve your location. Please allow location access or search by city."
            }
            Self::Superseded => "",
        }
    }

    /// Message for a failed lookup of the user's own position: service
    /// failures name the location rather than the network.
    pub fn location_user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Network => "Failed to fetch weather for your location.",
            _ => self.user_message(),
        }
    }
}
