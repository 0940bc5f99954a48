//! Weather lookup for SkyCast
//!
//! Fetches current conditions and the 5-day/3-hour forecast from
//! OpenWeatherMap, collapses the forecast into daily summaries and
//! formats readings for display.

pub mod api;
pub mod forecast;
pub mod format;
pub mod location;
pub mod provider;
pub mod types;

pub use forecast::{aggregate_daily, daily_summaries, FORECAST_DAYS};
pub use location::{FixedGeolocator, Geolocator, SystemGeolocator};
pub use provider::WeatherProvider;
pub use types::*;
