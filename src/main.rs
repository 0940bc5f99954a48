use std::sync::Arc;

use anyhow::Result;
use skycast_core::{AppError, Config, ConfigError};
use skycast_services::{KeyValueStore, MemoryStore, SqliteStore, WeatherService};
use skycast_weather::format::{
    day_label, display_name, format_humidity, format_temperature, format_wind_speed, icon_url,
};
use skycast_weather::{SystemGeolocator, WeatherError, WeatherReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    skycast_core::init()?;

    let (config, _) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => match e.downcast::<ConfigError>() {
            Ok(invalid) => {
                tracing::error!("{}", invalid);
                eprintln!("{}", AppError::from(invalid).user_message());
                std::process::exit(1);
            }
            Err(e) => return Err(e),
        },
    };
    let store = open_store(&config);
    let service = WeatherService::from_config(&config, store)?;

    tracing::info!("SkyCast started");

    let city = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    // Startup without a remembered city falls through to geolocation
    let by_location = city.trim().is_empty() && service.last_city().is_none();
    let outcome = if city.trim().is_empty() {
        service.startup(&SystemGeolocator).await
    } else {
        service.fetch_by_city(&city).await.map(Some)
    };

    match outcome {
        Ok(Some(report)) => print_report(&report),
        Ok(None) => println!("Search for a city: skycast <CITY>"),
        Err(e) => report_error(e, by_location),
    }

    let history = service.history();
    if !history.is_empty() {
        println!("\nRecent searches: {}", history.join(", "));
    }

    Ok(())
}

/// SQLite in the data directory, or an in-memory store when that fails
fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    let path = config.storage.database_path();
    match SqliteStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Could not open {}, preferences will not be saved: {}",
                path.display(),
                e
            );
            eprintln!("{}", AppError::from(e).user_message());
            Arc::new(MemoryStore::new())
        }
    }
}

fn report_error(err: WeatherError, by_location: bool) {
    let err = AppError::from(err);
    if err.is_silent() {
        tracing::debug!("Ignoring superseded query");
        return;
    }
    tracing::error!("Weather query failed: {}", err);

    let message = match &err {
        AppError::Weather(e) if by_location => e.location_user_message(),
        _ => err.user_message(),
    };
    eprintln!("{}", message);
}

fn print_report(report: &WeatherReport) {
    let current = &report.current;
    let units = report.units;

    println!("{}", display_name(current));
    println!("  {}", current.observed_at);
    println!(
        "  {}  {} (feels like {})",
        format_temperature(current.temperature, units),
        current.description,
        format_temperature(current.feels_like, units)
    );
    println!(
        "  Humidity {}  Wind {}",
        format_humidity(current.humidity),
        format_wind_speed(current.wind_speed, units)
    );
    if let (Some(sunrise), Some(sunset)) = (&current.sunrise, &current.sunset) {
        println!("  Sunrise {}  Sunset {}", sunrise, sunset);
    }
    println!("  {}", icon_url(&current.icon));

    if !report.has_forecast() {
        return;
    }

    println!();
    for day in &report.daily {
        println!(
            "  {:<12} {:>6} / {:<6} {}",
            day_label(day),
            format_temperature(day.temp_max, units),
            format_temperature(day.temp_min, units),
            day.description
        );
    }
}
