//! Weather query orchestration.
//!
//! `WeatherService` ties the provider to the user's preferences and search
//! history. Each query takes a generation token when it starts; when it
//! finishes, its outcome is applied only if no newer query has started in
//! the meantime; otherwise it resolves to [`WeatherError::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use skycast_core::Config;
use skycast_weather::{
    Coordinates, Geolocator, LocationError, LocationQuery, UnitSystem, WeatherError,
    WeatherProvider, WeatherReport,
};

use crate::history::HistoryManager;
use crate::preferences::{Preferences, Theme, UserPreferences};
use crate::store::KeyValueStore;

struct SessionState {
    preferences: Preferences,
    history: HistoryManager,
}

pub struct WeatherService {
    provider: WeatherProvider,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

impl WeatherService {
    /// Build a service whose preferences and history live in `store`.
    pub fn new(provider: WeatherProvider, store: Arc<dyn KeyValueStore>) -> Self {
        let state = SessionState {
            preferences: Preferences::load(store.clone()),
            history: HistoryManager::load(store),
        };

        Self {
            provider,
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, WeatherError> {
        let provider = WeatherProvider::with_options(
            config.weather.api_key.clone(),
            &config.weather.base_url,
            Duration::from_secs(config.weather.request_timeout_secs),
        )?;
        Ok(Self::new(provider, store))
    }

    /// Look up a city by name.
    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }
        self.provider.ensure_configured()?;

        let token = self.begin_query();
        self.run_query(LocationQuery::City(city.to_string()), token)
            .await
    }

    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        self.provider.ensure_configured()?;

        let token = self.begin_query();
        let query = LocationQuery::Coordinates(Coordinates::new(latitude, longitude));
        self.run_query(query, token).await
    }

    /// Explicit "use my location": every failure is reported.
    pub async fn use_my_location<G: Geolocator>(
        &self,
        locator: &G,
    ) -> Result<WeatherReport, WeatherError> {
        self.provider.ensure_configured()?;
        if !locator.is_available() {
            return Err(LocationError::Unsupported.into());
        }

        let token = self.begin_query();
        let located = locator.locate().await;
        if !self.is_current(token) {
            tracing::debug!("Dropping geolocation result of superseded query #{}", token);
            return Err(WeatherError::Superseded);
        }
        let coords = located.map_err(|e| {
            tracing::warn!("Geolocation failed: {}", e);
            WeatherError::from(e)
        })?;

        self.run_query(LocationQuery::Coordinates(coords), token)
            .await
    }

    /// First-run sequence: reload the last city if there is one, otherwise
    /// try geolocation once. A failed or unavailable geolocation here is not
    /// an error; the host simply shows nothing yet.
    pub async fn startup<G: Geolocator>(
        &self,
        locator: &G,
    ) -> Result<Option<WeatherReport>, WeatherError> {
        let last_city = self.last_city();
        if let Some(city) = last_city {
            tracing::info!("Restoring last city: {}", city);
            return self.fetch_by_city(&city).await.map(Some);
        }

        if !locator.is_available() {
            tracing::debug!("No geolocation backend, waiting for a search");
            return Ok(None);
        }

        let token = self.begin_query();
        match locator.locate().await {
            Ok(coords) => {
                if !self.is_current(token) {
                    return Err(WeatherError::Superseded);
                }
                self.provider.ensure_configured()?;
                self.run_query(LocationQuery::Coordinates(coords), token)
                    .await
                    .map(Some)
            }
            Err(e) => {
                tracing::debug!("Initial geolocation failed, ignoring: {}", e);
                Ok(None)
            }
        }
    }

    /// Persist the unit system and, if a city has been resolved before,
    /// fetch it again in the new units.
    pub async fn set_units(
        &self,
        units: UnitSystem,
    ) -> Option<Result<WeatherReport, WeatherError>> {
        let last_city = {
            let mut state = self.state.lock();
            state.preferences.set_units(units);
            state.history.last_city().map(str::to_string)
        };

        match last_city {
            Some(city) => Some(self.fetch_by_city(&city).await),
            None => None,
        }
    }

    pub async fn toggle_units(&self) -> Option<Result<WeatherReport, WeatherError>> {
        let next = self.units().toggled();
        self.set_units(next).await
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.lock().preferences.set_theme(theme);
    }

    pub fn toggle_theme(&self) -> Theme {
        let mut state = self.state.lock();
        let next = state.preferences.theme().toggled();
        state.preferences.set_theme(next);
        next
    }

    pub fn units(&self) -> UnitSystem {
        self.state.lock().preferences.units()
    }

    pub fn last_city(&self) -> Option<String> {
        self.state.lock().history.last_city().map(str::to_string)
    }

    pub fn preferences(&self) -> UserPreferences {
        let state = self.state.lock();
        UserPreferences {
            units: state.preferences.units(),
            theme: state.preferences.theme(),
            last_city: state.history.last_city().map(str::to_string),
        }
    }

    /// Search history, most recent first
    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.list().to_vec()
    }

    pub fn remove_from_history(&self, city: &str) -> bool {
        self.state.lock().history.remove(city)
    }

    pub fn clear_history(&self) {
        self.state.lock().history.clear();
    }

    fn begin_query(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    async fn run_query(
        &self,
        query: LocationQuery,
        token: u64,
    ) -> Result<WeatherReport, WeatherError> {
        let units = self.units();
        tracing::info!("Query #{} for {:?} in {}", token, query, units.as_str());

        let result = self.provider.fetch(&query, units).await;

        if !self.is_current(token) {
            tracing::debug!("Dropping result of superseded query #{}", token);
            return Err(WeatherError::Superseded);
        }

        match result {
            Ok(report) => {
                self.state
                    .lock()
                    .history
                    .record_success(&report.current.city);
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("Query #{} failed: {}", token, e);
                Err(e)
            }
        }
    }
}
