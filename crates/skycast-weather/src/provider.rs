//! OpenWeatherMap client.
//!
//! Every query hits two endpoints, `weather` and `forecast`, concurrently;
//! the query fails as a unit if either request does.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::api::{CurrentResponse, ForecastResponse};
use crate::forecast;
use crate::types::{
    CurrentConditions, ForecastSample, LocationQuery, UnitSystem, WeatherError, WeatherReport,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
/// Key shipped in fresh configs; never valid
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENWEATHER_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// False for an empty key or the shipped placeholder
    pub fn is_configured(&self) -> bool {
        is_usable_api_key(&self.api_key)
    }

    pub fn ensure_configured(&self) -> Result<(), WeatherError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(WeatherError::MissingApiKey)
        }
    }

    /// Fetch current conditions and the forecast together and shape them
    /// into a report. Nothing is returned unless both succeed.
    pub async fn fetch(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError> {
        self.ensure_configured()?;

        let (current, samples) =
            tokio::try_join!(self.current(query, units), self.forecast(query, units))?;

        let daily = forecast::daily_summaries(&samples);
        tracing::info!(
            "Fetched weather for {} ({} forecast samples, {} days)",
            current.city,
            samples.len(),
            daily.len()
        );

        Ok(WeatherReport {
            current,
            daily,
            units,
        })
    }

    #[instrument(skip(self), level = "info")]
    pub async fn current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError> {
        let resp: CurrentResponse = self.get("weather", query, units).await?;
        Ok(resp.into_conditions())
    }

    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let resp: ForecastResponse = self.get("forecast", query, units).await?;
        Ok(resp.into_samples())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.query_params();
        params.push(("units", units.as_str().to_string()));
        tracing::debug!("GET {} {:?}", url, params);
        params.push(("appid", self.api_key.clone()));

        let response = self.client.get(&url).query(&params).send().await?;
        self.handle_response(response, query).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body)
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else if status == StatusCode::NOT_FOUND {
            match query {
                LocationQuery::City(name) => Err(WeatherError::CityNotFound(name.clone())),
                LocationQuery::Coordinates(_) => Err(WeatherError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                }),
            }
        } else if status == StatusCode::UNAUTHORIZED {
            Err(WeatherError::InvalidApiKey)
        } else {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("Weather API returned {}: {}", status, text);
            Err(WeatherError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}
