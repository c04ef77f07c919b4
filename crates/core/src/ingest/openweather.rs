use crate::config::Settings;
use crate::domain::weather::WeatherReport;
use crate::http::{build_client, join_url};
use crate::ingest::decode_response;
use crate::ingest::provider::{ForecastProvider, ForecastQuery};
use crate::ingest::types::OwmForecastResponse;
use anyhow::{Context, Result};

const PROVIDER: &str = "openweathermap";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.owm_api_key_or_blank();
        let http = build_client(settings.http_timeout(), None)
            .context("failed to build OpenWeatherMap http client")?;
        Ok(Self::new(http, settings.owm_base_url.clone(), api_key))
    }
}

#[async_trait::async_trait]
impl ForecastProvider for OpenWeatherClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherReport> {
        tracing::debug!(lat = query.lat, lon = query.lon, slots = query.slots, "requesting forecast");

        let res = self
            .http
            .get(join_url(&self.base_url, "forecast"))
            .query(&[
                ("lat", query.lat.to_string()),
                ("lon", query.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("cnt", query.slots.to_string()),
            ])
            .send()
            .await
            .context("OpenWeatherMap request failed")?;

        let parsed = decode_response::<OwmForecastResponse>(PROVIDER, res).await?;
        Ok(parsed.into())
    }
}
