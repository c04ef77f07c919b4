use crate::config::Settings;
use crate::domain::stock::StockSample;
use crate::http::{build_client, join_url};
use crate::ingest::decode_response;
use crate::ingest::error::ProviderDiagnosticsError;
use crate::ingest::provider::StockProvider;
use crate::ingest::types::AvDailyResponse;
use anyhow::{Context, Result};

const PROVIDER: &str = "alphavantage";
const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.stock_api_key_or_blank();
        let http = build_client(settings.http_timeout(), None)
            .context("failed to build Alpha Vantage http client")?;
        Ok(Self::new(http, settings.stock_base_url.clone(), api_key))
    }
}

#[async_trait::async_trait]
impl StockProvider for AlphaVantageClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_daily_closes(&self, symbol: &str) -> Result<Vec<StockSample>> {
        let res = self
            .http
            .get(join_url(&self.base_url, "query"))
            .query(&[
                ("function", DAILY_FUNCTION),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Alpha Vantage request failed")?;

        let parsed = decode_response::<AvDailyResponse>(PROVIDER, res).await?;

        if parsed.time_series.is_none() {
            let detail = parsed
                .provider_message()
                .unwrap_or("response has no daily time series")
                .to_string();
            return Err(ProviderDiagnosticsError {
                provider: PROVIDER,
                stage: "payload",
                detail,
                raw_body: None,
            }
            .into());
        }

        let samples = parsed
            .into_samples()
            .with_context(|| format!("failed to read daily closes for {symbol}"))?;
        tracing::debug!(%symbol, days = samples.len(), "fetched daily closes");
        Ok(samples)
    }
}
