use crate::domain::news::NewsArticle;
use crate::domain::stock::StockSample;
use crate::domain::weather::WeatherReport;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    /// Number of 3-hour forecast slots to request.
    pub slots: u32,
}

#[async_trait::async_trait]
pub trait ForecastProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherReport>;
}

#[async_trait::async_trait]
pub trait StockProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily closes for `symbol`, in whatever order the provider returns them.
    async fn fetch_daily_closes(&self, symbol: &str) -> Result<Vec<StockSample>>;
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// At most `limit` articles whose title mentions `company`, in provider ranking order.
    async fn fetch_headlines(&self, company: &str, limit: usize) -> Result<Vec<NewsArticle>>;
}
