use crate::domain::news::NewsArticle;
use crate::domain::stock::StockSample;
use crate::domain::weather::{ForecastSlot, WeatherReport};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// OpenWeatherMap 5 day / 3 hour forecast.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwmForecastResponse {
    pub list: Vec<OwmForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwmForecastEntry {
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwmCondition {
    pub id: i32,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

impl From<OwmForecastResponse> for WeatherReport {
    fn from(res: OwmForecastResponse) -> Self {
        let slots = res
            .list
            .into_iter()
            .map(|entry| ForecastSlot {
                condition_code: entry.weather.first().map(|c| c.id),
            })
            .collect();
        WeatherReport { slots }
    }
}

// Alpha Vantage TIME_SERIES_DAILY.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvDailyResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    pub time_series: Option<BTreeMap<NaiveDate, AvDailyBar>>,

    // Throttling and bad requests come back as HTTP 200 with one of these instead.
    #[serde(rename = "Note", default)]
    pub note: Option<String>,
    #[serde(rename = "Information", default)]
    pub information: Option<String>,
    #[serde(rename = "Error Message", default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvDailyBar {
    #[serde(rename = "1. open", default)]
    pub open: Option<String>,
    #[serde(rename = "2. high", default)]
    pub high: Option<String>,
    #[serde(rename = "3. low", default)]
    pub low: Option<String>,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume", default)]
    pub volume: Option<String>,
}

impl AvDailyResponse {
    /// The provider's complaint, if the body carries one instead of a series.
    pub fn provider_message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }

    pub fn into_samples(self) -> Result<Vec<StockSample>> {
        let series = self
            .time_series
            .context("response has no \"Time Series (Daily)\" field")?;

        series
            .into_iter()
            .map(|(date, bar)| {
                let close = bar
                    .close
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("non-numeric close {:?} for {date}", bar.close))?;
                Ok(StockSample { date, close })
            })
            .collect()
    }
}

// NewsAPI /v2/everything.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl From<NewsApiArticle> for NewsArticle {
    fn from(a: NewsApiArticle) -> Self {
        NewsArticle {
            title: a.title.unwrap_or_default(),
            description: a.description.filter(|d| !d.trim().is_empty()),
        }
    }
}
