use crate::config::Settings;
use crate::domain::news::NewsArticle;
use crate::http::{build_client, join_url};
use crate::ingest::decode_response;
use crate::ingest::error::ProviderDiagnosticsError;
use crate::ingest::provider::NewsProvider;
use crate::ingest::types::NewsApiResponse;
use anyhow::{Context, Result};

const PROVIDER: &str = "newsapi";

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.news_api_key_or_blank();
        let http = build_client(settings.http_timeout(), None)
            .context("failed to build NewsAPI http client")?;
        Ok(Self::new(http, settings.news_base_url.clone(), api_key))
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_headlines(&self, company: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let res = self
            .http
            .get(join_url(&self.base_url, "v2/everything"))
            .query(&[("apiKey", self.api_key.as_str()), ("qInTitle", company)])
            .send()
            .await
            .context("NewsAPI request failed")?;

        let parsed = decode_response::<NewsApiResponse>(PROVIDER, res).await?;
        if parsed.status != "ok" {
            return Err(ProviderDiagnosticsError {
                provider: PROVIDER,
                stage: "payload",
                detail: format!(
                    "status={} code={} message={}",
                    parsed.status,
                    parsed.code.as_deref().unwrap_or("-"),
                    parsed.message.as_deref().unwrap_or("-")
                ),
                raw_body: None,
            }
            .into());
        }

        let articles: Vec<NewsArticle> = parsed
            .articles
            .into_iter()
            .take(limit)
            .map(NewsArticle::from)
            .collect();
        tracing::debug!(%company, articles = articles.len(), "fetched headlines");
        Ok(articles)
    }
}
