pub mod alphavantage;
pub mod error;
pub mod newsapi;
pub mod openweather;
pub mod provider;
pub mod types;

use crate::ingest::error::ProviderDiagnosticsError;
use anyhow::Context;
use serde::de::DeserializeOwned;

/// Reads the body once, keeps it for diagnostics, and decodes it on success.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    provider: &'static str,
    res: reqwest::Response,
) -> anyhow::Result<T> {
    let status = res.status();
    let text = res
        .text()
        .await
        .with_context(|| format!("failed to read {provider} response body"))?;

    if !status.is_success() {
        return Err(ProviderDiagnosticsError {
            provider,
            stage: "http",
            detail: format!("status={status}"),
            raw_body: Some(text),
        }
        .into());
    }

    serde_json::from_str::<T>(&text).map_err(|err| {
        ProviderDiagnosticsError {
            provider,
            stage: "decode",
            detail: err.to_string(),
            raw_body: Some(text),
        }
        .into()
    })
}
