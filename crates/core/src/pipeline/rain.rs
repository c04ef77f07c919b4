use crate::domain::message::RAIN_ALERT_BODY;
use crate::domain::weather::will_it_rain;
use crate::ingest::provider::{ForecastProvider, ForecastQuery};
use crate::notify::{DeliveryReport, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RainOutcome {
    /// The forecast could not be fetched; nothing was sent.
    FetchFailed,
    NoRain,
    Alerted(DeliveryReport),
}

/// Fetch, decide, notify. Fetch errors are logged here and never reach the caller.
pub async fn run(
    forecast: &dyn ForecastProvider,
    query: &ForecastQuery,
    notifier: &Notifier<'_>,
) -> RainOutcome {
    let report = match forecast.fetch_forecast(query).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(
                provider = forecast.provider_name(),
                error = %format!("{err:#}"),
                "error fetching weather data"
            );
            return RainOutcome::FetchFailed;
        }
    };

    if !will_it_rain(&report) {
        tracing::info!(slots = report.slots.len(), "no rain expected");
        return RainOutcome::NoRain;
    }

    tracing::info!(slots = report.slots.len(), "rain expected; sending alert");
    let delivery = notifier.send_all(&[RAIN_ALERT_BODY.to_string()]).await;
    RainOutcome::Alerted(delivery)
}
