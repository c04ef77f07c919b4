use alert_core::config::Settings;
use alert_core::ingest::openweather::OpenWeatherClient;
use alert_core::ingest::provider::ForecastQuery;
use alert_core::notify::twilio::TwilioClient;
use alert_core::notify::{LogOnlySender, Notifier, SmsSender};
use alert_core::pipeline::rain::{self, RainOutcome};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "rain_alert", about = "Text an umbrella reminder when rain is forecast")]
struct Args {
    /// Compose and log the alert without contacting the messaging provider.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let query = ForecastQuery {
        lat: settings.forecast_lat,
        lon: settings.forecast_lon,
        slots: settings.forecast_slots,
    };

    let forecast = match OpenWeatherClient::from_settings(&settings) {
        Ok(client) => client,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "error fetching weather data");
            return Ok(());
        }
    };

    let sender: Box<dyn SmsSender> = if args.dry_run {
        Box::new(LogOnlySender)
    } else {
        match TwilioClient::from_settings(&settings, settings.https_proxy.as_deref()) {
            Ok(client) => Box::new(client),
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %format!("{err:#}"), "messaging client unavailable");
                return Ok(());
            }
        }
    };

    let notifier = Notifier::new(
        sender.as_ref(),
        settings.twilio_from_number_or_blank(),
        settings.twilio_to_number_or_blank(),
    );

    match rain::run(&forecast, &query, &notifier).await {
        RainOutcome::FetchFailed => tracing::warn!("forecast unavailable; no alert sent"),
        RainOutcome::NoRain => tracing::info!("no rain expected"),
        RainOutcome::Alerted(report) => tracing::info!(
            sent = report.sent.len(),
            failed = report.failed,
            dry_run = args.dry_run,
            "rain alert run finished"
        ),
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
