use alert_core::config::Settings;
use alert_core::ingest::alphavantage::AlphaVantageClient;
use alert_core::ingest::error::ProviderDiagnosticsError;
use alert_core::ingest::newsapi::NewsApiClient;
use alert_core::notify::twilio::TwilioClient;
use alert_core::notify::{LogOnlySender, Notifier, SmsSender};
use alert_core::pipeline::stock::{self, StockOutcome, StockPlan};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stock_alert", about = "Text news headlines when a stock moves sharply")]
struct Args {
    /// Compose and log the alerts without contacting the messaging provider.
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

    // Any failure ends the run without alerting; the next scheduled run starts fresh.
    if let Err(err) = run(&settings, args.dry_run).await {
        sentry_anyhow::capture_anyhow(&err);
        if let Some(diag) = err.downcast_ref::<ProviderDiagnosticsError>() {
            tracing::error!(
                provider = diag.provider,
                stage = diag.stage,
                raw_body = diag.raw_body.as_deref().unwrap_or(""),
                "provider diagnostics"
            );
        }
        tracing::error!(error = %format!("{err:#}"), "stock alert run failed");
    }

    Ok(())
}

async fn run(settings: &Settings, dry_run: bool) -> anyhow::Result<()> {
    let plan = StockPlan::from_settings(settings)?;
    let stock_client = AlphaVantageClient::from_settings(settings)?;
    let news_client = NewsApiClient::from_settings(settings)?;

    let sender: Box<dyn SmsSender> = if dry_run {
        Box::new(LogOnlySender)
    } else {
        Box::new(TwilioClient::from_settings(settings, None)?)
    };
    let notifier = Notifier::new(
        sender.as_ref(),
        settings.twilio_from_number_or_blank(),
        settings.twilio_to_number_or_blank(),
    );

    match stock::run(&stock_client, &news_client, &plan, &notifier).await? {
        StockOutcome::Quiet(movement) => {
            tracing::info!(
                symbol = %plan.symbol,
                percent = %movement.percent_label(),
                "no significant change in stock price"
            );
        }
        StockOutcome::Alerted {
            movement,
            articles,
            report,
        } => {
            tracing::info!(
                symbol = %plan.symbol,
                percent = %movement.percent_label(),
                articles,
                sent = report.sent.len(),
                failed = report.failed,
                dry_run,
                "stock alert run finished"
            );
        }
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
