use crate::config::Settings;
use crate::domain::message::format_news_alerts;
use crate::domain::stock::{ChangeBasis, PriceMove};
use crate::ingest::provider::{NewsProvider, StockProvider};
use crate::notify::{DeliveryReport, Notifier};
use anyhow::Context;

#[derive(Debug, Clone, PartialEq)]
pub struct StockPlan {
    pub symbol: String,
    pub company: String,
    pub threshold_pct: f64,
    pub basis: ChangeBasis,
    pub max_articles: usize,
}

impl StockPlan {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let basis = match settings.change_basis.as_deref() {
            Some(raw) => raw
                .parse::<ChangeBasis>()
                .context("invalid STOCK_CHANGE_BASIS")?,
            None => ChangeBasis::default(),
        };
        Ok(Self {
            symbol: settings.stock_symbol.clone(),
            company: settings.company_name.clone(),
            threshold_pct: settings.move_threshold_pct,
            basis,
            max_articles: settings.news_max_articles,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StockOutcome {
    /// The move stayed within the threshold; no news was fetched.
    Quiet(PriceMove),
    Alerted {
        movement: PriceMove,
        articles: usize,
        report: DeliveryReport,
    },
}

/// Fetch closes, decide, and on a large move fetch headlines and text them.
/// Fetch and parse errors propagate; send errors are absorbed by the notifier.
pub async fn run(
    stock: &dyn StockProvider,
    news: &dyn NewsProvider,
    plan: &StockPlan,
    notifier: &Notifier<'_>,
) -> anyhow::Result<StockOutcome> {
    let samples = stock
        .fetch_daily_closes(&plan.symbol)
        .await
        .with_context(|| format!("failed to fetch daily closes for {}", plan.symbol))?;

    let movement = PriceMove::from_samples(&samples, plan.basis)
        .with_context(|| format!("failed to compute daily change for {}", plan.symbol))?;

    tracing::info!(
        symbol = %plan.symbol,
        previous_date = %movement.previous.date,
        previous_close = movement.previous.close,
        latest_date = %movement.latest.date,
        latest_close = movement.latest.close,
        percent = movement.percent,
        "computed daily change"
    );

    if !movement.exceeds(plan.threshold_pct) {
        tracing::info!(
            symbol = %plan.symbol,
            percent = movement.percent,
            threshold = plan.threshold_pct,
            "no significant change in stock price"
        );
        return Ok(StockOutcome::Quiet(movement));
    }

    let articles = news
        .fetch_headlines(&plan.company, plan.max_articles)
        .await
        .with_context(|| format!("failed to fetch news for {}", plan.company))?;

    if articles.is_empty() {
        tracing::warn!(company = %plan.company, "significant move but no headlines found");
    }

    let bodies = format_news_alerts(&plan.symbol, &movement, &articles);
    let report = notifier.send_all(&bodies).await;

    Ok(StockOutcome::Alerted {
        movement,
        articles: articles.len(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::NewsArticle;
    use crate::domain::stock::{Direction, StockSample};
    use crate::notify::testing::RecordingSender;
    use crate::pipeline::fakes::{FakeNews, FakeStock};
    use chrono::NaiveDate;

    fn plan() -> StockPlan {
        StockPlan {
            symbol: "TSLA".to_string(),
            company: "Tesla Inc".to_string(),
            threshold_pct: 5.0,
            basis: ChangeBasis::default(),
            max_articles: 3,
        }
    }

    fn closes(prev: f64, latest: f64) -> FakeStock {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        // Provider order is not trusted; hand them over oldest first.
        FakeStock {
            samples: Some(vec![
                StockSample {
                    date: d(1),
                    close: 1.0,
                },
                StockSample {
                    date: d(2),
                    close: prev,
                },
                StockSample {
                    date: d(3),
                    close: latest,
                },
            ]),
        }
    }

    fn articles(n: usize) -> Vec<NewsArticle> {
        (1..=n)
            .map(|i| NewsArticle {
                title: format!("Title {i}"),
                description: Some(format!("Brief {i}")),
            })
            .collect()
    }

    #[tokio::test]
    async fn six_percent_drop_fetches_news_and_sends_top_three() {
        let stock = closes(100.0, 94.0);
        let news = FakeNews::with(articles(5));
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        let outcome = run(&stock, &news, &plan(), &notifier).await.unwrap();

        let StockOutcome::Alerted {
            movement,
            articles,
            report,
        } = outcome
        else {
            panic!("expected an alert");
        };
        assert_eq!(movement.direction, Direction::Down);
        assert_eq!(movement.percent, -6.38);
        assert_eq!(articles, 3);
        assert_eq!(report.sent.len(), 3);
        assert_eq!(news.calls(), 1);
        assert_eq!(
            sender.bodies()[0],
            "TSLA: 🔻-6.38%\nHeadline: Title 1\nBrief: Brief 1"
        );
    }

    #[tokio::test]
    async fn three_percent_rise_is_quiet_and_skips_news() {
        let stock = closes(100.0, 103.0);
        let news = FakeNews::with(articles(3));
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        let outcome = run(&stock, &news, &plan(), &notifier).await.unwrap();

        let StockOutcome::Quiet(movement) = outcome else {
            panic!("expected no alert");
        };
        assert_eq!(movement.direction, Direction::Up);
        assert_eq!(movement.percent_label(), "2.91");
        assert_eq!(news.calls(), 0);
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test]
    async fn stock_fetch_failure_propagates_without_sending() {
        let stock = FakeStock { samples: None };
        let news = FakeNews::with(articles(3));
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        let err = run(&stock, &news, &plan(), &notifier).await.unwrap_err();

        assert!(format!("{err:#}").contains("simulated network error"));
        assert_eq!(news.calls(), 0);
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test]
    async fn news_fetch_failure_propagates_without_sending() {
        let stock = closes(100.0, 90.0);
        let news = FakeNews::default();
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        let res = run(&stock, &news, &plan(), &notifier).await;

        assert!(res.is_err());
        assert_eq!(news.calls(), 1);
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test]
    async fn too_few_closes_is_an_error() {
        let stock = FakeStock {
            samples: Some(vec![StockSample {
                date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                close: 10.0,
            }]),
        };
        let news = FakeNews::default();
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        assert!(run(&stock, &news, &plan(), &notifier).await.is_err());
        assert_eq!(sender.calls(), 0);
    }

    #[tokio::test]
    async fn one_failed_send_does_not_stop_the_others() {
        let stock = closes(100.0, 110.0);
        let news = FakeNews::with(articles(3));
        let sender = RecordingSender::failing_at(vec![1]);
        let notifier = Notifier::new(&sender, "+1", "+2");

        let outcome = run(&stock, &news, &plan(), &notifier).await.unwrap();

        let StockOutcome::Alerted { report, .. } = outcome else {
            panic!("expected an alert");
        };
        assert_eq!(report.sent.len(), 2);
        assert_eq!(report.failed, 1);
        assert_eq!(sender.calls(), 3);
    }

    #[test]
    fn plan_follows_settings() {
        let settings = Settings::from_lookup(|k| match k {
            "STOCK_SYMBOL" => Some("NVDA".to_string()),
            "COMPANY_NAME" => Some("Nvidia".to_string()),
            "STOCK_MOVE_THRESHOLD_PCT" => Some("2.5".to_string()),
            _ => None,
        })
        .unwrap();
        let plan = StockPlan::from_settings(&settings).unwrap();
        assert_eq!(plan.symbol, "NVDA");
        assert_eq!(plan.company, "Nvidia");
        assert_eq!(plan.threshold_pct, 2.5);
        assert_eq!(plan.basis, ChangeBasis::Latest);
        assert_eq!(plan.max_articles, 3);
    }

    #[test]
    fn plan_reads_change_basis() {
        let settings = Settings::from_lookup(|k| {
            (k == "STOCK_CHANGE_BASIS").then(|| "previous".to_string())
        })
        .unwrap();
        let plan = StockPlan::from_settings(&settings).unwrap();
        assert_eq!(plan.basis, ChangeBasis::Previous);
    }

    #[test]
    fn plan_rejects_unknown_change_basis() {
        let settings = Settings::from_lookup(|k| {
            (k == "STOCK_CHANGE_BASIS").then(|| "median".to_string())
        })
        .unwrap();
        let err = StockPlan::from_settings(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("STOCK_CHANGE_BASIS"));
    }

    #[tokio::test]
    async fn move_under_threshold_against_latest_close_is_quiet() {
        // +5.2 on 100 is over 5% of the previous close but 4.94% of the latest.
        let stock = closes(100.0, 105.2);
        let news = FakeNews::with(articles(3));
        let sender = RecordingSender::default();
        let notifier = Notifier::new(&sender, "+1", "+2");

        let outcome = run(&stock, &news, &plan(), &notifier).await.unwrap();

        assert!(matches!(outcome, StockOutcome::Quiet(ref m) if m.percent == 4.94));
        assert_eq!(news.calls(), 0);
        assert_eq!(sender.calls(), 0);
    }
}
