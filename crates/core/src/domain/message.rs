use crate::domain::news::NewsArticle;
use crate::domain::stock::PriceMove;
use serde::{Deserialize, Serialize};

pub const RAIN_ALERT_BODY: &str = "It's going to rain today. Remember to bring an ☔️";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub body: String,
    pub from: String,
    pub to: String,
}

/// One SMS body per article, each prefixed with the symbol and the move.
pub fn format_news_alerts(
    symbol: &str,
    movement: &PriceMove,
    articles: &[NewsArticle],
) -> Vec<String> {
    let headline = format!(
        "{symbol}: {}{}%",
        movement.direction.glyph(),
        movement.percent_label()
    );

    articles
        .iter()
        .map(|article| {
            format!(
                "{headline}\nHeadline: {}\nBrief: {}",
                article.title.trim(),
                article.description.as_deref().unwrap_or("").trim()
            )
        })
        .collect()
}
