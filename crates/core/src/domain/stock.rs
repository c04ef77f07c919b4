use anyhow::{bail, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockSample {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "🔺",
            Direction::Down => "🔻",
        }
    }
}

/// Which close the percentage change is expressed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeBasis {
    /// `(latest - previous) / previous`.
    Previous,
    /// `(latest - previous) / latest`, what the alerts have always reported.
    #[default]
    Latest,
}

impl FromStr for ChangeBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "previous" | "prev" => Ok(ChangeBasis::Previous),
            "latest" => Ok(ChangeBasis::Latest),
            other => bail!("unknown change basis {other:?} (expected \"previous\" or \"latest\")"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMove {
    pub previous: StockSample,
    pub latest: StockSample,
    pub difference: f64,
    pub direction: Direction,
    /// Signed percentage change, rounded to two decimals.
    pub percent: f64,
}

impl PriceMove {
    /// Compares the two most recent closes. Samples may arrive in any order.
    pub fn from_samples(samples: &[StockSample], basis: ChangeBasis) -> anyhow::Result<Self> {
        ensure!(
            samples.len() >= 2,
            "need at least two daily closes to compute a change (got {})",
            samples.len()
        );

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        let latest = sorted[0];
        let previous = sorted[1];
        ensure!(
            latest.date != previous.date,
            "duplicate daily close for {}",
            latest.date
        );

        Self::between(previous, latest, basis)
    }

    pub fn between(
        previous: StockSample,
        latest: StockSample,
        basis: ChangeBasis,
    ) -> anyhow::Result<Self> {
        let difference = latest.close - previous.close;
        let denominator = match basis {
            ChangeBasis::Previous => previous.close,
            ChangeBasis::Latest => latest.close,
        };
        ensure!(
            denominator.is_finite() && denominator != 0.0,
            "cannot compute percentage change against a close of {denominator}"
        );

        let direction = if difference > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        Ok(Self {
            previous,
            latest,
            difference,
            direction,
            percent: round2(difference / denominator * 100.0),
        })
    }

    pub fn exceeds(&self, threshold_pct: f64) -> bool {
        self.percent.abs() > threshold_pct
    }

    /// Renders the percentage the way the alerts always have: `-6.0`, `2.91`.
    pub fn percent_label(&self) -> String {
        if self.percent.fract() == 0.0 {
            format!("{:.1}", self.percent)
        } else {
            format!("{}", self.percent)
        }
    }
}

/// Rounds to two decimals from the exact binary value, ties to even.
fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}
