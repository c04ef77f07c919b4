use serde::{Deserialize, Serialize};

/// Condition codes below this value are precipitation (thunderstorm, drizzle, rain, snow).
/// Codes from 700 upwards are atmosphere, clear and clouds.
pub const RAIN_CODE_BOUNDARY: i32 = 700;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub slots: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSlot {
    /// Primary condition code of the slot; `None` when the provider sent no condition.
    pub condition_code: Option<i32>,
}

impl ForecastSlot {
    pub fn with_code(code: i32) -> Self {
        Self {
            condition_code: Some(code),
        }
    }

    pub fn is_precipitation(&self) -> bool {
        matches!(self.condition_code, Some(code) if code < RAIN_CODE_BOUNDARY)
    }
}

impl WeatherReport {
    pub fn from_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            slots: codes.into_iter().map(ForecastSlot::with_code).collect(),
        }
    }
}

pub fn will_it_rain(report: &WeatherReport) -> bool {
    report.slots.iter().any(ForecastSlot::is_precipitation)
}
