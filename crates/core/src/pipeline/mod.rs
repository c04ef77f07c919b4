pub mod rain;
pub mod stock;
