pub mod message;
pub mod news;
pub mod stock;
pub mod weather;
