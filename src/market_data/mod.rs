pub mod bar_series;
pub mod feed;
pub mod ingest;

// Re-export the Bar struct for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar_series::{Bar, BarSeries, PriceVectors};
pub use ingest::validate_bar;
