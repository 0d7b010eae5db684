//! Streaming technical-analysis engine.
//!
//! Accepts OHLC bars one at a time, keeps a bounded rolling series and
//! publishes a snapshot of indicator values after every accepted bar.

pub mod api;
pub mod app_state;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod snapshot;
