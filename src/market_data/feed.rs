use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::app_state::AppState;
use crate::market_data::Bar;

/// Timestamp layout the feed stamps on every bar it emits.
const BAR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// TickAggregator -- folds ticks into one OHLC bar per bucket
// ---------------------------------------------------------------------------

/// Accumulates ticks for the current bucket.  The first tick opens the bar,
/// every tick updates the extremes and the close.
#[derive(Debug, Default, Clone)]
pub struct TickAggregator {
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
}

impl TickAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one price into the current bucket.  Non-finite prices are
    /// dropped.
    pub fn on_tick(&mut self, price: f64) {
        if !price.is_finite() {
            return;
        }
        if self.open.is_none() {
            self.open = Some(price);
            self.high = price;
            self.low = price;
        }
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_none()
    }

    /// Close the bucket.  Returns `None` when no tick arrived since the last
    /// flush; the aggregator is reset either way.
    pub fn flush(&mut self, timestamp: impl Into<String>) -> Option<Bar> {
        let state = std::mem::take(self);
        let open = state.open?;
        Bar::new(open, state.high, state.low, state.close, timestamp).ok()
    }
}

// ---------------------------------------------------------------------------
// Frame parsing
// ---------------------------------------------------------------------------

/// Extract a price from a feed frame shaped like `[[id, seq, price, ...]]`.
///
/// The price may be a JSON number or a numeric string.  Anything else is not
/// a price frame and yields `None`.
pub fn parse_tick_frame(text: &str) -> Option<f64> {
    let root: serde_json::Value = serde_json::from_str(text).ok()?;
    let outer = root.as_array()?;
    if outer.len() != 1 {
        return None;
    }
    let raw = outer[0].as_array()?.get(2)?;
    let price = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

fn frame_text(msg: &Message) -> Option<&str> {
    match msg {
        Message::Text(text) => Some(text.as_str()),
        Message::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// WebSocket tick stream
// ---------------------------------------------------------------------------

/// Connect to the tick feed at `url`, aggregate ticks into `bucket`-wide bars
/// and submit each bar to `state`.
///
/// Runs until the stream disconnects or an error occurs, then returns so that
/// the caller can handle reconnection.
pub async fn run_tick_feed(url: &str, bucket: Duration, state: &Arc<AppState>) -> Result<()> {
    info!(url = %url, bucket_secs = bucket.as_secs(), "connecting to tick feed");

    let (ws_stream, _response) = connect_async(url)
        .await
        .context("failed to connect to tick feed")?;

    info!(url = %url, "tick feed connected");
    let (_write, mut read) = ws_stream.split();

    let mut aggregator = TickAggregator::new();
    let mut ticker = tokio::time::interval(bucket);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let timestamp = Utc::now().format(BAR_TIMESTAMP_FORMAT).to_string();
                if let Some(bar) = aggregator.flush(timestamp) {
                    debug!(close = bar.close, timestamp = %bar.timestamp, "bucket closed");
                    if let Err(e) = state.ingest(bar) {
                        warn!(error = %e, "feed bar rejected");
                    }
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        if let Some(price) = frame_text(&msg).and_then(parse_tick_frame) {
                            aggregator.on_tick(price);
                        }
                        // Ping / Pong / Close frames are handled by tungstenite.
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "tick feed read error");
                        return Err(e.into());
                    }
                    None => {
                        warn!(url = %url, "tick feed stream ended");
                        return Ok(());
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
