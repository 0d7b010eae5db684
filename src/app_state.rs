// =============================================================================
// Engine State: one rolling series, one indicator engine, one snapshot slot
// =============================================================================
//
// Constructed once at start up and shared as `Arc<AppState>` with the REST
// API, the WebSocket push feed and the tick feed adapter.  Several instances
// can coexist in one process; nothing here is global.
//
// Thread safety:
//   - The ingest path holds the series write lock across
//     push -> recompute -> store, so bar arrivals run to completion one at a
//     time and the store has a single writer.
//   - Readers only touch the snapshot store and never wait on a recompute
//     beyond the instant the slot is swapped.
//   - An atomic version counter lets push clients detect new snapshots.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::engine::IndicatorEngine;
use crate::error::ValidationError;
use crate::market_data::{validate_bar, Bar, BarSeries};
use crate::runtime_config::EngineConfig;
use crate::snapshot::{SnapshotStore, SnapshotView};

pub struct AppState {
    /// Monotonically increasing version, bumped once per accepted bar.
    pub state_version: AtomicU64,

    series: RwLock<BarSeries>,
    engine: Mutex<IndicatorEngine>,
    store: SnapshotStore,

    /// Instant the state was created, for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let series = BarSeries::new(config.history_capacity);
        let engine = IndicatorEngine::new(config);
        let store = SnapshotStore::new(engine.not_ready_snapshot());

        info!(
            capacity = series.capacity(),
            warmup = engine.warmup_period(),
            "indicator engine initialised"
        );

        Self {
            state_version: AtomicU64::new(0),
            series: RwLock::new(series),
            engine: Mutex::new(engine),
            store,
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Ingest ──────────────────────────────────────────────────────────

    /// Validate a raw JSON candidate and ingest it.
    ///
    /// Invalid input is rejected before any state is touched.
    pub fn submit_bar(&self, candidate: &Value) -> Result<Bar, ValidationError> {
        let bar = validate_bar(candidate).inspect_err(|e| {
            warn!(error = %e, payload = %candidate, "invalid OHLC bar rejected");
        })?;
        self.ingest(bar)
    }

    /// Append an already-typed bar, recompute and publish the new snapshot.
    pub fn ingest(&self, bar: Bar) -> Result<Bar, ValidationError> {
        // Re-run the typed checks; `Bar` fields are public.
        let bar = Bar::new(bar.open, bar.high, bar.low, bar.close, bar.timestamp)?;

        let mut series = self.series.write();
        if let Some(evicted) = series.push(bar.clone()) {
            debug!(evicted = %evicted.timestamp, "oldest bar evicted");
        }

        let recomputed = self.engine.lock().recompute(&series);
        self.store.write(SnapshotView {
            ready: recomputed.ready,
            bars: series.len(),
            latest_bar: Some(bar.clone()),
            indicators: recomputed.snapshot,
        });
        drop(series);

        let version = self.state_version.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            close = bar.close,
            timestamp = %bar.timestamp,
            ready = recomputed.ready,
            version,
            "bar ingested"
        );
        Ok(bar)
    }

    // ── Read ────────────────────────────────────────────────────────────

    /// The last published snapshot.  Never triggers a recompute.
    pub fn snapshot(&self) -> SnapshotView {
        self.store.read()
    }

    /// Number of bars currently held.
    pub fn bar_count(&self) -> usize {
        self.series.read().len()
    }
}
