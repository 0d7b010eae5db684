// =============================================================================
// Indicator Engine
// =============================================================================
//
// Recomputes every configured indicator from the current rolling series.
// Apart from the short SMA / PSAR trailing histories the engine holds no
// state: the same series always yields the same values.
//
// Until the series covers the longest configured period the snapshot is
// "not ready" and every indicator is reported unavailable.
// =============================================================================

use std::collections::VecDeque;

use tracing::debug;

use crate::indicators::{adx, bollinger, cci, macd, psar, rsi, sma, stochastic};
use crate::market_data::{BarSeries, PriceVectors};
use crate::runtime_config::EngineConfig;
use crate::snapshot::{IndicatorValue, Snapshot};

pub const BOLLINGER: &str = "BB";
pub const CCI: &str = "CCI";
pub const MACD: &str = "MACD";
pub const SMA: &str = "SMA";
pub const PSAR: &str = "PSAR";
pub const ADX: &str = "ADX";
pub const STOCHASTIC: &str = "Stochastic";

/// Snapshot key for an RSI period, e.g. `RSI_14`.
pub fn rsi_key(period: usize) -> String {
    format!("RSI_{period}")
}

/// Result of one recompute.
#[derive(Debug, Clone)]
pub struct Recomputed {
    pub ready: bool,
    pub snapshot: Snapshot,
}

pub struct IndicatorEngine {
    config: EngineConfig,
    warmup: usize,
    sma_history: VecDeque<f64>,
    psar_history: VecDeque<f64>,
}

impl IndicatorEngine {
    pub fn new(config: EngineConfig) -> Self {
        let warmup = config.warmup_period();
        let keep = config.trailing_history;
        Self {
            config,
            warmup,
            sma_history: VecDeque::with_capacity(keep + 1),
            psar_history: VecDeque::with_capacity(keep + 1),
        }
    }

    /// Bars required before the snapshot becomes ready.
    pub fn warmup_period(&self) -> usize {
        self.warmup
    }

    /// Every key a snapshot from this engine carries.
    pub fn indicator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.config.rsi_periods.iter().map(|&p| rsi_key(p)).collect();
        names.extend(
            [BOLLINGER, CCI, MACD, SMA, PSAR, ADX, STOCHASTIC]
                .iter()
                .map(|s| s.to_string()),
        );
        names
    }

    /// Snapshot reported before warm-up completes.
    pub fn not_ready_snapshot(&self) -> Snapshot {
        Snapshot::unavailable(self.indicator_names())
    }

    /// Recompute all indicators from `series`.
    pub fn recompute(&mut self, series: &BarSeries) -> Recomputed {
        if series.len() < self.warmup {
            debug!(bars = series.len(), warmup = self.warmup, "engine warming up");
            return Recomputed {
                ready: false,
                snapshot: self.not_ready_snapshot(),
            };
        }

        let pv = series.price_vectors();
        let cfg = &self.config;
        let mut snapshot = Snapshot::default();

        for &period in &cfg.rsi_periods {
            snapshot.insert(rsi_key(period), rsi::calculate_rsi(&pv.closes, period).into());
        }

        snapshot.insert(
            BOLLINGER,
            bollinger::calculate_bollinger(&pv.closes, cfg.bollinger.period, cfg.bollinger.deviation)
                .map_or(IndicatorValue::Unavailable, IndicatorValue::Bands),
        );

        snapshot.insert(
            CCI,
            cci::calculate_cci(&pv.highs, &pv.lows, &pv.closes, cfg.cci_period).into(),
        );

        snapshot.insert(
            MACD,
            macd::calculate_macd(&pv.closes, cfg.macd.fast, cfg.macd.slow, cfg.macd.signal)
                .map_or(IndicatorValue::Unavailable, IndicatorValue::Macd),
        );

        snapshot.insert(
            ADX,
            adx::calculate_adx(&pv.highs, &pv.lows, &pv.closes, cfg.adx_period).into(),
        );

        snapshot.insert(
            STOCHASTIC,
            stochastic::calculate_stochastic(
                &pv.highs,
                &pv.lows,
                &pv.closes,
                cfg.stochastic.period,
                cfg.stochastic.signal,
            )
            .map_or(IndicatorValue::Unavailable, IndicatorValue::Stochastic),
        );

        let (sma_value, psar_value) = self.advance_histories(&pv);
        snapshot.insert(SMA, sma_value);
        snapshot.insert(PSAR, psar_value);

        Recomputed {
            ready: true,
            snapshot,
        }
    }

    /// Push the latest SMA / PSAR into their trailing histories and return
    /// the displayed tail of each.
    fn advance_histories(&mut self, pv: &PriceVectors) -> (IndicatorValue, IndicatorValue) {
        let keep = self.config.trailing_history;
        let show = self.config.display_history;

        if let Some(v) = sma::calculate_sma(&pv.closes, self.config.sma_period) {
            push_bounded(&mut self.sma_history, v, keep);
        }
        if let Some(v) = psar::current_psar(&pv.highs, &pv.lows, self.config.psar.step, self.config.psar.max) {
            push_bounded(&mut self.psar_history, v, keep);
        }

        (tail(&self.sma_history, show), tail(&self.psar_history, show))
    }
}

fn push_bounded(history: &mut VecDeque<f64>, value: f64, keep: usize) {
    history.push_back(value);
    while history.len() > keep {
        history.pop_front();
    }
}

fn tail(history: &VecDeque<f64>, show: usize) -> IndicatorValue {
    if history.is_empty() {
        return IndicatorValue::Unavailable;
    }
    let skip = history.len().saturating_sub(show);
    IndicatorValue::Series(history.iter().skip(skip).copied().collect())
}
