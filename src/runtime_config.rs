// =============================================================================
// Engine Configuration: indicator periods, buffer sizes, transport settings
// =============================================================================
//
// One table drives every indicator.  The configuration is read once at start
// up and never mutated afterwards.  All fields carry `#[serde(default)]` so a
// partial JSON file only overrides what it names.
//
// =============================================================================

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_history_capacity() -> usize {
    100
}

fn default_rsi_periods() -> Vec<usize> {
    vec![14, 4]
}

fn default_bollinger_period() -> usize {
    5
}

fn default_bollinger_deviation() -> f64 {
    1.0
}

fn default_cci_period() -> usize {
    4
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_sma_period() -> usize {
    3
}

fn default_psar_step() -> f64 {
    0.25
}

fn default_psar_max() -> f64 {
    1.0
}

fn default_adx_period() -> usize {
    14
}

fn default_stochastic_period() -> usize {
    14
}

fn default_stochastic_signal() -> usize {
    3
}

fn default_trailing_history() -> usize {
    10
}

fn default_display_history() -> usize {
    5
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_bucket_secs() -> u64 {
    5
}

// =============================================================================
// Indicator parameter groups
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    #[serde(default = "default_bollinger_period")]
    pub period: usize,

    /// Band half-width in population standard deviations.
    #[serde(default = "default_bollinger_deviation")]
    pub deviation: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: default_bollinger_period(),
            deviation: default_bollinger_deviation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_macd_fast")]
    pub fast: usize,
    #[serde(default = "default_macd_slow")]
    pub slow: usize,
    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: default_macd_fast(),
            slow: default_macd_slow(),
            signal: default_macd_signal(),
        }
    }
}

/// Parabolic SAR acceleration.  The defaults (0.25 / 1.0) are far more
/// aggressive than Wilder's 0.02 / 0.2 and suit 5-second bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsarParams {
    #[serde(default = "default_psar_step")]
    pub step: f64,
    #[serde(default = "default_psar_max")]
    pub max: f64,
}

impl Default for PsarParams {
    fn default() -> Self {
        Self {
            step: default_psar_step(),
            max: default_psar_max(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticParams {
    #[serde(default = "default_stochastic_period")]
    pub period: usize,
    #[serde(default = "default_stochastic_signal")]
    pub signal: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            period: default_stochastic_period(),
            signal: default_stochastic_signal(),
        }
    }
}

/// Tick feed adapter settings.  The feed is disabled when `url` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Width of one OHLC bucket in seconds.
    #[serde(default = "default_bucket_secs")]
    pub bucket_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            bucket_secs: default_bucket_secs(),
        }
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // --- Rolling history ----------------------------------------------------

    /// Maximum number of bars kept in the rolling series.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Values kept in the SMA / PSAR trailing histories.
    #[serde(default = "default_trailing_history")]
    pub trailing_history: usize,

    /// How many of the trailing values are published in a snapshot.
    #[serde(default = "default_display_history")]
    pub display_history: usize,

    // --- Indicators ---------------------------------------------------------

    /// One `RSI_<period>` entry is published per period.
    #[serde(default = "default_rsi_periods")]
    pub rsi_periods: Vec<usize>,

    #[serde(default)]
    pub bollinger: BollingerParams,

    #[serde(default = "default_cci_period")]
    pub cci_period: usize,

    #[serde(default)]
    pub macd: MacdParams,

    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default)]
    pub psar: PsarParams,

    #[serde(default = "default_adx_period")]
    pub adx_period: usize,

    #[serde(default)]
    pub stochastic: StochasticParams,

    // --- Transport ----------------------------------------------------------

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            trailing_history: default_trailing_history(),
            display_history: default_display_history(),
            rsi_periods: default_rsi_periods(),
            bollinger: BollingerParams::default(),
            cci_period: default_cci_period(),
            macd: MacdParams::default(),
            sma_period: default_sma_period(),
            psar: PsarParams::default(),
            adx_period: default_adx_period(),
            stochastic: StochasticParams::default(),
            bind_addr: default_bind_addr(),
            feed: FeedConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Largest configured look-back.  The engine reports "not ready" until
    /// the rolling series holds at least this many bars.
    pub fn warmup_period(&self) -> usize {
        self.rsi_periods
            .iter()
            .copied()
            .chain([
                self.bollinger.period,
                self.cci_period,
                self.macd.fast,
                self.macd.slow,
                self.sma_period,
                self.adx_period,
                self.stochastic.period,
            ])
            .max()
            .unwrap_or(1)
    }

    /// Reject tables the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.rsi_periods.is_empty(), "at least one RSI period is required");
        ensure!(
            self.rsi_periods.iter().all(|&p| p >= 2),
            "RSI periods must be at least 2, got {:?}",
            self.rsi_periods
        );
        for (name, period) in [
            ("bollinger.period", self.bollinger.period),
            ("cci_period", self.cci_period),
            ("macd.signal", self.macd.signal),
            ("sma_period", self.sma_period),
            ("adx_period", self.adx_period),
            ("stochastic.period", self.stochastic.period),
            ("stochastic.signal", self.stochastic.signal),
        ] {
            ensure!(period > 0, "{name} must be positive");
        }
        ensure!(
            self.macd.fast > 0 && self.macd.fast < self.macd.slow,
            "macd.fast ({}) must be positive and shorter than macd.slow ({})",
            self.macd.fast,
            self.macd.slow
        );
        ensure!(
            self.bollinger.deviation.is_finite() && self.bollinger.deviation >= 0.0,
            "bollinger.deviation must be a non-negative number"
        );
        ensure!(
            self.psar.step > 0.0 && self.psar.max >= self.psar.step,
            "psar.step must be positive and not exceed psar.max"
        );
        ensure!(
            self.history_capacity >= self.warmup_period(),
            "history_capacity ({}) is smaller than the longest indicator period ({})",
            self.history_capacity,
            self.warmup_period()
        );
        ensure!(self.trailing_history > 0, "trailing_history must be positive");
        ensure!(
            self.display_history <= self.trailing_history,
            "display_history cannot exceed trailing_history"
        );
        ensure!(self.feed.bucket_secs > 0, "feed.bucket_secs must be positive");
        Ok(())
    }

    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid engine config in {}", path.display()))?;

        info!(
            path = %path.display(),
            history_capacity = config.history_capacity,
            warmup = config.warmup_period(),
            "engine config loaded"
        );

        Ok(config)
    }
}
