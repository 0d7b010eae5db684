// =============================================================================
// Indicator snapshot and its store
// =============================================================================

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::ser::{Serialize, Serializer};
use serde::Serialize as DeriveSerialize;

use crate::indicators::{BollingerResult, MacdResult, StochasticResult};
use crate::market_data::Bar;

/// Wire form of an indicator that cannot be computed yet.
pub const UNAVAILABLE: &str = "N/A";

/// Latest value of one indicator.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Unavailable,
    Scalar(f64),
    Series(Vec<f64>),
    Bands(BollingerResult),
    Macd(MacdResult),
    Stochastic(StochasticResult),
}

impl IndicatorValue {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Option<f64>> for IndicatorValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Scalar)
    }
}

impl Serialize for IndicatorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE),
            Self::Scalar(v) => serializer.serialize_f64(*v),
            Self::Series(values) => values.serialize(serializer),
            Self::Bands(bb) => bb.serialize(serializer),
            Self::Macd(m) => m.serialize(serializer),
            Self::Stochastic(s) => s.serialize(serializer),
        }
    }
}

/// Indicator name → latest value, replaced wholesale on every recompute.
#[derive(Debug, Clone, Default, PartialEq, DeriveSerialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, IndicatorValue>,
}

impl Snapshot {
    /// A snapshot where every named indicator is unavailable.
    pub fn unavailable<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: names
                .into_iter()
                .map(|n| (n.into(), IndicatorValue::Unavailable))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: IndicatorValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&IndicatorValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndicatorValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn all_unavailable(&self) -> bool {
        self.values.values().all(|v| !v.is_available())
    }
}

/// What a reader gets back: the latest bar plus the latest snapshot.
#[derive(Debug, Clone, PartialEq, DeriveSerialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    /// `false` until the rolling series covers the longest indicator period.
    pub ready: bool,
    /// Bars currently held in the rolling series.
    pub bars: usize,
    pub latest_bar: Option<Bar>,
    pub indicators: Snapshot,
}

/// Single-slot holder for the most recent [`SnapshotView`].
///
/// Reads clone whatever was last written and never trigger a computation.
pub struct SnapshotStore {
    slot: RwLock<SnapshotView>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            slot: RwLock::new(SnapshotView {
                ready: false,
                bars: 0,
                latest_bar: None,
                indicators: initial,
            }),
        }
    }

    pub fn read(&self) -> SnapshotView {
        self.slot.read().clone()
    }

    pub fn write(&self, view: SnapshotView) {
        *self.slot.write() = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unavailable_serialises_as_sentinel() {
        let mut snap = Snapshot::unavailable(["ADX"]);
        snap.insert("RSI_14", IndicatorValue::Scalar(55.5));
        snap.insert("SMA", IndicatorValue::Series(vec![1.0, 2.0]));

        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v, json!({ "ADX": "N/A", "RSI_14": 55.5, "SMA": [1.0, 2.0] }));
    }

    #[test]
    fn records_serialise_as_objects() {
        let mut snap = Snapshot::default();
        snap.insert(
            "BB",
            IndicatorValue::Bands(BollingerResult {
                upper: 3.0,
                middle: 2.0,
                lower: 1.0,
            }),
        );
        snap.insert(
            "Stochastic",
            IndicatorValue::Stochastic(StochasticResult { k: 80.0, d: None }),
        );

        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["BB"], json!({ "upper": 3.0, "middle": 2.0, "lower": 1.0 }));
        assert_eq!(v["Stochastic"], json!({ "k": 80.0, "d": null }));
    }

    #[test]
    fn option_conversion() {
        assert_eq!(IndicatorValue::from(None), IndicatorValue::Unavailable);
        assert_eq!(IndicatorValue::from(Some(2.5)).as_scalar(), Some(2.5));
    }

    #[test]
    fn store_returns_last_write() {
        let store = SnapshotStore::new(Snapshot::unavailable(["RSI_14"]));
        let first = store.read();
        assert!(!first.ready);
        assert!(first.latest_bar.is_none());
        assert!(first.indicators.all_unavailable());

        let bar = Bar::new(1.0, 2.0, 0.5, 1.5, "t0").unwrap();
        store.write(SnapshotView {
            ready: true,
            bars: 1,
            latest_bar: Some(bar.clone()),
            indicators: Snapshot::default(),
        });
        let view = store.read();
        assert!(view.ready);
        assert_eq!(view.latest_bar, Some(bar));
    }

    #[test]
    fn view_uses_camel_case_keys() {
        let store = SnapshotStore::new(Snapshot::default());
        let v = serde_json::to_value(store.read()).unwrap();
        assert!(v.get("latestBar").is_some());
        assert!(v.get("ready").is_some());
    }
}
