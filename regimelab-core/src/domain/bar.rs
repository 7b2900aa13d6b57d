//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Close/volume bar for a single symbol on a single day.
///
/// The engine consumes only close and volume. Bars arrive from an external
/// loader as an ordered, gap-tolerant sequence per symbol; the engine
/// rejects unsorted or non-finite input before the loop starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            close,
            volume,
        }
    }

    /// A bar is usable when its close is finite and positive.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new("SPY", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 103.0, 50_000)
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_nan_close() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_nonpositive_close() {
        let mut bar = sample_bar();
        bar.close = 0.0;
        assert!(!bar.is_sane());
        bar.close = -5.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
