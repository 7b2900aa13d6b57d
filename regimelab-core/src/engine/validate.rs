//! Bar-series validation — runs before the simulation loop.
//!
//! Out-of-order or non-finite input would corrupt causal indicator values,
//! so it is rejected as a fatal `DataError` before the first bar is
//! processed.

use crate::domain::Bar;
use crate::error::DataError;

/// Validate a bar series: non-empty, one symbol, strictly increasing dates,
/// finite positive closes.
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    let first = bars.first().ok_or(DataError::Empty)?;
    let expected_symbol = &first.symbol;

    for (index, bar) in bars.iter().enumerate() {
        if &bar.symbol != expected_symbol {
            return Err(DataError::MixedSymbols {
                index,
                expected: expected_symbol.clone(),
                found: bar.symbol.clone(),
            });
        }
        if !bar.is_sane() {
            return Err(DataError::BadClose {
                index,
                date: bar.date,
                close: bar.close,
            });
        }
        if index > 0 && bar.date <= bars[index - 1].date {
            return Err(DataError::NonMonotonicDates {
                index,
                date: bar.date,
            });
        }
    }
    Ok(())
}
