//! Fatal input errors, detected before the simulation loop starts.

use chrono::NaiveDate;
use thiserror::Error;

/// Bar-series validation errors. Any of these aborts the run before the
/// first bar is processed; the loop itself never sees bad input.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("bar series is empty")]
    Empty,
    #[error("bar {index} ({date}) is not after its predecessor")]
    NonMonotonicDates { index: usize, date: NaiveDate },
    #[error("bar {index} ({date}) has a non-finite or non-positive close: {close}")]
    BadClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },
    #[error("bar {index} has symbol '{found}', expected '{expected}'")]
    MixedSymbols {
        index: usize,
        expected: String,
        found: String,
    },
}
