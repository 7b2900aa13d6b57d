//! Run fingerprinting — BLAKE3 hashes over canonical serializations.
//!
//! Two identical `(bars, params)` inputs must produce byte-identical
//! ledgers; fingerprints make that property cheap to assert and cheap to
//! store next to persisted results.

use crate::domain::{Ledger, StrategyParams};

/// Hex BLAKE3 hash of the ledger's canonical JSON serialization.
pub fn ledger_fingerprint(ledger: &Ledger) -> String {
    let bytes = serde_json::to_vec(ledger).expect("ledger serialization is infallible");
    blake3::hash(&bytes).to_hex().to_string()
}

/// Hex BLAKE3 hash of a parameter set's canonical JSON serialization.
///
/// Useful as a cache/result key: two structurally identical parameter sets
/// hash identically regardless of how they were constructed.
pub fn params_fingerprint(params: &StrategyParams) -> String {
    let bytes = serde_json::to_vec(params).expect("params serialization is infallible");
    blake3::hash(&bytes).to_hex().to_string()
}
