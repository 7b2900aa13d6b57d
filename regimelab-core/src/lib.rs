//! RegimeLab Core — engine, domain types, indicators, regime classifier,
//! strategies, risk manager.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, positions, trades, the ledger, strategy params)
//! - Causal indicator library (RSI, EMA, rolling volatility, efficiency
//!   ratio, momentum) precomputed into a per-run frame
//! - Regime classifier with optional minimum-dwell hysteresis
//! - Strategy trait with mean-reversion, trend-following, and quorum
//!   ensemble variants
//! - Position & risk manager (volatility-scaled sizing, fee models,
//!   prioritized exit chain with outlier capping)
//! - Single-pass bar loop driving the Flat/Open position state machine
//!
//! A run is a pure function of `(bars, params, config)`: deterministic, no
//! I/O, no shared state. Orchestration (metrics, walk-forward, sweeps,
//! CSV in/out) lives in `regimelab-runner`.

pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod regime;
pub mod risk;
pub mod strategy;
