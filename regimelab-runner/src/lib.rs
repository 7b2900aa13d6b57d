//! RegimeLab Runner — orchestration around the core engine.
//!
//! - Performance metrics and caller-side constraint checks
//! - Parameter sweeps (rayon) with per-trial fault isolation
//! - Walk-forward Train/Validation/Test partitioning with frozen params
//! - Bootstrap Sharpe distributions (diagnostic)
//! - CSV bar loading, CSV ledger export, TOML run configuration

pub mod bootstrap;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod fitness;
pub mod metrics;
pub mod runner;
pub mod sweep;
pub mod walk_forward;

pub use bootstrap::{bootstrap_sharpe, BootstrapConfig, BootstrapSummary};
pub use config::{ConfigError, RunConfig};
pub use data_loader::{load_bars_csv, LoadError};
pub use export::{export_ledger_csv, ExportError};
pub use fitness::{FitnessMetric, REJECTED_SCORE};
pub use metrics::{ConstraintFlags, ConstraintLimits, PerformanceMetrics};
pub use runner::{run_single, BacktestResult, RunError, RunSettings};
pub use sweep::{ParamGrid, ParamSweep, SweepOutcome, TrialOutcome};
pub use walk_forward::{
    run_walk_forward, SplitFractions, SplitSpec, WalkForwardConfig, WalkForwardError,
    WalkForwardReport,
};
