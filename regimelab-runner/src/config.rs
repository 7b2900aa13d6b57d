//! TOML run configuration.
//!
//! A config file fully describes one backtest: where the bars come from,
//! the capital and caller-side limits, and the validated strategy
//! parameters.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! bars_csv = "data/spy.csv"
//! initial_capital = 100000.0
//!
//! [strategy.signal]
//! variant = "mean_reversion"
//! rsi_period = 2
//! entry_threshold = 30.0
//! exit_threshold = 70.0
//!
//! [strategy.regime]
//! er_window = 10
//! er_low = 0.3
//! er_high = 0.7
//! vol_window = 10
//!
//! [strategy.risk]
//! base_fraction = 0.25
//! max_fraction = 0.25
//! max_hold_bars = 20
//! return_cap = 0.5
//! fee_model = { kind = "percent_notional", rate = 0.001 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regimelab_core::domain::{ParamError, StrategyParams};

use crate::fitness::FitnessMetric;
use crate::metrics::ConstraintLimits;
use crate::runner::RunSettings;

/// Errors from config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid strategy params: {0}")]
    Params(#[from] ParamError),
}

/// The `[backtest]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    pub bars_csv: PathBuf,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
    #[serde(default)]
    pub fitness: FitnessMetric,
    #[serde(default)]
    pub min_trades: usize,
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: f64,
}

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_periods_per_year() -> f64 {
    252.0
}

fn default_max_drawdown() -> f64 {
    1.0
}

/// A complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategyParams,
}

impl RunConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate config text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let RunConfig { backtest, strategy } = toml::from_str(content)?;
        // Deserialization bypasses the params constructor; re-validate.
        let strategy = strategy.validated()?;
        Ok(RunConfig { backtest, strategy })
    }

    pub fn to_settings(&self) -> RunSettings {
        RunSettings {
            initial_capital: self.backtest.initial_capital,
            periods_per_year: self.backtest.periods_per_year,
            fitness: self.backtest.fitness,
            limits: ConstraintLimits {
                min_trades: self.backtest.min_trades,
                max_drawdown: self.backtest.max_drawdown,
            },
        }
    }
}
