//! Domain types: bars, positions, trades, the ledger, and strategy
//! parameters.

pub mod bar;
pub mod ledger;
pub mod params;
pub mod position;
pub mod trade;

pub use bar::Bar;
pub use ledger::Ledger;
pub use params::{
    AdaptiveHoldParams, FeeModel, MeanReversionParams, ParamError, RegimeParams, RiskParams,
    SignalParams, StrategyParams, TrendFollowingParams,
};
pub use position::{Position, PositionSide, PositionState};
pub use trade::Trade;
