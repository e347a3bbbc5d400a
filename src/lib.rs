//! Live tennis win probability: a scoring state machine, a memoized
//! forward-probability engine, and a simulator that plays one random match
//! while recording the full probability trace point by point.

pub mod history;
pub mod params;
pub mod predict;
pub mod score;
pub mod simulate;

pub use history::HistoryEntry;
pub use params::{MatchParams, ParamError};
pub use predict::{Forecast, Predictor, SetOutlook};
pub use score::{Player, PointEffect, ScoreState};
pub use simulate::TennisMatch;
