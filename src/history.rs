use serde::Serialize;

use crate::predict::Forecast;
use crate::score::{Player, ScoreState};

/// One immutable snapshot per completed point: the score after the point,
/// the six probabilities evaluated on that post-point state, and their
/// movement since the previous point. Pure data; nothing here recomputes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub point_id: u32,
    pub a_points: u8,
    pub b_points: u8,
    pub a_games: u8,
    pub b_games: u8,
    pub a_sets: u8,
    pub b_sets: u8,
    /// Who served the point just played.
    pub server: Player,
    /// Match winner as of this point, `None` while the match is live.
    pub winner: Option<Player>,
    pub message: String,
    pub forecast: Forecast,
    /// Change versus the previous entry; all zeros on the first point.
    pub delta: Forecast,
}

impl HistoryEntry {
    /// Builds the next entry in sequence. The first point's deltas are zero
    /// by definition, not a lookup into a missing previous entry.
    pub fn next(
        prev: Option<&HistoryEntry>,
        point_id: u32,
        score: &ScoreState,
        forecast: Forecast,
        server: Player,
        message: String,
    ) -> Self {
        let delta = match prev {
            Some(prev) => forecast.minus(&prev.forecast),
            None => Forecast::zero(),
        };
        Self {
            point_id,
            a_points: score.a_points,
            b_points: score.b_points,
            a_games: score.a_games,
            b_games: score.b_games,
            a_sets: score.a_sets,
            b_sets: score.b_sets,
            server,
            winner: score.winner,
            message,
            forecast,
            delta,
        }
    }
}
