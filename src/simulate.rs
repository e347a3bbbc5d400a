use rand::Rng;

use crate::history::HistoryEntry;
use crate::params::MatchParams;
use crate::predict::Predictor;
use crate::score::{Player, PointEffect, ScoreState};

/// One match: parameters, the live score, the per-match probability caches,
/// and the point-by-point trace. Everything is owned here; nothing is shared
/// across matches.
#[derive(Debug)]
pub struct TennisMatch {
    params: MatchParams,
    score: ScoreState,
    predictor: Predictor,
    history: Vec<HistoryEntry>,
}

impl TennisMatch {
    /// A freshly constructed match has no result yet: `winner()` is `None`
    /// and the history is empty until `play` runs.
    pub fn new(params: MatchParams) -> Self {
        Self {
            params,
            score: ScoreState::new(params.starting_server),
            predictor: Predictor::new(&params),
            history: Vec::new(),
        }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Simulates the whole match with system entropy. Non-deterministic; use
    /// `play_with` and a seeded RNG for reproducible playouts.
    pub fn play(&mut self) {
        self.play_with(&mut rand::thread_rng());
    }

    /// Simulates the whole match, one uniform draw per point, evaluating the
    /// probability engine on the post-point state and appending a history
    /// entry every time. Runs to completion; score, caches, and history are
    /// rebuilt from scratch on every invocation.
    pub fn play_with<R: Rng>(&mut self, rng: &mut R) {
        self.score = ScoreState::new(self.params.starting_server);
        self.predictor = Predictor::new(&self.params);
        self.history.clear();

        let mut point_id = 0u32;
        while self.score.winner.is_none() {
            let server = self.score.server;
            let p_a_point = self.params.p_a_wins_point(server);
            let point_winner = if rng.gen_bool(p_a_point) {
                Player::A
            } else {
                Player::B
            };

            let effect = self.score.apply_point(point_winner, &self.params);
            let forecast = self.predictor.forecast(&self.score);

            match effect {
                PointEffect::Point(_) => {}
                PointEffect::GameWon(winner) => {
                    tracing::debug!(winner = %winner, score = %self.score.score_line(), "game decided");
                }
                PointEffect::SetWon(winner) => {
                    tracing::debug!(winner = %winner, score = %self.score.score_line(), "set decided");
                }
                PointEffect::MatchWon(winner) => {
                    tracing::info!(winner = %winner, points = point_id + 1, "match decided");
                }
            }

            let entry = HistoryEntry::next(
                self.history.last(),
                point_id,
                &self.score,
                forecast,
                server,
                effect.describe(),
            );
            self.history.push(entry);
            point_id += 1;
        }
    }

    /// `None` until a playout has finished.
    pub fn winner(&self) -> Option<Player> {
        self.score.winner
    }

    /// Final set score as (A, B).
    pub fn final_sets(&self) -> (u8, u8) {
        (self.score.a_sets, self.score.b_sets)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn score_line(&self) -> String {
        self.score.score_line()
    }
}
