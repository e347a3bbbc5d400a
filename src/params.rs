use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::Player;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Fixed inputs of one match. Immutable for the match lifetime; the
/// probability caches key off positions only, so a new parameter set always
/// means a new `Predictor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Probability that player A wins a point on their own serve.
    pub p_win_on_serve: f64,
    /// Probability that player A wins a point returning B's serve.
    pub p_win_returning: f64,
    pub starting_server: Player,
    /// True = games must be won by two points (advantage scoring); false =
    /// a single sudden-death point decides a deuce game. The probability
    /// engine always models advantage scoring, so with `ad_scoring = false`
    /// the simulated game rule and the predicted one diverge at deuce.
    pub ad_scoring: bool,
}

impl MatchParams {
    pub fn new(
        p_win_on_serve: f64,
        p_win_returning: f64,
        starting_server: Player,
    ) -> Result<Self, ParamError> {
        check_probability("p_win_on_serve", p_win_on_serve)?;
        check_probability("p_win_returning", p_win_returning)?;
        Ok(Self {
            p_win_on_serve,
            p_win_returning,
            starting_server,
            ad_scoring: true,
        })
    }

    pub fn with_ad_scoring(mut self, ad_scoring: bool) -> Self {
        self.ad_scoring = ad_scoring;
        self
    }

    /// Probability that player A wins the next point, given who serves it.
    /// The returner's chance is the complement; two-outcome points leave no
    /// third case.
    pub fn p_a_wins_point(&self, server: Player) -> f64 {
        match server {
            Player::A => self.p_win_on_serve,
            Player::B => self.p_win_returning,
        }
    }
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            p_win_on_serve: 0.5,
            p_win_returning: 0.5,
            starting_server: Player::A,
            ad_scoring: true,
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ParamError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ParamError::OutOfRange { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_full_closed_range() {
        assert!(MatchParams::new(0.0, 1.0, Player::A).is_ok());
        assert!(MatchParams::new(1.0, 0.0, Player::B).is_ok());
        assert!(MatchParams::new(0.65, 0.35, Player::A).is_ok());
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        let err = MatchParams::new(-0.1, 0.5, Player::A).unwrap_err();
        assert_eq!(
            err,
            ParamError::OutOfRange {
                name: "p_win_on_serve",
                value: -0.1
            }
        );
        assert!(MatchParams::new(0.5, 1.5, Player::A).is_err());
    }

    #[test]
    fn rejects_non_finite_probabilities() {
        assert!(MatchParams::new(f64::NAN, 0.5, Player::A).is_err());
        assert!(MatchParams::new(0.5, f64::INFINITY, Player::A).is_err());
    }

    #[test]
    fn point_probability_follows_the_server() {
        let params = MatchParams::new(0.7, 0.4, Player::A).unwrap();
        assert_eq!(params.p_a_wins_point(Player::A), 0.7);
        assert_eq!(params.p_a_wins_point(Player::B), 0.4);
    }
}
