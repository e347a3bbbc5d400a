//! Exact forward win probabilities for game, set, tiebreak, and match,
//! computed by memoized recursion over the two outcomes of each point. These
//! are Markov-chain probabilities, never simulation estimates: each function
//! is a pure function of the server and the relative score, which is what
//! makes per-position memoization valid.

use std::collections::HashMap;

use serde::Serialize;

use crate::params::MatchParams;
use crate::score::{
    GAMES_TO_WIN_SET, POINTS_TO_WIN_GAME, POINTS_TO_WIN_TIEBREAK, Player, SCORE_CAP, SETS_TO_WIN,
    ScoreState,
};

/// A game count of exactly 7 denotes "this set was decided by the 6-6
/// tiebreak". It is a score-representation convention, not a games-won tally:
/// the set recursion short-circuits into the tiebreak at 6-6, so the value
/// can only arrive as a direct argument.
const TIEBREAK_DECIDED_GAMES: u8 = 7;

/// The six live figures, all from player A's side with B as complement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Forecast {
    pub p_a_game: f64,
    pub p_b_game: f64,
    pub p_a_set: f64,
    pub p_b_set: f64,
    pub p_a_match: f64,
    pub p_b_match: f64,
}

impl Forecast {
    fn from_a(p_game: f64, p_set: f64, p_match: f64) -> Self {
        Self {
            p_a_game: p_game,
            p_b_game: 1.0 - p_game,
            p_a_set: p_set,
            p_b_set: 1.0 - p_set,
            p_a_match: p_match,
            p_b_match: 1.0 - p_match,
        }
    }

    /// Degenerate forecast for a decided match.
    pub fn certain(winner: Player) -> Self {
        let p = match winner {
            Player::A => 1.0,
            Player::B => 0.0,
        };
        Self::from_a(p, p, p)
    }

    pub fn zero() -> Self {
        Self {
            p_a_game: 0.0,
            p_b_game: 0.0,
            p_a_set: 0.0,
            p_b_set: 0.0,
            p_a_match: 0.0,
            p_b_match: 0.0,
        }
    }

    /// Componentwise `self - prev`, used for the per-point delta columns.
    pub fn minus(&self, prev: &Forecast) -> Forecast {
        Forecast {
            p_a_game: self.p_a_game - prev.p_a_game,
            p_b_game: self.p_b_game - prev.p_b_game,
            p_a_set: self.p_a_set - prev.p_a_set,
            p_b_set: self.p_b_set - prev.p_b_set,
            p_a_match: self.p_a_match - prev.p_a_match,
            p_b_match: self.p_b_match - prev.p_b_match,
        }
    }
}

/// Set-level result pair: the set probability alone is not enough for the
/// match recursion, which also needs to know who is likely to serve first in
/// the following set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetOutlook {
    /// P(A wins this set).
    pub p_a_wins: f64,
    /// P(A serves the game after this set ends).
    pub p_a_serves_next: f64,
}

/// Per-match probability calculator. Caches are keyed by the values that
/// fully determine each sub-computation and live exactly as long as one
/// parameter set: a new match builds a new `Predictor`.
#[derive(Debug)]
pub struct Predictor {
    p_win_on_serve: f64,
    p_win_returning: f64,
    game_cache: HashMap<(Player, u8, u8), f64>,
    set_cache: HashMap<(Player, u8, u8), SetOutlook>,
    tiebreak_cache: HashMap<(Player, bool, u8, u8), f64>,
    match_cache: HashMap<(Player, u8, u8), f64>,
}

impl Predictor {
    pub fn new(params: &MatchParams) -> Self {
        Self {
            p_win_on_serve: params.p_win_on_serve,
            p_win_returning: params.p_win_returning,
            game_cache: HashMap::new(),
            set_cache: HashMap::new(),
            tiebreak_cache: HashMap::new(),
            match_cache: HashMap::new(),
        }
    }

    fn p_a_point(&self, server: Player) -> f64 {
        match server {
            Player::A => self.p_win_on_serve,
            Player::B => self.p_win_returning,
        }
    }

    /// P(A wins the current game) from `a`-`b` with `server` serving
    /// throughout. Past the score cap the position goes to whoever leads;
    /// the probability mass out there is negligible for any non-degenerate
    /// input, and for inputs near 0 or 1 the recursion ends long before the
    /// cap.
    pub fn game_win_prob(&mut self, server: Player, a: u8, b: u8) -> f64 {
        if a >= POINTS_TO_WIN_GAME && a >= b + 2 {
            return 1.0;
        }
        if b >= POINTS_TO_WIN_GAME && b >= a + 2 {
            return 0.0;
        }
        if a >= SCORE_CAP || b >= SCORE_CAP {
            return if a > b {
                1.0
            } else if b > a {
                0.0
            } else {
                0.5
            };
        }
        if let Some(&p) = self.game_cache.get(&(server, a, b)) {
            return p;
        }

        let p_point = self.p_a_point(server);
        let p = p_point * self.game_win_prob(server, a + 1, b)
            + (1.0 - p_point) * self.game_win_prob(server, a, b + 1);
        self.game_cache.insert((server, a, b), p);
        p
    }

    /// Set probability plus next-set server probability from `a_games` -
    /// `b_games`, with `server` serving the upcoming game. Games in progress
    /// are folded in by the caller (`forecast`), not here: the recursion
    /// always weighs a fresh game.
    pub fn set_win_prob(&mut self, server: Player, a_games: u8, b_games: u8) -> SetOutlook {
        let p_a_serving = match server {
            Player::A => 1.0,
            Player::B => 0.0,
        };

        if a_games >= GAMES_TO_WIN_SET && a_games >= b_games + 2 {
            return SetOutlook {
                p_a_wins: 1.0,
                p_a_serves_next: p_a_serving,
            };
        }
        if b_games >= GAMES_TO_WIN_SET && b_games >= a_games + 2 {
            return SetOutlook {
                p_a_wins: 0.0,
                p_a_serves_next: p_a_serving,
            };
        }
        if a_games == TIEBREAK_DECIDED_GAMES {
            return SetOutlook {
                p_a_wins: 1.0,
                p_a_serves_next: p_a_serving,
            };
        }
        if b_games == TIEBREAK_DECIDED_GAMES {
            return SetOutlook {
                p_a_wins: 0.0,
                p_a_serves_next: p_a_serving,
            };
        }
        if a_games == GAMES_TO_WIN_SET && b_games == GAMES_TO_WIN_SET {
            // The tiebreak is the set.
            let p_a_wins = self.tiebreak_win_prob(server, false, 0, 0);
            return SetOutlook {
                p_a_wins,
                p_a_serves_next: p_a_serving,
            };
        }
        if let Some(&outlook) = self.set_cache.get(&(server, a_games, b_games)) {
            return outlook;
        }

        let p_game = self.game_win_prob(server, 0, 0);
        let next_server = server.other();
        let if_won = self.set_win_prob(next_server, a_games + 1, b_games);
        let if_lost = self.set_win_prob(next_server, a_games, b_games + 1);

        let outlook = SetOutlook {
            p_a_wins: p_game * if_won.p_a_wins + (1.0 - p_game) * if_lost.p_a_wins,
            p_a_serves_next: p_game * if_won.p_a_serves_next
                + (1.0 - p_game) * if_lost.p_a_serves_next,
        };
        self.set_cache.insert((server, a_games, b_games), outlook);
        outlook
    }

    /// P(A wins the tiebreak). The serve rotation mirrors the state machine:
    /// a lone opening point, then pairs. Once both scores sit at the cap the
    /// position is approximated by the midpoint of the two serve
    /// probabilities; at that depth the server identity no longer matters.
    pub fn tiebreak_win_prob(&mut self, server: Player, first_of_pair: bool, a: u8, b: u8) -> f64 {
        if a >= POINTS_TO_WIN_TIEBREAK && a >= b + 2 {
            return 1.0;
        }
        if b >= POINTS_TO_WIN_TIEBREAK && b >= a + 2 {
            return 0.0;
        }
        if a >= SCORE_CAP && b >= SCORE_CAP {
            return (self.p_win_on_serve + self.p_win_returning) / 2.0;
        }
        if let Some(&p) = self.tiebreak_cache.get(&(server, first_of_pair, a, b)) {
            return p;
        }

        let p_point = self.p_a_point(server);
        let (next_server, next_first) = if first_of_pair {
            (server, false)
        } else {
            (server.other(), true)
        };
        let p = p_point * self.tiebreak_win_prob(next_server, next_first, a + 1, b)
            + (1.0 - p_point) * self.tiebreak_win_prob(next_server, next_first, a, b + 1);
        self.tiebreak_cache.insert((server, first_of_pair, a, b), p);
        p
    }

    /// P(A wins the match) from `a_sets` - `b_sets`, with `server` opening
    /// the next set. Four weighted branches: win/lose the next set, crossed
    /// with who serves the set after it.
    pub fn match_win_prob(&mut self, server: Player, a_sets: u8, b_sets: u8) -> f64 {
        if a_sets >= SETS_TO_WIN {
            return 1.0;
        }
        if b_sets >= SETS_TO_WIN {
            return 0.0;
        }
        if let Some(&p) = self.match_cache.get(&(server, a_sets, b_sets)) {
            return p;
        }

        let set = self.set_win_prob(server, 0, 0);
        let p_won_serving = set.p_a_wins
            * set.p_a_serves_next
            * self.match_win_prob(Player::A, a_sets + 1, b_sets);
        let p_lost_serving = (1.0 - set.p_a_wins)
            * set.p_a_serves_next
            * self.match_win_prob(Player::A, a_sets, b_sets + 1);
        let p_won_returning = set.p_a_wins
            * (1.0 - set.p_a_serves_next)
            * self.match_win_prob(Player::B, a_sets + 1, b_sets);
        let p_lost_returning = (1.0 - set.p_a_wins)
            * (1.0 - set.p_a_serves_next)
            * self.match_win_prob(Player::B, a_sets, b_sets + 1);

        let p = p_won_serving + p_lost_serving + p_won_returning + p_lost_returning;
        self.match_cache.insert((server, a_sets, b_sets), p);
        p
    }

    /// The six figures for the current position, folding any in-progress
    /// game or tiebreak into the set and match levels.
    pub fn forecast(&mut self, score: &ScoreState) -> Forecast {
        if let Some(winner) = score.winner {
            return Forecast::certain(winner);
        }

        if let Some(tb) = score.tiebreak {
            // Inside a tiebreak the game and set figures coincide, and the
            // match recursion starts from the server saved at tiebreak entry,
            // who serves the first game after the set.
            let p_set = self.tiebreak_win_prob(
                score.server,
                tb.first_serve_of_pair,
                score.a_points,
                score.b_points,
            );
            let p_match = p_set
                * self.match_win_prob(tb.server_at_start, score.a_sets + 1, score.b_sets)
                + (1.0 - p_set)
                    * self.match_win_prob(tb.server_at_start, score.a_sets, score.b_sets + 1);
            return Forecast::from_a(p_set, p_set, p_match);
        }

        let p_game = self.game_win_prob(score.server, score.a_points, score.b_points);

        // The game in progress is served by `score.server`; both set
        // continuations below start from the following game.
        let next_server = score.server.other();
        let if_won = self.set_win_prob(next_server, score.a_games + 1, score.b_games);
        let if_lost = self.set_win_prob(next_server, score.a_games, score.b_games + 1);

        let p_set = p_game * if_won.p_a_wins + (1.0 - p_game) * if_lost.p_a_wins;
        let p_serves_next =
            p_game * if_won.p_a_serves_next + (1.0 - p_game) * if_lost.p_a_serves_next;

        let p_match = p_serves_next
            * (p_set * self.match_win_prob(Player::A, score.a_sets + 1, score.b_sets)
                + (1.0 - p_set) * self.match_win_prob(Player::A, score.a_sets, score.b_sets + 1))
            + (1.0 - p_serves_next)
                * (p_set * self.match_win_prob(Player::B, score.a_sets + 1, score.b_sets)
                    + (1.0 - p_set)
                        * self.match_win_prob(Player::B, score.a_sets, score.b_sets + 1));

        Forecast::from_a(p_game, p_set, p_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor(p_serve: f64, p_return: f64) -> Predictor {
        let params = MatchParams::new(p_serve, p_return, Player::A).unwrap();
        Predictor::new(&params)
    }

    #[test]
    fn decided_games_are_terminal() {
        let mut p = predictor(0.65, 0.35);
        assert_eq!(p.game_win_prob(Player::A, 4, 0), 1.0);
        assert_eq!(p.game_win_prob(Player::A, 4, 2), 1.0);
        assert_eq!(p.game_win_prob(Player::B, 1, 4), 0.0);
        // 4-3 is advantage, still open.
        let open = p.game_win_prob(Player::A, 4, 3);
        assert!(open > 0.0 && open < 1.0);
    }

    #[test]
    fn even_point_probability_gives_even_game() {
        let mut p = predictor(0.5, 0.5);
        assert_eq!(p.game_win_prob(Player::A, 0, 0), 0.5);
        assert_eq!(p.game_win_prob(Player::B, 0, 0), 0.5);
    }

    #[test]
    fn deuce_is_self_similar() {
        let mut p = predictor(0.5, 0.5);
        assert_eq!(
            p.game_win_prob(Player::A, 3, 3),
            p.game_win_prob(Player::A, 4, 4)
        );

        // Away from 0.5 the score cap perturbs deeper positions slightly, so
        // self-similarity holds to the cap's residual mass only.
        let mut p = predictor(0.65, 0.35);
        let deuce = p.game_win_prob(Player::A, 3, 3);
        let later = p.game_win_prob(Player::A, 4, 4);
        assert!((deuce - later).abs() < 1e-5);
    }

    #[test]
    fn stronger_serve_never_hurts() {
        let mut last = 0.0;
        for p_serve in [0.50, 0.55, 0.60, 0.70, 0.80, 0.90] {
            let mut p = predictor(p_serve, 0.40);
            let m = p.match_win_prob(Player::A, 0, 0);
            assert!(m >= last, "match prob fell when serve improved");
            let s = p.set_win_prob(Player::A, 0, 0).p_a_wins;
            assert!(s > 0.0 && s <= 1.0);
            last = m;
        }
    }

    #[test]
    fn balanced_match_is_a_coin_flip_for_either_server() {
        for server in [Player::A, Player::B] {
            let mut p = predictor(0.5, 0.5);
            let m = p.match_win_prob(server, 0, 0);
            assert!((m - 0.5).abs() < 1e-12, "got {m} for server {server}");
        }
    }

    #[test]
    fn perfect_player_wins_with_certainty() {
        for server in [Player::A, Player::B] {
            let mut p = predictor(1.0, 1.0);
            assert_eq!(p.match_win_prob(server, 0, 0), 1.0);
            assert_eq!(p.set_win_prob(server, 0, 0).p_a_wins, 1.0);
            assert_eq!(p.tiebreak_win_prob(server, false, 0, 0), 1.0);
        }
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let mut p = predictor(0.63, 0.38);
        let first = (
            p.game_win_prob(Player::A, 2, 1),
            p.set_win_prob(Player::B, 3, 4),
            p.tiebreak_win_prob(Player::A, true, 5, 5),
            p.match_win_prob(Player::B, 1, 2),
        );
        let second = (
            p.game_win_prob(Player::A, 2, 1),
            p.set_win_prob(Player::B, 3, 4),
            p.tiebreak_win_prob(Player::A, true, 5, 5),
            p.match_win_prob(Player::B, 1, 2),
        );
        assert_eq!(first, second);
    }

    // P(B wins) computed from B's own point of view must complement P(A
    // wins). Mirroring swaps the players: B's serve-win probability is the
    // complement of A's return-win probability and vice versa.
    #[test]
    fn mirrored_game_probabilities_are_complements() {
        let mut a_side = predictor(0.68, 0.31);
        let mut b_side = predictor(1.0 - 0.31, 1.0 - 0.68);

        for (a, b) in [(0, 0), (2, 1), (3, 3), (5, 4), (1, 3)] {
            for server in [Player::A, Player::B] {
                let p_a = a_side.game_win_prob(server, a, b);
                let p_b = b_side.game_win_prob(server.other(), b, a);
                assert!((p_a + p_b - 1.0).abs() < 1e-12, "at {a}-{b} ({server})");
            }
        }
    }

    #[test]
    fn mirrored_match_probabilities_are_complements() {
        let mut a_side = predictor(0.68, 0.31);
        let mut b_side = predictor(1.0 - 0.31, 1.0 - 0.68);
        for server in [Player::A, Player::B] {
            let p_a = a_side.match_win_prob(server, 0, 0);
            let p_b = b_side.match_win_prob(server.other(), 0, 0);
            assert!((p_a + p_b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn tiebreak_decided_games_value_is_terminal() {
        let mut p = predictor(0.6, 0.4);
        let won = p.set_win_prob(Player::A, 7, 6);
        assert_eq!(won.p_a_wins, 1.0);
        let lost = p.set_win_prob(Player::A, 6, 7);
        assert_eq!(lost.p_a_wins, 0.0);
    }

    #[test]
    fn six_all_set_equals_the_tiebreak() {
        let mut p = predictor(0.6, 0.4);
        let set = p.set_win_prob(Player::B, 6, 6).p_a_wins;
        let tb = p.tiebreak_win_prob(Player::B, false, 0, 0);
        assert_eq!(set, tb);
    }

    #[test]
    fn forecast_complements_sum_to_one() {
        let params = MatchParams::new(0.64, 0.36, Player::A).unwrap();
        let mut p = Predictor::new(&params);
        let mut score = ScoreState::new(Player::A);
        score.apply_point(Player::A, &params);
        score.apply_point(Player::B, &params);

        let f = p.forecast(&score);
        assert_eq!(f.p_a_game + f.p_b_game, 1.0);
        assert_eq!(f.p_a_set + f.p_b_set, 1.0);
        assert_eq!(f.p_a_match + f.p_b_match, 1.0);
    }

    #[test]
    fn forecast_of_decided_match_reports_certainty() {
        let params = MatchParams::default();
        let mut p = Predictor::new(&params);
        let mut score = ScoreState::new(Player::A);
        score.winner = Some(Player::B);
        let f = p.forecast(&score);
        assert_eq!(f.p_b_match, 1.0);
        assert_eq!(f.p_b_game, 1.0);
        assert_eq!(f.p_a_set, 0.0);
    }
}
