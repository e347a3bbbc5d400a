use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::MatchParams;

/// Sets needed to take the match (best of five).
pub const SETS_TO_WIN: u8 = 3;
/// Games needed to take a set, subject to the two-game margin.
pub const GAMES_TO_WIN_SET: u8 = 6;
/// Points needed to take a game, subject to the two-point margin.
pub const POINTS_TO_WIN_GAME: u8 = 4;
/// Points needed to take a tiebreak, subject to the two-point margin.
pub const POINTS_TO_WIN_TIEBREAK: u8 = 7;
/// Hard ceiling on any score coordinate. A win-by-2 tiebreak that is still
/// open at this score goes to the leader; the probability recursions resolve
/// positions at the ceiling instead of recursing further.
pub const SCORE_CAP: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::A => "Player A",
            Player::B => "Player B",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "A"),
            Player::B => write!(f, "B"),
        }
    }
}

/// Tiebreak sub-state, present only while a set stands at 6-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tiebreak {
    /// True when the upcoming point is the first served by the current
    /// server's pair. The opening point of the tiebreak is a lone serve and
    /// starts with this flag false.
    pub first_serve_of_pair: bool,
    /// Who served the opening point. Restored as the next-game server once
    /// the tiebreak decides the set.
    pub server_at_start: Player,
}

/// What a single point changed, beyond the point itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEffect {
    Point(Player),
    GameWon(Player),
    SetWon(Player),
    MatchWon(Player),
}

impl PointEffect {
    pub fn describe(self) -> String {
        match self {
            PointEffect::Point(p) => format!("{} wins the point", p.label()),
            PointEffect::GameWon(p) => format!("{} wins the game", p.label()),
            PointEffect::SetWon(p) => format!("{} wins the set", p.label()),
            PointEffect::MatchWon(p) => format!("{} wins the match", p.label()),
        }
    }
}

/// Authoritative running score. Owned by the simulator; the probability
/// engine only ever reads snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    pub a_points: u8,
    pub b_points: u8,
    pub a_games: u8,
    pub b_games: u8,
    pub a_sets: u8,
    pub b_sets: u8,
    pub server: Player,
    pub tiebreak: Option<Tiebreak>,
    pub winner: Option<Player>,
}

impl ScoreState {
    pub fn new(starting_server: Player) -> Self {
        Self {
            a_points: 0,
            b_points: 0,
            a_games: 0,
            b_games: 0,
            a_sets: 0,
            b_sets: 0,
            server: starting_server,
            tiebreak: None,
            winner: None,
        }
    }

    fn points(&self, player: Player) -> u8 {
        match player {
            Player::A => self.a_points,
            Player::B => self.b_points,
        }
    }

    fn bump_points(&mut self, player: Player) {
        match player {
            Player::A => self.a_points += 1,
            Player::B => self.b_points += 1,
        }
    }

    fn games(&self, player: Player) -> u8 {
        match player {
            Player::A => self.a_games,
            Player::B => self.b_games,
        }
    }

    /// Applies one completed point and advances every enclosing unit it
    /// decides. Must not be called once `winner` is set.
    pub fn apply_point(&mut self, point_winner: Player, params: &MatchParams) -> PointEffect {
        debug_assert!(self.winner.is_none(), "point played after match end");

        self.bump_points(point_winner);

        if self.tiebreak.is_some() {
            return self.apply_tiebreak_point(point_winner);
        }

        let won = self.points(point_winner);
        let lost = self.points(point_winner.other());
        let game_over = if params.ad_scoring {
            won >= POINTS_TO_WIN_GAME && won >= lost + 2
        } else {
            // Sudden death at deuce: one point past 3-3 settles the game.
            won >= POINTS_TO_WIN_GAME && (won >= lost + 2 || lost >= 3)
        };
        if !game_over {
            return PointEffect::Point(point_winner);
        }

        self.win_game(point_winner)
    }

    fn win_game(&mut self, game_winner: Player) -> PointEffect {
        self.a_points = 0;
        self.b_points = 0;
        match game_winner {
            Player::A => self.a_games += 1,
            Player::B => self.b_games += 1,
        }
        self.server = self.server.other();

        let won = self.games(game_winner);
        let lost = self.games(game_winner.other());
        if won >= GAMES_TO_WIN_SET && won >= lost + 2 {
            return self.win_set(game_winner);
        }
        if self.a_games == GAMES_TO_WIN_SET && self.b_games == GAMES_TO_WIN_SET {
            // The player due to serve the next game opens the tiebreak.
            self.tiebreak = Some(Tiebreak {
                first_serve_of_pair: false,
                server_at_start: self.server,
            });
        }
        PointEffect::GameWon(game_winner)
    }

    fn apply_tiebreak_point(&mut self, point_winner: Player) -> PointEffect {
        let won = self.points(point_winner);
        let lost = self.points(point_winner.other());
        let decided = (won >= POINTS_TO_WIN_TIEBREAK && won >= lost + 2)
            || (won >= SCORE_CAP && won > lost);
        if decided {
            if let Some(tb) = self.tiebreak.take() {
                self.server = tb.server_at_start;
            }
            return self.win_set(point_winner);
        }

        // One lone opening serve, then the serve changes every two points.
        let mut swap = false;
        if let Some(tb) = self.tiebreak.as_mut() {
            if tb.first_serve_of_pair {
                tb.first_serve_of_pair = false;
            } else {
                tb.first_serve_of_pair = true;
                swap = true;
            }
        }
        if swap {
            self.server = self.server.other();
        }
        PointEffect::Point(point_winner)
    }

    fn win_set(&mut self, set_winner: Player) -> PointEffect {
        self.a_points = 0;
        self.b_points = 0;
        self.a_games = 0;
        self.b_games = 0;
        match set_winner {
            Player::A => self.a_sets += 1,
            Player::B => self.b_sets += 1,
        }

        let won = match set_winner {
            Player::A => self.a_sets,
            Player::B => self.b_sets,
        };
        if won >= SETS_TO_WIN {
            self.winner = Some(set_winner);
            return PointEffect::MatchWon(set_winner);
        }
        PointEffect::SetWon(set_winner)
    }

    /// Human-readable score: sets, games, and the current game in tennis
    /// terms ("0/15/30/40", "Deuce", "Advantage ..."), raw points inside a
    /// tiebreak.
    pub fn score_line(&self) -> String {
        const POINT_NAMES: [&str; 4] = ["0", "15", "30", "40"];

        let game = if self.tiebreak.is_some() {
            format!("Tiebreak {}-{}", self.a_points, self.b_points)
        } else if self.a_points >= 3 && self.b_points >= 3 {
            if self.a_points == self.b_points {
                "Deuce".to_string()
            } else if self.a_points > self.b_points {
                format!("Advantage {}", Player::A.label())
            } else {
                format!("Advantage {}", Player::B.label())
            }
        } else {
            format!(
                "{}-{}",
                POINT_NAMES[self.a_points.min(3) as usize],
                POINT_NAMES[self.b_points.min(3) as usize]
            )
        };

        format!(
            "Sets: {}-{}, Games: {}-{}, Current Game: {}",
            self.a_sets, self.b_sets, self.a_games, self.b_games, game
        )
    }
}
