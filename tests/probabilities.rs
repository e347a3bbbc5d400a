use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use matchpoint::{MatchParams, Player, Predictor, ScoreState, TennisMatch};

fn fresh_forecast(p_serve: f64, p_return: f64, server: Player) -> matchpoint::Forecast {
    let params = MatchParams::new(p_serve, p_return, server).expect("valid test params");
    let mut predictor = Predictor::new(&params);
    predictor.forecast(&ScoreState::new(server))
}

#[test]
fn balanced_players_start_even_for_either_server() {
    for server in [Player::A, Player::B] {
        let f = fresh_forecast(0.5, 0.5, server);
        assert!((f.p_a_match - 0.5).abs() < 1e-12);
        assert!((f.p_a_set - 0.5).abs() < 1e-12);
        assert_eq!(f.p_a_game, 0.5);
    }
}

#[test]
fn serve_strength_moves_the_whole_forecast_up() {
    let mut last_match = 0.0;
    let mut last_set = 0.0;
    for p_serve in [0.50, 0.56, 0.62, 0.70, 0.82, 0.95] {
        let f = fresh_forecast(p_serve, 0.42, Player::A);
        assert!(f.p_a_match >= last_match);
        assert!(f.p_a_set >= last_set);
        last_match = f.p_a_match;
        last_set = f.p_a_set;
    }
}

#[test]
fn complements_sum_to_one_at_every_point_of_a_playout() {
    let params = MatchParams::new(0.61, 0.42, Player::A).expect("valid test params");
    let mut tennis = TennisMatch::new(params);
    tennis.play_with(&mut ChaCha8Rng::seed_from_u64(41));

    for entry in tennis.history() {
        assert_eq!(entry.forecast.p_a_game + entry.forecast.p_b_game, 1.0);
        assert_eq!(entry.forecast.p_a_set + entry.forecast.p_b_set, 1.0);
        assert_eq!(entry.forecast.p_a_match + entry.forecast.p_b_match, 1.0);
    }
}

#[test]
fn forecast_matches_between_fresh_and_warmed_caches() {
    let params = MatchParams::new(0.66, 0.37, Player::A).expect("valid test params");
    let mut score = ScoreState::new(Player::A);
    // Walk a few games in to leave the trivial positions behind.
    for _ in 0..4 {
        score.apply_point(Player::A, &params);
    }
    for _ in 0..2 {
        score.apply_point(Player::B, &params);
    }

    let mut warmed = Predictor::new(&params);
    warmed.match_win_prob(Player::A, 0, 0); // populate caches broadly
    let mut cold = Predictor::new(&params);

    assert_eq!(warmed.forecast(&score), cold.forecast(&score));
    assert_eq!(cold.forecast(&score), cold.forecast(&score));
}

#[test]
fn certain_parameters_give_certain_forecasts() {
    for server in [Player::A, Player::B] {
        let f = fresh_forecast(1.0, 1.0, server);
        assert_eq!(f.p_a_match, 1.0);
        assert_eq!(f.p_b_match, 0.0);
        assert_eq!(f.p_a_set, 1.0);
        assert_eq!(f.p_a_game, 1.0);
    }
}
