use std::env;

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use matchpoint::{MatchParams, Player, TennisMatch};

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "matchpoint=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let p_serve = env_f64("MATCHPOINT_P_SERVE", 0.65);
    let p_return = env_f64("MATCHPOINT_P_RETURN", 0.35);
    let starting_server = match env::var("MATCHPOINT_SERVER")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "b" => Player::B,
        _ => Player::A,
    };
    let ad_scoring = env::var("MATCHPOINT_NO_AD").is_err();
    let seed = env::var("MATCHPOINT_SEED")
        .ok()
        .and_then(|val| val.parse::<u64>().ok());
    let as_json = env::args().any(|arg| arg == "--json");

    let params =
        MatchParams::new(p_serve, p_return, starting_server)?.with_ad_scoring(ad_scoring);

    let mut tennis = TennisMatch::new(params);
    match seed {
        Some(seed) => tennis.play_with(&mut ChaCha8Rng::seed_from_u64(seed)),
        None => tennis.play(),
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(tennis.history())?);
        return Ok(());
    }

    println!(
        "{:>4}  {:^5}  {:^5}  {:^5}  {:^3}  {:>8}  {:>8}  event",
        "pt", "sets", "games", "pts", "srv", "pA match", "delta"
    );
    for entry in tennis.history() {
        println!(
            "{:>4}  {:>2}-{:<2}  {:>2}-{:<2}  {:>2}-{:<2}  {:^3}  {:>7.1}%  {:>+7.1}%  {}",
            entry.point_id,
            entry.a_sets,
            entry.b_sets,
            entry.a_games,
            entry.b_games,
            entry.a_points,
            entry.b_points,
            entry.server,
            entry.forecast.p_a_match * 100.0,
            entry.delta.p_a_match * 100.0,
            entry.message,
        );
    }

    match tennis.winner() {
        Some(winner) => {
            let (a_sets, b_sets) = tennis.final_sets();
            println!();
            println!(
                "{} wins the match {}-{} ({} points)",
                winner.label(),
                a_sets,
                b_sets,
                tennis.history().len()
            );
        }
        None => println!("No result."),
    }

    Ok(())
}
