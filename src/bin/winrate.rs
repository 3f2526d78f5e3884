use std::collections::HashMap;
use std::error::Error;
use std::process;

use clap::{ArgAction, Parser};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use unobot::{Bot, GameError, Lobby, MatchConfig, create_seat_from_spec, is_human_spec, label_for_spec};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(name = "winrate", about = "Run many computer-only rounds and report per-seat win rates.")]
struct Args {
    /// Number of rounds to simulate
    #[arg(short = 'g', long = "games", default_value_t = 200)]
    games: usize,

    /// Base RNG seed (deck and bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on actions per round; rounds exceeding it are aborted
    #[arg(long = "max-turns", default_value_t = 5000)]
    max_turns: usize,

    /// Treat zeros as playable on any card
    #[arg(long = "zero-rule", action = ArgAction::SetTrue)]
    zero_rule: bool,

    /// Seat specs: e.g. computer random (2-4 total)
    seats: Vec<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.seats.len() < 2 || args.seats.len() > 4 {
        return Err(format!(
            "expected between 2 and 4 seats, received {}",
            args.seats.len()
        )
        .into());
    }
    // A human seat would block waiting for input.
    if args.seats.iter().any(|spec| is_human_spec(spec)) {
        return Err("human players are not supported in winrate runs".into());
    }

    let config = MatchConfig {
        zero_rule: args.zero_rule,
        ..MatchConfig::default()
    };
    let labels_for_spec: Vec<String> = args.seats.iter().map(|s| label_for_spec(s)).collect();
    let mut wins_per_label: HashMap<String, usize> = HashMap::new();
    let mut seats_per_label: HashMap<String, usize> = HashMap::new();
    let mut points_per_label: HashMap<String, u64> = HashMap::new();
    let mut aborted_games = 0usize;

    for game_idx in 0..args.games {
        // Permute seating each round for fairness.
        let mut indices: Vec<usize> = (0..args.seats.len()).collect();
        let mut seat_rng = StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9 ^ (game_idx as u64));
        indices.shuffle(&mut seat_rng);

        let mut lobby = Lobby::new(config);
        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(indices.len());
        let mut labels: Vec<String> = Vec::with_capacity(indices.len());
        for (seat, &src_idx) in indices.iter().enumerate() {
            let bot_seed = mix_seed(args.seed, game_idx as u64, seat as u64);
            let (participant, bot) =
                create_seat_from_spec(&args.seats[src_idx], seat, bot_seed, &lobby)?;
            lobby.add(participant)?;
            bots.push(bot);
            labels.push(labels_for_spec[src_idx].clone());
        }
        for label in &labels {
            *seats_per_label.entry(label.clone()).or_default() += 1;
        }

        let mut game = lobby.start_match(mix_seed(args.seed, game_idx as u64, 0x5EED_15))?;
        let mut turns = 0usize;
        while !game.is_finished() {
            if turns >= args.max_turns {
                game.abort();
                break;
            }
            let seat = game.current_seat();
            let state = game.state_view(seat)?;
            let legal = game.legal_actions(seat)?;
            if legal.is_empty() {
                return Err(GameError::InvalidConfiguration("no legal actions available").into());
            }
            let action = bots[seat].select_action(&state, &legal);
            game.apply_action(seat, action)?;
            turns += 1;
        }

        let settlement = lobby.finish_match(game)?;
        match settlement.winner {
            Some(winner) => {
                let label = labels[winner].clone();
                *wins_per_label.entry(label.clone()).or_default() += 1;
                *points_per_label.entry(label).or_default() += settlement.points;
            }
            None => aborted_games += 1,
        }
        info!("round {game_idx} finished after {turns} actions");
    }

    let mut results: Vec<(String, f64, usize, usize)> = seats_per_label
        .iter()
        .map(|(label, &seats)| {
            let wins = wins_per_label.get(label).copied().unwrap_or(0);
            let rate = if seats > 0 {
                wins as f64 / seats as f64
            } else {
                0.0
            };
            (label.clone(), rate, wins, seats)
        })
        .collect();
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    println!("Win rates (per-seat) with scoring:");
    for (label, rate, wins, seats) in &results {
        let total_points = points_per_label.get(label).copied().unwrap_or(0);
        let avg_points = if *seats > 0 {
            total_points as f64 / *seats as f64
        } else {
            0.0
        };
        println!(
            "  {label:<12}  {wins}/{seats}  ({:.2}%)   avg pts: {:>7.2}   total pts: {}",
            rate * 100.0,
            avg_points,
            total_points
        );
    }
    if aborted_games > 0 {
        println!("\nNote: {aborted_games} round(s) hit the turn cap without a winner.");
    }
    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
