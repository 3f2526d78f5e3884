use std::error::Error;
use std::process;
use std::thread;

use clap::{ArgAction, Parser, ValueEnum};
use log::{debug, warn};

use unobot::{
    Bot, ComputerSpeed, Lobby, Match, MatchConfig, MatchEvent, MatchStatus, ParticipantKind,
    VisualOptions, create_seat_from_spec, describe_action, render_state_with_options,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Speed {
    Slow,
    Normal,
    Fast,
}

impl From<Speed> for ComputerSpeed {
    fn from(speed: Speed) -> Self {
        match speed {
            Speed::Slow => ComputerSpeed::Slow,
            Speed::Normal => ComputerSpeed::Normal,
            Speed::Fast => ComputerSpeed::Fast,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "play", about = "Play rounds of Uno on the terminal.")]
struct Args {
    /// Treat zeros as playable on any card
    #[arg(long = "zero-rule", action = ArgAction::SetTrue)]
    zero_rule: bool,

    /// Pause between computer turns
    #[arg(long = "speed", value_enum, default_value = "normal")]
    speed: Speed,

    /// Base RNG seed for shuffles and computer seats
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Rounds to play; points carry over between rounds
    #[arg(short = 'r', long = "rounds", default_value_t = 1)]
    rounds: usize,

    /// Print computer hands when they act
    #[arg(long = "show-computer-hands", action = ArgAction::SetTrue)]
    show_computer_hands: bool,

    /// Abort a round after this many actions
    #[arg(long = "max-turns")]
    max_turns: Option<usize>,

    /// Seat specs: human[:name], computer[:seed], random[:seed] (2-4 total)
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
    let specs = if args.seats.is_empty() {
        vec![String::from("human"), String::from("computer")]
    } else {
        args.seats.clone()
    };

    let config = MatchConfig {
        zero_rule: args.zero_rule,
        computer_speed: args.speed.into(),
        hide_computer_hands: !args.show_computer_hands,
        ..MatchConfig::default()
    };
    let mut lobby = Lobby::new(config);
    let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let (participant, bot) = create_seat_from_spec(spec, index, args.seed, &lobby)?;
        lobby.add(participant)?;
        bots.push(bot);
    }
    if !lobby.can_begin() {
        return Err(format!("expected between 2 and 4 seats, received {}", specs.len()).into());
    }

    for round in 0..args.rounds {
        println!("\n##### Round {} #####", round + 1);
        let seed = args.seed.wrapping_add(round as u64);
        let mut game = lobby.start_match(seed)?;
        let quit = play_round(&mut game, &mut bots, args.max_turns)?;
        let settlement = lobby.finish_match(game)?;

        match settlement.winner {
            Some(winner) => println!(
                "\n{} wins the round and scores {} points!",
                lobby.participants()[winner].name(),
                settlement.points
            ),
            None => println!("\nRound ended without a winner."),
        }
        println!("Scores:");
        for participant in lobby.participants() {
            println!("  {:<12} {}", participant.name(), participant.points());
        }
        if quit {
            break;
        }
    }
    Ok(())
}

/// Runs one round to its end. Returns true when the round was aborted.
fn play_round(
    game: &mut Match,
    bots: &mut [Box<dyn Bot>],
    max_turns: Option<usize>,
) -> Result<bool, Box<dyn Error>> {
    let config = game.config();
    let mut turns = 0usize;
    print_events(game);
    while !game.is_finished() {
        if max_turns.is_some_and(|cap| turns >= cap) {
            warn!("turn cap of {turns} reached, aborting round");
            game.abort();
            break;
        }
        let seat = game.current_seat();
        let kind = game
            .participant(seat)
            .map(|p| p.kind())
            .ok_or("current seat has no participant")?;
        let view = game.state_view(seat)?;
        let legal = game.legal_actions(seat)?;
        if legal.is_empty() {
            break;
        }

        if kind == ParticipantKind::Computer {
            let delay = config.computer_speed.delay();
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            if !config.hide_computer_hands {
                let options = VisualOptions::default();
                println!("{}", render_state_with_options(&view, options));
            }
        }

        let action = bots[seat].select_action(&view, &legal);
        debug!("seat {seat} selects {action:?}");
        if kind == ParticipantKind::Computer {
            println!("{}: {}", view.seats[seat].name, describe_action(&view, &action));
        }
        game.apply_action(seat, action)?;
        turns += 1;
        print_events(game);
    }
    Ok(game.status() == MatchStatus::Aborted)
}

fn print_events(game: &mut Match) {
    let events = game.take_events();
    if !game.config().display_effects {
        return;
    }
    let name = |seat: usize| {
        game.participant(seat)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| format!("seat {seat}"))
    };
    for event in events {
        let line = match event {
            MatchEvent::Dealt { starting_seat, .. } => {
                format!("Cards dealt. {} goes first.", name(starting_seat))
            }
            MatchEvent::OpeningCard { card } => format!("Opening card: {card}"),
            MatchEvent::Skipped { seat } => format!("{} is skipped!", name(seat)),
            MatchEvent::Reversed { .. } => String::from("Turn order reversed!"),
            MatchEvent::ForcedDraw { seat, amount } => {
                format!("{} must draw {amount} cards!", name(seat))
            }
            MatchEvent::ForcedDrawsForgiven { seat } => {
                format!("Deck is empty, {} draws nothing.", name(seat))
            }
            MatchEvent::ColorChosen { seat, color } => {
                format!("{} changes the color to {color}.", name(seat))
            }
            MatchEvent::Passed { seat, .. } => format!("{} passes.", name(seat)),
            MatchEvent::EmergencyWild { color } => {
                format!("Nobody can play. The color is now {color}.")
            }
            MatchEvent::Won { seat } => format!("{} is out of cards!", name(seat)),
            MatchEvent::Aborted => String::from("Round aborted."),
            MatchEvent::Played { .. } | MatchEvent::Drew { .. } | MatchEvent::Settled { .. } => {
                continue;
            }
        };
        println!("{line}");
    }
}
