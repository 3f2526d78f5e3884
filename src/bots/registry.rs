use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Bot;
use crate::bots::{ComputerBot, HumanBot, RandomBot};
use crate::lobby::Lobby;
use crate::participant::Participant;

/// Returns a normalized label for a seat spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// True for specs that block on terminal input.
pub fn is_human_spec(spec: &str) -> bool {
    label_for_spec(spec) == "human"
}

fn seat_seed(spec: &str, index: usize, seed: u64) -> u64 {
    spec.split_once(':')
        .and_then(|(_, value)| value.trim().parse::<u64>().ok())
        .unwrap_or(seed ^ ((index as u64 + 1) * 0x9E37_79B9))
}

/// Create a seat from a CLI-style spec, naming computers after the lobby roster.
/// Supported specs:
/// - human[:name]
/// - computer[:seed]
/// - random[:seed]
pub fn create_seat_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
    lobby: &Lobby,
) -> Result<(Participant, Box<dyn Bot>), Box<dyn Error>> {
    match label_for_spec(spec).as_str() {
        "human" => {
            let name = spec
                .split_once(':')
                .map(|(_, name)| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Player {}", index + 1));
            let bot = HumanBot::new(name.clone());
            Ok((Participant::human(name), Box::new(bot)))
        }
        "computer" => {
            let rng = StdRng::seed_from_u64(seat_seed(spec, index, seed));
            Ok((
                Participant::computer(lobby.computer_name()),
                Box::new(ComputerBot::new(rng)),
            ))
        }
        "random" => {
            let rng = StdRng::seed_from_u64(seat_seed(spec, index, seed));
            Ok((
                Participant::computer(format!("Random {}", index + 1)),
                Box::new(RandomBot::new(rng)),
            ))
        }
        _ => Err(format!("unrecognized seat spec: {spec}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::ParticipantKind;

    #[test]
    fn specs_map_to_kinds() -> Result<(), Box<dyn Error>> {
        let lobby = Lobby::default();
        let (computer, _) = create_seat_from_spec("computer:42", 0, 1, &lobby)?;
        assert_eq!(computer.kind(), ParticipantKind::Computer);
        assert_eq!(computer.name(), "Watson");
        let (random, _) = create_seat_from_spec("Random", 1, 1, &lobby)?;
        assert_eq!(random.name(), "Random 2");
        assert!(create_seat_from_spec("oracle", 0, 1, &lobby).is_err());
        assert!(is_human_spec("HUMAN:Ann"));
        assert_eq!(label_for_spec(" Computer:7"), "computer");
        Ok(())
    }
}
