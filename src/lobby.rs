use log::{info, warn};

use crate::card::{MAX_PLAYERS, MIN_PLAYERS};
use crate::error::GameError;
use crate::game::{Match, MatchBuilder};
use crate::participant::Participant;
use crate::score::Settlement;
use crate::state::MatchConfig;

pub const COMPUTER_NAMES: [&str; MAX_PLAYERS] = ["Watson", "SkyNet", "Hal", "Metal Gear"];

/// Roster and settings kept between rounds.
#[derive(Clone, Debug, Default)]
pub struct Lobby {
    staging: Vec<Participant>,
    config: MatchConfig,
}

impl Lobby {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            staging: Vec::with_capacity(MAX_PLAYERS),
            config,
        }
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    pub fn config_mut(&mut self) -> &mut MatchConfig {
        &mut self.config
    }

    pub fn participants(&self) -> &[Participant] {
        &self.staging
    }

    pub fn len(&self) -> usize {
        self.staging.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staging.is_empty()
    }

    pub fn can_add(&self) -> bool {
        self.staging.len() < MAX_PLAYERS
    }

    pub fn can_remove(&self) -> bool {
        !self.staging.is_empty()
    }

    pub fn can_begin(&self) -> bool {
        self.staging.len() >= MIN_PLAYERS
    }

    pub fn add(&mut self, participant: Participant) -> Result<(), GameError> {
        if !self.can_add() {
            return Err(GameError::LobbyFull);
        }
        self.staging.push(participant);
        Ok(())
    }

    pub fn add_human(&mut self, name: impl Into<String>) -> Result<(), GameError> {
        self.add(Participant::human(name))
    }

    /// Adds a computer seat under the next free name.
    pub fn add_computer(&mut self) -> Result<(), GameError> {
        let name = self.computer_name();
        self.add(Participant::computer(name))
    }

    /// Removes the participant at 1-based roster `position`.
    pub fn remove(&mut self, position: usize) -> Result<Participant, GameError> {
        if position == 0 || position > self.staging.len() {
            return Err(GameError::NoSuchParticipant(position));
        }
        Ok(self.staging.remove(position - 1))
    }

    pub fn clear(&mut self) {
        self.staging.clear();
    }

    pub fn cycle_computer_speed(&mut self) {
        self.config.computer_speed = self.config.computer_speed.cycled();
    }

    /// First name from [`COMPUTER_NAMES`] not in use, starting at the roster size.
    pub fn computer_name(&self) -> String {
        let taken = |name: &str| self.staging.iter().any(|p| p.name() == name);
        let start = self.staging.len() % COMPUTER_NAMES.len();
        (0..COMPUTER_NAMES.len())
            .map(|offset| COMPUTER_NAMES[(start + offset) % COMPUTER_NAMES.len()])
            .find(|name| !taken(name))
            .unwrap_or(COMPUTER_NAMES[start])
            .to_string()
    }

    /// Builder over a copy of the roster; seat ids follow roster order.
    pub fn match_builder(&self) -> Result<MatchBuilder, GameError> {
        if !self.can_begin() {
            return Err(GameError::InvalidConfiguration(
                "two participants are required to begin",
            ));
        }
        Ok(MatchBuilder::new(self.staging.clone())?.with_config(self.config))
    }

    /// Deals a new round. The roster moves into the match only once it is built.
    pub fn start_match(&mut self, seed: u64) -> Result<Match, GameError> {
        let game = self.match_builder()?.with_seed(seed).build()?;
        self.staging.clear();
        Ok(game)
    }

    /// Settles a finished match and puts its participants back on the roster.
    ///
    /// A round that cannot be settled yet is dropped: its participants return
    /// with empty hands and their scores untouched, and the error is passed on.
    pub fn finish_match(&mut self, mut game: Match) -> Result<Settlement, GameError> {
        let settled = game.settle();
        self.staging = game.into_participants();
        match settled {
            Ok(settlement) => {
                info!(
                    "round settled: winner {:?}, {} points",
                    settlement.winner, settlement.points
                );
                Ok(settlement)
            }
            Err(err) => {
                for participant in &mut self.staging {
                    participant.reset_for_round();
                }
                warn!("round dropped without settlement: {err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::bots::ComputerBot;

    #[test]
    fn computer_names_skip_taken_ones() -> Result<(), GameError> {
        let mut lobby = Lobby::default();
        lobby.add_computer()?;
        assert_eq!(lobby.participants()[0].name(), "Watson");
        lobby.add_human("SkyNet")?;
        lobby.add_computer()?;
        assert_eq!(lobby.participants()[2].name(), "Hal");
        lobby.remove(1)?;
        // Two seated, start at index 2 ("Hal") which is taken, so move on.
        assert_eq!(lobby.computer_name(), "Metal Gear");
        Ok(())
    }

    #[test]
    fn roster_limits() -> Result<(), GameError> {
        let mut lobby = Lobby::default();
        assert!(!lobby.can_begin());
        assert!(lobby.match_builder().is_err());
        for _ in 0..MAX_PLAYERS {
            lobby.add_computer()?;
        }
        assert!(!lobby.can_add());
        assert!(matches!(lobby.add_human("Eve"), Err(GameError::LobbyFull)));
        assert!(matches!(lobby.remove(0), Err(GameError::NoSuchParticipant(0))));
        assert!(matches!(lobby.remove(5), Err(GameError::NoSuchParticipant(5))));
        Ok(())
    }

    fn play_out(game: &mut Match, seed: u64) -> Result<(), GameError> {
        let mut bots: Vec<ComputerBot<StdRng>> = (0..game.seat_count() as u64)
            .map(|i| ComputerBot::new(StdRng::seed_from_u64(seed + i)))
            .collect();
        let mut turns = 0;
        while !game.is_finished() && turns < 5000 {
            let seat = game.current_seat();
            game.step(&mut bots[seat])?;
            turns += 1;
        }
        game.abort();
        Ok(())
    }

    fn scores(lobby: &Lobby) -> Vec<u64> {
        lobby.participants().iter().map(|p| p.points()).collect()
    }

    #[test]
    fn scores_carry_between_rounds() -> Result<(), GameError> {
        let mut lobby = Lobby::default();
        lobby.add_computer()?;
        lobby.add_computer()?;
        lobby.add_computer()?;
        let names = ["Watson", "SkyNet", "Hal"];

        let mut totals = vec![0u64; 3];
        for round in 0..2u64 {
            let mut game = lobby.start_match(round + 11)?;
            assert!(lobby.is_empty());
            play_out(&mut game, round * 7)?;
            let settlement = lobby.finish_match(game)?;
            if let Some(winner) = settlement.winner {
                totals[winner] += settlement.points;
            }
            assert_eq!(scores(&lobby), totals);
            let roster: Vec<&str> = lobby.participants().iter().map(|p| p.name()).collect();
            assert_eq!(roster, names);
            assert!(lobby.participants().iter().all(|p| p.hand().is_empty()));
        }

        // An aborted round awards nothing.
        let mut game = lobby.start_match(99)?;
        game.abort();
        let settlement = lobby.finish_match(game)?;
        assert_eq!(settlement.winner, None);
        assert_eq!(scores(&lobby), totals);
        Ok(())
    }

    #[test]
    fn failed_start_keeps_the_roster() -> Result<(), GameError> {
        let mut lobby = Lobby::default();
        lobby.add_human("Ann")?;
        lobby.add_computer()?;
        lobby.config_mut().hand_size = 0;
        assert!(matches!(
            lobby.start_match(1),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert_eq!(lobby.len(), 2);
        Ok(())
    }

    #[test]
    fn unsettled_round_returns_participants() -> Result<(), GameError> {
        let mut lobby = Lobby::default();
        lobby.add_computer()?;
        lobby.add_computer()?;
        let mut game = lobby.start_match(3)?;
        play_out(&mut game, 3)?;
        lobby.finish_match(game)?;
        let before = scores(&lobby);

        let game = lobby.start_match(4)?;
        assert!(matches!(
            lobby.finish_match(game),
            Err(GameError::MatchInProgress)
        ));
        assert_eq!(lobby.len(), 2);
        assert_eq!(scores(&lobby), before);
        assert!(lobby.participants().iter().all(|p| p.hand().is_empty()));
        Ok(())
    }

    #[test]
    fn speed_cycles() {
        let mut lobby = Lobby::default();
        let before = lobby.config().computer_speed;
        lobby.cycle_computer_speed();
        assert_ne!(lobby.config().computer_speed, before);
    }
}
