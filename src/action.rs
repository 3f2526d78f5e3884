use serde::{Deserialize, Serialize};

use crate::card::Color;

/// Zero-based seat index within a match; stable for the whole round.
pub type SeatId = usize;

/// Action available to a seat during its turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at the given hand index onto the discard pile.
    Play { hand_index: usize },
    /// Draw one card from the draw pile; the seat may act again afterwards.
    Draw,
    /// Give up the turn. Only legal once the draw pile is exhausted and nothing is playable.
    Pass,
    /// Pick the color a just-played wild card stands for.
    ChooseColor(Color),
    /// Quit the match without a winner. Accepted at any point while the match is ongoing.
    Abort,
}

impl Action {
    /// Returns the hand index if the action plays a card.
    pub fn hand_index(&self) -> Option<usize> {
        match self {
            Action::Play { hand_index } => Some(*hand_index),
            _ => None,
        }
    }

    pub fn is_play(&self) -> bool {
        matches!(self, Action::Play { .. })
    }
}

/// Turn order direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Seat that follows `seat` among `seats` in this direction.
    pub fn step(self, seat: SeatId, seats: usize) -> SeatId {
        match self {
            Direction::Clockwise => (seat + 1) % seats,
            Direction::CounterClockwise => (seat + seats - 1) % seats,
        }
    }
}
