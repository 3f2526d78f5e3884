//! Round settlement.
//!
//! The winner is credited with the point value of every card left in the
//! other hands (numerals at face value, skip/reverse/draw-two 20, wilds 50).
//! Aborted rounds award nothing.

use serde::{Deserialize, Serialize};

use crate::action::SeatId;
use crate::card::Card;

/// Outcome of settling one round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Option<SeatId>,
    /// Points credited to the winner this round.
    pub points: u64,
    /// Cumulative score per seat after crediting.
    pub scores: Vec<(SeatId, u64)>,
}

/// Sum of the point values of `cards`.
pub fn hand_points<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u64 {
    cards.into_iter().map(|card| u64::from(card.points())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Color, Face};

    #[test]
    fn mixed_hand_points() -> Result<(), crate::GameError> {
        // 7 + 20 + 50 + 0 = 77
        let cards = [
            Card::number(Color::Red, 7)?,
            Card::new(Color::Blue, Face::Skip)?,
            Card::wild_draw_four(),
            Card::number(Color::Green, 0)?,
        ];
        assert_eq!(hand_points(&cards), 77);
        Ok(())
    }

    #[test]
    fn empty_hand_scores_nothing() {
        assert_eq!(hand_points(&Vec::<Card>::new()), 0);
    }
}
