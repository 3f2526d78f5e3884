use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::{Direction, SeatId};
use crate::card::{Card, Color, Face, HAND_SIZE};
use crate::hand::Legality;
use crate::participant::{ColorTally, ParticipantKind};

/// Pacing for computer turns. Presentation only, no rule effect.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComputerSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl ComputerSpeed {
    pub fn delay(self) -> Duration {
        match self {
            ComputerSpeed::Slow => Duration::from_secs(2),
            ComputerSpeed::Normal => Duration::from_secs(1),
            ComputerSpeed::Fast => Duration::ZERO,
        }
    }

    /// Next setting in the slow -> normal -> fast -> slow cycle.
    pub fn cycled(self) -> Self {
        match self {
            ComputerSpeed::Slow => ComputerSpeed::Normal,
            ComputerSpeed::Normal => ComputerSpeed::Fast,
            ComputerSpeed::Fast => ComputerSpeed::Slow,
        }
    }
}

/// Settings carried into a match.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Zeros become playable on anything (hand-swap house rule; the swap itself is not applied).
    pub zero_rule: bool,
    pub computer_speed: ComputerSpeed,
    pub hide_computer_hands: bool,
    pub display_effects: bool,
    pub hand_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            zero_rule: false,
            computer_speed: ComputerSpeed::default(),
            hide_computer_hands: true,
            display_effects: true,
            hand_size: HAND_SIZE,
        }
    }
}

/// Status of the whole match.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStatus {
    Ongoing,
    Won { winner: SeatId },
    Aborted,
}

/// Phase of the active turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingAction,
    /// A wild card sits on the discard pile and its player must name a color.
    ChoosingColor,
    Settling,
    Done,
}

/// Rule transitions, in the order they happened.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchEvent {
    Dealt { hand_size: usize, starting_seat: SeatId },
    OpeningCard { card: Card },
    Played { seat: SeatId, card: Card },
    Drew { seat: SeatId, forced: bool },
    Skipped { seat: SeatId },
    Reversed { direction: Direction },
    ForcedDraw { seat: SeatId, amount: u32 },
    ForcedDrawsForgiven { seat: SeatId },
    ColorChosen { seat: SeatId, color: Color },
    Passed { seat: SeatId, passes: usize },
    EmergencyWild { color: Color },
    Won { seat: SeatId },
    Aborted,
    Settled { winner: Option<SeatId>, points: u64 },
}

/// Public portion of a seat that every participant may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub id: SeatId,
    pub name: String,
    pub kind: ParticipantKind,
    pub card_count: usize,
    pub points: u64,
    pub forced_draws: u32,
    pub drew: bool,
    pub drew_forced: bool,
    pub is_current: bool,
}

/// Match snapshot from one seat's perspective, for bots and renderers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchView {
    pub config: MatchConfig,
    pub phase: TurnPhase,
    pub status: MatchStatus,
    pub self_seat: SeatId,
    pub current_seat: SeatId,
    pub previous_seat: SeatId,
    pub next_seat: SeatId,
    pub direction: Direction,
    pub active_color: Color,
    pub active_face: Face,
    pub discard_top: Option<Card>,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
    pub pending_draw: u32,
    pub passes: usize,
    pub seats: Vec<SeatView>,
    pub hand: Vec<Card>,
    /// Buckets for `hand` against the active color and value.
    pub legality: Legality,
    pub tally: Option<ColorTally>,
}

impl MatchView {
    pub fn self_view(&self) -> Option<&SeatView> {
        self.seats.iter().find(|seat| seat.id == self.self_seat)
    }

    /// Two seats left: the previous and next seat coincide.
    pub fn heads_up(&self) -> bool {
        self.previous_seat == self.next_seat
    }

    /// Cards across every pile and hand.
    pub fn total_cards(&self) -> usize {
        self.draw_pile_count
            + self.discard_pile_count
            + self.seats.iter().map(|seat| seat.card_count).sum::<usize>()
    }
}
