//! Uno-style card game engine: deck, hands, turn rules, a computer opponent and scoring.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod lobby;
pub mod participant;
pub mod score;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, Direction, SeatId};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_seat_from_spec, is_human_spec, label_for_spec};
pub use crate::bots::{ComputerBot, HumanBot, RandomBot};
pub use crate::card::{Card, Color, Face, full_deck};
pub use crate::deck::Deck;
pub use crate::error::{GameError, InvalidAction};
pub use crate::game::{Match, MatchBuilder};
pub use crate::hand::{Hand, Legality};
pub use crate::lobby::Lobby;
pub use crate::participant::{ColorTally, DrawKind, Participant, ParticipantKind};
pub use crate::score::{Settlement, hand_points};
pub use crate::state::{
    ComputerSpeed, MatchConfig, MatchEvent, MatchStatus, MatchView, SeatView, TurnPhase,
};
pub use crate::visualize::{VisualOptions, describe_action, render_state, render_state_with_options};
