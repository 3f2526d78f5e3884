use thiserror::Error;

use crate::action::SeatId;
use crate::card::{Card, Color, Face};

/// Errors that can occur when manipulating the match state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("seat {0} is out of range")]
    InvalidPlayer(SeatId),
    #[error("not the specified seat's turn")]
    NotPlayersTurn,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("match is already over")]
    GameOver,
    #[error("match has not reached settlement yet")]
    MatchInProgress,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("no such card: {color} {face}")]
    InvalidCard { color: Color, face: Face },
    #[error("draw pile is empty")]
    EmptyDeck,
    #[error("cannot change the color of {0}, it is not a wild card")]
    NotWild(Card),
    #[error("lobby already holds the maximum number of participants")]
    LobbyFull,
    #[error("no participant at roster position {0}")]
    NoSuchParticipant(usize),
}

/// Details of rejected turn actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("card at hand index {index} does not match the active color or value")]
    CardNotPlayable { index: usize },
    #[error("{0} forced draw(s) must be taken before playing")]
    ForcedDrawsOutstanding(u32),
    #[error("cannot draw, the draw pile is empty")]
    DrawPileEmpty,
    #[error("passing requires an empty draw pile and no playable card")]
    PassNotAllowed,
    #[error("a color must be chosen for the wild card first")]
    ColorRequired,
    #[error("no wild card is waiting for a color")]
    NoColorPending,
    #[error("wild is not a color that can be chosen")]
    WildIsNotAColor,
}
