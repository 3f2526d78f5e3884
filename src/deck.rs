use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::card::{Card, full_deck};
use crate::error::GameError;

/// Ordered pile of cards, used both as the draw pile and the discard pile.
///
/// The draw pile draws from the end of the sequence; the discard pile receives
/// plays at the front, so index 0 is always the active top card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shuffled copy of the full 108-card deck.
    pub fn populated<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.populate(rng);
        deck
    }

    /// Deck holding exactly `cards`; the last element is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.extend(full_deck());
        self.shuffle(rng);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes and returns the card drawn next.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    /// Puts a card on top of a discard pile.
    pub fn insert(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    /// Slides a card under the pile, away from the top.
    pub fn tuck(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn top_mut(&mut self) -> Option<&mut Card> {
        self.cards.first_mut()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
