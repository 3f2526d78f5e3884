use serde::{Deserialize, Serialize};

use crate::card::{Card, Color, Face};
use crate::error::{GameError, InvalidAction};

/// Cards held by one participant, in the order they were received.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, index: usize) -> Result<Card, GameError> {
        if index >= self.cards.len() {
            return Err(InvalidAction::HandIndex(index).into());
        }
        Ok(self.cards.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Empties the hand, handing the cards back in hand order.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub fn legality(&self, active_color: Color, active_face: Face, zero_rule: bool) -> Legality {
        Legality::compute(&self.cards, active_color, active_face, zero_rule)
    }
}

/// Partition of a hand into playable buckets for the current discard top.
///
/// Buckets hold hand indices. `legal`, `wild` and `zero` are disjoint;
/// `color_change` is the subset of `legal` whose color differs from the active color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legality {
    pub legal: Vec<usize>,
    pub wild: Vec<usize>,
    pub color_change: Vec<usize>,
    pub zero: Vec<usize>,
    pub can_skip: bool,
    pub can_reverse: bool,
    pub can_draw_two: bool,
    pub can_draw_four: bool,
    pub can_change_color: bool,
}

impl Legality {
    /// Recomputes the buckets from scratch. Pure in its inputs.
    ///
    /// Wild-draw-four only joins the `wild` bucket when nothing in `legal`
    /// can be played. With the zero rule on, zeros are set apart in `zero`
    /// whatever their color.
    pub fn compute(cards: &[Card], active_color: Color, active_face: Face, zero_rule: bool) -> Self {
        let mut out = Self::default();
        let mut draw_fours = Vec::new();
        for (index, card) in cards.iter().enumerate() {
            if card.is_wild() {
                if card.face() == Face::WildDrawFour {
                    draw_fours.push(index);
                } else {
                    out.wild.push(index);
                }
            } else if zero_rule && card.is_zero() {
                out.zero.push(index);
            } else if card.color() == active_color || card.face() == active_face {
                if card.color() != active_color {
                    out.can_change_color = true;
                    out.color_change.push(index);
                }
                match card.face() {
                    Face::DrawTwo => out.can_draw_two = true,
                    Face::Reverse => out.can_reverse = true,
                    Face::Skip => out.can_skip = true,
                    _ => {}
                }
                out.legal.push(index);
            }
        }
        if out.legal.is_empty() && !draw_fours.is_empty() {
            out.can_draw_four = true;
            out.wild.extend(draw_fours);
        }
        out
    }

    pub fn has_legal_card(&self) -> bool {
        !self.legal.is_empty()
    }

    /// Every playable hand index: legal, then wild, then zero.
    pub fn all_valid(&self) -> Vec<usize> {
        self.legal
            .iter()
            .chain(&self.wild)
            .chain(&self.zero)
            .copied()
            .collect()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.legal.contains(&index) || self.wild.contains(&index) || self.zero.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.legal.is_empty() && self.wild.is_empty() && self.zero.is_empty()
    }
}
