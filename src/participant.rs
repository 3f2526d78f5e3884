use serde::{Deserialize, Serialize};

use crate::action::SeatId;
use crate::card::{Card, Color, Face};
use crate::error::GameError;
use crate::hand::{Hand, Legality};

/// Whether a seat waits for external input or computes its own actions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ParticipantKind {
    Human,
    Computer,
}

impl ParticipantKind {
    pub fn requires_input(self) -> bool {
        matches!(self, ParticipantKind::Human)
    }
}

/// How a card reached the hand.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DrawKind {
    Voluntary,
    /// Discharged one owed forced draw.
    Forced,
}

/// Running count of in-hand cards per color (wild included), indexed by [`Color::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTally {
    counts: [u32; 5],
}

impl ColorTally {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut tally = Self::default();
        for card in cards {
            tally.add(card.color());
        }
        tally
    }

    pub fn add(&mut self, color: Color) {
        self.counts[color.index()] += 1;
    }

    pub fn remove(&mut self, color: Color) {
        let slot = &mut self.counts[color.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn get(&self, color: Color) -> u32 {
        self.counts[color.index()]
    }

    /// Highest-count non-wild color among `candidates`.
    /// Ties go to the earlier color in [`Color::PLAYABLE`].
    pub fn best_among(&self, candidates: impl IntoIterator<Item = Color>) -> Option<Color> {
        let mut present = [false; 4];
        for color in candidates {
            if color != Color::Wild {
                present[color.index()] = true;
            }
        }
        let mut best: Option<(Color, u32)> = None;
        for color in Color::PLAYABLE {
            if !present[color.index()] {
                continue;
            }
            let count = self.get(color);
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((color, count));
            }
        }
        best.map(|(color, _)| color)
    }

    /// Most-held non-wild color, or `None` while no colored card is held.
    pub fn most_held(&self) -> Option<Color> {
        self.best_among(Color::PLAYABLE)
            .filter(|color| self.get(*color) > 0)
    }

    pub fn clear(&mut self) {
        self.counts = [0; 5];
    }
}

/// A seat's hand plus the turn bookkeeping the engine needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: SeatId,
    name: String,
    kind: ParticipantKind,
    hand: Hand,
    drew: bool,
    drew_forced: bool,
    forced_draws: u32,
    points: u64,
    tally: Option<ColorTally>,
}

impl Participant {
    pub fn new(name: impl Into<String>, kind: ParticipantKind) -> Self {
        Self {
            id: 0,
            name: name.into(),
            kind,
            hand: Hand::new(),
            drew: false,
            drew_forced: false,
            forced_draws: 0,
            points: 0,
            tally: matches!(kind, ParticipantKind::Computer).then(ColorTally::default),
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self::new(name, ParticipantKind::Human)
    }

    pub fn computer(name: impl Into<String>) -> Self {
        Self::new(name, ParticipantKind::Computer)
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: SeatId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    /// Color tally, kept only for computer seats.
    pub fn tally(&self) -> Option<&ColorTally> {
        self.tally.as_ref()
    }

    pub fn forced_draws(&self) -> u32 {
        self.forced_draws
    }

    /// Drew by choice during the current or most recent turn.
    pub fn drew(&self) -> bool {
        self.drew
    }

    /// Discharged at least one forced draw during the current or most recent turn.
    pub fn drew_forced(&self) -> bool {
        self.drew_forced
    }

    /// Takes a card into the hand. While forced draws are owed, the card
    /// discharges one of them instead of counting as a voluntary draw.
    pub fn add_card(&mut self, card: Card) -> DrawKind {
        let kind = if self.forced_draws > 0 {
            self.forced_draws -= 1;
            self.drew_forced = true;
            DrawKind::Forced
        } else {
            self.drew = true;
            DrawKind::Voluntary
        };
        if let Some(tally) = self.tally.as_mut() {
            tally.add(card.color());
        }
        self.hand.add(card);
        kind
    }

    pub fn remove_card(&mut self, index: usize) -> Result<Card, GameError> {
        let card = self.hand.remove(index)?;
        if let Some(tally) = self.tally.as_mut() {
            tally.remove(card.color());
        }
        Ok(card)
    }

    pub fn begin_turn(&mut self) {
        self.drew = false;
        self.drew_forced = false;
    }

    pub fn clear_draw_flags(&mut self) {
        self.begin_turn();
    }

    pub fn add_forced_draws(&mut self, amount: u32) {
        self.forced_draws += amount;
    }

    pub fn clear_forced_draws(&mut self) {
        self.forced_draws = 0;
    }

    pub fn add_points(&mut self, amount: u64) {
        self.points = self.points.saturating_add(amount);
    }

    pub fn legality(&self, active_color: Color, active_face: Face, zero_rule: bool) -> Legality {
        self.hand.legality(active_color, active_face, zero_rule)
    }

    /// Empties the hand and returns the cards in hand order.
    pub fn discard_hand(&mut self) -> Vec<Card> {
        if let Some(tally) = self.tally.as_mut() {
            tally.clear();
        }
        self.hand.take_all()
    }

    /// Clears all per-round state, keeping identity and score.
    pub(crate) fn reset_for_round(&mut self) {
        self.begin_turn();
        self.forced_draws = 0;
        self.discard_hand();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(n: u8) -> Card {
        Card::number(Color::Red, n).expect("valid card")
    }

    #[test]
    fn forced_draws_are_not_voluntary() {
        let mut p = Participant::human("Ann");
        p.add_forced_draws(2);
        assert_eq!(p.add_card(red(1)), DrawKind::Forced);
        assert_eq!(p.add_card(red(2)), DrawKind::Forced);
        assert!(!p.drew());
        assert!(p.drew_forced());
        assert_eq!(p.forced_draws(), 0);
        assert_eq!(p.add_card(red(3)), DrawKind::Voluntary);
        assert!(p.drew());
        p.begin_turn();
        assert!(!p.drew() && !p.drew_forced());
    }

    #[test]
    fn computer_tally_follows_hand() -> Result<(), GameError> {
        let mut p = Participant::computer("Hal");
        p.add_card(red(1));
        p.add_card(red(2));
        p.add_card(Card::wild());
        let tally = p.tally().copied().unwrap_or_default();
        assert_eq!(tally.get(Color::Red), 2);
        assert_eq!(tally.get(Color::Wild), 1);
        p.remove_card(0)?;
        assert_eq!(p.tally().map(|t| t.get(Color::Red)), Some(1));
        assert!(Participant::human("Bo").tally().is_none());
        Ok(())
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut p = Participant::human("Ann");
        assert!(p.remove_card(0).is_err());
    }

    #[test]
    fn best_color_ties_follow_fixed_order() -> Result<(), GameError> {
        let tally = ColorTally::from_cards(&[
            Card::number(Color::Blue, 1)?,
            Card::number(Color::Green, 1)?,
            Card::wild(),
            Card::wild(),
        ]);
        assert_eq!(tally.best_among([Color::Blue, Color::Green]), Some(Color::Green));
        assert_eq!(tally.best_among([Color::Blue]), Some(Color::Blue));
        assert_eq!(tally.best_among([Color::Wild]), None);
        assert_eq!(tally.most_held(), Some(Color::Green));
        assert_eq!(ColorTally::from_cards(&[Card::wild()]).most_held(), None);
        Ok(())
    }

    #[test]
    fn points_saturate() {
        let mut p = Participant::human("Ann");
        p.add_points(u64::MAX - 1);
        p.add_points(10);
        assert_eq!(p.points(), u64::MAX);
    }
}
