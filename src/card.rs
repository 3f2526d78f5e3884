use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const FULL_DECK_SIZE: usize = 108;
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const WILD_COPIES: usize = 4;
pub const MAX_NUMBER: u8 = 9;

pub const ACTION_POINTS: u32 = 20;
pub const WILD_POINTS: u32 = 50;

/// Card color. `Wild` is the color of an unresolved wild-family card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// Colors a wild card may be changed to, in tie-break order.
    pub const PLAYABLE: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Yellow => 1,
            Color::Green => 2,
            Color::Blue => 3,
            Color::Wild => 4,
        }
    }

    /// Parses the initial used by the color prompt (`r`, `y`, `g`, `b`).
    pub fn from_initial(input: &str) -> Option<Color> {
        match input.trim().chars().next()?.to_ascii_lowercase() {
            'r' => Some(Color::Red),
            'y' => Some(Color::Yellow),
            'g' => Some(Color::Green),
            'b' => Some(Color::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Wild => "wild",
        };
        f.write_str(name)
    }
}

/// Face value printed on a card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// Numeral between 0 and 9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Face {
    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Face::Wild | Face::WildDrawFour)
    }

    pub fn points(self) -> u32 {
        match self {
            Face::Number(n) => u32::from(n),
            Face::Skip | Face::Reverse | Face::DrawTwo => ACTION_POINTS,
            Face::Wild | Face::WildDrawFour => WILD_POINTS,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Number(n) => write!(f, "{n}"),
            Face::Skip => f.write_str("X"),
            Face::Reverse => f.write_str("R"),
            Face::DrawTwo => f.write_str("+2"),
            Face::Wild => f.write_str("W"),
            Face::WildDrawFour => f.write_str("+4"),
        }
    }
}

/// A single card. Only the color of a wild-family card ever changes after construction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardFields")]
pub struct Card {
    color: Color,
    face: Face,
}

/// Wire shape of a [`Card`], checked before it becomes one.
#[derive(Deserialize)]
struct CardFields {
    color: Color,
    face: Face,
}

impl TryFrom<CardFields> for Card {
    type Error = GameError;

    /// Same checks as [`Card::new`], except that a wild may carry the color chosen for it.
    fn try_from(fields: CardFields) -> Result<Self, GameError> {
        let mut card = Card::new(
            if fields.face.is_wild() { Color::Wild } else { fields.color },
            fields.face,
        )?;
        if card.is_wild() {
            card.change_color(fields.color)?;
        }
        Ok(card)
    }
}

impl Card {
    /// Builds a card, rejecting numerals above nine and color/face pairs that
    /// cannot exist in the deck (a colored wild or a wild-colored numeral).
    pub fn new(color: Color, face: Face) -> Result<Self, GameError> {
        let valid = match face {
            Face::Number(n) => n <= MAX_NUMBER && color != Color::Wild,
            Face::Skip | Face::Reverse | Face::DrawTwo => color != Color::Wild,
            Face::Wild | Face::WildDrawFour => color == Color::Wild,
        };
        if !valid {
            return Err(GameError::InvalidCard { color, face });
        }
        Ok(Self { color, face })
    }

    /// Shorthand for a colored numeral, for building fixed decks.
    pub fn number(color: Color, n: u8) -> Result<Self, GameError> {
        Self::new(color, Face::Number(n))
    }

    pub fn wild() -> Self {
        Self { color: Color::Wild, face: Face::Wild }
    }

    pub fn wild_draw_four() -> Self {
        Self { color: Color::Wild, face: Face::WildDrawFour }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn face(&self) -> Face {
        self.face
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.face.points()
    }

    /// True for wild and wild-draw-four, even after a color was chosen.
    #[inline]
    pub fn is_wild(&self) -> bool {
        self.face.is_wild()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.face == Face::Number(0)
    }

    /// Assigns the chosen color to a wild-family card.
    pub fn change_color(&mut self, color: Color) -> Result<(), GameError> {
        if !self.is_wild() {
            return Err(GameError::NotWild(*self));
        }
        self.color = color;
        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wild() && self.color == Color::Wild {
            write!(f, "{}", self.face)
        } else {
            write!(f, "{} {}", self.color, self.face)
        }
    }
}

/// Builds the canonical 108-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(FULL_DECK_SIZE);
    for color in Color::PLAYABLE {
        deck.push(Card { color, face: Face::Number(0) });
        for n in 1..=MAX_NUMBER {
            deck.extend([Card { color, face: Face::Number(n) }; 2]);
        }
        for face in [Face::Skip, Face::Reverse, Face::DrawTwo] {
            deck.extend([Card { color, face }; 2]);
        }
    }
    deck.extend(std::iter::repeat(Card::wild_draw_four()).take(WILD_COPIES));
    deck.extend(std::iter::repeat(Card::wild()).take(WILD_COPIES));
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_multiplicities() {
        let deck = full_deck();
        assert_eq!(deck.len(), FULL_DECK_SIZE);
        let count = |pred: &dyn Fn(&Card) -> bool| deck.iter().filter(|c| pred(c)).count();
        for color in Color::PLAYABLE {
            assert_eq!(count(&|c| c.color() == color && c.is_zero()), 1);
            for n in 1..=9 {
                assert_eq!(count(&|c| c.color() == color && c.face() == Face::Number(n)), 2);
            }
            for face in [Face::Skip, Face::Reverse, Face::DrawTwo] {
                assert_eq!(count(&|c| c.color() == color && c.face() == face), 2);
            }
        }
        assert_eq!(count(&|c| c.face() == Face::Wild), 4);
        assert_eq!(count(&|c| c.face() == Face::WildDrawFour), 4);
    }

    #[test]
    fn point_table() -> Result<(), GameError> {
        assert_eq!(Card::number(Color::Red, 0)?.points(), 0);
        assert_eq!(Card::number(Color::Blue, 7)?.points(), 7);
        assert_eq!(Card::new(Color::Green, Face::DrawTwo)?.points(), 20);
        assert_eq!(Card::new(Color::Yellow, Face::Reverse)?.points(), 20);
        assert_eq!(Card::wild().points(), 50);
        assert_eq!(Card::wild_draw_four().points(), 50);
        Ok(())
    }

    #[test]
    fn rejects_impossible_cards() {
        assert!(matches!(
            Card::number(Color::Red, 10),
            Err(GameError::InvalidCard { .. })
        ));
        assert!(Card::new(Color::Red, Face::Wild).is_err());
        assert!(Card::new(Color::Wild, Face::Skip).is_err());
    }

    #[test]
    fn loading_checks_the_color_face_pair() {
        let load = |color, face| Card::try_from(CardFields { color, face });
        assert!(load(Color::Wild, Face::Number(3)).is_err());
        assert!(load(Color::Blue, Face::Number(12)).is_err());
        assert!(load(Color::Wild, Face::DrawTwo).is_err());
        assert_eq!(load(Color::Red, Face::Skip).ok(), Card::new(Color::Red, Face::Skip).ok());
        // A wild keeps the color chosen for it.
        let chosen = load(Color::Green, Face::WildDrawFour).ok();
        assert_eq!(chosen.map(|c| (c.color(), c.face())), Some((Color::Green, Face::WildDrawFour)));
    }

    #[test]
    fn change_color_only_on_wild_family() -> Result<(), GameError> {
        let mut wild = Card::wild_draw_four();
        wild.change_color(Color::Blue)?;
        assert_eq!(wild.color(), Color::Blue);
        assert!(wild.is_wild());
        let mut seven = Card::number(Color::Red, 7)?;
        assert!(matches!(seven.change_color(Color::Blue), Err(GameError::NotWild(_))));
        assert_eq!(seven.color(), Color::Red);
        Ok(())
    }

    #[test]
    fn color_initials() {
        assert_eq!(Color::from_initial("b"), Some(Color::Blue));
        assert_eq!(Color::from_initial(" Red"), Some(Color::Red));
        assert_eq!(Color::from_initial("w"), None);
        assert_eq!(Color::from_initial(""), None);
    }
}
