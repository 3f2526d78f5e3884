use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::card::{Color, Face};
use crate::participant::ColorTally;
use crate::state::{MatchView, TurnPhase};

/// Rule-based computer opponent.
///
/// In plain English:
/// - Draw when nothing but a zero can be played.
/// - With no matching card, lay a zero of the best color (zero rule), else a
///   draw-four, else any wild.
/// - Heads-up, shed a skip or reverse first so the opponent loses a turn.
/// - If the previous seat had to take forced draws, bounce play back to them
///   with a reverse in the active color.
/// - Switch color with a value match only when it moves play to a color we
///   hold more of, or when nothing in the active color is left.
/// - Otherwise play a random card that keeps the color.
///
/// Wild colors go to the most-held color, or a random one with no colored cards.
pub struct ComputerBot<R: Rng> {
    rng: R,
}

impl<R: Rng> ComputerBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Hand index to play, or `None` to draw.
    pub fn choose_card(&mut self, state: &MatchView) -> Option<usize> {
        let legality = &state.legality;
        let hand = &state.hand;
        let tally = Self::tally(state);
        let color_of = |index: usize| hand.get(index).map(|card| card.color());
        let face_of = |index: usize| hand.get(index).map(|card| card.face());

        if legality.legal.is_empty() && legality.wild.is_empty() {
            return None;
        }

        if legality.legal.is_empty() {
            if state.config.zero_rule && !legality.zero.is_empty() {
                let best = tally.best_among(legality.zero.iter().filter_map(|&i| color_of(i)));
                return legality
                    .zero
                    .iter()
                    .copied()
                    .find(|&i| color_of(i) == best)
                    .or_else(|| legality.zero.first().copied());
            }
            if legality.can_draw_four {
                if let Some(index) = legality
                    .wild
                    .iter()
                    .copied()
                    .find(|&i| face_of(i) == Some(Face::WildDrawFour))
                {
                    return Some(index);
                }
            }
            return legality.wild.choose(&mut self.rng).copied();
        }

        // Heads-up a reverse is just another skip.
        if state.heads_up() {
            if let Some(index) = legality
                .legal
                .iter()
                .copied()
                .find(|&i| matches!(face_of(i), Some(Face::Skip | Face::Reverse)))
            {
                return Some(index);
            }
        } else if legality.can_reverse && Self::previous_was_forced(state) {
            if let Some(index) = legality.legal.iter().copied().rev().find(|&i| {
                face_of(i) == Some(Face::Reverse) && color_of(i) == Some(state.active_color)
            }) {
                return Some(index);
            }
        }

        if !legality.color_change.is_empty() {
            let best = tally.best_among(legality.color_change.iter().filter_map(|&i| color_of(i)));
            if let Some(best) = best {
                let better = tally.get(best) > tally.get(state.active_color);
                if better || legality.color_change.len() == legality.legal.len() {
                    return legality
                        .color_change
                        .iter()
                        .copied()
                        .find(|&i| color_of(i) == Some(best));
                }
            }
        }

        let steady: Vec<usize> = legality
            .legal
            .iter()
            .copied()
            .filter(|i| !legality.color_change.contains(i))
            .collect();
        steady
            .choose(&mut self.rng)
            .or_else(|| legality.legal.choose(&mut self.rng))
            .copied()
    }

    pub fn choose_color(&mut self, state: &MatchView) -> Color {
        Self::tally(state)
            .most_held()
            .unwrap_or_else(|| Color::PLAYABLE[self.rng.gen_range(0..Color::PLAYABLE.len())])
    }

    fn tally(state: &MatchView) -> ColorTally {
        state
            .tally
            .unwrap_or_else(|| ColorTally::from_cards(&state.hand))
    }

    fn previous_was_forced(state: &MatchView) -> bool {
        state
            .seats
            .iter()
            .find(|seat| seat.id == state.previous_seat)
            .is_some_and(|seat| seat.drew_forced)
    }
}

impl<R: Rng> Bot for ComputerBot<R> {
    fn select_action(&mut self, state: &MatchView, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "computer bot requires at least one legal action"
        );
        if state.phase == TurnPhase::ChoosingColor {
            let color = self.choose_color(state);
            return Action::ChooseColor(color);
        }
        let owes_draws = state.self_view().is_some_and(|me| me.forced_draws > 0);
        if owes_draws && legal_actions.contains(&Action::Draw) {
            return Action::Draw;
        }
        if let Some(hand_index) = self.choose_card(state) {
            let play = Action::Play { hand_index };
            if legal_actions.contains(&play) {
                return play;
            }
        }
        [Action::Draw, Action::Pass]
            .into_iter()
            .find(|action| legal_actions.contains(action))
            .unwrap_or(legal_actions[0])
    }
}
