use std::fmt::Write;

use crate::action::{Action, Direction};
use crate::state::{MatchStatus, MatchView, TurnPhase};

/// Cards shown per page of a hand.
pub const HAND_WINDOW: usize = 10;

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisualOptions {
    /// Show the perspective hand as placeholders (hidden computer hands).
    pub hide_hand: bool,
    /// Which 10-card page of the hand to show.
    pub hand_page: usize,
}

pub fn render_state(state: &MatchView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &MatchView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        MatchStatus::Ongoing => String::from("Ongoing"),
        MatchStatus::Won { winner } => format!("Finished (winner: {})", seat_name(state, winner)),
        MatchStatus::Aborted => String::from("Aborted"),
    };
    let _ = writeln!(out, "Match status: {status}");
    if state.phase == TurnPhase::ChoosingColor {
        let _ = writeln!(out, "Waiting for a wild color");
    }
    let top = state
        .discard_top
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let _ = writeln!(
        out,
        "Discard top: {top}  |  Active: {} {}  |  Deck: {} cards",
        state.active_color, state.active_face, state.draw_pile_count
    );
    let arrow = match state.direction {
        Direction::Clockwise => "forward",
        Direction::CounterClockwise => "reversed",
    };
    let _ = writeln!(out, "Turn order: {arrow}");
    let _ = writeln!(out, "Players:");
    for seat in &state.seats {
        let label_you = if seat.id == state.self_seat { " (You)" } else { "" };
        let current_tag = if seat.is_current { " <- current" } else { "" };
        let _ = writeln!(
            out,
            "  {}{} - {} cards, {} points{}",
            seat.name, label_you, seat.card_count, seat.points, current_tag
        );
    }

    let pages = state.hand.len().div_ceil(HAND_WINDOW).max(1);
    let page = options.hand_page.min(pages - 1);
    let start = page * HAND_WINDOW;
    let entries: Vec<String> = state
        .hand
        .iter()
        .enumerate()
        .skip(start)
        .take(HAND_WINDOW)
        .map(|(idx, card)| {
            if options.hide_hand {
                format!("{}:??", idx - start)
            } else {
                format!("{}:{}", idx - start, card)
            }
        })
        .collect();
    if entries.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let _ = writeln!(out, "Hand [{}/{}]: {}", page + 1, pages, entries.join("  "));
    }
    out
}

pub fn describe_action(state: &MatchView, action: &Action) -> String {
    match action {
        Action::Play { hand_index } => match state.hand.get(*hand_index) {
            Some(card) => format!("Play {card}"),
            None => format!("Play hand[{hand_index}]"),
        },
        Action::Draw => String::from("Draw a card"),
        Action::Pass => String::from("Pass"),
        Action::ChooseColor(color) => format!("Change color to {color}"),
        Action::Abort => String::from("Quit the match"),
    }
}

fn seat_name(state: &MatchView, seat: usize) -> String {
    state
        .seats
        .iter()
        .find(|s| s.id == seat)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("seat {seat}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MatchBuilder;
    use crate::participant::Participant;

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let game = MatchBuilder::new(vec![Participant::human("Ann"), Participant::computer("Hal")])
            .expect("builder")
            .with_starting_seat(0)
            .build()
            .expect("match");
        let view = game.state_view(0).expect("state view");
        let text = render_state(&view);
        assert!(text.contains("Ann (You)"));
        assert!(text.contains("Hand [1/1]:"));
        assert!(text.contains("Deck: 93 cards"));

        let hidden = render_state_with_options(
            &view,
            VisualOptions {
                hide_hand: true,
                hand_page: 0,
            },
        );
        assert!(hidden.contains("0:??"));

        assert_eq!(describe_action(&view, &Action::Draw), "Draw a card");
        let play = describe_action(&view, &Action::Play { hand_index: 0 });
        assert!(play.starts_with("Play "));
    }
}
