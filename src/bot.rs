use crate::action::Action;
use crate::state::MatchView;

/// Interface for anything that picks a seat's next action.
pub trait Bot {
    fn select_action(&mut self, state: &MatchView, legal_actions: &[Action]) -> Action;
}
