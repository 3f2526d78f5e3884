use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::state::MatchView;

/// Baseline bot: plays a uniformly random playable card, draws only when
/// nothing can be played, and names a random color for wilds.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _state: &MatchView, legal_actions: &[Action]) -> Action {
        let plays: Vec<Action> = legal_actions
            .iter()
            .copied()
            .filter(|action| matches!(action, Action::Play { .. } | Action::ChooseColor(_)))
            .collect();
        plays
            .choose(&mut self.rng)
            .or_else(|| legal_actions.choose(&mut self.rng))
            .copied()
            .expect("at least one legal action must be available")
    }
}
