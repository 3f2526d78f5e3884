use rand::SeedableRng;
use rand::rngs::StdRng;

use unobot::{
    Action, Bot, Card, Color, ColorTally, ComputerBot, Direction, Face, Legality, MatchConfig,
    MatchStatus, MatchView, ParticipantKind, SeatView, TurnPhase,
};

fn num(color: Color, n: u8) -> Card {
    Card::number(color, n).expect("valid numeral")
}

fn special(color: Color, face: Face) -> Card {
    Card::new(color, face).expect("valid action card")
}

fn seat(id: usize, cards: usize, drew_forced: bool) -> SeatView {
    SeatView {
        id,
        name: format!("Seat {id}"),
        kind: ParticipantKind::Computer,
        card_count: cards,
        points: 0,
        forced_draws: 0,
        drew: false,
        drew_forced,
        is_current: id == 0,
    }
}

/// Seat 0 to act against `color`/`face`; the last seat acted just before.
fn base_state(hand: Vec<Card>, color: Color, face: Face, seats: usize) -> MatchView {
    let config = MatchConfig::default();
    let legality = Legality::compute(&hand, color, face, config.zero_rule);
    let seats: Vec<SeatView> = (0..seats).map(|id| seat(id, 5, false)).collect();
    MatchView {
        config,
        phase: TurnPhase::AwaitingAction,
        status: MatchStatus::Ongoing,
        self_seat: 0,
        current_seat: 0,
        previous_seat: seats.len() - 1,
        next_seat: 1,
        direction: Direction::Clockwise,
        active_color: color,
        active_face: face,
        discard_top: Card::new(color, face).ok(),
        draw_pile_count: 40,
        discard_pile_count: 10,
        pending_draw: 0,
        passes: 0,
        seats,
        tally: Some(ColorTally::from_cards(&hand)),
        hand,
        legality,
    }
}

fn plays(state: &MatchView) -> Vec<Action> {
    let mut actions: Vec<Action> = state
        .legality
        .all_valid()
        .into_iter()
        .map(|hand_index| Action::Play { hand_index })
        .collect();
    actions.push(Action::Draw);
    actions
}

fn bot(seed: u64) -> ComputerBot<StdRng> {
    ComputerBot::new(StdRng::seed_from_u64(seed))
}

#[test]
fn draws_without_playable_cards() {
    let state = base_state(
        vec![num(Color::Blue, 1), num(Color::Green, 2)],
        Color::Red,
        Face::Number(5),
        3,
    );
    let mut bot = bot(1);
    assert_eq!(bot.choose_card(&state), None);
    assert_eq!(bot.select_action(&state, &[Action::Draw]), Action::Draw);
}

#[test]
fn plays_draw_four_when_nothing_matches() {
    let state = base_state(
        vec![Card::wild(), Card::wild_draw_four(), num(Color::Blue, 1)],
        Color::Red,
        Face::Number(5),
        3,
    );
    assert!(state.legality.can_draw_four);
    let mut bot = bot(2);
    let legal = plays(&state);
    assert_eq!(
        bot.select_action(&state, &legal),
        Action::Play { hand_index: 1 }
    );
}

#[test]
fn plays_a_wild_when_no_draw_four() {
    let state = base_state(
        vec![num(Color::Blue, 1), Card::wild()],
        Color::Red,
        Face::Number(5),
        3,
    );
    let mut bot = bot(3);
    assert_eq!(bot.choose_card(&state), Some(1));
}

#[test]
fn heads_up_prefers_skip() {
    let state = base_state(
        vec![num(Color::Red, 2), special(Color::Red, Face::Skip)],
        Color::Red,
        Face::Number(5),
        2,
    );
    assert!(state.heads_up());
    for seed in 0..8 {
        assert_eq!(bot(seed).choose_card(&state), Some(1));
    }
}

#[test]
fn reverses_onto_a_seat_that_was_forced_to_draw() {
    let mut state = base_state(
        vec![
            num(Color::Red, 2),
            special(Color::Red, Face::Reverse),
            num(Color::Red, 8),
        ],
        Color::Red,
        Face::Number(5),
        3,
    );
    state.seats[2].drew_forced = true;
    for seed in 0..8 {
        assert_eq!(bot(seed).choose_card(&state), Some(1));
    }
}

#[test]
fn switches_color_only_when_it_pays() {
    // Blue outnumbers red, so the blue five moves play to blue.
    let state = base_state(
        vec![
            num(Color::Blue, 5),
            num(Color::Blue, 3),
            num(Color::Blue, 7),
            num(Color::Red, 2),
        ],
        Color::Red,
        Face::Number(5),
        3,
    );
    assert_eq!(bot(4).choose_card(&state), Some(0));

    // Red outnumbers blue: keep the color.
    let state = base_state(
        vec![num(Color::Blue, 5), num(Color::Red, 2), num(Color::Red, 3)],
        Color::Red,
        Face::Number(5),
        3,
    );
    for seed in 0..8 {
        let choice = bot(seed).choose_card(&state);
        assert!(matches!(choice, Some(1) | Some(2)), "got {choice:?}");
    }
}

#[test]
fn forced_switch_picks_the_best_color() {
    let state = base_state(
        vec![num(Color::Green, 5), num(Color::Blue, 5), num(Color::Blue, 2)],
        Color::Red,
        Face::Number(5),
        3,
    );
    assert_eq!(bot(5).choose_card(&state), Some(1));
}

#[test]
fn ties_follow_color_order() {
    let mut state = base_state(
        vec![num(Color::Green, 5), num(Color::Yellow, 5)],
        Color::Red,
        Face::Number(5),
        3,
    );
    assert_eq!(bot(6).choose_card(&state), Some(1));
    // Without a tracked tally the hand is counted on the spot.
    state.tally = None;
    assert_eq!(bot(6).choose_card(&state), Some(1));
}

#[test]
fn names_the_most_held_color() {
    let mut state = base_state(
        vec![num(Color::Blue, 1), num(Color::Blue, 2), num(Color::Green, 3)],
        Color::Wild,
        Face::Wild,
        3,
    );
    state.phase = TurnPhase::ChoosingColor;
    let legal: Vec<Action> = Color::PLAYABLE.into_iter().map(Action::ChooseColor).collect();
    assert_eq!(
        bot(7).select_action(&state, &legal),
        Action::ChooseColor(Color::Blue)
    );

    // Only wilds left: any playable color will do.
    state.hand = vec![Card::wild()];
    state.tally = Some(ColorTally::from_cards(&state.hand));
    match bot(8).select_action(&state, &legal) {
        Action::ChooseColor(color) => assert_ne!(color, Color::Wild),
        other => panic!("unexpected action {other:?}"),
    }
}

#[test]
fn takes_forced_draws_first() {
    let mut state = base_state(
        vec![num(Color::Red, 2)],
        Color::Red,
        Face::DrawTwo,
        3,
    );
    state.seats[0].forced_draws = 2;
    assert_eq!(bot(9).select_action(&state, &[Action::Draw]), Action::Draw);
}
