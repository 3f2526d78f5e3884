use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::{Action, Direction, SeatId};
use crate::bot::Bot;
use crate::card::{Card, Color, Face, MAX_PLAYERS, MIN_PLAYERS};
use crate::deck::Deck;
use crate::error::{GameError, InvalidAction};
use crate::hand::Legality;
use crate::participant::{DrawKind, Participant};
use crate::score::{Settlement, hand_points};
use crate::state::{MatchConfig, MatchEvent, MatchStatus, MatchView, SeatView, TurnPhase};

const DEFAULT_SEED: u64 = 0x0DD5_EED5_CA4D_F00D;

/// Builder that enables deterministic deck injection and seating for tests and simulations.
pub struct MatchBuilder {
    participants: Vec<Participant>,
    config: MatchConfig,
    seed: u64,
    deck: Option<Vec<Card>>,
    starting_seat: Option<SeatId>,
}

impl MatchBuilder {
    pub fn new(participants: Vec<Participant>) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&participants.len()) {
            return Err(GameError::InvalidConfiguration(
                "a match needs between 2 and 4 participants",
            ));
        }
        Ok(Self {
            participants,
            config: MatchConfig::default(),
            seed: DEFAULT_SEED,
            deck: None,
            starting_seat: None,
        })
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use `deck` as the draw pile instead of a shuffled full deck.
    /// The last card is dealt first.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Fix the seat that takes the first turn instead of picking one at random.
    pub fn with_starting_seat(mut self, seat: SeatId) -> Self {
        self.starting_seat = Some(seat);
        self
    }

    pub fn build(self) -> Result<Match, GameError> {
        Match::from_builder(self)
    }
}

/// One round of play: piles, seats, turn order and the active color/value.
pub struct Match {
    config: MatchConfig,
    status: MatchStatus,
    phase: TurnPhase,
    current: SeatId,
    direction: Direction,
    active_color: Color,
    active_face: Face,
    seats: Vec<Participant>,
    draw_pile: Deck,
    discard_pile: Deck,
    pending_draw: u32,
    pending_skip: bool,
    passes: usize,
    pass_limit: usize,
    /// The opening card still needs its color before the first turn starts.
    opening: bool,
    events: Vec<MatchEvent>,
    rng: StdRng,
}

impl Match {
    pub fn builder(participants: Vec<Participant>) -> Result<MatchBuilder, GameError> {
        MatchBuilder::new(participants)
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_seat(&self) -> SeatId {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn active_face(&self) -> Face {
        self.active_face
    }

    pub fn discard_top(&self) -> Option<&Card> {
        self.discard_pile.top()
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Draws owed by whichever seat acts next.
    pub fn pending_draw(&self) -> u32 {
        self.pending_draw
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn pass_limit(&self) -> usize {
        self.pass_limit
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn participant(&self, seat: SeatId) -> Option<&Participant> {
        self.seats.get(seat)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.seats
    }

    /// Seat that acts after `seat` in the current direction.
    pub fn seat_after(&self, seat: SeatId) -> SeatId {
        self.direction.step(seat, self.seats.len())
    }

    /// Seat that acted before `seat` in the current direction.
    pub fn seat_before(&self, seat: SeatId) -> SeatId {
        self.direction.flipped().step(seat, self.seats.len())
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.status, MatchStatus::Ongoing)
    }

    pub fn winner(&self) -> Option<SeatId> {
        match self.status {
            MatchStatus::Won { winner } => Some(winner),
            _ => None,
        }
    }

    /// Hands over the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Legality buckets for `seat` against the active color and value.
    pub fn legality(&self, seat: SeatId) -> Result<Legality, GameError> {
        let participant = self.seats.get(seat).ok_or(GameError::InvalidPlayer(seat))?;
        Ok(participant.legality(self.active_color, self.active_face, self.config.zero_rule))
    }

    pub fn state_view(&self, perspective: SeatId) -> Result<MatchView, GameError> {
        let me = self
            .seats
            .get(perspective)
            .ok_or(GameError::InvalidPlayer(perspective))?;
        let seats = self
            .seats
            .iter()
            .enumerate()
            .map(|(idx, p)| SeatView {
                id: idx,
                name: p.name().to_string(),
                kind: p.kind(),
                card_count: p.card_count(),
                points: p.points(),
                forced_draws: p.forced_draws(),
                drew: p.drew(),
                drew_forced: p.drew_forced(),
                is_current: idx == self.current,
            })
            .collect();

        Ok(MatchView {
            config: self.config,
            phase: self.phase,
            status: self.status,
            self_seat: perspective,
            current_seat: self.current,
            previous_seat: self.seat_before(self.current),
            next_seat: self.seat_after(self.current),
            direction: self.direction,
            active_color: self.active_color,
            active_face: self.active_face,
            discard_top: self.discard_pile.top().copied(),
            draw_pile_count: self.draw_pile.len(),
            discard_pile_count: self.discard_pile.len(),
            pending_draw: self.pending_draw,
            passes: self.passes,
            seats,
            hand: me.hand().cards().to_vec(),
            legality: me.legality(self.active_color, self.active_face, self.config.zero_rule),
            tally: me.tally().copied(),
        })
    }

    pub fn legal_actions(&self, seat: SeatId) -> Result<Vec<Action>, GameError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        if seat >= self.seats.len() {
            return Err(GameError::InvalidPlayer(seat));
        }
        if seat != self.current {
            return Err(GameError::NotPlayersTurn);
        }
        match self.phase {
            TurnPhase::ChoosingColor => Ok(Color::PLAYABLE
                .into_iter()
                .map(Action::ChooseColor)
                .collect()),
            TurnPhase::AwaitingAction => {
                let legality = self.legality(seat)?;
                let mut actions = Vec::new();
                if self.seats[seat].forced_draws() == 0 {
                    actions.extend(
                        legality
                            .all_valid()
                            .into_iter()
                            .map(|hand_index| Action::Play { hand_index }),
                    );
                }
                if !self.draw_pile.is_empty() {
                    actions.push(Action::Draw);
                } else if legality.is_empty() {
                    actions.push(Action::Pass);
                }
                Ok(actions)
            }
            TurnPhase::Settling | TurnPhase::Done => Ok(Vec::new()),
        }
    }

    pub fn apply_action(&mut self, seat: SeatId, action: Action) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if seat >= self.seats.len() {
            return Err(GameError::InvalidPlayer(seat));
        }
        match (self.phase, action) {
            (_, Action::Abort) => {
                self.abort();
                Ok(())
            }
            _ if seat != self.current => Err(GameError::NotPlayersTurn),
            (TurnPhase::ChoosingColor, Action::ChooseColor(color)) => self.choose_color(color),
            (TurnPhase::ChoosingColor, _) => Err(InvalidAction::ColorRequired.into()),
            (_, Action::ChooseColor(_)) => Err(InvalidAction::NoColorPending.into()),
            (_, Action::Draw) => self.draw(),
            (_, Action::Play { hand_index }) => self.play(hand_index),
            (_, Action::Pass) => self.pass(),
        }
    }

    /// Asks `bot` for the current seat's action and applies it.
    pub fn step(&mut self, bot: &mut dyn Bot) -> Result<Action, GameError> {
        let seat = self.current;
        let view = self.state_view(seat)?;
        let legal_actions = self.legal_actions(seat)?;
        if legal_actions.is_empty() {
            return Err(GameError::GameOver);
        }
        let action = bot.select_action(&view, &legal_actions);
        self.apply_action(seat, action)?;
        Ok(action)
    }

    /// Ends the match without a winner. Scores stay untouched at settlement.
    pub fn abort(&mut self) {
        if self.is_finished() {
            return;
        }
        info!("match aborted at seat {}", self.current);
        self.status = MatchStatus::Aborted;
        self.phase = TurnPhase::Settling;
        self.pending_draw = 0;
        self.pending_skip = false;
        self.events.push(MatchEvent::Aborted);
    }

    /// Credits the winner with the points left in every other hand and empties all hands.
    pub fn settle(&mut self) -> Result<Settlement, GameError> {
        match self.phase {
            TurnPhase::Settling => {}
            TurnPhase::Done => return Err(GameError::GameOver),
            TurnPhase::AwaitingAction | TurnPhase::ChoosingColor => {
                return Err(GameError::MatchInProgress);
            }
        }
        let winner = self.winner();
        let mut points = 0u64;
        for seat in 0..self.seats.len() {
            let cards = self.seats[seat].discard_hand();
            if winner.is_some_and(|w| w != seat) {
                points = points.saturating_add(hand_points(&cards));
            }
            for card in cards {
                self.discard_pile.tuck(card);
            }
        }
        if let Some(winner) = winner {
            self.seats[winner].add_points(points);
            info!(
                "{} wins {points} points (total {})",
                self.seats[winner].name(),
                self.seats[winner].points()
            );
        }
        self.phase = TurnPhase::Done;
        self.events.push(MatchEvent::Settled { winner, points });
        Ok(Settlement {
            winner,
            points,
            scores: self.seats.iter().map(|p| (p.id(), p.points())).collect(),
        })
    }

    /// Releases the participants, e.g. back into a lobby.
    pub fn into_participants(self) -> Vec<Participant> {
        self.seats
    }

    fn from_builder(builder: MatchBuilder) -> Result<Self, GameError> {
        let MatchBuilder {
            mut participants,
            config,
            seed,
            deck,
            starting_seat,
        } = builder;
        if config.hand_size == 0 {
            return Err(GameError::InvalidConfiguration("hand size must be positive"));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let draw_pile = match deck {
            Some(cards) => Deck::from_cards(cards),
            None => Deck::populated(&mut rng),
        };
        if draw_pile.len() < config.hand_size * participants.len() + 1 {
            return Err(GameError::InvalidConfiguration(
                "deck does not contain enough cards to deal",
            ));
        }
        for (id, participant) in participants.iter_mut().enumerate() {
            participant.reset_for_round();
            participant.assign_id(id);
        }
        let seat_count = participants.len();
        let current = match starting_seat {
            Some(seat) if seat >= seat_count => return Err(GameError::InvalidPlayer(seat)),
            Some(seat) => seat,
            None => rng.gen_range(0..seat_count),
        };

        let mut game = Match {
            config,
            status: MatchStatus::Ongoing,
            phase: TurnPhase::AwaitingAction,
            current,
            direction: Direction::Clockwise,
            active_color: Color::Wild,
            active_face: Face::Wild,
            seats: participants,
            draw_pile,
            discard_pile: Deck::new(),
            pending_draw: 0,
            pending_skip: false,
            passes: 0,
            pass_limit: seat_count,
            opening: false,
            events: Vec::new(),
            rng,
        };
        game.deal()?;
        game.open()?;
        Ok(game)
    }

    fn deal(&mut self) -> Result<(), GameError> {
        for seat in 0..self.seats.len() {
            for _ in 0..self.config.hand_size {
                let card = self.draw_pile.draw()?;
                self.seats[seat].add_card(card);
            }
            self.seats[seat].clear_draw_flags();
        }
        debug!(
            "dealt {} cards to {} seats, seat {} starts",
            self.config.hand_size,
            self.seats.len(),
            self.current
        );
        self.events.push(MatchEvent::Dealt {
            hand_size: self.config.hand_size,
            starting_seat: self.current,
        });
        Ok(())
    }

    /// Turns over the opening card; its effect lands on the starting seat.
    fn open(&mut self) -> Result<(), GameError> {
        let card = self.draw_pile.draw()?;
        debug!("opening card {card}");
        self.events.push(MatchEvent::OpeningCard { card });
        if self.place_card(card) {
            self.opening = true;
            self.phase = TurnPhase::ChoosingColor;
        } else {
            self.begin_turn();
        }
        Ok(())
    }

    /// Puts `card` on the discard pile and queues its effect.
    /// Returns true when the card still needs a color.
    fn place_card(&mut self, card: Card) -> bool {
        self.active_color = card.color();
        self.active_face = card.face();
        self.passes = 0;
        match card.face() {
            Face::Skip => self.pending_skip = true,
            Face::Reverse if self.seats.len() > 2 => {
                self.direction = self.direction.flipped();
                debug!("direction is now {:?}", self.direction);
                self.events.push(MatchEvent::Reversed {
                    direction: self.direction,
                });
            }
            Face::Reverse => self.pending_skip = true,
            Face::DrawTwo => self.pending_draw = 2,
            Face::WildDrawFour => self.pending_draw = 4,
            Face::Number(_) | Face::Wild => {}
        }
        self.discard_pile.insert(card);
        card.is_wild()
    }

    fn play(&mut self, hand_index: usize) -> Result<(), GameError> {
        let seat = self.current;
        let owed = self.seats[seat].forced_draws();
        if owed > 0 {
            return Err(InvalidAction::ForcedDrawsOutstanding(owed).into());
        }
        if hand_index >= self.seats[seat].card_count() {
            return Err(InvalidAction::HandIndex(hand_index).into());
        }
        if !self.legality(seat)?.is_valid(hand_index) {
            return Err(InvalidAction::CardNotPlayable { index: hand_index }.into());
        }
        let card = self.seats[seat].remove_card(hand_index)?;
        if card.color() != self.active_color {
            for participant in &mut self.seats {
                participant.clear_draw_flags();
            }
        }
        debug!("seat {seat} plays {card}");
        self.events.push(MatchEvent::Played { seat, card });
        let needs_color = self.place_card(card);

        if self.seats[seat].card_count() == 0 {
            self.declare_winner(seat);
        } else if needs_color {
            self.phase = TurnPhase::ChoosingColor;
        } else {
            self.end_turn();
        }
        Ok(())
    }

    fn choose_color(&mut self, color: Color) -> Result<(), GameError> {
        if color == Color::Wild {
            return Err(InvalidAction::WildIsNotAColor.into());
        }
        if let Some(top) = self.discard_pile.top_mut() {
            top.change_color(color)?;
        }
        let seat = self.current;
        self.active_color = color;
        debug!("seat {seat} names {color}");
        self.events.push(MatchEvent::ColorChosen { seat, color });
        if std::mem::take(&mut self.opening) {
            self.begin_turn();
        } else {
            self.end_turn();
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<(), GameError> {
        let seat = self.current;
        if self.draw_pile.is_empty() {
            return Err(InvalidAction::DrawPileEmpty.into());
        }
        let card = self.draw_pile.draw()?;
        let forced = self.seats[seat].add_card(card) == DrawKind::Forced;
        debug!("seat {seat} draws (forced: {forced}), {} left", self.draw_pile.len());
        self.events.push(MatchEvent::Drew { seat, forced });
        self.forgive_if_exhausted(seat);
        Ok(())
    }

    fn pass(&mut self) -> Result<(), GameError> {
        let seat = self.current;
        if !self.draw_pile.is_empty() || !self.legality(seat)?.is_empty() {
            return Err(InvalidAction::PassNotAllowed.into());
        }
        self.seats[seat].clear_forced_draws();
        self.passes += 1;
        debug!("seat {seat} passes ({}/{})", self.passes, self.pass_limit);
        self.events.push(MatchEvent::Passed {
            seat,
            passes: self.passes,
        });
        if self.passes >= self.pass_limit {
            self.passes = 0;
            self.emergency_wild()?;
        }
        self.end_turn();
        Ok(())
    }

    /// Every seat passed in a row: pick a random color nobody chose.
    fn emergency_wild(&mut self) -> Result<(), GameError> {
        let color = Color::PLAYABLE[self.rng.gen_range(0..Color::PLAYABLE.len())];
        if let Some(top) = self.discard_pile.top_mut().filter(|card| card.is_wild()) {
            top.change_color(color)?;
        }
        self.active_color = color;
        info!("all seats passed, color forced to {color}");
        self.events.push(MatchEvent::EmergencyWild { color });
        Ok(())
    }

    fn declare_winner(&mut self, seat: SeatId) {
        info!("{} (seat {seat}) empties their hand", self.seats[seat].name());
        self.status = MatchStatus::Won { winner: seat };
        self.phase = TurnPhase::Settling;
        self.pending_draw = 0;
        self.pending_skip = false;
        self.events.push(MatchEvent::Won { seat });
    }

    fn end_turn(&mut self) {
        self.current = self.seat_after(self.current);
        self.begin_turn();
    }

    /// Resolves queued skip and forced-draw effects for the seat about to act.
    fn begin_turn(&mut self) {
        loop {
            let seat = self.current;
            self.seats[seat].begin_turn();
            if self.pending_skip {
                self.pending_skip = false;
                debug!("seat {seat} is skipped");
                self.events.push(MatchEvent::Skipped { seat });
                self.current = self.seat_after(seat);
                continue;
            }
            if self.pending_draw > 0 {
                let amount = std::mem::take(&mut self.pending_draw);
                self.seats[seat].add_forced_draws(amount);
                debug!("seat {seat} owes {amount} forced draws");
                self.events.push(MatchEvent::ForcedDraw { seat, amount });
            }
            self.forgive_if_exhausted(seat);
            trace!("seat {seat} to act");
            self.phase = TurnPhase::AwaitingAction;
            return;
        }
    }

    /// Forced draws cannot be discharged from an empty draw pile; drop them.
    fn forgive_if_exhausted(&mut self, seat: SeatId) {
        if self.draw_pile.is_empty() && self.seats[seat].forced_draws() > 0 {
            self.seats[seat].clear_forced_draws();
            debug!("seat {seat} forced draws forgiven, draw pile empty");
            self.events.push(MatchEvent::ForcedDrawsForgiven { seat });
        }
    }
}
