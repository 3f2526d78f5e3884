use std::io::{self, BufRead, Write};

use crate::action::Action;
use crate::bot::Bot;
use crate::card::Color;
use crate::state::{MatchView, TurnPhase};
use crate::visualize::{HAND_WINDOW, VisualOptions, describe_action, render_state_with_options};

/// A line of console input, already validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Card at a zero-based position inside the visible window.
    Card(usize),
    Draw,
    Pass,
    Pause,
    ScrollLeft,
    ScrollRight,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Some(Command::Card(index));
        }
        match trimmed.chars().next()?.to_ascii_lowercase() {
            'd' => Some(Command::Draw),
            's' => Some(Command::Pass),
            'p' => Some(Command::Pause),
            '<' => Some(Command::ScrollLeft),
            '>' => Some(Command::ScrollRight),
            _ => None,
        }
    }
}

/// Interactive bot that queries a human on the terminal.
pub struct HumanBot {
    name: String,
    /// Scripted input; `None` reads a line from stdin per prompt.
    input: Option<Box<dyn BufRead>>,
    /// Index of the visible 10-card page of the hand.
    page: usize,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: None,
            page: 0,
        }
    }

    pub fn with_input(name: impl Into<String>, input: impl BufRead + 'static) -> Self {
        Self {
            input: Some(Box::new(input)),
            ..Self::new(name)
        }
    }

    fn prompt(&mut self, label: &str) -> Option<String> {
        print!("{label}: ");
        if io::stdout().flush().is_err() {
            eprintln!("failed to flush stdout");
        }
        let mut line = String::new();
        // Stdin is locked only for the duration of the read.
        let read = match self.input.as_mut() {
            Some(input) => input.read_line(&mut line),
            None => io::stdin().read_line(&mut line),
        };
        match read {
            // End of input or a broken stream counts as quitting.
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    fn pages(state: &MatchView) -> usize {
        state.hand.len().div_ceil(HAND_WINDOW).max(1)
    }

    fn render(&self, state: &MatchView) {
        let options = VisualOptions {
            hide_hand: false,
            hand_page: self.page,
        };
        println!("{}", render_state_with_options(state, options));
    }

    fn pause(&mut self) -> bool {
        loop {
            println!("\n\tPause\n\t1. Resume\n\t2. Quit");
            match self.prompt("Selection").as_deref().map(str::trim) {
                Some("1") | Some("") => return false,
                Some("2") | None => return true,
                Some(_) => println!("Selection invalid"),
            }
        }
    }

    fn select_color(&mut self, state: &MatchView) -> Action {
        loop {
            self.render(state);
            println!("Wild card! Specify a color: (B)lue, (R)ed, (G)reen, (Y)ellow");
            let Some(line) = self.prompt("Color change") else {
                return Action::Abort;
            };
            if let Some(color) = Color::from_initial(&line) {
                return Action::ChooseColor(color);
            }
            match Command::parse(&line) {
                Some(Command::ScrollLeft) => self.scroll(state, false),
                Some(Command::ScrollRight) => self.scroll(state, true),
                _ => println!("'{}' is not a color.", line.trim()),
            }
        }
    }

    fn scroll(&mut self, state: &MatchView, forward: bool) {
        let pages = Self::pages(state);
        self.page = if forward {
            (self.page + 1) % pages
        } else {
            (self.page + pages - 1) % pages
        };
    }
}

impl Bot for HumanBot {
    fn select_action(&mut self, state: &MatchView, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "at least one legal action must exist"
        );
        if state.phase == TurnPhase::ChoosingColor {
            return self.select_color(state);
        }
        self.page = self.page.min(Self::pages(state) - 1);
        loop {
            println!("\n=== {}'s turn ===", self.name);
            self.render(state);
            if let Some(me) = state.self_view().filter(|me| me.forced_draws > 0) {
                println!("Draw card played! Draw {} cards.", me.forced_draws);
            }
            if legal_actions.contains(&Action::Pass) {
                println!("Select a card, (D)raw, (P)ause, or Pas(s).");
            } else {
                println!("Select a card, (D)raw, or (P)ause.");
            }
            let Some(line) = self.prompt("Selection") else {
                return Action::Abort;
            };
            let Some(command) = Command::parse(&line) else {
                println!("'{}' is not a valid selection.", line.trim());
                continue;
            };
            let action = match command {
                Command::ScrollLeft => {
                    self.scroll(state, false);
                    continue;
                }
                Command::ScrollRight => {
                    self.scroll(state, true);
                    continue;
                }
                Command::Pause => {
                    if self.pause() {
                        println!("Quitting match.");
                        return Action::Abort;
                    }
                    continue;
                }
                Command::Draw => Action::Draw,
                Command::Pass => Action::Pass,
                Command::Card(offset) => {
                    let hand_index = offset + self.page * HAND_WINDOW;
                    if hand_index >= state.hand.len() {
                        println!("{offset} is not a card.");
                        continue;
                    }
                    Action::Play { hand_index }
                }
            };
            if legal_actions.contains(&action) {
                println!("You selected: {}", describe_action(state, &action));
                self.page = 0;
                return action;
            }
            match action {
                Action::Draw => println!("Cannot draw. Deck is empty."),
                Action::Pass if state.draw_pile_count > 0 => {
                    println!("Cannot pass until the deck is empty.")
                }
                Action::Pass => println!("Cannot pass while holding playable cards."),
                _ if state.self_view().is_some_and(|me| me.forced_draws > 0) => {
                    println!("Take your forced draws first.")
                }
                _ => println!(
                    "Card doesn't match the color {} or value {}!",
                    state.active_color, state.active_face
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("3\n"), Some(Command::Card(3)));
        assert_eq!(Command::parse("D"), Some(Command::Draw));
        assert_eq!(Command::parse("skip"), Some(Command::Pass));
        assert_eq!(Command::parse(">"), Some(Command::ScrollRight));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn scripted_input_drives_a_turn() -> Result<(), crate::GameError> {
        use crate::game::MatchBuilder;
        use crate::participant::Participant;
        use std::io::Cursor;

        let game = MatchBuilder::new(vec![Participant::human("Ann"), Participant::computer("Hal")])?
            .with_starting_seat(0)
            .build()?;
        let view = game.state_view(0)?;
        let legal = game.legal_actions(0)?;

        let mut bot = HumanBot::with_input("Ann", Cursor::new("x\nb\nd\n"));
        let expected = if view.phase == TurnPhase::ChoosingColor {
            Action::ChooseColor(Color::Blue)
        } else {
            Action::Draw
        };
        assert_eq!(bot.select_action(&view, &legal), expected);

        // Running out of input quits.
        let mut bot = HumanBot::with_input("Ann", Cursor::new(""));
        assert_eq!(bot.select_action(&view, &legal), Action::Abort);
        Ok(())
    }

    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stream closed"))
        }
    }

    #[test]
    fn read_errors_quit_instead_of_reprompting() -> Result<(), crate::GameError> {
        use crate::game::MatchBuilder;
        use crate::participant::Participant;

        let game = MatchBuilder::new(vec![Participant::human("Ann"), Participant::computer("Hal")])?
            .with_starting_seat(0)
            .build()?;
        let view = game.state_view(0)?;
        let legal = game.legal_actions(0)?;
        let mut bot = HumanBot::with_input("Ann", io::BufReader::new(Broken));
        assert_eq!(bot.select_action(&view, &legal), Action::Abort);
        Ok(())
    }

    #[test]
    fn several_terminal_seats_can_coexist() {
        let first = HumanBot::new("Ann");
        let second = HumanBot::new("Bo");
        assert!(first.input.is_none() && second.input.is_none());
        assert_eq!(second.name, "Bo");
    }
}
