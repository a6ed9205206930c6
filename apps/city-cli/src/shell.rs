//! Interactive menu loop: one action runs to completion before the next prompt.

use std::io::{self, BufRead, Write};

use city_core::{CityError, StructureId};
use city_runtime::{Command, Outcome, Session, SessionError};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::form::{self, BuildKind, Console, FormError};
use crate::render::{self, brl, GAME_OVER, MENU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    Build(BuildKind),
    TriggerEvent,
    Update,
    Remove,
    Select,
    Quit,
}

fn parse_menu(raw: &str) -> Option<MenuChoice> {
    let choice = match raw.trim() {
        "1" => MenuChoice::Build(BuildKind::Building),
        "2" => MenuChoice::Build(BuildKind::Transport),
        "3" => MenuChoice::Build(BuildKind::Park),
        "4" => MenuChoice::Build(BuildKind::Factory),
        "5" => MenuChoice::Build(BuildKind::PublicService),
        "6" => MenuChoice::TriggerEvent,
        "7" => MenuChoice::Update,
        "8" => MenuChoice::Remove,
        "9" => MenuChoice::Select,
        "0" | "q" | "quit" => MenuChoice::Quit,
        _ => return None,
    };
    Some(choice)
}

/// How the shell loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum End {
    Quit,
    GameOver,
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Refused(#[from] SessionError),
}

impl From<FormError> for ActionError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Io(e) => ActionError::Io(e),
            FormError::Invalid(e) => ActionError::Refused(SessionError::City(e)),
        }
    }
}

pub struct Shell<R, W> {
    session: Session,
    console: Console<R, W>,
    selected: Option<StructureId>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(session: Session, input: R, out: W) -> Self {
        Self {
            session,
            console: Console::new(input, out),
            selected: None,
        }
    }

    pub fn into_parts(self) -> (Session, W) {
        let (_, out) = self.console.into_inner();
        (self.session, out)
    }

    pub fn run(&mut self) -> io::Result<End> {
        loop {
            if self.session.is_over() {
                self.console.say(&render::status_line(&self.session))?;
                self.console.say(GAME_OVER)?;
                return Ok(End::GameOver);
            }
            self.render()?;
            let Some(raw) = self.console.read_line("Choose an action")? else {
                return Ok(End::Quit);
            };
            if raw.is_empty() {
                continue;
            }
            match parse_menu(&raw) {
                Some(MenuChoice::Quit) => return Ok(End::Quit),
                Some(choice) => self.handle(choice)?,
                None => self.console.say(&format!("Unknown action '{raw}'."))?,
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.console.say("")?;
        self.console.say(&render::status_line(&self.session))?;
        self.console
            .say(&render::structure_list(&self.session, self.selected))?;
        self.console.say(MENU)
    }

    fn handle(&mut self, choice: MenuChoice) -> io::Result<()> {
        debug!(?choice, "menu action");
        let result = match choice {
            MenuChoice::Build(kind) => self.build(kind),
            MenuChoice::TriggerEvent => self.trigger_event(),
            MenuChoice::Update => self.update(),
            MenuChoice::Remove => self.remove(),
            MenuChoice::Select => self.select(),
            MenuChoice::Quit => Ok(()),
        };
        match result {
            Ok(()) => Ok(()),
            Err(ActionError::Io(e)) => Err(e),
            Err(ActionError::Refused(err)) => self.console.say(&render::describe_error(&err)),
        }
    }

    fn cancelled(&mut self) -> Result<(), ActionError> {
        self.console.say("Cancelled.")?;
        Ok(())
    }

    fn selection(&mut self) -> Result<Option<StructureId>, ActionError> {
        match self.selected {
            Some(id) if self.session.structure(id).is_some() => Ok(Some(id)),
            _ => {
                self.selected = None;
                self.console.say("No structure selected.")?;
                Ok(None)
            }
        }
    }

    fn build(&mut self, kind: BuildKind) -> Result<(), ActionError> {
        let Some(draft) = form::read_draft(&mut self.console, kind)? else {
            return self.cancelled();
        };
        let name = draft.name.clone();
        if let Outcome::Built { cost, .. } = self.session.execute(Command::Construct(draft))? {
            self.console.say(&format!("Built {name} for {}.", brl(cost)))?;
        }
        Ok(())
    }

    fn trigger_event(&mut self) -> Result<(), ActionError> {
        if let Outcome::EventApplied(event) = self.session.execute(Command::TriggerEvent)? {
            self.console.say(&render::event_notice(event))?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<(), ActionError> {
        let Some(id) = self.selection()? else {
            return Ok(());
        };
        let current = self
            .session
            .structure(id)
            .cloned()
            .ok_or(SessionError::City(CityError::NotFound(id)))?;
        let Some(changes) = form::read_changes(&mut self.console, &current)? else {
            return self.cancelled();
        };
        if let Outcome::Updated { delta, .. } = self.session.execute(Command::Update(id, changes))? {
            let note = if delta > Decimal::ZERO {
                format!("charged {}", brl(delta))
            } else if delta < Decimal::ZERO {
                format!("refunded {}", brl(-delta))
            } else {
                "no cost change".to_string()
            };
            self.console.say(&format!("Updated ({note})."))?;
        }
        Ok(())
    }

    fn remove(&mut self) -> Result<(), ActionError> {
        let Some(id) = self.selection()? else {
            return Ok(());
        };
        if let Outcome::Removed { structure, .. } = self.session.execute(Command::Remove(id))? {
            self.selected = None;
            self.console.say(&format!("Removed {}.", structure.name))?;
        }
        Ok(())
    }

    fn select(&mut self) -> Result<(), ActionError> {
        if self.session.structures().is_empty() {
            self.console.say("No structures yet.")?;
            return Ok(());
        }
        let Some(n) = self.console.ask_count("Structure number")? else {
            return self.cancelled();
        };
        let picked = (n as usize)
            .checked_sub(1)
            .and_then(|i| self.session.structures().get(i))
            .map(|(id, s)| (*id, s.to_string()));
        match picked {
            Some((id, text)) => {
                self.selected = Some(id);
                self.console.say(&format!("Selected: {text}"))?;
                Ok(())
            }
            None => Err(ActionError::Refused(SessionError::City(
                CityError::InvalidInput(format!("there is no structure number {n}")),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_core::Tier;
    use city_events::Event;
    use city_runtime::SessionConfig;
    use std::io::Cursor;

    fn session(budget: i64) -> Session {
        let cfg = SessionConfig {
            starting_budget: Decimal::new(budget, 0),
            ..SessionConfig::default()
        }
        .with_seed(7);
        Session::new(&cfg)
    }

    fn play(session: Session, script: &str) -> (End, Session, String) {
        let mut shell = Shell::new(session, Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let end = shell.run().unwrap();
        let (session, out) = shell.into_parts();
        (end, session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn builds_a_plain_building() {
        let (end, s, out) = play(session(100_000), "1\nTown Hall\nCivic\n1\n0\n");
        assert_eq!(end, End::Quit);
        assert_eq!(s.budget(), Decimal::new(90_000, 0));
        assert_eq!(s.structures().len(), 1);
        assert_eq!(s.structures()[0].1.to_string(), "Town Hall (Civic, Tier: LOW)");
        assert!(out.contains("Built Town Hall for R$ 10.000,00."));
        assert!(out.contains("Budget: R$ 90.000,00 | Resources: 100"));
        assert!(out.contains("  1. Town Hall (Civic, Tier: LOW)"));
    }

    #[test]
    fn cancelled_tier_changes_nothing() {
        let (_, s, out) = play(session(100_000), "1\nHall\nCivic\n\n0\n");
        assert!(out.contains("Cancelled."));
        assert_eq!(s.budget(), Decimal::new(100_000, 0));
        assert!(s.structures().is_empty());
    }

    #[test]
    fn bad_number_is_reported() {
        let (_, s, out) = play(session(100_000), "3\nCentral\nlots\n0\n");
        assert!(out.contains("Invalid input: 'lots' is not a valid number"));
        assert!(s.structures().is_empty());
    }

    #[test]
    fn unaffordable_build_is_reported() {
        let (end, s, out) = play(session(5_000), "1\nHall\nCivic\n2\n0\n");
        assert_eq!(end, End::Quit);
        assert!(out.contains("Insufficient budget: need R$ 20.000,00, have R$ 5.000,00."));
        assert_eq!(s.budget(), Decimal::new(5_000, 0));
        assert!(s.structures().is_empty());
    }

    #[test]
    fn update_and_remove_need_a_selection() {
        let (_, _, out) = play(session(100_000), "7\n8\n0\n");
        assert_eq!(out.matches("No structure selected.").count(), 2);
    }

    #[test]
    fn select_update_remove() {
        let script = "3\nCentral\n1200\n1\n9\n1\n7\nCentral Park\nPark\n3\n8\n0\n";
        let (_, s, out) = play(session(100_000), script);
        assert!(out.contains("Selected: Central (Park, Tier: LOW) - Green area: 1200m²"));
        assert!(out.contains("> 1. Central (Park, Tier: LOW)"));
        assert!(out.contains("Updated (charged R$ 40.000,00)."));
        assert!(out.contains("Removed Central Park."));
        assert!(s.structures().is_empty());
        assert_eq!(s.budget(), Decimal::new(50_000, 0));
    }

    #[test]
    fn selecting_out_of_range_is_invalid() {
        let (_, _, out) = play(session(100_000), "4\nMill\n50\n1\n9\n5\n0\n");
        assert!(out.contains("Invalid input: there is no structure number 5."));
    }

    #[test]
    fn downgrade_reports_refund() {
        let script = "5\nClinic\n40\nHealth\n3\n9\n1\n7\nClinic\nPublic Service\nlow\n0\n";
        let (_, s, out) = play(session(100_000), script);
        assert!(out.contains("Updated (refunded R$ 40.000,00)."));
        assert_eq!(s.budget(), Decimal::new(90_000, 0));
        assert_eq!(s.structures()[0].1.tier, Tier::Low);
    }

    #[test]
    fn spending_the_last_coin_ends_the_game() {
        let (end, s, out) = play(session(10_000), "1\nLast\nCivic\n1\n0\n");
        assert_eq!(end, End::GameOver);
        assert!(s.is_over());
        assert!(out.ends_with(&format!("{GAME_OVER}\n")));
    }

    #[test]
    fn bankrupt_session_ends_immediately() {
        let mut s = session(15_000);
        s.execute(Command::ApplyEvent(Event::lookup("Economic Crisis").unwrap()))
            .unwrap();
        let (end, _, out) = play(s, "");
        assert_eq!(end, End::GameOver);
        assert!(out.contains("Budget: -R$ 5.000,00"));
    }

    #[test]
    fn triggered_event_is_announced() {
        let (_, s, out) = play(session(1_000_000), "6\n0\n");
        assert!(out.contains("Event: "));
        assert!(out.contains("Budget impact: "));
        assert_eq!(s.journal().len(), 1);
    }

    #[test]
    fn end_of_input_quits_and_blank_lines_are_ignored() {
        let (end, s, out) = play(session(100_000), "\n\nxyz\n");
        assert_eq!(end, End::Quit);
        assert!(out.contains("Unknown action 'xyz'."));
        assert!(s.journal().is_empty());
    }
}
