#![deny(warnings)]

//! Session runtime: owns one city for the lifetime of a process.
//!
//! State lives in an ECS `World` as resources (the city, the event deck, the
//! action journal and the session status). Commands run to completion one at
//! a time; after each successful command the schedule re-checks game over
//! and latches the session once the budget is exhausted.

mod config;

pub use config::SessionConfig;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, Schedule};
use city_core::{
    is_game_over, Catalog, CityError, Ledger, Structure, StructureChanges, StructureDraft,
    StructureId,
};
use city_events::{Event, EventDeck};
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

/// Ledger and catalog, always mutated together.
#[derive(Resource, Debug)]
struct City {
    ledger: Ledger,
    catalog: Catalog,
}

#[derive(Resource)]
struct Deck(EventDeck);

/// Whether the session still accepts commands.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
enum SessionStatus {
    Running,
    Over,
}

/// Ordered record of every successful action.
#[derive(Resource, Debug, Default)]
struct Journal {
    entries: Vec<JournalEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JournalEntry {
    pub action: Action,
    /// Budget right after the action.
    pub budget_after: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Built(StructureId),
    Updated(StructureId),
    Removed(StructureId),
    Event(&'static str),
}

/// A player action.
#[derive(Clone, Debug)]
pub enum Command {
    Construct(StructureDraft),
    Update(StructureId, StructureChanges),
    Remove(StructureId),
    /// Draw an event from the session's deck.
    TriggerEvent,
    /// Apply a specific event, bypassing the draw.
    ApplyEvent(&'static Event),
}

/// Result of a successful command.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Built { id: StructureId, cost: Decimal },
    /// `delta` is positive when charged and negative when refunded.
    Updated { id: StructureId, delta: Decimal },
    Removed { id: StructureId, structure: Structure },
    EventApplied(&'static Event),
}

impl Outcome {
    fn action(&self) -> Action {
        match self {
            Outcome::Built { id, .. } => Action::Built(*id),
            Outcome::Updated { id, .. } => Action::Updated(*id),
            Outcome::Removed { id, .. } => Action::Removed(*id),
            Outcome::EventApplied(e) => Action::Event(e.name),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    City(#[from] CityError),
    #[error("the game is over")]
    Ended,
}

fn check_game_over(city: Res<City>, mut status: ResMut<SessionStatus>) {
    if *status == SessionStatus::Running && is_game_over(&city.ledger) {
        *status = SessionStatus::Over;
        info!(budget = %city.ledger.budget(), "game over");
    }
}

/// One game, from process start to game over.
pub struct Session {
    world: World,
    schedule: Schedule,
    seed: u64,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        let seed = config
            .rng_seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut world = World::new();
        world.insert_resource(City {
            ledger: Ledger::new(config.starting_budget, config.starting_resources),
            catalog: Catalog::default(),
        });
        world.insert_resource(Deck(EventDeck::seeded(seed)));
        world.insert_resource(Journal::default());
        world.insert_resource(SessionStatus::Running);

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(check_game_over);
        schedule.run(&mut world);

        info!(
            seed,
            budget = %config.starting_budget,
            resources = config.starting_resources,
            "session started"
        );
        Self {
            world,
            schedule,
            seed,
        }
    }

    /// Run one command. Refused commands leave every piece of state as it was.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        if self.is_over() {
            warn!(?command, "command after game over");
            return Err(SessionError::Ended);
        }
        let outcome = self.dispatch(command).map_err(|err| {
            warn!(%err, "action refused");
            err
        })?;
        let entry = JournalEntry {
            action: outcome.action(),
            budget_after: self.budget(),
        };
        self.world.resource_mut::<Journal>().entries.push(entry);
        self.schedule.run(&mut self.world);
        Ok(outcome)
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, CityError> {
        match command {
            Command::Construct(draft) => {
                let cost = draft.tier.cost();
                let mut city = self.world.resource_mut::<City>();
                let city = &mut *city;
                let id = city.catalog.construct(&mut city.ledger, draft)?;
                Ok(Outcome::Built { id, cost })
            }
            Command::Update(id, changes) => {
                let mut city = self.world.resource_mut::<City>();
                let city = &mut *city;
                let delta = city.catalog.update(&mut city.ledger, id, changes)?;
                Ok(Outcome::Updated { id, delta })
            }
            Command::Remove(id) => {
                let structure = self.world.resource_mut::<City>().catalog.remove(id)?;
                Ok(Outcome::Removed { id, structure })
            }
            Command::TriggerEvent => {
                let event = self.world.resource_mut::<Deck>().0.trigger_random_event();
                Ok(self.apply_event(event))
            }
            Command::ApplyEvent(event) => Ok(self.apply_event(event)),
        }
    }

    fn apply_event(&mut self, event: &'static Event) -> Outcome {
        city_events::apply(event, &mut self.world.resource_mut::<City>().ledger);
        Outcome::EventApplied(event)
    }

    fn city(&self) -> &City {
        self.world.resource::<City>()
    }

    pub fn budget(&self) -> Decimal {
        self.city().ledger.budget()
    }

    pub fn resources(&self) -> u32 {
        self.city().ledger.resources()
    }

    pub fn structures(&self) -> &[(StructureId, Structure)] {
        self.city().catalog.list()
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.city().catalog.get(id)
    }

    pub fn is_over(&self) -> bool {
        *self.world.resource::<SessionStatus>() == SessionStatus::Over
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.world.resource::<Journal>().entries
    }

    /// Seed of the event deck; reusing it replays the same events.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_core::{StructureKind, Tier};
    use proptest::prelude::*;

    fn session_with_budget(budget: i64) -> Session {
        let cfg = SessionConfig {
            starting_budget: Decimal::new(budget, 0),
            ..SessionConfig::default()
        }
        .with_seed(42);
        Session::new(&cfg)
    }

    fn plain(name: &str, tier: Tier) -> Command {
        Command::Construct(
            StructureDraft::new(name, StructureKind::Plain, tier).with_category("Residential"),
        )
    }

    fn event(name: &str) -> Command {
        Command::ApplyEvent(Event::lookup(name).unwrap())
    }

    #[test]
    fn end_to_end_scenarios() {
        let mut s = Session::new(&SessionConfig::default().with_seed(1));
        assert_eq!(s.budget(), Decimal::new(100_000, 0));
        assert_eq!(s.resources(), 100);

        let out = s.execute(plain("Plain#1", Tier::Low)).unwrap();
        let Outcome::Built { id, cost } = out else {
            panic!("expected a build");
        };
        assert_eq!(cost, Decimal::new(10_000, 0));
        assert_eq!(s.budget(), Decimal::new(90_000, 0));
        assert_eq!(s.structures().len(), 1);
        assert_eq!(s.structure(id).unwrap().name, "Plain#1");

        s.execute(event("External Investment")).unwrap();
        assert_eq!(s.budget(), Decimal::new(115_000, 0));
        assert!(!s.is_over());
    }

    #[test]
    fn unaffordable_build_changes_nothing() {
        let mut s = session_with_budget(5_000);
        let err = s.execute(plain("Tower", Tier::Medium)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::City(CityError::InsufficientFunds { .. })
        ));
        assert_eq!(s.budget(), Decimal::new(5_000, 0));
        assert!(s.structures().is_empty());
        assert!(s.journal().is_empty());
    }

    #[test]
    fn crisis_ends_the_game_and_latches() {
        let mut s = session_with_budget(5_000);
        s.execute(event("Economic Crisis")).unwrap();
        assert_eq!(s.budget(), Decimal::new(-15_000, 0));
        assert!(s.is_over());
        assert_eq!(s.execute(event("External Investment")), Err(SessionError::Ended));
        assert_eq!(s.execute(Command::TriggerEvent), Err(SessionError::Ended));
        assert_eq!(s.budget(), Decimal::new(-15_000, 0));
        assert!(s.is_over());
    }

    #[test]
    fn non_positive_start_is_over_immediately() {
        let mut s = session_with_budget(0);
        assert!(s.is_over());
        assert_eq!(s.execute(plain("x", Tier::Low)), Err(SessionError::Ended));
    }

    #[test]
    fn update_and_remove_flow() {
        let mut s = session_with_budget(100_000);
        let Outcome::Built { id, .. } = s.execute(plain("Hall", Tier::Medium)).unwrap() else {
            panic!("expected a build");
        };
        let out = s
            .execute(Command::Update(
                id,
                StructureChanges::new("Grand Hall", "Civic", Tier::High),
            ))
            .unwrap();
        assert_eq!(
            out,
            Outcome::Updated {
                id,
                delta: Decimal::new(30_000, 0)
            }
        );
        assert_eq!(s.budget(), Decimal::new(50_000, 0));

        let Outcome::Removed { structure, .. } = s.execute(Command::Remove(id)).unwrap() else {
            panic!("expected a removal");
        };
        assert_eq!(structure.name, "Grand Hall");
        assert_eq!(s.budget(), Decimal::new(50_000, 0));
        assert_eq!(
            s.execute(Command::Remove(id)),
            Err(SessionError::City(CityError::NotFound(id)))
        );

        let actions: Vec<_> = s.journal().iter().map(|e| e.action.clone()).collect();
        assert_eq!(
            actions,
            [Action::Built(id), Action::Updated(id), Action::Removed(id)]
        );
        assert_eq!(s.journal()[1].budget_after, Decimal::new(50_000, 0));
    }

    #[test]
    fn seeded_sessions_replay_events() {
        let cfg = SessionConfig {
            starting_budget: Decimal::new(10_000_000, 0),
            ..SessionConfig::default()
        }
        .with_seed(2024);
        let mut a = Session::new(&cfg);
        let mut b = Session::new(&cfg);
        for _ in 0..20 {
            assert_eq!(
                a.execute(Command::TriggerEvent).unwrap(),
                b.execute(Command::TriggerEvent).unwrap()
            );
        }
        assert_eq!(a.budget(), b.budget());
        assert_eq!(a.seed(), 2024);
    }

    #[test]
    fn unseeded_session_records_its_seed() {
        let s = Session::new(&SessionConfig::default());
        let replay = Session::new(&SessionConfig::default().with_seed(s.seed()));
        assert_eq!(replay.seed(), s.seed());
    }

    proptest! {
        #[test]
        fn game_over_stays_over(start in 1i64..60_000, extra_events in 0usize..5) {
            let mut s = session_with_budget(start);
            while !s.is_over() {
                s.execute(event("Economic Crisis")).unwrap();
            }
            for _ in 0..extra_events {
                prop_assert_eq!(s.execute(event("External Investment")), Err(SessionError::Ended));
            }
            prop_assert!(s.is_over());
            prop_assert!(s.budget() <= Decimal::ZERO);
        }
    }
}
