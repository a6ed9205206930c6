#![deny(warnings)]

//! Random city events: a fixed table of crises and one windfall.
//!
//! Events bypass the ledger's overdraft guard. Applying one always moves the
//! budget by the full impact, which is how a city runs out of money.

use city_core::Ledger;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use tracing::info;

/// A budget-impacting occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: &'static str,
    pub description: &'static str,
    impact: i64,
}

/// Every event that can be drawn, in draw order.
pub static EVENTS: [Event; 4] = [
    Event {
        name: "Economic Crisis",
        description: "A sudden downturn hits the economy!",
        impact: 20_000,
    },
    Event {
        name: "Natural Disaster",
        description: "Severe storms strike the city!",
        impact: 15_000,
    },
    Event {
        name: "General Strike",
        description: "Public workers walk off the job!",
        impact: 10_000,
    },
    Event {
        name: "External Investment",
        description: "A major investment arrives in the city!",
        impact: -25_000,
    },
];

impl Event {
    /// Signed cost of the event: positive drains the budget, negative credits it.
    pub fn budget_impact(&self) -> Decimal {
        Decimal::from(self.impact)
    }

    pub fn is_windfall(&self) -> bool {
        self.impact < 0
    }

    /// Find a table entry by name (case-insensitive).
    pub fn lookup(name: &str) -> Option<&'static Event> {
        EVENTS.iter().find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Draws events uniformly from [`EVENTS`] using an injected random source.
#[derive(Debug, Clone)]
pub struct EventDeck<R = ChaCha8Rng> {
    rng: R,
}

impl EventDeck<ChaCha8Rng> {
    /// Deterministic deck for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> EventDeck<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn trigger_random_event(&mut self) -> &'static Event {
        let idx = self.rng.gen_range(0..EVENTS.len());
        &EVENTS[idx]
    }
}

/// Apply an event to the ledger. Never refused, never clamped.
pub fn apply(event: &Event, ledger: &mut Ledger) {
    ledger.absorb_impact(event.budget_impact());
    info!(
        event = event.name,
        impact = %event.budget_impact(),
        budget = %ledger.budget(),
        "event applied"
    );
}
