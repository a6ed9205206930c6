#![deny(warnings)]

//! Core domain model for the city builder.
//!
//! This crate holds the budget/resource ledger, the three construction
//! tiers, the structure catalog and the game-over predicate. Everything is
//! synchronous and free of user-facing I/O; callers observe `Result`s and
//! decide presentation themselves.

mod catalog;
mod ledger;
mod structure;
mod tier;

pub use catalog::{Catalog, StructureId};
pub use ledger::Ledger;
pub use structure::{Structure, StructureChanges, StructureDraft, StructureKind};
pub use tier::{cost_of, Tier};

use rust_decimal::Decimal;
use thiserror::Error;

/// Resources every new city starts with.
pub const STARTING_RESOURCES: u32 = 100;

/// Budget every new city starts with (100,000 currency units).
pub fn starting_budget() -> Decimal {
    Decimal::new(100_000, 0)
}

/// Errors produced by ledger and catalog operations.
///
/// All of them are recoverable: the failed action leaves state untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CityError {
    /// Budget is lower than the amount an action needs.
    #[error("insufficient budget: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    /// Resource counter is lower than the amount requested.
    #[error("insufficient resources: need {needed}, have {available}")]
    InsufficientResources { needed: u32, available: u32 },
    /// Structure id is stale or was never issued.
    #[error("structure {0} not found")]
    NotFound(StructureId),
    /// Raw input could not be turned into a valid value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// True once the budget has fallen to zero or below.
pub fn is_game_over(ledger: &Ledger) -> bool {
    ledger.budget() <= Decimal::ZERO
}
