use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{starting_budget, CityError, STARTING_RESOURCES};

/// City budget and resource counters with guarded mutation.
///
/// Construction paths go through [`Ledger::spend_budget`], which refuses to
/// overdraw. Only [`Ledger::absorb_impact`] can push the budget below zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    budget: Decimal,
    resources: u32,
}

impl Ledger {
    pub fn new(budget: Decimal, resources: u32) -> Self {
        Self { budget, resources }
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    /// Credit the budget. Always succeeds.
    pub fn add_budget(&mut self, amount: Decimal) {
        self.budget += amount;
        debug!(%amount, budget = %self.budget, "budget credited");
    }

    /// Debit the budget if it covers `amount`; otherwise leave it untouched.
    pub fn spend_budget(&mut self, amount: Decimal) -> Result<(), CityError> {
        if self.budget < amount {
            return Err(CityError::InsufficientFunds {
                needed: amount,
                available: self.budget,
            });
        }
        self.budget -= amount;
        debug!(%amount, budget = %self.budget, "budget spent");
        Ok(())
    }

    pub fn add_resources(&mut self, amount: u32) {
        self.resources = self.resources.saturating_add(amount);
    }

    pub fn consume_resources(&mut self, amount: u32) -> Result<(), CityError> {
        self.resources = self
            .resources
            .checked_sub(amount)
            .ok_or(CityError::InsufficientResources {
                needed: amount,
                available: self.resources,
            })?;
        Ok(())
    }

    /// Subtract an event impact with no guard and no clamping.
    ///
    /// A negative impact credits the budget.
    pub fn absorb_impact(&mut self, impact: Decimal) {
        self.budget -= impact;
        debug!(%impact, budget = %self.budget, "impact absorbed");
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(starting_budget(), STARTING_RESOURCES)
    }
}
