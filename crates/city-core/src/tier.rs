use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CityError;

/// Construction quality level; applies uniformly to every structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// 10,000 currency units.
    Low,
    /// 20,000 currency units.
    Medium,
    /// 50,000 currency units.
    High,
}

impl Tier {
    /// Every tier in menu order.
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    /// Fixed construction cost of this tier.
    pub fn cost(self) -> Decimal {
        match self {
            Tier::Low => Decimal::new(10_000, 0),
            Tier::Medium => Decimal::new(20_000, 0),
            Tier::High => Decimal::new(50_000, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Low => "LOW",
            Tier::Medium => "MEDIUM",
            Tier::High => "HIGH",
        }
    }
}

/// Cost lookup over the fixed tier table.
pub fn cost_of(tier: Tier) -> Decimal {
    tier.cost()
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = CityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tier::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CityError::InvalidInput(format!("unknown tier '{wanted}'")))
    }
}
