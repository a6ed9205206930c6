use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use city_core::{starting_budget, STARTING_RESOURCES};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Session setup. Every field is optional in YAML.
///
/// ```yaml
/// starting_budget: 100000
/// starting_resources: 100
/// rng_seed: 42
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub starting_budget: Decimal,
    pub starting_resources: u32,
    /// Seed for the event deck; drawn from the thread RNG when absent.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_budget: starting_budget(),
            starting_resources: STARTING_RESOURCES,
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid session config")
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
