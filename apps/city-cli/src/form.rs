//! Validated-input boundary between the terminal and the session.
//!
//! Every prompt reads one line. A blank answer or end of input cancels the
//! whole form, so a half-filled form never reaches the session.

use std::io::{self, BufRead, Write};

use city_core::{CityError, Structure, StructureChanges, StructureDraft, StructureKind, Tier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Invalid(#[from] CityError),
}

/// Line-oriented prompt over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Prompt and read one raw line; `None` at end of input.
    pub fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a required field; blank or end of input cancels.
    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        Ok(self.read_line(label)?.filter(|s| !s.is_empty()))
    }

    pub fn ask_count(&mut self, label: &str) -> Result<Option<u32>, FormError> {
        match self.ask(label)? {
            Some(raw) => Ok(Some(parse_count(label, &raw)?)),
            None => Ok(None),
        }
    }

    pub fn ask_tier(&mut self) -> Result<Option<Tier>, FormError> {
        let label = "Tier [1) LOW R$ 10.000  2) MEDIUM R$ 20.000  3) HIGH R$ 50.000]";
        match self.ask(label)? {
            Some(raw) => Ok(Some(parse_tier(&raw)?)),
            None => Ok(None),
        }
    }
}

/// Non-negative whole number typed by the player.
pub fn parse_count(field: &str, raw: &str) -> Result<u32, CityError> {
    raw.trim()
        .parse()
        .map_err(|_| CityError::InvalidInput(format!("'{raw}' is not a valid number for {field}")))
}

/// Menu ordinal (`1`..`3`) or tier name.
pub fn parse_tier(raw: &str) -> Result<Tier, CityError> {
    match raw.trim() {
        "1" => Ok(Tier::Low),
        "2" => Ok(Tier::Medium),
        "3" => Ok(Tier::High),
        other => other.parse(),
    }
}

/// What the player asked to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildKind {
    Building,
    Transport,
    Park,
    Factory,
    PublicService,
}

/// Collect every input a construction needs, or `None` if cancelled.
pub fn read_draft<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    kind: BuildKind,
) -> Result<Option<StructureDraft>, FormError> {
    let draft = match kind {
        BuildKind::Building => {
            let Some(name) = console.ask("Building name")? else {
                return Ok(None);
            };
            let Some(category) = console.ask("Building category")? else {
                return Ok(None);
            };
            let Some(tier) = console.ask_tier()? else {
                return Ok(None);
            };
            StructureDraft::new(name, StructureKind::Plain, tier).with_category(category)
        }
        BuildKind::Park => {
            let Some(name) = console.ask("Park name")? else {
                return Ok(None);
            };
            let Some(green_area_m2) = console.ask_count("Green area (m²)")? else {
                return Ok(None);
            };
            let Some(tier) = console.ask_tier()? else {
                return Ok(None);
            };
            StructureDraft::new(name, StructureKind::Park { green_area_m2 }, tier)
        }
        BuildKind::Factory => {
            let Some(name) = console.ask("Factory name")? else {
                return Ok(None);
            };
            let Some(production_capacity) = console.ask_count("Production capacity")? else {
                return Ok(None);
            };
            let Some(tier) = console.ask_tier()? else {
                return Ok(None);
            };
            StructureDraft::new(
                name,
                StructureKind::Factory {
                    production_capacity,
                },
                tier,
            )
        }
        BuildKind::Transport => {
            let Some(name) = console.ask("Transport name")? else {
                return Ok(None);
            };
            let Some(capacity) = console.ask_count("Transport capacity")? else {
                return Ok(None);
            };
            let Some(transport_kind) = console.ask("Transport kind")? else {
                return Ok(None);
            };
            let Some(tier) = console.ask_tier()? else {
                return Ok(None);
            };
            StructureDraft::new(
                name,
                StructureKind::Transport {
                    capacity,
                    transport_kind,
                },
                tier,
            )
        }
        BuildKind::PublicService => {
            let Some(name) = console.ask("Public service name")? else {
                return Ok(None);
            };
            let Some(service_capacity) = console.ask_count("Service capacity")? else {
                return Ok(None);
            };
            let Some(service_kind) = console.ask("Service kind")? else {
                return Ok(None);
            };
            let Some(tier) = console.ask_tier()? else {
                return Ok(None);
            };
            StructureDraft::new(
                name,
                StructureKind::PublicService {
                    service_kind,
                    service_capacity,
                },
                tier,
            )
        }
    };
    Ok(Some(draft))
}

/// Collect the edits for an update, or `None` if cancelled.
pub fn read_changes<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    current: &Structure,
) -> Result<Option<StructureChanges>, FormError> {
    let Some(name) = console.ask(&format!("New name (was {})", current.name))? else {
        return Ok(None);
    };
    let Some(category) = console.ask(&format!("New category (was {})", current.category))? else {
        return Ok(None);
    };
    let Some(tier) = console.ask_tier()? else {
        return Ok(None);
    };
    Ok(Some(StructureChanges::new(name, category, tier)))
}
