use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Tier;

/// Variant-specific payload of a structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureKind {
    /// Generic building; its category is chosen by the player.
    Plain,
    Park {
        /// Green area in square meters.
        green_area_m2: u32,
    },
    Factory {
        /// Units produced per cycle.
        production_capacity: u32,
    },
    Transport {
        capacity: u32,
        /// Free-form mode, e.g. "Bus" or "Metro".
        transport_kind: String,
    },
    PublicService {
        /// Free-form service, e.g. "Hospital".
        service_kind: String,
        service_capacity: u32,
    },
}

impl StructureKind {
    /// Display label for the variant tag.
    pub fn label(&self) -> &'static str {
        match self {
            StructureKind::Plain => "Building",
            StructureKind::Park { .. } => "Park",
            StructureKind::Factory { .. } => "Factory",
            StructureKind::Transport { .. } => "Transport",
            StructureKind::PublicService { .. } => "Public Service",
        }
    }
}

/// A structure owned by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    /// Category shown in listings; defaults to the variant label.
    pub category: String,
    pub tier: Tier,
    pub kind: StructureKind,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, Tier: {})", self.name, self.category, self.tier)?;
        match &self.kind {
            StructureKind::Plain => Ok(()),
            StructureKind::Park { green_area_m2 } => {
                write!(f, " - Green area: {green_area_m2}m²")
            }
            StructureKind::Factory {
                production_capacity,
            } => write!(f, " - Production capacity: {production_capacity} units"),
            StructureKind::Transport {
                capacity,
                transport_kind,
            } => write!(f, " - Kind: {transport_kind} (Capacity: {capacity})"),
            StructureKind::PublicService {
                service_kind,
                service_capacity,
            } => write!(f, " - Kind: {service_kind} (Capacity: {service_capacity})"),
        }
    }
}

/// Fully validated inputs for a construction action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureDraft {
    pub name: String,
    pub category: String,
    pub kind: StructureKind,
    pub tier: Tier,
}

impl StructureDraft {
    /// Draft whose category is the variant label.
    pub fn new(name: impl Into<String>, kind: StructureKind, tier: Tier) -> Self {
        Self {
            name: name.into(),
            category: kind.label().to_string(),
            kind,
            tier,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub(crate) fn into_structure(self) -> Structure {
        Structure {
            name: self.name,
            category: self.category,
            tier: self.tier,
            kind: self.kind,
        }
    }
}

/// In-place edits applied by an update action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureChanges {
    pub name: String,
    pub category: String,
    pub tier: Tier,
    /// Replacement payload; `None` keeps the current one.
    pub kind: Option<StructureKind>,
}

impl StructureChanges {
    pub fn new(name: impl Into<String>, category: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            tier,
            kind: None,
        }
    }
}
