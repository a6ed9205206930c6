use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{cost_of, CityError, Ledger, Structure, StructureChanges, StructureDraft};

/// Stable handle to a catalog entry. Never reused within a catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureId(pub u64);

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered arena of every structure in the city.
///
/// Insertion order is display order. Construction and tier changes are
/// charged against the ledger passed in; a refused charge leaves both the
/// ledger and the catalog untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<(StructureId, Structure)>,
    last_id: u64,
}

impl Catalog {
    /// Charge the tier cost and append a new structure.
    pub fn construct(
        &mut self,
        ledger: &mut Ledger,
        draft: StructureDraft,
    ) -> Result<StructureId, CityError> {
        let cost = cost_of(draft.tier);
        ledger.spend_budget(cost)?;
        self.last_id += 1;
        let id = StructureId(self.last_id);
        debug!(%id, name = %draft.name, tier = %draft.tier, %cost, "structure built");
        self.entries.push((id, draft.into_structure()));
        Ok(id)
    }

    /// Apply `changes` in place, charging or refunding the tier cost delta.
    ///
    /// Returns the delta (positive when charged, negative when refunded).
    pub fn update(
        &mut self,
        ledger: &mut Ledger,
        id: StructureId,
        changes: StructureChanges,
    ) -> Result<Decimal, CityError> {
        let idx = self.position(id).ok_or(CityError::NotFound(id))?;
        let current = &mut self.entries[idx].1;
        let delta = cost_of(changes.tier) - cost_of(current.tier);
        if delta > Decimal::ZERO {
            ledger.spend_budget(delta)?;
        } else if delta < Decimal::ZERO {
            ledger.add_budget(-delta);
        }
        current.name = changes.name;
        current.category = changes.category;
        current.tier = changes.tier;
        if let Some(kind) = changes.kind {
            current.kind = kind;
        }
        debug!(%id, %delta, "structure updated");
        Ok(delta)
    }

    /// Drop a structure. Its construction cost is not refunded.
    pub fn remove(&mut self, id: StructureId) -> Result<Structure, CityError> {
        let idx = self.position(id).ok_or(CityError::NotFound(id))?;
        let (_, removed) = self.entries.remove(idx);
        debug!(%id, name = %removed.name, "structure removed");
        Ok(removed)
    }

    pub fn list(&self) -> &[(StructureId, Structure)] {
        &self.entries
    }

    pub fn get(&self, id: StructureId) -> Option<&Structure> {
        self.entries.iter().find(|(e, _)| *e == id).map(|(_, s)| s)
    }

    pub fn position(&self, id: StructureId) -> Option<usize> {
        self.entries.iter().position(|(e, _)| *e == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
