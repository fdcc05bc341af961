//! Write batches applied atomically by a `WarStore`

use serde::Serialize;

use crate::city::CityBuildings;
use crate::core::types::{CityId, FactionId};
use crate::stats::WarStats;

/// A single mutation inside a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WriteOp {
    /// Remove every garrison row of a city
    ClearGarrison { city: CityId },
    /// Insert or overwrite the `(city, unit_name)` row
    UpsertGarrison {
        city: CityId,
        unit_name: String,
        unit_count: u32,
        unit_image: String,
    },
    /// Remove one garrison row if present
    DeleteGarrisonRow { city: CityId, unit_name: String },
    /// Reassign the authoritative city owner
    SetCityOwner { city: CityId, owner: FactionId },
    /// Reassign the owner copy kept on the city's building record
    SetBuildingsOwner { city: CityId, owner: FactionId },
    /// Replace a city's building counts
    SetBuildings(CityBuildings),
    /// Add to a faction's running war totals, creating the row if needed
    UpsertWarStats { faction: FactionId, delta: WarStats },
    /// Add to a faction's experience counter
    AddExperience { faction: FactionId, amount: f64 },
    /// Count one battle in a faction's dossier
    RecordDossier { faction: FactionId, won: bool },
}

/// Ordered batch of writes that commits all-or-nothing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    label: &'static str,
    ops: Vec<WriteOp>,
}

impl Transaction {
    /// Begin a new batch; the label only appears in logs
    pub fn begin(label: &'static str) -> Self {
        Self {
            label,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
