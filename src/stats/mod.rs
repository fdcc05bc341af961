//! War statistics - running totals, experience and dossiers per faction

pub mod recorder;

use serde::{Deserialize, Serialize};

pub use recorder::{battle_experience, plan_outcome_records, record_outcome};

/// Running combat totals for one faction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarStats {
    /// Units sent into battle
    pub units_combat: u64,
    /// Own units lost
    pub units_destroyed: u64,
    /// Enemy units killed
    pub units_killed: u64,
}

impl WarStats {
    pub fn add(&mut self, other: &WarStats) {
        self.units_combat += other.units_combat;
        self.units_destroyed += other.units_destroyed;
        self.units_killed += other.units_killed;
    }
}

/// Battles won and lost by a faction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
    pub wins: u32,
    pub losses: u32,
}

impl Dossier {
    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}
