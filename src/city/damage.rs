//! Infrastructure damage - leftover offensive power levels buildings
//!
//! Power converts to a budget of `floor(power / damage_per_building)`
//! buildings, spent down the configured priority list one type at a time.

use serde::{Deserialize, Serialize};

use super::building::{BuildingType, CityBuildings};
use crate::core::config::BattleConfig;
use crate::core::types::CityId;

/// Buildings destroyed in one city, per type in the order they were hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub destroyed: Vec<(BuildingType, u32)>,
}

impl DamageReport {
    pub fn add(&mut self, building: BuildingType, count: u32) {
        if count == 0 {
            return;
        }
        match self.destroyed.iter_mut().find(|(b, _)| *b == building) {
            Some((_, total)) => *total += count,
            None => self.destroyed.push((building, count)),
        }
    }

    pub fn merge(&mut self, other: &DamageReport) {
        for (building, count) in &other.destroyed {
            self.add(*building, *count);
        }
    }

    pub fn total(&self) -> u64 {
        self.destroyed.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty()
    }
}

/// Number of buildings a given power can destroy
pub fn building_budget(power: f64, config: &BattleConfig) -> u32 {
    if power <= 0.0 {
        return 0;
    }
    let budget = (power / config.damage_per_building).floor();
    if budget >= u32::MAX as f64 {
        u32::MAX
    } else {
        budget as u32
    }
}

/// Apply one burst of damage to a city's buildings
///
/// Only types on the priority list are touched. A city with no buildings is
/// left as it is.
pub fn apply_infrastructure_damage(
    buildings: &mut CityBuildings,
    power: f64,
    config: &BattleConfig,
) -> DamageReport {
    let mut report = DamageReport::default();
    if buildings.is_empty() {
        return report;
    }

    let mut budget = building_budget(power, config);
    for &building in &config.damage_priority {
        if budget == 0 {
            break;
        }
        let removed = buildings.remove(building, budget);
        if removed > 0 {
            tracing::debug!("{} lost {} {}(s)", buildings.city, removed, building.label());
            report.add(building, removed);
            budget -= removed;
        }
    }

    report
}

/// Damage applied to one city over a whole battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfrastructureDamage {
    pub city: CityId,
    /// Building counts after every burst was applied
    pub buildings: CityBuildings,
    pub report: DamageReport,
}

/// Apply a sequence of bursts, one per pairwise round, in order
pub fn apply_damage_bursts(
    mut buildings: CityBuildings,
    bursts: impl IntoIterator<Item = f64>,
    config: &BattleConfig,
) -> InfrastructureDamage {
    let mut report = DamageReport::default();
    for power in bursts {
        let burst = apply_infrastructure_damage(&mut buildings, power, config);
        report.merge(&burst);
    }
    InfrastructureDamage {
        city: buildings.city,
        buildings,
        report,
    }
}
