//! City buildings - per-type counts for one city

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{CityId, FactionId};

/// Type of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Hospital,
    Factory,
    Railway,
    Port,
    Fortress,
}

impl BuildingType {
    pub const ALL: [BuildingType; 5] = [
        BuildingType::Hospital,
        BuildingType::Factory,
        BuildingType::Railway,
        BuildingType::Port,
        BuildingType::Fortress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BuildingType::Hospital => "hospital",
            BuildingType::Factory => "factory",
            BuildingType::Railway => "railway",
            BuildingType::Port => "port",
            BuildingType::Fortress => "fortress",
        }
    }
}

/// Building counts of one city
///
/// `owner` duplicates the city record's owner so building queries need no
/// join; the garrison reconciler keeps both in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityBuildings {
    pub city: CityId,
    pub owner: FactionId,
    #[serde(default)]
    counts: BTreeMap<BuildingType, u32>,
}

impl CityBuildings {
    pub fn new(city: CityId, owner: FactionId) -> Self {
        Self {
            city,
            owner,
            counts: BTreeMap::new(),
        }
    }

    pub fn with(mut self, building: BuildingType, count: u32) -> Self {
        self.set(building, count);
        self
    }

    pub fn get(&self, building: BuildingType) -> u32 {
        self.counts.get(&building).copied().unwrap_or(0)
    }

    pub fn set(&mut self, building: BuildingType, count: u32) {
        if count == 0 {
            self.counts.remove(&building);
        } else {
            self.counts.insert(building, count);
        }
    }

    /// Remove up to `count` buildings of a type, returns how many were removed
    pub fn remove(&mut self, building: BuildingType, count: u32) -> u32 {
        let current = self.get(building);
        let removed = count.min(current);
        self.set(building, current - removed);
        removed
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingType, u32)> + '_ {
        self.counts.iter().map(|(b, c)| (*b, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut buildings = CityBuildings::new(CityId(1), FactionId(1))
            .with(BuildingType::Hospital, 2)
            .with(BuildingType::Port, 1);

        assert_eq!(buildings.total(), 3);
        assert_eq!(buildings.get(BuildingType::Factory), 0);

        assert_eq!(buildings.remove(BuildingType::Hospital, 5), 2);
        assert_eq!(buildings.get(BuildingType::Hospital), 0);
        assert_eq!(buildings.total(), 1);
        assert!(!buildings.is_empty());
    }

    #[test]
    fn test_total_beyond_u32() {
        let buildings = CityBuildings::new(CityId(1), FactionId(1))
            .with(BuildingType::Hospital, u32::MAX)
            .with(BuildingType::Factory, u32::MAX);
        assert_eq!(buildings.total(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_zero_count_is_not_stored() {
        let buildings = CityBuildings::new(CityId(1), FactionId(1)).with(BuildingType::Railway, 0);
        assert!(buildings.is_empty());
        assert_eq!(buildings.iter().count(), 0);
    }
}
