//! Typed persistence records
//!
//! Raw rows are converted into these at the store boundary, so the battle
//! code never sees loosely typed data.

use serde::{Deserialize, Serialize};

use crate::army::UnitStats;
use crate::core::types::{CityId, FactionId};

/// Authoritative city record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: CityId,
    pub name: String,
    pub owner: FactionId,
}

/// One garrison row, keyed by `(city, unit_name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarrisonRow {
    pub city: CityId,
    pub unit_name: String,
    pub unit_count: u32,
    #[serde(default)]
    pub unit_image: String,
}

/// Unit type reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCatalogEntry {
    pub unit_name: String,
    pub stats: UnitStats,
}
