use crate::army::UnitStats;
use crate::city::CityBuildings;
use crate::core::types::{CityId, FactionId};
use crate::stats::{Dossier, WarStats};

use super::error::StoreResult;
use super::records::{CityRecord, GarrisonRow};
use super::transaction::Transaction;

/// Persistence collaborator for battle resolution
///
/// Reads are typed lookups. All mutation goes through [`WarStore::commit`],
/// which must apply the whole transaction or none of it.
pub trait WarStore {
    /// Look up a city record
    fn city(&self, id: CityId) -> StoreResult<Option<CityRecord>>;

    /// All garrison rows of a city, in insertion order
    fn garrison(&self, city: CityId) -> StoreResult<Vec<GarrisonRow>>;

    /// Building counts of a city, if it has a building record
    fn buildings(&self, city: CityId) -> StoreResult<Option<CityBuildings>>;

    /// Reference stats for a unit type
    fn unit_stats(&self, unit_name: &str) -> StoreResult<Option<UnitStats>>;

    /// Running war totals of a faction
    fn war_stats(&self, faction: FactionId) -> StoreResult<Option<WarStats>>;

    /// Experience counter of a faction (zero if never credited)
    fn experience(&self, faction: FactionId) -> StoreResult<f64>;

    /// Win/loss dossier of a faction
    fn dossier(&self, faction: FactionId) -> StoreResult<Option<Dossier>>;

    /// Apply a write batch atomically
    fn commit(&mut self, tx: Transaction) -> StoreResult<()>;
}
