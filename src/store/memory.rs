//! In-memory `WarStore`
//!
//! Commits apply the batch to a working copy of the state and swap it in only
//! when every op succeeded, so a failed batch leaves nothing behind.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::army::UnitStats;
use crate::city::CityBuildings;
use crate::core::types::{CityId, FactionId};
use crate::stats::{Dossier, WarStats};

use super::error::{StoreError, StoreResult};
use super::records::{CityRecord, GarrisonRow, UnitCatalogEntry};
use super::traits::WarStore;
use super::transaction::{Transaction, WriteOp};

#[derive(Debug, Clone, Default)]
struct StoreState {
    cities: AHashMap<CityId, CityRecord>,
    garrisons: AHashMap<CityId, Vec<GarrisonRow>>,
    buildings: AHashMap<CityId, CityBuildings>,
    units: AHashMap<String, UnitStats>,
    war_stats: AHashMap<FactionId, WarStats>,
    experience: AHashMap<FactionId, f64>,
    dossiers: AHashMap<FactionId, Dossier>,
}

impl StoreState {
    fn require_city(&self, city: CityId) -> StoreResult<()> {
        if self.cities.contains_key(&city) {
            Ok(())
        } else {
            Err(StoreError::UnknownCity(city))
        }
    }

    fn upsert_garrison(&mut self, row: GarrisonRow) {
        let rows = self.garrisons.entry(row.city).or_default();
        match rows.iter_mut().find(|r| r.unit_name == row.unit_name) {
            Some(existing) => {
                existing.unit_count = row.unit_count;
                existing.unit_image = row.unit_image;
            }
            None => rows.push(row),
        }
    }

    fn apply(&mut self, op: WriteOp) -> StoreResult<()> {
        match op {
            WriteOp::ClearGarrison { city } => {
                self.require_city(city)?;
                self.garrisons.remove(&city);
            }
            WriteOp::UpsertGarrison {
                city,
                unit_name,
                unit_count,
                unit_image,
            } => {
                self.require_city(city)?;
                if unit_count == 0 {
                    return Err(StoreError::Rejected(format!(
                        "garrison row {} in {} must hold at least one unit",
                        unit_name, city
                    )));
                }
                self.upsert_garrison(GarrisonRow {
                    city,
                    unit_name,
                    unit_count,
                    unit_image,
                });
            }
            WriteOp::DeleteGarrisonRow { city, unit_name } => {
                if let Some(rows) = self.garrisons.get_mut(&city) {
                    rows.retain(|r| r.unit_name != unit_name);
                }
            }
            WriteOp::SetCityOwner { city, owner } => {
                let record = self
                    .cities
                    .get_mut(&city)
                    .ok_or(StoreError::UnknownCity(city))?;
                record.owner = owner;
            }
            WriteOp::SetBuildingsOwner { city, owner } => {
                self.require_city(city)?;
                if let Some(buildings) = self.buildings.get_mut(&city) {
                    buildings.owner = owner;
                }
            }
            WriteOp::SetBuildings(buildings) => {
                self.require_city(buildings.city)?;
                self.buildings.insert(buildings.city, buildings);
            }
            WriteOp::UpsertWarStats { faction, delta } => {
                self.war_stats.entry(faction).or_default().add(&delta);
            }
            WriteOp::AddExperience { faction, amount } => {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(StoreError::Rejected(format!(
                        "experience gain {} for {} is not a non-negative number",
                        amount, faction
                    )));
                }
                *self.experience.entry(faction).or_insert(0.0) += amount;
            }
            WriteOp::RecordDossier { faction, won } => {
                self.dossiers.entry(faction).or_default().record(won);
            }
        }
        Ok(())
    }
}

/// Running war totals row for snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarStatsRow {
    pub faction: FactionId,
    #[serde(flatten)]
    pub stats: WarStats,
}

/// Experience counter row for snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRow {
    pub faction: FactionId,
    pub experience: f64,
}

/// Dossier row for snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DossierRow {
    pub faction: FactionId,
    #[serde(flatten)]
    pub dossier: Dossier,
}

/// Flat, serializable copy of everything an `InMemoryStore` holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub cities: Vec<CityRecord>,
    pub garrisons: Vec<GarrisonRow>,
    pub buildings: Vec<CityBuildings>,
    pub units: Vec<UnitCatalogEntry>,
    pub war_stats: Vec<WarStatsRow>,
    pub experience: Vec<ExperienceRow>,
    pub dossiers: Vec<DossierRow>,
}

/// In-memory implementation of `WarStore`
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: StoreState,
    commits: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut state = StoreState::default();
        for city in snapshot.cities {
            state.cities.insert(city.id, city);
        }
        for row in snapshot.garrisons {
            state.upsert_garrison(row);
        }
        for buildings in snapshot.buildings {
            state.buildings.insert(buildings.city, buildings);
        }
        for unit in snapshot.units {
            state.units.insert(unit.unit_name, unit.stats);
        }
        for row in snapshot.war_stats {
            state.war_stats.insert(row.faction, row.stats);
        }
        for row in snapshot.experience {
            state.experience.insert(row.faction, row.experience);
        }
        for row in snapshot.dossiers {
            state.dossiers.insert(row.faction, row.dossier);
        }
        Self { state, commits: 0 }
    }

    /// Dump the current state, ordered by id
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut cities: Vec<CityRecord> = self.state.cities.values().cloned().collect();
        cities.sort_by_key(|c| c.id);

        let mut city_ids: Vec<CityId> = self.state.garrisons.keys().copied().collect();
        city_ids.sort();
        let garrisons = city_ids
            .iter()
            .flat_map(|id| self.state.garrisons[id].iter().cloned())
            .collect();

        let mut buildings: Vec<CityBuildings> = self.state.buildings.values().cloned().collect();
        buildings.sort_by_key(|b| b.city);

        let mut units: Vec<UnitCatalogEntry> = self
            .state
            .units
            .iter()
            .map(|(name, stats)| UnitCatalogEntry {
                unit_name: name.clone(),
                stats: *stats,
            })
            .collect();
        units.sort_by(|a, b| a.unit_name.cmp(&b.unit_name));

        let mut war_stats: Vec<WarStatsRow> = self
            .state
            .war_stats
            .iter()
            .map(|(faction, stats)| WarStatsRow {
                faction: *faction,
                stats: *stats,
            })
            .collect();
        war_stats.sort_by_key(|r| r.faction);

        let mut experience: Vec<ExperienceRow> = self
            .state
            .experience
            .iter()
            .map(|(faction, amount)| ExperienceRow {
                faction: *faction,
                experience: *amount,
            })
            .collect();
        experience.sort_by_key(|r| r.faction);

        let mut dossiers: Vec<DossierRow> = self
            .state
            .dossiers
            .iter()
            .map(|(faction, dossier)| DossierRow {
                faction: *faction,
                dossier: *dossier,
            })
            .collect();
        dossiers.sort_by_key(|r| r.faction);

        StoreSnapshot {
            cities,
            garrisons,
            buildings,
            units,
            war_stats,
            experience,
            dossiers,
        }
    }

    pub fn with_city(mut self, id: CityId, name: impl Into<String>, owner: FactionId) -> Self {
        self.state.cities.insert(
            id,
            CityRecord {
                id,
                name: name.into(),
                owner,
            },
        );
        self
    }

    pub fn with_garrison(mut self, city: CityId, unit_name: impl Into<String>, count: u32) -> Self {
        self.state.upsert_garrison(GarrisonRow {
            city,
            unit_name: unit_name.into(),
            unit_count: count,
            unit_image: String::new(),
        });
        self
    }

    pub fn with_buildings(mut self, buildings: CityBuildings) -> Self {
        self.state.buildings.insert(buildings.city, buildings);
        self
    }

    pub fn with_unit(mut self, unit_name: impl Into<String>, stats: UnitStats) -> Self {
        self.state.units.insert(unit_name.into(), stats);
        self
    }

    /// Number of transactions committed so far
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Garrison count of one unit type in a city (zero if absent)
    pub fn garrison_count(&self, city: CityId, unit_name: &str) -> u32 {
        self.state
            .garrisons
            .get(&city)
            .and_then(|rows| rows.iter().find(|r| r.unit_name == unit_name))
            .map(|r| r.unit_count)
            .unwrap_or(0)
    }
}

impl WarStore for InMemoryStore {
    fn city(&self, id: CityId) -> StoreResult<Option<CityRecord>> {
        Ok(self.state.cities.get(&id).cloned())
    }

    fn garrison(&self, city: CityId) -> StoreResult<Vec<GarrisonRow>> {
        Ok(self.state.garrisons.get(&city).cloned().unwrap_or_default())
    }

    fn buildings(&self, city: CityId) -> StoreResult<Option<CityBuildings>> {
        Ok(self.state.buildings.get(&city).cloned())
    }

    fn unit_stats(&self, unit_name: &str) -> StoreResult<Option<UnitStats>> {
        Ok(self.state.units.get(unit_name).copied())
    }

    fn war_stats(&self, faction: FactionId) -> StoreResult<Option<WarStats>> {
        Ok(self.state.war_stats.get(&faction).copied())
    }

    fn experience(&self, faction: FactionId) -> StoreResult<f64> {
        Ok(self.state.experience.get(&faction).copied().unwrap_or(0.0))
    }

    fn dossier(&self, faction: FactionId) -> StoreResult<Option<Dossier>> {
        Ok(self.state.dossiers.get(&faction).copied())
    }

    fn commit(&mut self, tx: Transaction) -> StoreResult<()> {
        if tx.is_empty() {
            return Ok(());
        }
        let label = tx.label();
        let op_count = tx.len();
        let mut working = self.state.clone();

        for op in tx.into_ops() {
            if let Err(e) = working.apply(op) {
                tracing::debug!("Rolling back {} ({} ops): {}", label, op_count, e);
                return Err(e);
            }
        }

        self.state = working;
        self.commits += 1;
        tracing::debug!("Committed {} ({} ops)", label, op_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::UnitClass;
    use crate::city::BuildingType;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_city(CityId(1), "Vyborg", FactionId(1))
            .with_garrison(CityId(1), "Rifle", 10)
    }

    #[test]
    fn test_upsert_overwrites_existing_row() {
        let mut store = store();
        let mut tx = Transaction::begin("test");
        tx.push(WriteOp::UpsertGarrison {
            city: CityId(1),
            unit_name: "Rifle".into(),
            unit_count: 4,
            unit_image: "rifle.png".into(),
        });
        store.commit(tx).unwrap();

        let rows = store.garrison(CityId(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_count, 4);
        assert_eq!(rows[0].unit_image, "rifle.png");
    }

    #[test]
    fn test_failed_commit_rolls_back_everything() {
        let mut store = store();
        let mut tx = Transaction::begin("test");
        tx.push(WriteOp::ClearGarrison { city: CityId(1) });
        tx.push(WriteOp::SetCityOwner {
            city: CityId(99),
            owner: FactionId(2),
        });

        let err = store.commit(tx).unwrap_err();

        assert_eq!(err, StoreError::UnknownCity(CityId(99)));
        assert_eq!(store.garrison_count(CityId(1), "Rifle"), 10);
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn test_empty_commit_is_noop() {
        let mut store = store();
        store.commit(Transaction::begin("nothing")).unwrap();
        assert_eq!(store.commit_count(), 0);
        assert_eq!(store.garrison_count(CityId(1), "Rifle"), 10);
    }

    #[test]
    fn test_zero_count_upsert_is_rejected() {
        let mut store = store();
        let mut tx = Transaction::begin("test");
        tx.push(WriteOp::UpsertGarrison {
            city: CityId(1),
            unit_name: "Rifle".into(),
            unit_count: 0,
            unit_image: String::new(),
        });
        assert!(matches!(store.commit(tx), Err(StoreError::Rejected(_))));
    }

    #[test]
    fn test_stats_accumulate() {
        let mut store = store();
        for _ in 0..2 {
            let mut tx = Transaction::begin("stats");
            tx.push(WriteOp::UpsertWarStats {
                faction: FactionId(1),
                delta: WarStats {
                    units_combat: 10,
                    units_destroyed: 3,
                    units_killed: 5,
                },
            });
            tx.push(WriteOp::AddExperience {
                faction: FactionId(1),
                amount: 1.5,
            });
            tx.push(WriteOp::RecordDossier {
                faction: FactionId(1),
                won: true,
            });
            store.commit(tx).unwrap();
        }

        let stats = store.war_stats(FactionId(1)).unwrap().unwrap();
        assert_eq!(stats.units_combat, 20);
        assert_eq!(stats.units_destroyed, 6);
        assert_eq!(stats.units_killed, 10);
        assert_eq!(store.experience(FactionId(1)).unwrap(), 3.0);
        assert_eq!(
            store.dossier(FactionId(1)).unwrap(),
            Some(Dossier { wins: 2, losses: 0 })
        );
    }

    #[test]
    fn test_snapshot_round_trip_through_toml() {
        let store = store()
            .with_unit("Rifle", UnitStats::new(6, 3, 4, UnitClass::Class1))
            .with_buildings(
                CityBuildings::new(CityId(1), FactionId(1)).with(BuildingType::Factory, 2),
            );

        let text = toml::to_string(&store.snapshot()).unwrap();
        let reloaded = InMemoryStore::from_snapshot(toml::from_str(&text).unwrap());

        assert_eq!(reloaded.snapshot(), store.snapshot());
    }
}
