//! Build battle records from persisted garrison rows

use crate::core::types::CityId;
use crate::store::{StoreResult, WarStore};

use super::unit::UnitRecord;

/// Read a city's garrison and attach unit stats from the catalog
///
/// Rows whose unit type is missing from the catalog come back with
/// `stats: None`; consolidation drops them from the battle.
pub fn records_from_garrison<S: WarStore + ?Sized>(
    store: &S,
    city: CityId,
) -> StoreResult<Vec<UnitRecord>> {
    let rows = store.garrison(city)?;
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let stats = store.unit_stats(&row.unit_name)?;
        if stats.is_none() {
            tracing::warn!("Garrison of {} holds {} with no catalog stats", city, row.unit_name);
        }
        records.push(UnitRecord {
            unit_name: row.unit_name,
            unit_count: row.unit_count,
            unit_image: row.unit_image,
            stats,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{UnitClass, UnitStats};
    use crate::core::types::FactionId;
    use crate::store::InMemoryStore;

    #[test]
    fn test_joins_catalog_stats() {
        let rifle = UnitStats::new(6, 3, 4, UnitClass::Class1);
        let store = InMemoryStore::new()
            .with_city(CityId(1), "Tula", FactionId(1))
            .with_unit("Rifle", rifle)
            .with_garrison(CityId(1), "Rifle", 40)
            .with_garrison(CityId(1), "Zeppelin", 2);

        let records = records_from_garrison(&store, CityId(1)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stats, Some(rifle));
        assert_eq!(records[0].unit_count, 40);
        assert_eq!(records[1].unit_name, "Zeppelin");
        assert!(records[1].stats.is_none());
    }

    #[test]
    fn test_empty_garrison() {
        let store = InMemoryStore::new().with_city(CityId(1), "Tula", FactionId(1));
        assert!(records_from_garrison(&store, CityId(1)).unwrap().is_empty());
    }
}
