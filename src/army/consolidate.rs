//! Army consolidation - merge raw unit rows into one stack per unit type

use ahash::AHashMap;
use serde::Serialize;

use super::stack::UnitStack;
use super::unit::UnitRecord;

/// A unit row left out of the battle
///
/// Either its unit type has no stats, or merging it would overflow the
/// stack count. Skipped units take no part in combat and stay where they
/// were garrisoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub unit_name: String,
    pub unit_count: u32,
    pub unit_image: String,
}

impl SkippedRecord {
    fn from_record(record: &UnitRecord) -> Self {
        Self {
            unit_name: record.unit_name.clone(),
            unit_count: record.unit_count,
            unit_image: record.unit_image.clone(),
        }
    }
}

/// Result of consolidating one side's raw records
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    /// One stack per distinct unit type, in first-seen order
    pub stacks: Vec<UnitStack>,
    /// Rows left out of the battle
    pub skipped: Vec<SkippedRecord>,
}

/// Merge records into stacks, summing counts per `unit_name`
///
/// The first record seen for a unit type supplies its stats and image. Every
/// stack starts with `initial_count == unit_count` and nothing killed.
pub fn consolidate(records: &[UnitRecord]) -> Consolidation {
    let mut result = Consolidation::default();
    let mut index: AHashMap<&str, usize> = AHashMap::new();

    for record in records {
        let Some(stats) = record.stats else {
            tracing::warn!(
                "Skipping {} x {}: unit type has no stats",
                record.unit_count,
                record.unit_name
            );
            result.skipped.push(SkippedRecord::from_record(record));
            continue;
        };

        match index.get(record.unit_name.as_str()) {
            Some(&i) => {
                if !result.stacks[i].absorb(record.unit_count) {
                    tracing::warn!(
                        "Skipping {} x {}: stack would exceed {} units",
                        record.unit_count,
                        record.unit_name,
                        u32::MAX
                    );
                    result.skipped.push(SkippedRecord::from_record(record));
                }
            }
            None => {
                index.insert(record.unit_name.as_str(), result.stacks.len());
                result.stacks.push(
                    UnitStack::new(record.unit_name.clone(), record.unit_count, stats)
                        .with_image(record.unit_image.clone()),
                );
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::unit::{UnitClass, UnitStats};

    fn rifle_stats() -> UnitStats {
        UnitStats::new(6, 3, 4, UnitClass::Class1)
    }

    #[test]
    fn test_merges_duplicates() {
        let records = vec![
            UnitRecord::new("Rifle", 30, rifle_stats()).with_image("rifle.png"),
            UnitRecord::new("Tank", 2, UnitStats::new(80, 40, 60, UnitClass::Class4)),
            UnitRecord::new("Rifle", 12, rifle_stats()).with_image("rifle_alt.png"),
        ];

        let merged = consolidate(&records);

        assert_eq!(merged.stacks.len(), 2);
        let rifle = &merged.stacks[0];
        assert_eq!(rifle.unit_name, "Rifle");
        assert_eq!(rifle.unit_count(), 42);
        assert_eq!(rifle.initial_count(), 42);
        assert_eq!(rifle.killed_count(), 0);
        assert_eq!(rifle.image_ref, "rifle.png");
        assert!(merged.skipped.is_empty());
    }

    #[test]
    fn test_skips_records_without_stats() {
        let mut ghost = UnitRecord::new("Ghost", 9, rifle_stats());
        ghost.stats = None;
        let records = vec![ghost, UnitRecord::new("Rifle", 5, rifle_stats())];

        let merged = consolidate(&records);

        assert_eq!(merged.stacks.len(), 1);
        assert_eq!(
            merged.skipped,
            vec![SkippedRecord {
                unit_name: "Ghost".into(),
                unit_count: 9,
                unit_image: String::new(),
            }]
        );
    }

    #[test]
    fn test_overflowing_record_is_skipped() {
        let records = vec![
            UnitRecord::new("Rifle", 3_000_000_000, rifle_stats()),
            UnitRecord::new("Rifle", 3_000_000_000, rifle_stats()).with_image("late.png"),
            UnitRecord::new("Rifle", 5, rifle_stats()),
        ];

        let merged = consolidate(&records);

        assert_eq!(merged.stacks.len(), 1);
        assert_eq!(merged.stacks[0].unit_count(), 3_000_000_005);
        assert_eq!(merged.skipped.len(), 1);
        assert_eq!(merged.skipped[0].unit_count, 3_000_000_000);
        assert_eq!(merged.skipped[0].unit_image, "late.png");
    }

    #[test]
    fn test_merge_order_does_not_change_counts() {
        let a = UnitRecord::new("Rifle", 7, rifle_stats());
        let b = UnitRecord::new("Rifle", 11, rifle_stats());

        let forward = consolidate(&[a.clone(), b.clone()]);
        let backward = consolidate(&[b, a]);

        assert_eq!(forward.stacks[0].unit_count(), backward.stacks[0].unit_count());
    }

    #[test]
    fn test_zero_count_record_still_forms_stack() {
        let merged = consolidate(&[UnitRecord::new("Rifle", 0, rifle_stats())]);
        assert_eq!(merged.stacks.len(), 1);
        assert!(!merged.stacks[0].is_alive());
    }
}
