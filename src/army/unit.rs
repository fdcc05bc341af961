//! Unit reference data and the raw per-row records armies are built from

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tier of a unit type (1 = weakest, 5 = strongest)
///
/// Ordering follows the tier, so lower classes sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum UnitClass {
    Class1 = 1,
    Class2 = 2,
    Class3 = 3,
    Class4 = 4,
    Class5 = 5,
}

impl UnitClass {
    pub const ALL: [UnitClass; 5] = [
        UnitClass::Class1,
        UnitClass::Class2,
        UnitClass::Class3,
        UnitClass::Class4,
        UnitClass::Class5,
    ];

    /// Zero-based position for per-class lookup tables
    pub fn index(&self) -> usize {
        (*self as u8 - 1) as usize
    }

    pub fn tier(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for UnitClass {
    type Error = InvalidUnitClass;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UnitClass::Class1),
            2 => Ok(UnitClass::Class2),
            3 => Ok(UnitClass::Class3),
            4 => Ok(UnitClass::Class4),
            5 => Ok(UnitClass::Class5),
            other => Err(InvalidUnitClass(other)),
        }
    }
}

impl From<UnitClass> for u8 {
    fn from(class: UnitClass) -> u8 {
        class.tier()
    }
}

/// A unit class outside 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUnitClass(pub u8);

impl fmt::Display for InvalidUnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit class must be between 1 and 5, got {}", self.0)
    }
}

impl std::error::Error for InvalidUnitClass {}

/// Combat stats for one unit type (read-only reference data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub attack: u32,
    pub defense: u32,
    pub durability: u32,
    #[serde(rename = "unit_class")]
    pub class: UnitClass,
}

impl UnitStats {
    pub fn new(attack: u32, defense: u32, durability: u32, class: UnitClass) -> Self {
        Self {
            attack,
            defense,
            durability,
            class,
        }
    }
}

/// One raw unit row as handed to the battle by the caller
///
/// Several records may share a `unit_name` when troops arrive from different
/// garrison rows. `stats` is `None` when the unit type has no reference data;
/// such records are skipped during consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub unit_name: String,
    pub unit_count: u32,
    #[serde(default)]
    pub unit_image: String,
    #[serde(default, rename = "units_stats")]
    pub stats: Option<UnitStats>,
}

impl UnitRecord {
    pub fn new(name: impl Into<String>, count: u32, stats: UnitStats) -> Self {
        Self {
            unit_name: name.into(),
            unit_count: count,
            unit_image: String::new(),
            stats: Some(stats),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.unit_image = image.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ordering_follows_tier() {
        assert!(UnitClass::Class1 < UnitClass::Class2);
        assert!(UnitClass::Class4 < UnitClass::Class5);
        assert_eq!(UnitClass::Class3.index(), 2);
    }

    #[test]
    fn test_class_from_u8() {
        assert_eq!(UnitClass::try_from(4), Ok(UnitClass::Class4));
        assert_eq!(UnitClass::try_from(0), Err(InvalidUnitClass(0)));
        assert_eq!(UnitClass::try_from(6), Err(InvalidUnitClass(6)));
    }

    #[test]
    fn test_record_deserializes_without_stats() {
        let record: UnitRecord =
            serde_json::from_str(r#"{"unit_name": "Ghost", "unit_count": 3}"#).unwrap();
        assert_eq!(record.unit_count, 3);
        assert!(record.stats.is_none());
    }

    #[test]
    fn test_record_rejects_bad_class() {
        let json = r#"{
            "unit_name": "Archer",
            "unit_count": 3,
            "units_stats": {"attack": 1, "defense": 1, "durability": 1, "unit_class": 9}
        }"#;
        assert!(serde_json::from_str::<UnitRecord>(json).is_err());
    }
}
