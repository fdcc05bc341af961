//! Army layer - unit reference data, stacks, and consolidation

pub mod consolidate;
pub mod loader;
pub mod stack;
pub mod unit;

pub use consolidate::{consolidate, Consolidation, SkippedRecord};
pub use loader::records_from_garrison;
pub use stack::{
    engagement_order, sort_for_engagement, total_fielded, total_killed, total_units, UnitStack,
};
pub use unit::{InvalidUnitClass, UnitClass, UnitRecord, UnitStats};
