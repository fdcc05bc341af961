//! Store layer - persistence collaborator for battle resolution
//!
//! The battle pipeline reads typed records through [`WarStore`] and writes
//! only through atomic [`Transaction`] batches.

mod error;
mod memory;
mod records;
mod traits;
mod transaction;

pub use error::{StoreError, StoreResult};
pub use memory::{DossierRow, ExperienceRow, InMemoryStore, StoreSnapshot, WarStatsRow};
pub use records::{CityRecord, GarrisonRow, UnitCatalogEntry};
pub use traits::WarStore;
pub use transaction::{Transaction, WriteOp};
