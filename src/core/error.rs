use thiserror::Error;

use crate::core::types::{CityId, FactionId};
use crate::store::StoreError;

/// Errors that stop a battle before any combat math runs
#[derive(Error, Debug)]
pub enum BattleError {
    #[error("City not found: {0}")]
    UnknownCity(CityId),

    #[error("City {0} cannot attack itself")]
    SameCity(CityId),

    #[error("Faction {0} is on both sides of the battle")]
    SameFaction(FactionId),

    #[error("City {city} is owned by {actual}, not {expected}")]
    OwnerMismatch {
        city: CityId,
        expected: FactionId,
        actual: FactionId,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
