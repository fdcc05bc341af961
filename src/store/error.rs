use thiserror::Error;

use crate::core::types::CityId;

/// Errors raised by a `WarStore` read or commit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("City not found: {0}")]
    UnknownCity(CityId),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
