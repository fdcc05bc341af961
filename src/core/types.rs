//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub u32);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "city#{}", self.0)
    }
}

/// Unique identifier for factions (the political owners of cities and armies)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction#{}", self.0)
    }
}

/// Role a faction plays in one battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacking,
    Defending,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attacking => Side::Defending,
            Side::Defending => Side::Attacking,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attacking => f.write_str("attacking"),
            Side::Defending => f.write_str("defending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Attacking.opponent(), Side::Defending);
        assert_eq!(Side::Defending.opponent(), Side::Attacking);
    }

    #[test]
    fn test_side_serializes_snake_case() {
        let json = serde_json::to_string(&Side::Attacking).unwrap();
        assert_eq!(json, "\"attacking\"");
    }
}
