//! Battle system - deterministic stack-versus-stack resolution
//!
//! Armies are consolidated into one stack per unit type, sorted by class and
//! attack, and swept pairwise. Leftover attacking power levels buildings in
//! the defending city; survivors are committed back into garrisons.

pub mod constants;
pub mod context;
pub mod engine;
pub mod outcome;
pub mod power;
pub mod report;
pub mod resolution;

// Re-exports for convenient access
pub use constants::*;
pub use context::BattleContext;
pub use engine::{fight, BattleResolution, PersistenceFailure, WritePhase};
pub use outcome::BattleOutcome;
pub use power::{
    attack_milli, attack_power, defense_milli, defense_power, survivors_from_power, to_power,
    unit_attack_power, unit_defense_power,
};
pub use report::{build_report, BattleReport, ReportRow};
pub use resolution::{battle_winner, resolve_rounds, PairwiseStep, RoundPhase, RoundResolver};
