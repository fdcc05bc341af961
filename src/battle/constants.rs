//! Battle constants - default tuning values in one place
//!
//! `BattleConfig::default()` is built from these; a loaded config may
//! override any of them.

// Attack multiplier per unit class (index 0 = class 1)
pub const CLASS_COEFFICIENTS: [f64; 5] = [1.3, 1.7, 2.0, 3.0, 4.0];

// Experience per killed enemy unit, per class
pub const CLASS_EXPERIENCE: [f64; 5] = [0.5, 1.4, 4.3, 8.0, 23.0];

// Attacking power that destroys one building
pub const DAMAGE_PER_BUILDING: f64 = 500.0;

// Fixed-point scale for power arithmetic (1 power = 1000 milli-power).
// Class coefficients must be whole multiples of 1 / POWER_SCALE.
pub const POWER_SCALE: u64 = 1000;

// Result labels for the player's side of the report
pub const VICTORY_LABEL: &str = "Победа";
pub const DEFEAT_LABEL: &str = "Поражение";
