//! Power calculation - turn unit stats into attack and defense power
//!
//! Attack scales with the unit's class coefficient. Defense is raw
//! durability plus defense; class does not apply to it.
//!
//! Combat compares and divides power in fixed point (`POWER_SCALE`
//! milli-power per point) so equal powers are exactly equal. The `f64`
//! helpers are for logs, reports and infrastructure damage.

use super::constants::POWER_SCALE;
use crate::army::UnitStack;
use crate::core::config::BattleConfig;

/// Attacking power of a single unit, in milli-power
pub fn unit_attack_milli(stack: &UnitStack, config: &BattleConfig) -> u128 {
    u128::from(stack.stats.attack) * u128::from(config.class_coefficient_scaled(stack.class()))
}

/// Defending power of a single unit, in milli-power
pub fn unit_defense_milli(stack: &UnitStack) -> u128 {
    (u128::from(stack.stats.durability) + u128::from(stack.stats.defense))
        * u128::from(POWER_SCALE)
}

/// Attacking power of the whole stack at its current count, in milli-power
pub fn attack_milli(stack: &UnitStack, config: &BattleConfig) -> u128 {
    unit_attack_milli(stack, config) * u128::from(stack.unit_count())
}

/// Defending power of the whole stack at its current count, in milli-power
pub fn defense_milli(stack: &UnitStack) -> u128 {
    unit_defense_milli(stack) * u128::from(stack.unit_count())
}

/// Convert milli-power to power
pub fn to_power(milli: u128) -> f64 {
    milli as f64 / POWER_SCALE as f64
}

/// Attacking power of a single unit of this stack
pub fn unit_attack_power(stack: &UnitStack, config: &BattleConfig) -> f64 {
    to_power(unit_attack_milli(stack, config))
}

/// Defending power of a single unit of this stack
pub fn unit_defense_power(stack: &UnitStack) -> f64 {
    to_power(unit_defense_milli(stack))
}

/// Attacking power of the whole stack at its current count
pub fn attack_power(stack: &UnitStack, config: &BattleConfig) -> f64 {
    to_power(attack_milli(stack, config))
}

/// Defending power of the whole stack at its current count
pub fn defense_power(stack: &UnitStack) -> f64 {
    to_power(defense_milli(stack))
}

/// Units that leftover power can still field, rounded down
///
/// Both arguments are milli-power. Zero per-unit power fields nobody.
pub fn survivors_from_power(remaining: u128, per_unit: u128) -> u32 {
    if per_unit == 0 {
        return 0;
    }
    u32::try_from(remaining / per_unit).unwrap_or(u32::MAX)
}
