//! Battle configuration with documented constants
//!
//! Every tunable number the battle pipeline uses lives here. Components take
//! a `&BattleConfig` explicitly; there is no process-wide config cell, so two
//! battles resolved with different configs never observe each other.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::army::UnitClass;
use crate::battle::constants::{
    CLASS_COEFFICIENTS, CLASS_EXPERIENCE, DAMAGE_PER_BUILDING, DEFEAT_LABEL, POWER_SCALE,
    VICTORY_LABEL,
};
use crate::city::BuildingType;
use crate::core::error::{BattleError, Result};

/// Configuration for battle resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Attack multiplier per unit class, indexed by class 1..=5
    ///
    /// Must be strictly ascending: a higher class always hits harder per
    /// point of attack than a lower one. At most three decimal places, so
    /// power comparisons stay exact.
    pub class_coefficients: [f64; 5],

    /// Experience granted per killed enemy unit, indexed by class 1..=5
    pub class_experience: [f64; 5],

    /// Attacking power needed to destroy one building
    pub damage_per_building: f64,

    /// Building types targeted by infrastructure damage, first hit first
    ///
    /// Types missing from this list are never damaged.
    pub damage_priority: Vec<BuildingType>,

    /// Result label shown to the player's side when it won
    pub victory_label: String,

    /// Result label shown to the player's side when it lost
    pub defeat_label: String,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            class_coefficients: CLASS_COEFFICIENTS,
            class_experience: CLASS_EXPERIENCE,
            damage_per_building: DAMAGE_PER_BUILDING,
            damage_priority: vec![
                BuildingType::Hospital,
                BuildingType::Factory,
                BuildingType::Railway,
            ],
            victory_label: VICTORY_LABEL.to_string(),
            defeat_label: DEFEAT_LABEL.to_string(),
        }
    }
}

/// Largest class coefficient accepted by `validate`
const MAX_CLASS_COEFFICIENT: f64 = 1_000_000.0;

impl BattleConfig {
    /// Attack multiplier for a unit class
    pub fn class_coefficient(&self, class: UnitClass) -> f64 {
        self.class_coefficients[class.index()]
    }

    /// Attack multiplier in thousandths, as used by the power calculator
    pub fn class_coefficient_scaled(&self, class: UnitClass) -> u64 {
        (self.class_coefficient(class) * POWER_SCALE as f64).round() as u64
    }

    /// Experience per killed unit of a class
    pub fn class_experience(&self, class: UnitClass) -> f64 {
        self.class_experience[class.index()]
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self
            .class_coefficients
            .iter()
            .any(|c| !c.is_finite() || *c <= 0.0 || *c > MAX_CLASS_COEFFICIENT)
        {
            return Err(format!(
                "class_coefficients must be positive numbers up to {}, got {:?}",
                MAX_CLASS_COEFFICIENT, self.class_coefficients
            ));
        }

        for c in self.class_coefficients {
            let scaled = c * POWER_SCALE as f64;
            if (scaled - scaled.round()).abs() > 1e-6 {
                return Err(format!(
                    "class coefficient {} has more than three decimal places",
                    c
                ));
            }
        }

        if self.class_coefficients.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!(
                "class_coefficients must be strictly ascending, got {:?}",
                self.class_coefficients
            ));
        }

        if self.class_experience.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err("class_experience must be non-negative numbers".into());
        }

        if self.damage_per_building <= 0.0 || !self.damage_per_building.is_finite() {
            return Err(format!(
                "damage_per_building ({}) must be a positive number",
                self.damage_per_building
            ));
        }

        for (i, building) in self.damage_priority.iter().enumerate() {
            if self.damage_priority[..i].contains(building) {
                return Err(format!("damage_priority lists {:?} twice", building));
            }
        }

        Ok(())
    }

    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate().map_err(BattleError::Config)?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
