//! City layer - buildings, infrastructure damage, and garrisons

pub mod building;
pub mod damage;
pub mod garrison;

pub use building::{BuildingType, CityBuildings};
pub use damage::{
    apply_damage_bursts, apply_infrastructure_damage, building_budget, DamageReport,
    InfrastructureDamage,
};
pub use garrison::{plan_garrison_reconciliation, reconcile_garrisons, GarrisonPlan};
