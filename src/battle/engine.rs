//! Battle orchestration - one call from raw armies to committed state
//!
//! Order of work:
//! 1. validate the context and read the defending city's buildings
//! 2. consolidate both armies
//! 3. sweep the rounds
//! 4. level buildings, one burst per pairwise round
//! 5. reconcile garrisons and city ownership
//! 6. record statistics
//! 7. build the report
//!
//! Steps 4-6 are independent transactions. A failed commit is logged and
//! reported in [`BattleResolution::failures`]; the in-memory outcome is
//! returned either way.

use serde::Serialize;

use super::context::BattleContext;
use super::outcome::BattleOutcome;
use super::report::{build_report, BattleReport};
use super::resolution::{battle_winner, resolve_rounds};
use crate::army::{consolidate, UnitRecord};
use crate::city::{apply_damage_bursts, plan_garrison_reconciliation, DamageReport};
use crate::core::config::BattleConfig;
use crate::core::error::Result;
use crate::core::types::{CityId, FactionId};
use crate::stats::record_outcome;
use crate::store::{StoreError, Transaction, WarStore, WriteOp};

/// Unit of persisted work inside a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePhase {
    Infrastructure,
    Garrison,
    Statistics,
}

/// A write phase that was rolled back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceFailure {
    pub phase: WritePhase,
    pub error: String,
}

/// Everything a resolved battle produced
#[derive(Debug, Clone, Serialize)]
pub struct BattleResolution {
    pub outcome: BattleOutcome,
    pub report: BattleReport,
    /// Buildings destroyed in the defending city
    pub damage: DamageReport,
    /// Defending city and its new owner, when it fell
    pub capture: Option<(CityId, FactionId)>,
    pub failures: Vec<PersistenceFailure>,
}

impl BattleResolution {
    pub fn is_fully_committed(&self) -> bool {
        self.failures.is_empty()
    }
}

fn note_failure(failures: &mut Vec<PersistenceFailure>, phase: WritePhase, error: StoreError) {
    tracing::error!("{:?} changes rolled back: {}", phase, error);
    failures.push(PersistenceFailure {
        phase,
        error: error.to_string(),
    });
}

/// Resolve one battle and commit its consequences
///
/// Returns `Err` only for invocation problems found before combat starts;
/// nothing is written in that case.
pub fn fight<S: WarStore + ?Sized>(
    store: &mut S,
    config: &BattleConfig,
    context: &BattleContext,
    attacking: &[UnitRecord],
    defending: &[UnitRecord],
) -> Result<BattleResolution> {
    context.validate(&*store)?;
    let target_buildings = store.buildings(context.defending_city)?;

    tracing::info!(
        "Battle: {} ({}) attacks {} ({})",
        context.attacking_city,
        context.attacking_faction,
        context.defending_city,
        context.defending_faction
    );

    let attack = consolidate(attacking);
    let defense = consolidate(defending);
    let mut attackers = attack.stacks;
    let mut defenders = defense.stacks;

    let rounds = resolve_rounds(&mut attackers, &mut defenders, config);
    let winner = battle_winner(&attackers);

    let mut outcome = BattleOutcome::new(
        winner,
        attackers,
        defenders,
        rounds,
        context.is_user_involved(),
    );
    outcome.skipped_attackers = attack.skipped;
    outcome.skipped_defenders = defense.skipped;

    let mut failures = Vec::new();

    let damage = match target_buildings {
        Some(buildings) => {
            let bursts = outcome.rounds.iter().map(|r| r.attack_power);
            let damage = apply_damage_bursts(buildings, bursts, config);
            if !damage.report.is_empty() {
                let mut tx = Transaction::begin("infrastructure damage");
                tx.push(WriteOp::SetBuildings(damage.buildings));
                if let Err(e) = store.commit(tx) {
                    note_failure(&mut failures, WritePhase::Infrastructure, e);
                }
            }
            damage.report
        }
        None => DamageReport::default(),
    };

    let mut capture = None;
    match plan_garrison_reconciliation(
        &*store,
        context,
        &outcome.attackers,
        &outcome.defenders,
        &outcome.skipped_defenders,
        winner,
    ) {
        Ok(plan) => {
            let planned_capture = plan.capture;
            match plan.commit(store) {
                Ok(()) => capture = planned_capture,
                Err(e) => note_failure(&mut failures, WritePhase::Garrison, e),
            }
        }
        Err(e) => note_failure(&mut failures, WritePhase::Garrison, e),
    }

    if let Err(e) = record_outcome(store, context, &outcome, config) {
        note_failure(&mut failures, WritePhase::Statistics, e);
    }

    let report = build_report(context, &outcome, Some(&damage), config);

    tracing::info!(
        "Battle over: {} side wins after {} round(s), losses {} / {}, {} building(s) destroyed",
        winner,
        outcome.rounds.len(),
        outcome.attacker_losses,
        outcome.defender_losses,
        damage.total()
    );

    Ok(BattleResolution {
        outcome,
        report,
        damage,
        capture,
        failures,
    })
}
