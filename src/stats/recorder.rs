//! Outcome recording - war totals, experience and dossiers
//!
//! Each battle updates both factions' running totals once. The human
//! player's faction additionally earns experience for a won battle and gets
//! a dossier entry for any battle it fought in. Everything goes out as one
//! transaction.

use crate::army::UnitStack;
use crate::battle::context::BattleContext;
use crate::battle::outcome::BattleOutcome;
use crate::core::config::BattleConfig;
use crate::core::types::Side;
use crate::store::{StoreResult, Transaction, WarStore, WriteOp};

use super::WarStats;

/// Experience earned from the units a losing army lost
pub fn battle_experience(losing: &[UnitStack], config: &BattleConfig) -> f64 {
    losing
        .iter()
        .map(|s| config.class_experience(s.class()) * s.killed_count() as f64)
        .sum()
}

/// Build the statistics write batch for an outcome
pub fn plan_outcome_records(
    context: &BattleContext,
    outcome: &BattleOutcome,
    config: &BattleConfig,
) -> Transaction {
    let mut tx = Transaction::begin("battle statistics");

    for side in [Side::Attacking, Side::Defending] {
        tx.push(WriteOp::UpsertWarStats {
            faction: context.faction(side),
            delta: WarStats {
                units_combat: outcome.fielded(side),
                units_destroyed: outcome.losses(side),
                units_killed: outcome.losses(side.opponent()),
            },
        });
    }

    if let Some(user_side) = context.user_side() {
        let won = user_side == outcome.winner;
        if won {
            let gained = battle_experience(outcome.stacks(outcome.loser()), config);
            if gained > 0.0 {
                tx.push(WriteOp::AddExperience {
                    faction: context.faction(user_side),
                    amount: gained,
                });
            }
        }
        tx.push(WriteOp::RecordDossier {
            faction: context.faction(user_side),
            won,
        });
    }

    tx
}

/// Plan and commit the statistics for one battle
pub fn record_outcome<S: WarStore + ?Sized>(
    store: &mut S,
    context: &BattleContext,
    outcome: &BattleOutcome,
    config: &BattleConfig,
) -> StoreResult<()> {
    store.commit(plan_outcome_records(context, outcome, config))
}
