//! Battle outcome - the immutable result of one resolved battle

use serde::Serialize;

use super::resolution::PairwiseStep;
use crate::army::{total_fielded, total_killed, SkippedRecord, UnitStack};
use crate::core::types::Side;

/// Final state of both armies after the round sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleOutcome {
    pub winner: Side,
    pub attacker_losses: u64,
    pub defender_losses: u64,
    /// Attacking stacks in engagement order, with final counts
    pub attackers: Vec<UnitStack>,
    /// Defending stacks in engagement order, with final counts
    pub defenders: Vec<UnitStack>,
    /// Every pairwise round in the order it was fought
    pub rounds: Vec<PairwiseStep>,
    /// Records left out for lacking stats, per side
    pub skipped_attackers: Vec<SkippedRecord>,
    pub skipped_defenders: Vec<SkippedRecord>,
    pub is_user_involved: bool,
}

impl BattleOutcome {
    pub fn stacks(&self, side: Side) -> &[UnitStack] {
        match side {
            Side::Attacking => &self.attackers,
            Side::Defending => &self.defenders,
        }
    }

    pub fn losses(&self, side: Side) -> u64 {
        match side {
            Side::Attacking => self.attacker_losses,
            Side::Defending => self.defender_losses,
        }
    }

    pub fn fielded(&self, side: Side) -> u64 {
        total_fielded(self.stacks(side))
    }

    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }

    pub(crate) fn new(
        winner: Side,
        attackers: Vec<UnitStack>,
        defenders: Vec<UnitStack>,
        rounds: Vec<PairwiseStep>,
        is_user_involved: bool,
    ) -> Self {
        Self {
            winner,
            attacker_losses: total_killed(&attackers),
            defender_losses: total_killed(&defenders),
            attackers,
            defenders,
            rounds,
            skipped_attackers: Vec::new(),
            skipped_defenders: Vec::new(),
            is_user_involved,
        }
    }
}
