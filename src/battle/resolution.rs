//! Round resolution - pairwise sweep of attacking stacks through defenders
//!
//! Both armies are put in engagement order once. Each living attacking
//! stack then fights every living defending stack in turn, one pairwise
//! round each, carrying its surviving count from round to round. The sweep
//! is O(attackers x defenders) and always terminates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::power::{
    attack_milli, defense_milli, survivors_from_power, to_power, unit_attack_milli,
    unit_defense_milli,
};
use crate::army::{sort_for_engagement, UnitStack};
use crate::core::config::BattleConfig;
use crate::core::types::Side;

/// Progress of a round resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No pair has engaged yet
    Pending,
    /// At least one pair has fought and more may follow
    Engaged,
    /// Every possible pair has been evaluated; counts are final
    Resolved,
}

/// Record of one pairwise round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseStep {
    pub attacker: String,
    pub defender: String,
    /// Total attacking power of the attacker stack going into the round
    pub attack_power: f64,
    /// Total defending power of the defender stack going into the round
    pub defense_power: f64,
    pub winner: Side,
    pub attacker_survivors: u32,
    pub defender_survivors: u32,
}

/// Steps an attacking army through a defending army, one pair at a time
#[derive(Debug)]
pub struct RoundResolver<'a> {
    attackers: &'a mut [UnitStack],
    defenders: &'a mut [UnitStack],
    config: &'a BattleConfig,
    phase: RoundPhase,
    next_attacker: usize,
    next_defender: usize,
}

impl<'a> RoundResolver<'a> {
    /// Sort both armies into engagement order and get ready to fight
    pub fn new(
        attackers: &'a mut [UnitStack],
        defenders: &'a mut [UnitStack],
        config: &'a BattleConfig,
    ) -> Self {
        sort_for_engagement(attackers);
        sort_for_engagement(defenders);
        Self {
            attackers,
            defenders,
            config,
            phase: RoundPhase::Pending,
            next_attacker: 0,
            next_defender: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Fight the next pair where both stacks still have units
    ///
    /// Returns `None` once the sweep is complete.
    pub fn step(&mut self) -> Option<PairwiseStep> {
        if self.phase == RoundPhase::Resolved {
            return None;
        }

        while self.next_attacker < self.attackers.len() {
            let a = self.next_attacker;
            if self.attackers[a].is_alive() {
                while self.next_defender < self.defenders.len() {
                    let d = self.next_defender;
                    self.next_defender += 1;
                    if self.defenders[d].is_alive() {
                        self.phase = RoundPhase::Engaged;
                        return Some(self.engage(a, d));
                    }
                }
            }
            self.next_attacker += 1;
            self.next_defender = 0;
        }

        self.phase = RoundPhase::Resolved;
        None
    }

    /// Run the sweep to completion
    pub fn run(mut self) -> Vec<PairwiseStep> {
        let mut steps = Vec::new();
        while let Some(step) = self.step() {
            steps.push(step);
        }
        steps
    }

    fn engage(&mut self, a: usize, d: usize) -> PairwiseStep {
        let attacker = &mut self.attackers[a];
        let defender = &mut self.defenders[d];

        let attack = attack_milli(attacker, self.config);
        let defense = defense_milli(defender);

        let winner = match attack.cmp(&defense) {
            Ordering::Greater => {
                let per_unit = unit_attack_milli(attacker, self.config);
                defender.wipe_out();
                attacker.set_survivors(survivors_from_power(attack - defense, per_unit));
                Side::Attacking
            }
            // Exact tie: the attacker breaks, the defender holds untouched.
            Ordering::Equal => {
                attacker.wipe_out();
                Side::Defending
            }
            Ordering::Less => {
                let per_unit = unit_defense_milli(defender);
                attacker.wipe_out();
                defender.set_survivors(survivors_from_power(defense - attack, per_unit));
                Side::Defending
            }
        };
        let (attack, defense) = (to_power(attack), to_power(defense));

        tracing::debug!(
            "{} ({:.1}) vs {} ({:.1}): {} wins, {} / {} left",
            attacker.unit_name,
            attack,
            defender.unit_name,
            defense,
            winner,
            attacker.unit_count(),
            defender.unit_count()
        );

        PairwiseStep {
            attacker: attacker.unit_name.clone(),
            defender: defender.unit_name.clone(),
            attack_power: attack,
            defense_power: defense,
            winner,
            attacker_survivors: attacker.unit_count(),
            defender_survivors: defender.unit_count(),
        }
    }
}

/// Sort, then fight every attacker/defender pair; returns the round log
pub fn resolve_rounds(
    attackers: &mut [UnitStack],
    defenders: &mut [UnitStack],
    config: &BattleConfig,
) -> Vec<PairwiseStep> {
    RoundResolver::new(attackers, defenders, config).run()
}

/// The attacker wins if any of its stacks is still standing
pub fn battle_winner(attackers: &[UnitStack]) -> Side {
    if attackers.iter().any(UnitStack::is_alive) {
        Side::Attacking
    } else {
        Side::Defending
    }
}
