//! Battle report - per unit type summary for the presentation layer

use std::fmt;

use serde::Serialize;

use super::context::BattleContext;
use super::outcome::BattleOutcome;
use crate::city::DamageReport;
use crate::core::config::BattleConfig;
use crate::core::types::{CityId, Side};

/// One unit type on one side of the battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub unit_name: String,
    pub initial_count: u32,
    pub final_count: u32,
    pub losses: u32,
    pub side: Side,
    /// Win/loss label, only on the human player's side
    pub result: Option<String>,
    pub city: CityId,
}

/// Side-by-side summary of one battle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub winner: Side,
    pub attacker_losses: u64,
    pub defender_losses: u64,
    pub rows: Vec<ReportRow>,
    /// Buildings destroyed, shown only when the player attacked
    pub infrastructure: Option<DamageReport>,
}

impl BattleReport {
    pub fn rows_for(&self, side: Side) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |r| r.side == side)
    }
}

/// Build the report rows: attacking stacks first, then defending stacks
pub fn build_report(
    context: &BattleContext,
    outcome: &BattleOutcome,
    damage: Option<&DamageReport>,
    config: &BattleConfig,
) -> BattleReport {
    let user_side = context.user_side();
    let mut rows = Vec::with_capacity(outcome.attackers.len() + outcome.defenders.len());

    for side in [Side::Attacking, Side::Defending] {
        let result = (user_side == Some(side)).then(|| {
            if outcome.winner == side {
                config.victory_label.clone()
            } else {
                config.defeat_label.clone()
            }
        });

        for stack in outcome.stacks(side) {
            rows.push(ReportRow {
                unit_name: stack.unit_name.clone(),
                initial_count: stack.initial_count(),
                final_count: stack.unit_count(),
                losses: stack.killed_count(),
                side,
                result: result.clone(),
                city: context.city(side),
            });
        }
    }

    let infrastructure = match (user_side, damage) {
        (Some(Side::Attacking), Some(report)) => Some(report.clone()),
        _ => None,
    };

    BattleReport {
        winner: outcome.winner,
        attacker_losses: outcome.attacker_losses,
        defender_losses: outcome.defender_losses,
        rows,
        infrastructure,
    }
}

fn cell(row: Option<&ReportRow>) -> String {
    match row {
        Some(r) => format!(
            "{:<16}{:>7}{:>7}{:>7}",
            r.unit_name, r.initial_count, r.final_count, r.losses
        ),
        None => " ".repeat(37),
    }
}

impl fmt::Display for BattleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attackers: Vec<&ReportRow> = self.rows_for(Side::Attacking).collect();
        let defenders: Vec<&ReportRow> = self.rows_for(Side::Defending).collect();

        writeln!(f, "Winner: {}", self.winner)?;
        writeln!(f, "{:<37} | {}", "ATTACKING", "DEFENDING")?;
        let header = format!("{:<16}{:>7}{:>7}{:>7}", "unit", "before", "after", "lost");
        writeln!(f, "{} | {}", header, header)?;

        for i in 0..attackers.len().max(defenders.len()) {
            writeln!(
                f,
                "{} | {}",
                cell(attackers.get(i).copied()),
                cell(defenders.get(i).copied())
            )?;
        }

        writeln!(
            f,
            "{:<16}{:>21} | {:<16}{:>21}",
            "total lost", self.attacker_losses, "total lost", self.defender_losses
        )?;

        for side in [Side::Attacking, Side::Defending] {
            if let Some(result) = self.rows_for(side).find_map(|r| r.result.as_deref()) {
                writeln!(f, "Your {} army: {}", side, result)?;
            }
        }

        if let Some(damage) = &self.infrastructure {
            for (building, count) in &damage.destroyed {
                writeln!(f, "Destroyed {} {}(s)", count, building.label())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{UnitClass, UnitStack, UnitStats};
    use crate::city::BuildingType;
    use crate::core::types::FactionId;

    fn outcome() -> BattleOutcome {
        let mut archer = UnitStack::new("Archer", 100, UnitStats::new(10, 1, 1, UnitClass::Class2));
        archer.set_survivors(70);
        let mut guard = UnitStack::new("Guard", 50, UnitStats::new(1, 5, 5, UnitClass::Class1));
        guard.wipe_out();
        BattleOutcome::new(Side::Attacking, vec![archer], vec![guard], vec![], true)
    }

    fn damage() -> DamageReport {
        let mut report = DamageReport::default();
        report.add(BuildingType::Hospital, 3);
        report
    }

    fn context(user: Option<FactionId>) -> BattleContext {
        BattleContext {
            user_faction: user,
            ..BattleContext::new(CityId(1), CityId(2), FactionId(1), FactionId(2))
        }
    }

    #[test]
    fn test_rows_per_side() {
        let config = BattleConfig::default();
        let report = build_report(&context(None), &outcome(), None, &config);

        assert_eq!(report.rows.len(), 2);
        let archer = &report.rows[0];
        assert_eq!(archer.side, Side::Attacking);
        assert_eq!(archer.city, CityId(1));
        assert_eq!((archer.initial_count, archer.final_count, archer.losses), (100, 70, 30));
        let guard = &report.rows[1];
        assert_eq!(guard.city, CityId(2));
        assert_eq!(guard.losses, 50);
        assert!(report.rows.iter().all(|r| r.result.is_none()));
    }

    #[test]
    fn test_result_only_on_user_side() {
        let config = BattleConfig::default();
        let report = build_report(&context(Some(FactionId(2))), &outcome(), None, &config);

        assert_eq!(report.rows[0].result, None);
        assert_eq!(report.rows[1].result.as_deref(), Some("Поражение"));
    }

    #[test]
    fn test_damage_shown_only_to_attacking_user() {
        let config = BattleConfig::default();
        let dmg = damage();

        let attacker_view = build_report(&context(Some(FactionId(1))), &outcome(), Some(&dmg), &config);
        assert_eq!(attacker_view.infrastructure, Some(dmg.clone()));
        assert_eq!(attacker_view.rows[0].result.as_deref(), Some("Победа"));

        let defender_view = build_report(&context(Some(FactionId(2))), &outcome(), Some(&dmg), &config);
        assert_eq!(defender_view.infrastructure, None);
    }

    #[test]
    fn test_text_rendering() {
        let config = BattleConfig::default();
        let dmg = damage();
        let text = build_report(&context(Some(FactionId(1))), &outcome(), Some(&dmg), &config)
            .to_string();

        assert!(text.contains("Winner: attacking"));
        assert!(text.contains("Archer"));
        assert!(text.contains("Guard"));
        assert!(text.contains("Your attacking army: Победа"));
        assert!(text.contains("Destroyed 3 hospital(s)"));
    }
}
