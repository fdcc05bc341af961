//! Garrison reconciliation - commit battle survivors back into the cities
//!
//! Planning reads everything the write batch depends on and fails before
//! any write is issued; committing then applies the batch as one
//! transaction.

use crate::army::{SkippedRecord, UnitStack};
use crate::battle::context::BattleContext;
use crate::core::types::{CityId, FactionId, Side};
use crate::store::{StoreError, StoreResult, Transaction, WarStore, WriteOp};

/// A validated, not yet applied garrison write batch
#[derive(Debug, Clone, PartialEq)]
pub struct GarrisonPlan {
    tx: Transaction,
    /// Set when the defending city changes hands
    pub capture: Option<(CityId, FactionId)>,
}

impl GarrisonPlan {
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Apply the batch; on failure the store keeps its previous garrisons
    pub fn commit<S: WarStore + ?Sized>(self, store: &mut S) -> StoreResult<()> {
        let capture = self.capture;
        store.commit(self.tx)?;
        if let Some((city, owner)) = capture {
            tracing::info!("{} captured by {}", city, owner);
        }
        Ok(())
    }
}

/// Build the garrison write batch for a finished battle
///
/// - The defending city's garrison is replaced by the winner's survivors.
///   When the defence holds, defending rows that sat the battle out
///   (`skipped_defenders`) are kept as they were.
/// - On an attacking win the defending city (and its building record)
///   passes to the attacking faction.
/// - The attacking city keeps `home - departed` of each unit type that
///   marched out; the row is removed when nothing is left.
pub fn plan_garrison_reconciliation<S: WarStore + ?Sized>(
    store: &S,
    context: &BattleContext,
    attackers: &[UnitStack],
    defenders: &[UnitStack],
    skipped_defenders: &[SkippedRecord],
    winner: Side,
) -> StoreResult<GarrisonPlan> {
    for city in [context.attacking_city, context.defending_city] {
        if store.city(city)?.is_none() {
            return Err(StoreError::UnknownCity(city));
        }
    }
    let home = store.garrison(context.attacking_city)?;

    let mut tx = Transaction::begin("garrison reconciliation");
    tx.push(WriteOp::ClearGarrison {
        city: context.defending_city,
    });

    let occupiers = match winner {
        Side::Attacking => attackers,
        Side::Defending => defenders,
    };
    let mut rows: Vec<(String, u32, String)> = occupiers
        .iter()
        .filter(|s| s.is_alive())
        .map(|s| (s.unit_name.clone(), s.unit_count(), s.image_ref.clone()))
        .collect();

    if winner == Side::Defending {
        for skipped in skipped_defenders.iter().filter(|r| r.unit_count > 0) {
            match rows.iter_mut().find(|(name, _, _)| *name == skipped.unit_name) {
                Some((_, count, _)) => *count = count.saturating_add(skipped.unit_count),
                None => rows.push((
                    skipped.unit_name.clone(),
                    skipped.unit_count,
                    skipped.unit_image.clone(),
                )),
            }
        }
    }

    for (unit_name, unit_count, unit_image) in rows {
        tx.push(WriteOp::UpsertGarrison {
            city: context.defending_city,
            unit_name,
            unit_count,
            unit_image,
        });
    }

    let capture = if winner == Side::Attacking {
        tx.push(WriteOp::SetCityOwner {
            city: context.defending_city,
            owner: context.attacking_faction,
        });
        tx.push(WriteOp::SetBuildingsOwner {
            city: context.defending_city,
            owner: context.attacking_faction,
        });
        Some((context.defending_city, context.attacking_faction))
    } else {
        None
    };

    for stack in attackers {
        let home_row = home.iter().find(|r| r.unit_name == stack.unit_name);
        let home_count = home_row.map(|r| r.unit_count).unwrap_or(0);
        let remaining = i64::from(home_count) - i64::from(stack.initial_count());

        if remaining > 0 {
            tx.push(WriteOp::UpsertGarrison {
                city: context.attacking_city,
                unit_name: stack.unit_name.clone(),
                unit_count: remaining as u32,
                unit_image: home_row
                    .map(|r| r.unit_image.clone())
                    .unwrap_or_else(|| stack.image_ref.clone()),
            });
        } else {
            tx.push(WriteOp::DeleteGarrisonRow {
                city: context.attacking_city,
                unit_name: stack.unit_name.clone(),
            });
        }
    }

    Ok(GarrisonPlan { tx, capture })
}

/// Plan and commit in one call
pub fn reconcile_garrisons<S: WarStore + ?Sized>(
    store: &mut S,
    context: &BattleContext,
    attackers: &[UnitStack],
    defenders: &[UnitStack],
    skipped_defenders: &[SkippedRecord],
    winner: Side,
) -> StoreResult<Option<(CityId, FactionId)>> {
    let plan = plan_garrison_reconciliation(
        &*store,
        context,
        attackers,
        defenders,
        skipped_defenders,
        winner,
    )?;
    let capture = plan.capture;
    plan.commit(store)?;
    Ok(capture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::{UnitClass, UnitStats};
    use crate::city::{BuildingType, CityBuildings};
    use crate::store::InMemoryStore;

    const HOME: CityId = CityId(1);
    const TARGET: CityId = CityId(2);
    const RED: FactionId = FactionId(10);
    const BLUE: FactionId = FactionId(20);

    fn context() -> BattleContext {
        BattleContext::new(HOME, TARGET, RED, BLUE)
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_city(HOME, "Kazan", RED)
            .with_city(TARGET, "Samara", BLUE)
            .with_garrison(HOME, "Archer", 120)
            .with_garrison(HOME, "Cannon", 4)
            .with_garrison(TARGET, "Guard", 50)
            .with_buildings(CityBuildings::new(TARGET, BLUE).with(BuildingType::Factory, 1))
    }

    fn stack(name: &str, fielded: u32, survivors: u32) -> UnitStack {
        let mut s = UnitStack::new(name, fielded, UnitStats::new(10, 1, 1, UnitClass::Class2));
        s.set_survivors(survivors);
        s
    }

    #[test]
    fn test_attacking_win_captures_city() {
        let mut store = store();
        let attackers = vec![stack("Archer", 100, 70), stack("Cannon", 4, 0)];
        let defenders = vec![stack("Guard", 50, 0)];

        let capture =
            reconcile_garrisons(&mut store, &context(), &attackers, &defenders, &[], Side::Attacking)
                .unwrap();

        assert_eq!(capture, Some((TARGET, RED)));
        assert_eq!(store.garrison_count(TARGET, "Archer"), 70);
        assert_eq!(store.garrison_count(TARGET, "Guard"), 0);
        assert_eq!(store.garrison_count(TARGET, "Cannon"), 0);
        assert_eq!(store.city(TARGET).unwrap().unwrap().owner, RED);
        assert_eq!(store.buildings(TARGET).unwrap().unwrap().owner, RED);

        // 20 archers stayed home; every cannon marched out.
        assert_eq!(store.garrison_count(HOME, "Archer"), 20);
        assert!(store.garrison(HOME).unwrap().iter().all(|r| r.unit_name != "Cannon"));
    }

    #[test]
    fn test_defending_win_keeps_owner_and_survivors() {
        let mut store = store();
        let attackers = vec![stack("Archer", 120, 0)];
        let defenders = vec![stack("Guard", 50, 33)];

        let capture =
            reconcile_garrisons(&mut store, &context(), &attackers, &defenders, &[], Side::Defending)
                .unwrap();

        assert_eq!(capture, None);
        assert_eq!(store.garrison_count(TARGET, "Guard"), 33);
        assert_eq!(store.city(TARGET).unwrap().unwrap().owner, BLUE);
        assert_eq!(store.garrison_count(HOME, "Archer"), 0);
        assert_eq!(store.garrison_count(HOME, "Cannon"), 4);
    }

    fn sat_out(name: &str, count: u32) -> SkippedRecord {
        SkippedRecord {
            unit_name: name.into(),
            unit_count: count,
            unit_image: format!("{}.png", name.to_lowercase()),
        }
    }

    #[test]
    fn test_held_city_keeps_units_that_sat_out() {
        let mut store = store();
        let attackers = vec![stack("Archer", 1, 0)];
        let defenders = vec![stack("Guard", 50, 48)];
        let skipped = vec![sat_out("Ghost", 7), sat_out("Guard", 3)];

        reconcile_garrisons(
            &mut store,
            &context(),
            &attackers,
            &defenders,
            &skipped,
            Side::Defending,
        )
        .unwrap();

        assert_eq!(store.garrison_count(TARGET, "Ghost"), 7);
        assert_eq!(store.garrison_count(TARGET, "Guard"), 51);
        let ghost = store
            .garrison(TARGET)
            .unwrap()
            .into_iter()
            .find(|r| r.unit_name == "Ghost")
            .unwrap();
        assert_eq!(ghost.unit_image, "ghost.png");
    }

    #[test]
    fn test_captured_city_drops_units_that_sat_out() {
        let mut store = store();
        let attackers = vec![stack("Archer", 100, 70)];
        let defenders = vec![stack("Guard", 50, 0)];

        reconcile_garrisons(
            &mut store,
            &context(),
            &attackers,
            &defenders,
            &[sat_out("Ghost", 7)],
            Side::Attacking,
        )
        .unwrap();

        assert_eq!(store.garrison_count(TARGET, "Ghost"), 0);
        assert_eq!(store.garrison_count(TARGET, "Archer"), 70);
    }

    #[test]
    fn test_wiped_out_defenders_leave_empty_garrison() {
        let mut store = store();
        let attackers = vec![stack("Archer", 10, 0)];
        let defenders = vec![stack("Guard", 50, 0)];

        reconcile_garrisons(&mut store, &context(), &attackers, &defenders, &[], Side::Defending)
            .unwrap();

        assert!(store.garrison(TARGET).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_city_fails_before_any_write() {
        let mut store = InMemoryStore::new().with_city(HOME, "Kazan", RED);
        let attackers = vec![stack("Archer", 10, 10)];

        let err = plan_garrison_reconciliation(&store, &context(), &attackers, &[], &[], Side::Attacking)
            .unwrap_err();

        assert_eq!(err, StoreError::UnknownCity(TARGET));
        assert_eq!(store.commit_count(), 0);
        assert!(reconcile_garrisons(&mut store, &context(), &attackers, &[], &[], Side::Attacking).is_err());
    }

    #[test]
    fn test_plan_has_single_clear_op() {
        let store = store();
        let attackers = vec![stack("Archer", 100, 70)];

        let plan =
            plan_garrison_reconciliation(&store, &context(), &attackers, &[], &[], Side::Attacking)
                .unwrap();

        let clears = plan
            .transaction()
            .ops()
            .iter()
            .filter(|op| matches!(op, WriteOp::ClearGarrison { .. }))
            .count();
        assert_eq!(clears, 1);
    }
}
