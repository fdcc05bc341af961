//! Battle context - who fights whom, and from where

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::{CityId, FactionId, Side};
use crate::store::WarStore;

/// Identifiers for one battle invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleContext {
    pub attacking_city: CityId,
    pub defending_city: CityId,
    pub attacking_faction: FactionId,
    pub defending_faction: FactionId,
    /// Faction controlled by the human player, if any
    #[serde(default)]
    pub user_faction: Option<FactionId>,
}

impl BattleContext {
    pub fn new(
        attacking_city: CityId,
        defending_city: CityId,
        attacking_faction: FactionId,
        defending_faction: FactionId,
    ) -> Self {
        Self {
            attacking_city,
            defending_city,
            attacking_faction,
            defending_faction,
            user_faction: None,
        }
    }

    pub fn with_user(mut self, faction: FactionId) -> Self {
        self.user_faction = Some(faction);
        self
    }

    /// Resolve both factions from the current city owners
    pub fn from_cities<S: WarStore + ?Sized>(
        store: &S,
        attacking_city: CityId,
        defending_city: CityId,
        user_faction: Option<FactionId>,
    ) -> Result<Self> {
        let attacker = store
            .city(attacking_city)?
            .ok_or(BattleError::UnknownCity(attacking_city))?;
        let defender = store
            .city(defending_city)?
            .ok_or(BattleError::UnknownCity(defending_city))?;

        Ok(Self {
            attacking_city,
            defending_city,
            attacking_faction: attacker.owner,
            defending_faction: defender.owner,
            user_faction,
        })
    }

    /// Check every precondition a battle needs before combat starts
    pub fn validate<S: WarStore + ?Sized>(&self, store: &S) -> Result<()> {
        if self.attacking_city == self.defending_city {
            return Err(BattleError::SameCity(self.attacking_city));
        }
        if self.attacking_faction == self.defending_faction {
            return Err(BattleError::SameFaction(self.attacking_faction));
        }

        for (city, faction) in [
            (self.attacking_city, self.attacking_faction),
            (self.defending_city, self.defending_faction),
        ] {
            let record = store.city(city)?.ok_or(BattleError::UnknownCity(city))?;
            if record.owner != faction {
                return Err(BattleError::OwnerMismatch {
                    city,
                    expected: faction,
                    actual: record.owner,
                });
            }
        }

        Ok(())
    }

    pub fn faction(&self, side: Side) -> FactionId {
        match side {
            Side::Attacking => self.attacking_faction,
            Side::Defending => self.defending_faction,
        }
    }

    pub fn city(&self, side: Side) -> CityId {
        match side {
            Side::Attacking => self.attacking_city,
            Side::Defending => self.defending_city,
        }
    }

    /// Side the human player fought on, if they took part
    pub fn user_side(&self) -> Option<Side> {
        let user = self.user_faction?;
        if user == self.attacking_faction {
            Some(Side::Attacking)
        } else if user == self.defending_faction {
            Some(Side::Defending)
        } else {
            None
        }
    }

    pub fn is_user_involved(&self) -> bool {
        self.user_side().is_some()
    }
}
