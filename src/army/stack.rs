//! Unit stacks - one unit type within one army

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::unit::{UnitClass, UnitStats};

/// A group of identical units tracked as one count
///
/// `initial_count` is fixed when the stack is built; `unit_count` can only
/// go down from there, so `killed_count` never underflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStack {
    pub unit_name: String,
    unit_count: u32,
    initial_count: u32,
    pub stats: UnitStats,
    pub image_ref: String,
}

impl UnitStack {
    pub fn new(name: impl Into<String>, count: u32, stats: UnitStats) -> Self {
        Self {
            unit_name: name.into(),
            unit_count: count,
            initial_count: count,
            stats,
            image_ref: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image_ref = image.into();
        self
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    pub fn initial_count(&self) -> u32 {
        self.initial_count
    }

    pub fn killed_count(&self) -> u32 {
        self.initial_count - self.unit_count
    }

    pub fn class(&self) -> UnitClass {
        self.stats.class
    }

    /// Dead stacks are excluded from further engagements
    pub fn is_alive(&self) -> bool {
        self.unit_count > 0
    }

    /// Set the surviving count, never above the starting count
    pub fn set_survivors(&mut self, count: u32) {
        self.unit_count = count.min(self.initial_count);
    }

    pub fn wipe_out(&mut self) {
        self.unit_count = 0;
    }

    /// Merge more troops of the same type in before combat starts
    ///
    /// Returns `false`, leaving the stack unchanged, if the merged count
    /// would not fit in a `u32`.
    pub(crate) fn absorb(&mut self, count: u32) -> bool {
        match self.initial_count.checked_add(count) {
            Some(total) => {
                self.unit_count += count;
                self.initial_count = total;
                true
            }
            None => false,
        }
    }
}

/// Engagement order: lower class first, then higher attack first
pub fn engagement_order(a: &UnitStack, b: &UnitStack) -> Ordering {
    a.stats
        .class
        .cmp(&b.stats.class)
        .then_with(|| b.stats.attack.cmp(&a.stats.attack))
}

/// Stable sort of an army into engagement order
pub fn sort_for_engagement(stacks: &mut [UnitStack]) {
    stacks.sort_by(engagement_order);
}

/// Sum of surviving units
pub fn total_units(stacks: &[UnitStack]) -> u64 {
    stacks.iter().map(|s| u64::from(s.unit_count)).sum()
}

/// Sum of units fielded at the start of the battle
pub fn total_fielded(stacks: &[UnitStack]) -> u64 {
    stacks.iter().map(|s| u64::from(s.initial_count)).sum()
}

/// Sum of units lost during the battle
pub fn total_killed(stacks: &[UnitStack]) -> u64 {
    stacks.iter().map(|s| u64::from(s.killed_count())).sum()
}
