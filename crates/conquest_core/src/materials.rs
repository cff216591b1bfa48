//! Per-player material balances.
//!
//! Two material kinds are tracked as independent non-negative counters.
//! Mines credit them, camps and construction debit them. All arithmetic is
//! integer and a balance can never go negative: callers must reject rather
//! than overdraw.

use serde::{Deserialize, Serialize};

/// A material kind yielded by deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Primary construction material.
    Iron,
    /// Secondary material, consumed by camps when iron runs out.
    Gold,
}

/// A fixed construction cost in material units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialCost {
    /// Iron units.
    pub iron: i32,
    /// Gold units.
    pub gold: i32,
}

impl MaterialCost {
    /// Creates a cost.
    #[must_use]
    pub const fn new(iron: i32, gold: i32) -> Self {
        Self { iron, gold }
    }
}

/// One player's material balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialStore {
    /// Iron units held.
    pub iron: i32,
    /// Gold units held.
    pub gold: i32,
}

impl MaterialStore {
    /// Creates a store with the given balances.
    #[must_use]
    pub const fn new(iron: i32, gold: i32) -> Self {
        Self { iron, gold }
    }

    /// Amount held of one material kind.
    #[must_use]
    pub const fn amount(&self, kind: Material) -> i32 {
        match kind {
            Material::Iron => self.iron,
            Material::Gold => self.gold,
        }
    }

    /// Credits one unit of a material kind.
    pub fn credit(&mut self, kind: Material) {
        match kind {
            Material::Iron => self.iron += 1,
            Material::Gold => self.gold += 1,
        }
    }

    /// Check if the balance covers a cost.
    #[must_use]
    pub const fn can_afford(&self, cost: MaterialCost) -> bool {
        self.iron >= cost.iron && self.gold >= cost.gold
    }

    /// Spend a cost if the balance covers it.
    ///
    /// Returns true if the transaction succeeded.
    pub fn spend(&mut self, cost: MaterialCost) -> bool {
        if self.can_afford(cost) {
            self.iron -= cost.iron;
            self.gold -= cost.gold;
            true
        } else {
            false
        }
    }

    /// Consume a single unit of whichever material is available, iron first.
    ///
    /// Returns the kind consumed, or `None` if both balances are empty.
    pub fn consume_any(&mut self) -> Option<Material> {
        if self.iron >= 1 {
            self.iron -= 1;
            Some(Material::Iron)
        } else if self.gold >= 1 {
            self.gold -= 1;
            Some(Material::Gold)
        } else {
            None
        }
    }
}
