//! Building placement and demolition rules.
//!
//! Construction validates a request against ownership, terrain, occupancy,
//! and the player's material balance, then debits the fixed cost. Every
//! rejection leaves both the grid and the balances untouched.

use crate::error::{GameError, Result};
use crate::game::Game;
use crate::materials::MaterialCost;
use crate::tile::{Building, Owner, Tile};

/// Fixed material cost of a building type.
#[must_use]
pub const fn building_cost(building: Building) -> MaterialCost {
    match building {
        Building::None => MaterialCost::new(0, 0),
        Building::Wall => MaterialCost::new(1, 0),
        Building::Mine => MaterialCost::new(2, 0),
        Building::Camp => MaterialCost::new(2, 2),
        Building::Capital => MaterialCost::new(10, 10),
    }
}

impl Game {
    /// Places or removes a building, returning whether it was accepted.
    pub fn build(&mut self, player: u8, index: u32, building: Building) -> bool {
        self.try_build(player, index, building).is_ok()
    }

    /// Places or removes a building.
    ///
    /// `Building::None` demolishes. Walls convert the tile into a neutral
    /// fortress: unclaimed, army fixed at the ruleset's wall strength.
    ///
    /// # Errors
    ///
    /// - [`GameError::RejectedSurrendered`] if the player surrendered.
    /// - [`GameError::RejectedOwnership`] if the tile is not theirs.
    /// - [`GameError::RejectedOccupiedBuilding`] if the tile is already
    ///   built on, or a demolition targets a capital.
    /// - [`GameError::RejectedTerrain`] if the tile is hazardous, a mine
    ///   has no deposit under it, or a wall site holds more than one army.
    /// - [`GameError::RejectedInsufficientResources`] if the cost exceeds
    ///   the player's balance.
    pub fn try_build(&mut self, player: u8, index: u32, building: Building) -> Result<()> {
        if self.surrendered.contains(&player) {
            return Err(GameError::RejectedSurrendered { player });
        }
        let mut tile = self.grid.get(index);
        if tile.owner != Owner::Player(player) {
            return Err(GameError::RejectedOwnership { player, tile: index });
        }

        if building == Building::None {
            // Demolition. Capitals cannot be removed.
            if tile.building == Building::Capital {
                return Err(GameError::RejectedOccupiedBuilding { tile: index });
            }
            tile.building = Building::None;
            self.grid.set(index, tile);
            return Ok(());
        }

        if tile.building != Building::None {
            return Err(GameError::RejectedOccupiedBuilding { tile: index });
        }
        if self.swamps.contains(&index) {
            return Err(GameError::RejectedTerrain { tile: index });
        }
        if building == Building::Mine && !self.deposits.contains_key(&index) {
            return Err(GameError::RejectedTerrain { tile: index });
        }
        if building == Building::Wall && tile.army > 1 {
            return Err(GameError::RejectedTerrain { tile: index });
        }

        let cost = building_cost(building);
        let store = &mut self.materials[usize::from(player)];
        if !store.can_afford(cost) {
            return Err(GameError::RejectedInsufficientResources {
                required_iron: cost.iron,
                required_gold: cost.gold,
            });
        }
        store.spend(cost);

        if building == Building::Wall {
            // The tile leaves the player's territory entirely: a fortress
            // obstacle owned by no one.
            self.grid.set(
                index,
                Tile::with_building(Owner::Neutral, self.rules.wall_army, Building::Wall),
            );
        } else {
            tile.building = building;
            self.grid.set(index, tile);
        }
        Ok(())
    }
}
