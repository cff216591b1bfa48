//! Tile, owner, and building types.
//!
//! A tile is one grid cell: who controls it, how much army sits on it, and
//! what structure (if any) is built there. Tiles are small `Copy` values;
//! the grid stores only tiles that differ from [`Tile::default`].

use serde::{Deserialize, Serialize};

/// Controller of a tile.
///
/// The integer codes (`-2` obstacle, `-1` unclaimed, `0..N-1` player index)
/// are the external document encoding; in memory the enum keeps the three
/// cases impossible to confuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Impassable terrain. Never mutated by move, production, or decay logic.
    Obstacle,
    /// Unclaimed ground (the grid default).
    Neutral,
    /// Owned by the player with this index.
    Player(u8),
}

impl Owner {
    /// Returns the document integer code for this owner.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Owner::Obstacle => -2,
            Owner::Neutral => -1,
            Owner::Player(p) => p as i32,
        }
    }

    /// Parses an owner from its document integer code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Owner> {
        match code {
            -2 => Some(Owner::Obstacle),
            -1 => Some(Owner::Neutral),
            p if (0..=i32::from(u8::MAX)).contains(&p) => {
                // Range-checked above, the cast cannot truncate.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let p = p as u8;
                Some(Owner::Player(p))
            }
            _ => None,
        }
    }

    /// Returns the player index if this tile is player-owned.
    #[must_use]
    pub const fn player(self) -> Option<u8> {
        match self {
            Owner::Player(p) => Some(p),
            _ => None,
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Owner::Neutral
    }
}

/// Structure built on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Building {
    /// No structure (the default, also the demolition target).
    #[default]
    None,
    /// Neutral fortress obstacle; cleared when captured.
    Wall,
    /// Produces army each production tick; losing the last one loses the
    /// player's whole territory on the next capture.
    Capital,
    /// Extracts one material unit per production tick from a deposit.
    Mine,
    /// Converts one material unit into one army per production tick.
    Camp,
}

impl Building {
    /// Returns the document byte code for this building.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Building::None => 0,
            Building::Wall => 1,
            Building::Capital => 2,
            Building::Mine => 3,
            Building::Camp => 4,
        }
    }

    /// Parses a building from its document byte code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Building> {
        match code {
            0 => Some(Building::None),
            1 => Some(Building::Wall),
            2 => Some(Building::Capital),
            3 => Some(Building::Mine),
            4 => Some(Building::Camp),
            _ => None,
        }
    }
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Controller of the tile.
    pub owner: Owner,
    /// Army strength. Negative only on unclaimed outpost tiles, bounded
    /// below by the ruleset's outpost charge.
    pub army: i32,
    /// Structure on the tile.
    pub building: Building,
}

impl Tile {
    /// Creates a tile with no building.
    #[must_use]
    pub const fn new(owner: Owner, army: i32) -> Self {
        Self {
            owner,
            army,
            building: Building::None,
        }
    }

    /// Creates a tile with a building.
    #[must_use]
    pub const fn with_building(owner: Owner, army: i32, building: Building) -> Self {
        Self {
            owner,
            army,
            building,
        }
    }

    /// An impassable obstacle tile.
    #[must_use]
    pub const fn obstacle() -> Self {
        Self::new(Owner::Obstacle, 0)
    }

    /// True for the implicit grid default: unclaimed, empty, unbuilt.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Tile::default()
    }
}
