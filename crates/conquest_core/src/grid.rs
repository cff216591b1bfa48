//! Sparse tile grid with an implicit default.
//!
//! Only tiles that differ from [`Tile::default`] are stored. Lookups for
//! unindexed positions return a fresh default value, never a shared
//! reference, so callers cannot alias the default through a mutation.
//!
//! `BTreeMap` keeps iteration in tile-index order, which makes every pass
//! over the grid deterministic without a separate sorted-key step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Sparse mapping from tile index to tile state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: BTreeMap<u32, Tile>,
}

impl TileGrid {
    /// Creates an empty grid (every position at the implicit default).
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
        }
    }

    /// Tile state at an index, the implicit default if unindexed.
    #[must_use]
    pub fn get(&self, index: u32) -> Tile {
        self.tiles.get(&index).copied().unwrap_or_default()
    }

    /// Sets the tile state at an index.
    ///
    /// Storing a value equal to the default removes the entry, so the grid
    /// never holds explicit defaults and structural equality matches
    /// observable equality.
    pub fn set(&mut self, index: u32, tile: Tile) {
        if tile.is_default() {
            self.tiles.remove(&index);
        } else {
            self.tiles.insert(index, tile);
        }
    }

    /// Reverts a tile to the implicit default.
    pub fn clear(&mut self, index: u32) {
        self.tiles.remove(&index);
    }

    /// Iterate over explicitly stored tiles in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Tile)> + '_ {
        self.tiles.iter().map(|(&index, &tile)| (index, tile))
    }

    /// Indices of explicitly stored tiles, in order.
    ///
    /// Collected up front so callers can mutate the grid while walking it.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        self.tiles.keys().copied().collect()
    }

    /// Number of explicitly stored tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if every position is at the implicit default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Building, Owner};

    #[test]
    fn miss_returns_fresh_default() {
        let grid = TileGrid::new();
        let tile = grid.get(42);
        assert!(tile.is_default());
        // A second lookup is unaffected by whatever the caller did with the
        // first copy.
        let mut first = grid.get(7);
        first.army = 99;
        assert_eq!(grid.get(7).army, 0);
    }

    #[test]
    fn set_then_get() {
        let mut grid = TileGrid::new();
        grid.set(3, Tile::new(Owner::Player(1), 5));
        assert_eq!(grid.get(3), Tile::new(Owner::Player(1), 5));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn storing_the_default_removes_the_entry() {
        let mut grid = TileGrid::new();
        grid.set(3, Tile::new(Owner::Player(1), 5));
        grid.set(3, Tile::default());
        assert!(grid.is_empty());
    }

    #[test]
    fn clear_reverts_to_default() {
        let mut grid = TileGrid::new();
        grid.set(9, Tile::with_building(Owner::Player(0), 2, Building::Mine));
        grid.clear(9);
        assert!(grid.get(9).is_default());
        assert!(grid.is_empty());
    }

    #[test]
    fn iteration_is_in_index_order() {
        let mut grid = TileGrid::new();
        for index in [11u32, 2, 7] {
            grid.set(index, Tile::new(Owner::Player(0), 1));
        }
        let order: Vec<u32> = grid.iter().map(|(index, _)| index).collect();
        assert_eq!(order, vec![2, 7, 11]);
        assert_eq!(grid.indices(), vec![2, 7, 11]);
    }
}
