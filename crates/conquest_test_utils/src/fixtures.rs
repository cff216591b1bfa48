//! Layout and game fixtures.
//!
//! Pre-built maps and matches for consistent testing: an empty arena for
//! hand-placed tiles, seeded generated maps, and a scripted bot that
//! exercises the move queue without any outside randomness.

use std::collections::{BTreeMap, BTreeSet};

use conquest_core::prelude::*;

/// An empty layout: no hazards, deposits, obstacles, or spawns.
///
/// Tests place tiles by hand on top of this.
#[must_use]
pub fn empty_layout(width: u32, height: u32) -> Layout {
    Layout {
        width,
        height,
        swamps: BTreeSet::new(),
        deposits: BTreeMap::new(),
        obstacles: BTreeSet::new(),
        spawns: BTreeMap::new(),
        outposts: BTreeMap::new(),
    }
}

/// Player names `p0..pN`.
#[must_use]
pub fn player_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("p{i}")).collect()
}

/// A two-player match on an empty arena with the canonical ruleset.
#[must_use]
pub fn arena_2p(width: u32, height: u32) -> Game {
    Game::new(
        player_names(2),
        &empty_layout(width, height),
        Ruleset::resource_economy(),
    )
}

/// A two-player match on a seeded density map with the canonical ruleset.
#[must_use]
pub fn density_2p(seed: u64) -> Game {
    let layout = Layout::generate(2, &LayoutConfig::default().with_seed(seed));
    Game::new(player_names(2), &layout, Ruleset::resource_economy())
}

/// A two-player match on a seeded island map.
#[must_use]
pub fn island_2p(seed: u64) -> Game {
    let layout = Layout::generate(2, &LayoutConfig::island().with_seed(seed));
    Game::new(player_names(2), &layout, Ruleset::resource_economy())
}

/// Scripted bot that walks each player's strongest tile toward a corner.
///
/// Purely a function of the observed state, so identical matches produce
/// identical move scripts. Used by the determinism harness and benches to
/// keep queues busy without real players.
pub fn enqueue_scripted_moves(game: &mut Game) {
    #[allow(clippy::cast_possible_truncation)]
    let player_count = game.players().len() as u8;
    for player in 0..player_count {
        let strongest = game
            .tiles()
            .iter()
            .filter(|(_, tile)| tile.owner == Owner::Player(player) && tile.army > 1)
            .max_by_key(|&(index, tile)| (tile.army, index));
        let Some((from, _)) = strongest else {
            continue;
        };
        // March right, wrapping to the next row at the map edge.
        let to = if from + 1 < game.area() { from + 1 } else { 0 };
        game.queue_move(player, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_has_no_tiles() {
        let game = arena_2p(5, 5);
        assert!(game.tiles().is_empty());
        assert_eq!(game.players().len(), 2);
    }

    #[test]
    fn density_fixture_spawns_both_players() {
        let game = density_2p(1);
        let owners: std::collections::BTreeSet<u8> = game
            .tiles()
            .iter()
            .filter_map(|(_, tile)| tile.owner.player())
            .collect();
        assert_eq!(owners.len(), 2);
    }

    #[test]
    fn scripted_moves_only_use_owned_tiles() {
        let mut game = density_2p(2);
        for _ in 0..8 {
            enqueue_scripted_moves(&mut game);
            game.tick();
        }
        // The script is state-driven; it must never leave a queue growing
        // without bound.
        assert!(game.pending_moves(0) <= 8);
        assert!(game.pending_moves(1) <= 8);
    }
}
