//! Tile-diff replay recorder.
//!
//! A replay stores the initial map state plus, for every tick, the set of
//! tiles whose (owner, army, building) triple changed and the players who
//! newly surrendered. The recorder only reads game state; it never mutates
//! the match it observes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::Game;
use crate::materials::Material;
use crate::tile::Tile;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// The diff produced by one observed tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayUpdate {
    /// Tiles that changed since the previous observation, ordered by index.
    pub tiles: Vec<(u32, Tile)>,
    /// Players that surrendered since the previous observation.
    pub surrendered: Vec<u8>,
}

impl ReplayUpdate {
    /// True when the tick changed nothing observable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.surrendered.is_empty()
    }
}

/// Complete recorded replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Player identifiers in index order.
    pub players: Vec<String>,
    /// Hazard tile indices.
    pub swamps: Vec<u32>,
    /// Deposit entries `(tile, material)`.
    pub deposits: Vec<(u32, Material)>,
    /// Initial explicit tile entries.
    pub initial_tiles: Vec<(u32, Tile)>,
    /// One update per observed tick.
    pub updates: Vec<ReplayUpdate>,
}

impl Replay {
    /// Encodes the replay as compact bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Decodes a replay from bytes, checking the format version.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] on malformed bytes or a version
    /// mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let replay: Self =
            bincode::deserialize(bytes).map_err(|e| GameError::Codec(e.to_string()))?;
        if replay.version != REPLAY_VERSION {
            return Err(GameError::Codec(format!(
                "replay version mismatch: expected {REPLAY_VERSION}, got {}",
                replay.version
            )));
        }
        Ok(replay)
    }

    /// Number of recorded ticks.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.updates.len()
    }
}

/// Observes a match and accumulates a [`Replay`].
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    replay: Replay,
    /// Shadow copy of the last observed tile state.
    shadow: BTreeMap<u32, Tile>,
    /// Players already seen surrendering.
    seen_surrendered: BTreeSet<u8>,
}

impl ReplayRecorder {
    /// Starts a recording from the match's current state.
    #[must_use]
    pub fn new(game: &Game) -> Self {
        let shadow: BTreeMap<u32, Tile> = game.tiles().iter().collect();
        let replay = Replay {
            version: REPLAY_VERSION,
            width: game.width(),
            height: game.height(),
            players: game.players().to_vec(),
            swamps: game.swamps().iter().copied().collect(),
            deposits: game.deposits().iter().map(|(&i, &m)| (i, m)).collect(),
            initial_tiles: shadow.iter().map(|(&i, &t)| (i, t)).collect(),
            updates: Vec::new(),
        };
        Self {
            replay,
            shadow,
            seen_surrendered: game.surrendered().clone(),
        }
    }

    /// Records the diff since the last observation. Call once per tick.
    pub fn observe(&mut self, game: &Game) {
        let mut update = ReplayUpdate::default();

        // Changed or newly explicit tiles.
        for (index, tile) in game.tiles().iter() {
            if self.shadow.get(&index) != Some(&tile) {
                update.tiles.push((index, tile));
                self.shadow.insert(index, tile);
            }
        }

        // Tiles that reverted to the implicit default.
        let reverted: Vec<u32> = self
            .shadow
            .keys()
            .copied()
            .filter(|&index| game.tiles().get(index).is_default())
            .collect();
        for index in reverted {
            update.tiles.push((index, Tile::default()));
            self.shadow.remove(&index);
        }
        update.tiles.sort_unstable_by_key(|&(index, _)| index);

        for &player in game.surrendered() {
            if self.seen_surrendered.insert(player) {
                update.surrendered.push(player);
            }
        }

        self.replay.updates.push(update);
    }

    /// The replay accumulated so far.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Finishes the recording and returns the replay.
    #[must_use]
    pub fn finish(self) -> Replay {
        self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, LayoutConfig};
    use crate::ruleset::Ruleset;
    use crate::tile::Owner;

    fn recorded_game() -> (Game, ReplayRecorder) {
        let layout = Layout::generate(2, &LayoutConfig::default().with_seed(31));
        let game = Game::new(
            vec![String::from("a"), String::from("b")],
            &layout,
            Ruleset::resource_economy(),
        );
        let recorder = ReplayRecorder::new(&game);
        (game, recorder)
    }

    #[test]
    fn initial_state_is_captured() {
        let (game, recorder) = recorded_game();
        let replay = recorder.replay();
        assert_eq!(replay.version, REPLAY_VERSION);
        assert_eq!(replay.initial_tiles.len(), game.tiles().len());
        assert_eq!(replay.players, game.players());
    }

    #[test]
    fn quiet_ticks_record_empty_updates() {
        let (mut game, mut recorder) = recorded_game();
        game.tick();
        recorder.observe(&game);
        // Turn 1: no production, no decay, no moves.
        assert!(recorder.replay().updates[0].is_empty());
    }

    #[test]
    fn tile_changes_appear_exactly_once() {
        let (mut game, mut recorder) = recorded_game();
        let spawn = game
            .tiles()
            .iter()
            .find(|(_, tile)| tile.owner == Owner::Player(0))
            .map(|(index, _)| index)
            .unwrap();

        game.queue_move(0, spawn, spawn.wrapping_add(1));
        for _ in 0..4 {
            game.tick();
            recorder.observe(&game);
        }

        let touched: usize = recorder
            .replay()
            .updates
            .iter()
            .map(|update| update.tiles.len())
            .sum();
        assert!(touched > 0);

        // Observing an unchanged game again adds nothing.
        recorder.observe(&game);
        assert!(recorder.replay().updates.last().unwrap().is_empty());
    }

    #[test]
    fn reverted_tiles_are_recorded_as_defaults() {
        let (mut game, mut recorder) = recorded_game();
        let swamp = *game.swamps().iter().next().unwrap();
        game.grid.set(swamp, Tile::new(Owner::Player(0), 1));
        recorder.observe(&game);

        for _ in 0..4 {
            game.tick();
        }
        recorder.observe(&game);
        let last = recorder.replay().updates.last().unwrap();
        assert!(last
            .tiles
            .iter()
            .any(|&(index, tile)| index == swamp && tile.is_default()));
    }

    #[test]
    fn surrenders_are_reported_once() {
        let (mut game, mut recorder) = recorded_game();
        game.surrender(1);
        recorder.observe(&game);
        recorder.observe(&game);

        assert_eq!(recorder.replay().updates[0].surrendered, vec![1]);
        assert!(recorder.replay().updates[1].surrendered.is_empty());
    }

    #[test]
    fn replay_bytes_roundtrip_with_version_check() {
        let (mut game, mut recorder) = recorded_game();
        game.tick();
        recorder.observe(&game);

        let replay = recorder.finish();
        let bytes = replay.to_bytes().unwrap();
        assert_eq!(Replay::from_bytes(&bytes).unwrap(), replay);

        let mut stale = replay;
        stale.version = 99;
        let bytes = stale.to_bytes().unwrap();
        assert!(Replay::from_bytes(&bytes).is_err());
    }
}
