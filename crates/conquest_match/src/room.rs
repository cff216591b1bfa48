//! Pre-game room state.
//!
//! A room collects players and force-start votes until the match begins.
//! A match starts when a majority-plus-one of the players vote to force,
//! or when the room fills. Turning a room into a game assigns player
//! indices in join order and hands back the key-to-index mapping the
//! transport layer needs to route requests.

use std::collections::BTreeMap;

use conquest_core::game::Game;
use conquest_core::layout::{Layout, LayoutConfig};
use conquest_core::ruleset::Ruleset;

/// A pre-game lobby.
#[derive(Debug, Clone)]
pub struct Room {
    /// Player key to display name, in join order.
    players: Vec<(String, String)>,
    /// Keys that voted to force-start.
    force: Vec<String>,
    /// Room capacity; `usize::MAX` for an open room.
    max_players: usize,
    /// Counter backing key assignment.
    next_key: u64,
    /// Layout settings the host configured for this room.
    pub layout: LayoutConfig,
    /// Ruleset the match will be created with.
    pub ruleset: Ruleset,
}

impl Room {
    /// Creates a room with a capacity.
    #[must_use]
    pub fn new(max_players: usize) -> Self {
        Self {
            players: Vec::new(),
            force: Vec::new(),
            max_players,
            next_key: 0,
            layout: LayoutConfig::default(),
            ruleset: Ruleset::resource_economy(),
        }
    }

    /// Creates a room without a capacity bound.
    #[must_use]
    pub fn open() -> Self {
        Self::new(usize::MAX)
    }

    /// Adds a player, returning their key, or `None` if the room is full.
    pub fn join(&mut self, name: &str) -> Option<String> {
        if self.players.len() >= self.max_players {
            return None;
        }
        let key = format!("k{}", self.next_key);
        self.next_key += 1;
        self.players.push((key.clone(), name.to_string()));
        Some(key)
    }

    /// Removes a player and their force vote. Returns whether they were in
    /// the room.
    pub fn leave(&mut self, key: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|(k, _)| k != key);
        self.force.retain(|k| k != key);
        self.players.len() != before
    }

    /// Records or withdraws a force-start vote.
    pub fn set_force(&mut self, key: &str, force: bool) {
        let known = self.players.iter().any(|(k, _)| k == key);
        self.force.retain(|k| k != key);
        if force && known {
            self.force.push(key.to_string());
        }
    }

    /// Votes needed to force-start.
    #[must_use]
    pub fn force_threshold(&self) -> usize {
        self.players.len() / 2 + 1
    }

    /// Whether the match should begin.
    #[must_use]
    pub fn should_start(&self) -> bool {
        (!self.players.is_empty() && self.force.len() >= self.force_threshold())
            || (self.max_players != usize::MAX && self.players.len() >= self.max_players)
    }

    /// Number of players currently in the room.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Player display names in join (index) order.
    #[must_use]
    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Starts the match: generates the configured layout and returns the
    /// game plus the key-to-player-index mapping.
    #[must_use]
    pub fn into_game(self) -> (Game, BTreeMap<String, u8>) {
        // Player count is bounded by the u8 index space.
        #[allow(clippy::cast_possible_truncation)]
        let count = self.players.len().min(usize::from(u8::MAX)) as u8;
        let layout = Layout::generate(count, &self.layout);
        let names = self.player_names();
        let keys = self
            .players
            .into_iter()
            .enumerate()
            .take(usize::from(count))
            .map(|(index, (key, _))| {
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u8;
                (key, index)
            })
            .collect();
        (Game::new(names, &layout, self.ruleset), keys)
    }
}
