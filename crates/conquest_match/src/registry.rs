//! Per-instance match registry and tick driver.
//!
//! Every running match sits behind its own async mutex: transport handlers
//! enqueue moves, builds, and surrenders under the match lock, and the tick
//! driver takes the same lock to advance the game, so a drain phase can
//! never observe a partially appended queue. Matches are independent; the
//! registry itself is the only shared structure.
//!
//! Ended matches linger for a grace period of ticks (so late observers can
//! fetch the final state) and are then retired.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use conquest_core::document::GameDocument;
use conquest_core::game::Game;
use conquest_core::tile::Building;

/// A registered match plus its teardown state.
#[derive(Debug)]
pub struct MatchHandle {
    /// The match itself.
    pub game: Game,
    /// Ticks left before an ended match is retired.
    grace_remaining: Option<u32>,
}

impl MatchHandle {
    fn new(game: Game) -> Self {
        Self {
            game,
            grace_remaining: None,
        }
    }
}

/// Registry of running matches keyed by match id.
#[derive(Debug)]
pub struct MatchRegistry {
    matches: Mutex<BTreeMap<String, Arc<Mutex<MatchHandle>>>>,
    grace_ticks: u32,
}

impl MatchRegistry {
    /// Creates a registry; ended matches are retired after `grace_ticks`
    /// further ticks.
    #[must_use]
    pub fn new(grace_ticks: u32) -> Self {
        Self {
            matches: Mutex::new(BTreeMap::new()),
            grace_ticks,
        }
    }

    /// Registers a match under an id, replacing any previous holder.
    pub async fn register(&self, id: impl Into<String>, game: Game) {
        let id = id.into();
        info!(match_id = %id, players = game.players().len(), "match registered");
        self.matches
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(MatchHandle::new(game))));
    }

    /// Shared handle to a match, for read access or bot drivers.
    pub async fn handle(&self, id: &str) -> Option<Arc<Mutex<MatchHandle>>> {
        self.matches.lock().await.get(id).cloned()
    }

    /// Number of registered matches.
    pub async fn len(&self) -> usize {
        self.matches.lock().await.len()
    }

    /// True when no matches are registered.
    pub async fn is_empty(&self) -> bool {
        self.matches.lock().await.is_empty()
    }

    /// Enqueues a move under the match lock.
    pub async fn queue_move(&self, id: &str, player: u8, from: u32, to: u32) -> bool {
        match self.handle(id).await {
            Some(handle) => handle.lock().await.game.queue_move(player, from, to),
            None => false,
        }
    }

    /// Applies a build request under the match lock.
    pub async fn build(&self, id: &str, player: u8, tile: u32, building: Building) -> bool {
        match self.handle(id).await {
            Some(handle) => handle.lock().await.game.build(player, tile, building),
            None => false,
        }
    }

    /// Marks a player surrendered. Returns false for an unknown match.
    pub async fn surrender(&self, id: &str, player: u8) -> bool {
        match self.handle(id).await {
            Some(handle) => {
                handle.lock().await.game.surrender(player);
                true
            }
            None => false,
        }
    }

    /// Snapshots a match as a document.
    pub async fn snapshot(&self, id: &str) -> Option<GameDocument> {
        match self.handle(id).await {
            Some(handle) => Some(handle.lock().await.game.to_document()),
            None => None,
        }
    }

    /// Advances every registered match by one tick and retires matches
    /// whose grace period has elapsed. Returns the number of matches still
    /// registered.
    pub async fn tick_all(&self) -> usize {
        let mut matches = self.matches.lock().await;
        let mut retired = Vec::new();

        for (id, handle) in matches.iter() {
            let mut handle = handle.lock().await;
            handle.game.tick();

            if handle.game.ended() {
                let remaining = handle.grace_remaining.get_or_insert(self.grace_ticks);
                if *remaining == 0 {
                    retired.push(id.clone());
                } else {
                    *remaining -= 1;
                }
            }
        }

        for id in retired {
            info!(match_id = %id, "match retired");
            matches.remove(&id);
        }
        matches.len()
    }
}

/// Drives the registry on a fixed cadence until nothing is left to tick
/// (or `max_ticks` elapses, when given).
pub async fn drive(registry: &MatchRegistry, period: Duration, max_ticks: Option<u64>) {
    let mut interval = tokio::time::interval(period);
    let mut ticks = 0u64;
    loop {
        interval.tick().await;
        let remaining = registry.tick_all().await;
        ticks += 1;
        debug!(ticks, remaining, "driver tick");
        if remaining == 0 {
            break;
        }
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
    }
}
