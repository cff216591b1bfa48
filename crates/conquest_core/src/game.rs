//! The per-match game state machine.
//!
//! One [`Game`] instance exists per match. It owns the tile grid, player
//! list, material balances, pending move queues, and the ruleset, and is
//! mutated exclusively through the public operations here plus the tick
//! phases in [`crate::turn`]. All state is explicit fields with controlled
//! accessors; nothing hides behind interior mutability.
//!
//! The engine never advances itself: an external scheduler calls
//! [`Game::tick`] on a fixed cadence and tears the instance down after
//! observing [`Game::ended`].

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::hash::{Hash, Hasher};

use crate::construction::building_cost;
use crate::document::{GameDocument, TileDoc};
use crate::error::Result;
use crate::grid::TileGrid;
use crate::layout::Layout;
use crate::materials::{Material, MaterialStore};
use crate::ruleset::Ruleset;
use crate::tile::{Building, Owner, Tile};

/// A pending move request: source and destination tile indices.
pub type PendingMove = (u32, u32);

/// Complete state of one match.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) players: Vec<String>,
    pub(crate) rules: Ruleset,
    pub(crate) swamps: BTreeSet<u32>,
    pub(crate) deposits: BTreeMap<u32, Material>,
    pub(crate) outposts: BTreeMap<u32, i32>,
    pub(crate) surrendered: BTreeSet<u8>,
    pub(crate) grid: TileGrid,
    pub(crate) materials: Vec<MaterialStore>,
    pub(crate) turn: u64,
    pub(crate) queues: Vec<VecDeque<PendingMove>>,
    pub(crate) ended_forced: bool,
}

impl Game {
    /// Creates a match from a layout and an ordered player list.
    ///
    /// The first `players.len()` spawn tiles (in index order) become the
    /// players' capitals with one army each; obstacle tiles are fixed into
    /// the grid; everything else starts at the implicit default.
    #[must_use]
    pub fn new(players: Vec<String>, layout: &Layout, rules: Ruleset) -> Self {
        let mut grid = TileGrid::new();

        for (player, (&index, _label)) in layout.spawns.iter().take(players.len()).enumerate() {
            // Player count is bounded by the u8 index space.
            #[allow(clippy::cast_possible_truncation)]
            let player = player as u8;
            grid.set(
                index,
                Tile::with_building(Owner::Player(player), 1, Building::Capital),
            );
        }

        for &index in &layout.obstacles {
            grid.set(index, Tile::obstacle());
        }

        // Both counters start at 1.5x the mine's iron cost, enough to
        // bootstrap a first mine with a margin.
        let buffer = building_cost(Building::Mine).iron * 3 / 2;
        let materials = vec![MaterialStore::new(buffer, buffer); players.len()];
        let queues = vec![VecDeque::new(); players.len()];

        Self {
            width: layout.width,
            height: layout.height,
            players,
            rules,
            swamps: layout.swamps.clone(),
            deposits: layout.deposits.clone(),
            outposts: layout.outposts.clone(),
            surrendered: BTreeSet::new(),
            grid,
            materials,
            queues,
            turn: 0,
            ended_forced: false,
        }
    }

    /// Map width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total tile count.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Player identifiers in index order.
    #[must_use]
    pub fn players(&self) -> &[String] {
        &self.players
    }

    /// The ruleset this match was created with.
    #[must_use]
    pub const fn rules(&self) -> &Ruleset {
        &self.rules
    }

    /// Current turn counter.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Read access to the tile grid (for transport and replay differs).
    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.grid
    }

    /// Indices of surrendered players.
    #[must_use]
    pub const fn surrendered(&self) -> &BTreeSet<u8> {
        &self.surrendered
    }

    /// Per-player material balances in player index order.
    #[must_use]
    pub fn materials(&self) -> &[MaterialStore] {
        &self.materials
    }

    /// Hazard tile indices.
    #[must_use]
    pub const fn swamps(&self) -> &BTreeSet<u32> {
        &self.swamps
    }

    /// Deposit tile index to material kind.
    #[must_use]
    pub const fn deposits(&self) -> &BTreeMap<u32, Material> {
        &self.deposits
    }

    /// Enqueues a move request for a player.
    ///
    /// Enqueue only: validation happens when the queue drains. Returns
    /// false for an unknown player index or a surrendered player.
    pub fn queue_move(&mut self, player: u8, from: u32, to: u32) -> bool {
        let Some(queue) = self.queues.get_mut(usize::from(player)) else {
            return false;
        };
        if self.surrendered.contains(&player) {
            return false;
        }
        queue.push_back((from, to));
        true
    }

    /// Number of pending moves for a player.
    #[must_use]
    pub fn pending_moves(&self, player: u8) -> usize {
        self.queues
            .get(usize::from(player))
            .map_or(0, VecDeque::len)
    }

    /// Marks a player as surrendered and discards their pending moves.
    ///
    /// Surrender is a plain state mutation, not an interrupt: the player's
    /// tiles stay on the board and only the end condition ignores them.
    pub fn surrender(&mut self, player: u8) {
        if usize::from(player) < self.players.len() {
            self.surrendered.insert(player);
            self.queues[usize::from(player)].clear();
        }
    }

    /// Whether the match has ended.
    ///
    /// True if force-set, or if at most one non-surrendered player still
    /// owns territory and at least one other player has none. A
    /// single-player match never auto-ends.
    #[must_use]
    pub fn ended(&self) -> bool {
        if self.ended_forced {
            return true;
        }
        let holders: BTreeSet<u8> = self
            .grid
            .iter()
            .filter_map(|(_, tile)| tile.owner.player())
            .filter(|player| !self.surrendered.contains(player))
            .collect();
        holders.len() <= 1 && holders.len() < self.players.len()
    }

    /// Force-sets the ended flag (scheduler teardown hook).
    pub fn set_ended(&mut self) {
        self.ended_forced = true;
    }

    /// Deterministic hash of the observable state.
    ///
    /// Two matches with identical tiles, materials, turn, and surrender
    /// state produce identical hashes; used for desync detection and the
    /// determinism harness.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        self.players.hash(&mut hasher);
        for player in &self.surrendered {
            player.hash(&mut hasher);
        }
        for (index, tile) in self.grid.iter() {
            index.hash(&mut hasher);
            tile.owner.code().hash(&mut hasher);
            tile.army.hash(&mut hasher);
            tile.building.code().hash(&mut hasher);
        }
        for store in &self.materials {
            store.iron.hash(&mut hasher);
            store.gold.hash(&mut hasher);
        }
        // The observable flag, not the force bit: a snapshot stores the
        // computed end state, so hashing the raw bit would make a
        // round-trip look like a divergence.
        self.ended().hash(&mut hasher);
        hasher.finish()
    }

    /// Snapshots the match as a document.
    #[must_use]
    pub fn to_document(&self) -> GameDocument {
        GameDocument {
            width: self.width,
            height: self.height,
            players: self.players.clone(),
            swamps: self.swamps.iter().copied().collect(),
            deposits: self.deposits.iter().map(|(&i, &m)| (i, m)).collect(),
            outposts: self.outposts.iter().map(|(&i, &c)| (i, c)).collect(),
            surrendered: self.surrendered.iter().copied().collect(),
            tiles: self
                .grid
                .iter()
                .map(|(index, tile)| (index, TileDoc::encode(tile)))
                .collect(),
            materials: self.materials.clone(),
            turn: self.turn,
            ended: self.ended(),
        }
    }

    /// Reconstructs a match from a document.
    ///
    /// The grid starts from its implicit default before the document's
    /// explicit entries are replayed; pending move queues start empty.
    ///
    /// # Errors
    ///
    /// Currently infallible for any well-typed document, but the signature
    /// reserves the right to reject inconsistent snapshots.
    pub fn from_document(doc: &GameDocument, rules: Ruleset) -> Result<Self> {
        let mut grid = TileGrid::new();
        for &(index, tile) in &doc.tiles {
            grid.set(index, tile.decode());
        }

        let mut materials = doc.materials.clone();
        materials.resize(doc.players.len(), MaterialStore::default());

        Ok(Self {
            width: doc.width,
            height: doc.height,
            players: doc.players.clone(),
            rules,
            swamps: doc.swamps.iter().copied().collect(),
            deposits: doc.deposits.iter().copied().collect(),
            outposts: doc.outposts.iter().copied().collect(),
            surrendered: doc.surrendered.iter().copied().collect(),
            grid,
            queues: vec![VecDeque::new(); doc.players.len()],
            materials,
            turn: doc.turn,
            ended_forced: doc.ended,
        })
    }
}
