//! Typed snapshot and map document serializers.
//!
//! Collaborators (transport, persistence, replay) consume game state as
//! explicit documents rather than walking engine internals. Associative
//! structures encode as ordered key/value lists and sets as ordered index
//! lists, so a document's byte form is deterministic for a given state.
//!
//! Pending move queues are transport state and deliberately absent from
//! snapshots.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::materials::{Material, MaterialStore};
use crate::tile::{Building, Owner, Tile};

/// One tile in document form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDoc {
    /// Owner code: -2 obstacle, -1 unclaimed, 0..N-1 player index.
    pub terrain: i32,
    /// Army strength.
    pub army: i32,
    /// Building code.
    pub building: u8,
}

impl TileDoc {
    /// Encodes a tile.
    #[must_use]
    pub const fn encode(tile: Tile) -> Self {
        Self {
            terrain: tile.owner.code(),
            army: tile.army,
            building: tile.building.code(),
        }
    }

    /// Decodes a tile; unknown codes fall back to the grid default.
    #[must_use]
    pub fn decode(self) -> Tile {
        Tile {
            owner: Owner::from_code(self.terrain).unwrap_or_default(),
            army: self.army,
            building: Building::from_code(self.building).unwrap_or_default(),
        }
    }
}

/// Snapshot of one match, sufficient to reconstruct an equivalent game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDocument {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Player identifiers in index order.
    pub players: Vec<String>,
    /// Hazard tile indices, ordered.
    pub swamps: Vec<u32>,
    /// Deposit entries `(tile, material)`, ordered by tile.
    pub deposits: Vec<(u32, Material)>,
    /// Outpost entries `(tile, max charge)`, ordered by tile.
    pub outposts: Vec<(u32, i32)>,
    /// Indices of surrendered players, ordered.
    pub surrendered: Vec<u8>,
    /// Explicit tile entries `(index, tile)`, ordered by index.
    pub tiles: Vec<(u32, TileDoc)>,
    /// Per-player material balances, in player index order.
    pub materials: Vec<MaterialStore>,
    /// Turn counter.
    pub turn: u64,
    /// Whether the match has ended.
    pub ended: bool,
}

impl GameDocument {
    /// Encodes the document as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Decodes a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if the input is not a valid document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Encodes the document as compact bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Decodes a document from compact bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if the input is not a valid document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| GameError::Codec(e.to_string()))
    }
}

/// Externally supplied map description.
///
/// All layout-bearing fields are optional at the parse layer;
/// [`crate::layout::Layout::from_document`] decides which are required and
/// reports the first missing one as [`GameError::MalformedMap`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    /// Map width in tiles.
    pub width: Option<u32>,
    /// Map height in tiles.
    pub height: Option<u32>,
    /// Hazard tile indices.
    pub swamps: Option<Vec<u32>>,
    /// Spawn entries `(tile, label)`.
    pub spawns: Option<Vec<(u32, String)>>,
    /// Deposit entries `(tile, material)`.
    pub deposits: Option<Vec<(u32, Material)>>,
    /// Impassable tile indices. Optional; defaults to none.
    #[serde(default)]
    pub mountains: Vec<u32>,
    /// Outpost entries `(tile, max charge)`. Optional; defaults to none.
    #[serde(default)]
    pub outposts: Vec<(u32, i32)>,
}

impl MapDocument {
    /// Decodes a map document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if the input is not valid JSON for the
    /// document shape. Missing fields are reported later, when the document
    /// is turned into a layout.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::Codec(e.to_string()))
    }

    /// Encodes the map document as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Codec`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GameError::Codec(e.to_string()))
    }
}
