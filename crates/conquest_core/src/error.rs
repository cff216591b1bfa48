//! Error types for the game engine.
//!
//! No condition inside the engine is fatal: every public operation reports
//! success or failure, and a failure is always a silent no-op on state.
//! The typed variants exist so collaborators (and tests) can distinguish
//! *why* an operation was rejected.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The acting player does not own the source tile.
    #[error("player {player} does not own tile {tile}")]
    RejectedOwnership {
        /// Acting player index.
        player: u8,
        /// Tile the player tried to act from or on.
        tile: u32,
    },

    /// The target tile is impassable or out of grid bounds.
    #[error("tile {tile} is impassable or out of bounds")]
    RejectedTerrain {
        /// Offending tile index.
        tile: u32,
    },

    /// A construction cost exceeds the player's material balance.
    #[error("insufficient materials: need {required_iron} iron and {required_gold} gold")]
    RejectedInsufficientResources {
        /// Iron units required.
        required_iron: i32,
        /// Gold units required.
        required_gold: i32,
    },

    /// The tile already holds a building.
    #[error("tile {tile} is already built on")]
    RejectedOccupiedBuilding {
        /// Occupied tile index.
        tile: u32,
    },

    /// The acting player has already surrendered.
    #[error("player {player} has surrendered")]
    RejectedSurrendered {
        /// Acting player index.
        player: u8,
    },

    /// An external map document is missing a required field.
    ///
    /// Non-fatal: callers fall back to procedural generation.
    #[error("malformed map document: missing field '{field}'")]
    MalformedMap {
        /// Name of the absent field.
        field: &'static str,
    },

    /// A snapshot or replay failed to encode or decode.
    #[error("codec failure: {0}")]
    Codec(String),
}
