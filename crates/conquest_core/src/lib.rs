//! # Conquest Core
//!
//! Deterministic game engine for a turn-based grid-territory conquest game.
//!
//! This crate contains **only** deterministic logic:
//! - No transport or rendering
//! - No IO (except explicit document encode/decode helpers)
//! - No system randomness
//! - No internal clock
//!
//! The engine exposes pure state-transition operations (`queue_move`,
//! `build`, `surrender`, `tick`) and is driven by an external scheduler.
//! This separation enables:
//! - Lockstep advancement of many independent matches
//! - Replay recording from read-only state access
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`tile`] - Tile, owner, and building types
//! - [`grid`] - Sparse tile grid with an implicit default
//! - [`layout`] - Procedural map generation and external map documents
//! - [`ruleset`] - Cadences, thresholds, and enabled subsystems per match
//! - [`game`] - The per-match state machine
//! - [`turn`] - Per-tick effect resolution and move draining
//! - [`conquest`] - Move application and cascade capture
//! - [`construction`] - Building placement and demolition rules
//! - [`materials`] - Per-player material balances
//! - [`document`] - Typed snapshot and map document serializers
//! - [`replay`] - Tile-diff replay recorder

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod conquest;
pub mod construction;
pub mod document;
pub mod error;
pub mod game;
pub mod grid;
pub mod layout;
pub mod materials;
pub mod replay;
pub mod ruleset;
pub mod tile;
pub mod turn;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::document::{GameDocument, MapDocument, TileDoc};
    pub use crate::error::{GameError, Result};
    pub use crate::game::Game;
    pub use crate::grid::TileGrid;
    pub use crate::layout::{GenStrategy, Layout, LayoutConfig, LayoutRng};
    pub use crate::materials::{Material, MaterialCost, MaterialStore};
    pub use crate::replay::{Replay, ReplayRecorder, ReplayUpdate};
    pub use crate::ruleset::Ruleset;
    pub use crate::tile::{Building, Owner, Tile};
}
