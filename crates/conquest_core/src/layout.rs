//! Procedural map generation and external map loading.
//!
//! A [`Layout`] is the immutable initial description of a map: hazard
//! tiles, material deposits, obstacles, spawn points, and (in the classic
//! ruleset) neutral outposts. It is created once at game start, either
//! generated from a seeded configuration or parsed from an external map
//! document, and never mutated afterward.
//!
//! Generation is fully deterministic: all randomness flows through a
//! [`LayoutRng`] seeded from the configuration, so identical seeds produce
//! identical maps on every platform.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::document::MapDocument;
use crate::error::{GameError, Result};
use crate::materials::Material;

/// Map generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GenStrategy {
    /// Scatter hazards, deposits, spawns, and obstacles uniformly over the
    /// index space, drawn without replacement.
    #[default]
    Density,
    /// Start fully hazardous and carve player home islands plus smaller
    /// neutral islands, then scatter deposits and obstacles over the
    /// carved land.
    Island,
}

/// Configuration for procedural layout generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Generation strategy.
    pub strategy: GenStrategy,
    /// Fraction of the map covered by hazard tiles (density strategy).
    pub hazard_fraction: f32,
    /// Fraction of the map covered by obstacles (density strategy).
    pub obstacle_fraction: f32,
    /// Number of material deposits (density strategy).
    pub deposit_count: u32,
    /// Number of neutral outposts (density strategy, classic ruleset).
    pub outpost_count: u32,
    /// Charge bound for generated outposts.
    pub outpost_charge: i32,
    /// Number of neutral islands to carve (island strategy).
    pub neutral_islands: u32,
    /// Half-width of each player's home island (island strategy).
    pub home_island_radius: i32,
    /// Half-width of each neutral island (island strategy).
    pub neutral_island_radius: i32,
    /// Per-tile probability of an iron deposit on carved land.
    pub iron_probability: f32,
    /// Per-tile probability of a gold deposit on carved land.
    pub gold_probability: f32,
    /// Per-tile probability of an obstacle on carved land.
    pub island_obstacle_density: f32,
    /// Random seed for deterministic generation.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            strategy: GenStrategy::Density,
            hazard_fraction: 0.10,
            obstacle_fraction: 0.25,
            deposit_count: 3,
            outpost_count: 0,
            outpost_charge: 30,
            neutral_islands: 8,
            home_island_radius: 2,
            neutral_island_radius: 1,
            iron_probability: 0.06,
            gold_probability: 0.06,
            island_obstacle_density: 0.10,
            seed: 12345,
        }
    }
}

impl LayoutConfig {
    /// The classic density map: neutral outposts instead of deposits.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            deposit_count: 0,
            outpost_count: 3,
            ..Default::default()
        }
    }

    /// An island map (the resource-economy variant's signature layout).
    #[must_use]
    pub fn island() -> Self {
        Self {
            width: 24,
            height: 24,
            strategy: GenStrategy::Island,
            ..Default::default()
        }
    }

    /// A larger island map.
    #[must_use]
    pub fn island_large() -> Self {
        Self {
            width: 40,
            height: 40,
            neutral_islands: 20,
            ..Self::island()
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set obstacle density, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_obstacle_fraction(mut self, fraction: f32) -> Self {
        self.obstacle_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Set hazard density, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_hazard_fraction(mut self, fraction: f32) -> Self {
        self.hazard_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Total tile count.
    #[must_use]
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }
}

/// Small deterministic generator for layout generation.
///
/// Injectable so tests can drive generation with a known sequence; never
/// backed by system randomness.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    state: u64,
}

impl LayoutRng {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5DEE_CE66D).wrapping_add(11);
        self.state
    }

    /// Next value in `[0, 1)` with four decimal digits of resolution.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() % 10_000) as f32 / 10_000.0
    }

    /// Next value in `[0, bound)`; returns 0 for an empty bound.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_usize(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }

    /// Next value in `[min, max)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn next_range(&mut self, min: i32, max: i32) -> i32 {
        let range = max.saturating_sub(min);
        if range <= 0 {
            return min;
        }
        min + (self.next_u64() % range as u64) as i32
    }
}

/// Immutable initial map description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    /// Hazard tile indices (army drains on the decay cadence).
    pub swamps: BTreeSet<u32>,
    /// Deposit tile index to material kind.
    pub deposits: BTreeMap<u32, Material>,
    /// Impassable tile indices.
    pub obstacles: BTreeSet<u32>,
    /// Spawn tile index to reserved label.
    pub spawns: BTreeMap<u32, String>,
    /// Neutral outpost tile index to maximum charge (classic ruleset).
    pub outposts: BTreeMap<u32, i32>,
}

impl Layout {
    /// Generates a layout from a seeded configuration.
    #[must_use]
    pub fn generate(player_count: u8, config: &LayoutConfig) -> Layout {
        let mut rng = LayoutRng::new(config.seed);
        Self::generate_with(player_count, config, &mut rng)
    }

    /// Generates a layout with an injected random source.
    #[must_use]
    pub fn generate_with(player_count: u8, config: &LayoutConfig, rng: &mut LayoutRng) -> Layout {
        match config.strategy {
            GenStrategy::Density => density_layout(player_count, config, rng),
            GenStrategy::Island => island_layout(player_count, config, rng),
        }
    }

    /// Parses an externally supplied map document.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MalformedMap`] when a required field is absent,
    /// in which case the caller falls back to generation.
    pub fn from_document(doc: &MapDocument) -> Result<Layout> {
        let width = doc.width.ok_or(GameError::MalformedMap { field: "width" })?;
        let height = doc
            .height
            .ok_or(GameError::MalformedMap { field: "height" })?;
        let swamps = doc
            .swamps
            .as_ref()
            .ok_or(GameError::MalformedMap { field: "swamps" })?;
        let spawns = doc
            .spawns
            .as_ref()
            .ok_or(GameError::MalformedMap { field: "spawns" })?;
        let deposits = doc
            .deposits
            .as_ref()
            .ok_or(GameError::MalformedMap { field: "deposits" })?;

        Ok(Layout {
            width,
            height,
            swamps: swamps.iter().copied().collect(),
            deposits: deposits.iter().copied().collect(),
            obstacles: doc.mountains.iter().copied().collect(),
            spawns: spawns.iter().cloned().collect(),
            outposts: doc.outposts.iter().copied().collect(),
        })
    }

    /// Number of spawn points.
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.spawns.len()
    }
}

/// Uniform scatter, drawn without replacement from the index pool.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn density_layout(player_count: u8, config: &LayoutConfig, rng: &mut LayoutRng) -> Layout {
    let area = config.area();
    let mut pool: Vec<u32> = (0..area).collect();
    let draw = |pool: &mut Vec<u32>, rng: &mut LayoutRng| -> Option<u32> {
        if pool.is_empty() {
            None
        } else {
            let at = rng.next_usize(pool.len());
            Some(pool.swap_remove(at))
        }
    };

    let mut swamps = BTreeSet::new();
    let swamp_target = (f64::from(area) * f64::from(config.hazard_fraction)) as u32;
    for _ in 0..swamp_target {
        let Some(index) = draw(&mut pool, rng) else {
            break;
        };
        swamps.insert(index);
    }

    let mut deposits = BTreeMap::new();
    for slot in 0..config.deposit_count {
        let Some(index) = draw(&mut pool, rng) else {
            break;
        };
        let kind = if slot % 2 == 0 {
            Material::Iron
        } else {
            Material::Gold
        };
        deposits.insert(index, kind);
    }

    let mut outposts = BTreeMap::new();
    for _ in 0..config.outpost_count {
        let Some(index) = draw(&mut pool, rng) else {
            break;
        };
        outposts.insert(index, config.outpost_charge);
    }

    let mut spawns = BTreeMap::new();
    while spawns.len() < usize::from(player_count) {
        let Some(index) = draw(&mut pool, rng) else {
            break;
        };
        spawns.insert(index, String::new());
    }

    let mut obstacles = BTreeSet::new();
    let obstacle_target = (f64::from(area) * f64::from(config.obstacle_fraction)) as u32;
    for _ in 0..obstacle_target {
        let Some(index) = draw(&mut pool, rng) else {
            break;
        };
        obstacles.insert(index);
    }

    Layout {
        width: config.width,
        height: config.height,
        swamps,
        deposits,
        obstacles,
        spawns,
        outposts,
    }
}

/// Everything starts hazardous; islands are carved out of the swamp.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn island_layout(player_count: u8, config: &LayoutConfig, rng: &mut LayoutRng) -> Layout {
    let width = config.width as i32;
    let height = config.height as i32;

    let mut swamps: BTreeSet<u32> = (0..config.area()).collect();
    let mut spawns = BTreeMap::new();

    let carve = |swamps: &mut BTreeSet<u32>, cx: i32, cy: i32, radius: i32| {
        for y in (cy - radius).max(0)..=(cy + radius).min(height - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(width - 1) {
                swamps.remove(&((y * width + x) as u32));
            }
        }
    };

    // Home islands, one spawn at each center. Bounded redraw keeps spawn
    // centers distinct.
    let margin = config.home_island_radius + 1;
    for _ in 0..player_count {
        for _attempt in 0..32 {
            let cx = rng.next_range(margin, width - margin);
            let cy = rng.next_range(margin, height - margin);
            let center = (cy * width + cx) as u32;
            if spawns.contains_key(&center) {
                continue;
            }
            carve(&mut swamps, cx, cy, config.home_island_radius);
            spawns.insert(center, String::new());
            break;
        }
    }

    for _ in 0..config.neutral_islands {
        let cx = rng.next_range(1, width - 1);
        let cy = rng.next_range(1, height - 1);
        carve(&mut swamps, cx, cy, config.neutral_island_radius);
    }

    // Deposits scatter over carved land by independent probability per kind.
    let mut deposits = BTreeMap::new();
    for index in 0..config.area() {
        if swamps.contains(&index) || spawns.contains_key(&index) {
            continue;
        }
        if rng.next_f32() < config.iron_probability {
            deposits.insert(index, Material::Iron);
        } else if rng.next_f32() < config.gold_probability {
            deposits.insert(index, Material::Gold);
        }
    }

    // Obstacles over the remaining carved land, skipping deposits.
    let mut obstacles = BTreeSet::new();
    for index in 0..config.area() {
        if swamps.contains(&index)
            || spawns.contains_key(&index)
            || deposits.contains_key(&index)
        {
            continue;
        }
        if rng.next_f32() < config.island_obstacle_density {
            obstacles.insert(index);
        }
    }

    Layout {
        width: config.width,
        height: config.height,
        swamps,
        deposits,
        obstacles,
        spawns,
        outposts: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_generation_is_deterministic() {
        let config = LayoutConfig::default().with_seed(42);
        let first = Layout::generate(2, &config);
        let second = Layout::generate(2, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_differ() {
        let first = Layout::generate(2, &LayoutConfig::default().with_seed(1));
        let second = Layout::generate(2, &LayoutConfig::default().with_seed(2));
        assert_ne!(first, second);
    }

    #[test]
    fn density_counts_match_config() {
        let config = LayoutConfig::default().with_seed(7);
        let layout = Layout::generate(3, &config);

        let area = config.area();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let swamp_target = (f64::from(area) * f64::from(config.hazard_fraction)) as usize;
        assert_eq!(layout.swamps.len(), swamp_target);
        assert_eq!(layout.deposits.len(), config.deposit_count as usize);
        assert_eq!(layout.spawn_count(), 3);
        assert!(layout.outposts.is_empty());
    }

    #[test]
    fn density_draws_without_replacement() {
        let layout = Layout::generate(4, &LayoutConfig::default().with_seed(99));
        for spawn in layout.spawns.keys() {
            assert!(!layout.swamps.contains(spawn));
            assert!(!layout.obstacles.contains(spawn));
            assert!(!layout.deposits.contains_key(spawn));
        }
        for obstacle in &layout.obstacles {
            assert!(!layout.swamps.contains(obstacle));
            assert!(!layout.deposits.contains_key(obstacle));
        }
    }

    #[test]
    fn classic_config_generates_outposts() {
        let layout = Layout::generate(2, &LayoutConfig::classic().with_seed(5));
        assert_eq!(layout.outposts.len(), 3);
        assert!(layout.deposits.is_empty());
        assert!(layout.outposts.values().all(|&charge| charge == 30));
    }

    #[test]
    fn island_generation_carves_home_islands() {
        let config = LayoutConfig::island().with_seed(11);
        let layout = Layout::generate(2, &config);

        assert_eq!(layout.spawn_count(), 2);
        // Spawn centers and their surroundings are carved out of the swamp.
        for &spawn in layout.spawns.keys() {
            assert!(!layout.swamps.contains(&spawn));
        }
        // The map is mostly swamp with land carved out.
        assert!(layout.swamps.len() < config.area() as usize);
        assert!(!layout.swamps.is_empty());
    }

    #[test]
    fn island_obstacles_and_deposits_stay_on_land() {
        let layout = Layout::generate(2, &LayoutConfig::island().with_seed(3));
        for index in layout.deposits.keys() {
            assert!(!layout.swamps.contains(index));
        }
        for index in &layout.obstacles {
            assert!(!layout.swamps.contains(index));
            assert!(!layout.deposits.contains_key(index));
        }
    }

    #[test]
    fn injected_rng_controls_generation() {
        let config = LayoutConfig::default().with_seed(0);
        let mut rng_a = LayoutRng::new(77);
        let mut rng_b = LayoutRng::new(77);
        let first = Layout::generate_with(2, &config, &mut rng_a);
        let second = Layout::generate_with(2, &config, &mut rng_b);
        assert_eq!(first, second);
    }
}
