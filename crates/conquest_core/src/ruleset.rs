//! Ruleset configuration.
//!
//! The game's rules changed across its lifetime: decay ran on different
//! cadences with different thresholds, the material economy and cascade
//! capture were added later, and the early variant used neutral outposts
//! instead of deposits. All of those knobs live here as one configuration
//! struct selected at game creation, so a match follows exactly one rule
//! variant with no divergent code paths.

use serde::{Deserialize, Serialize};

/// Cadences, thresholds, and enabled subsystems for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Production runs when `turn % production_interval == 0`.
    pub production_interval: u64,
    /// Hazard decay runs when `turn % decay_interval == 0`.
    pub decay_interval: u64,
    /// A hazard tile drains only while its army exceeds this threshold.
    ///
    /// 0 drains tiles all the way to reclamation; 1 is the legacy variant
    /// that leaves a single unit stranded.
    pub decay_threshold: i32,
    /// Whether capitals, camps, and mines produce (the material economy).
    pub economy: bool,
    /// Whether capturing a capital converts the defender's territory.
    pub cascade: bool,
    /// Whether unclaimed outpost tiles charge downward each decay tick.
    pub neutral_outposts: bool,
    /// Half-width of the cascade window (3 gives the 7x7 window).
    pub cascade_radius: i32,
    /// Army fixed on a tile converted to a wall.
    pub wall_army: i32,
    /// Default charge bound for generated outposts (`army >= -charge`).
    pub outpost_max_charge: i32,
}

impl Ruleset {
    /// The canonical ruleset: full material economy with cascade capture.
    #[must_use]
    pub const fn resource_economy() -> Self {
        Self {
            production_interval: 4,
            decay_interval: 4,
            decay_threshold: 0,
            economy: true,
            cascade: true,
            neutral_outposts: false,
            cascade_radius: 3,
            wall_army: 250,
            outpost_max_charge: 30,
        }
    }

    /// The early rule variant: no economy, no cascade, neutral outposts.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            production_interval: 4,
            decay_interval: 4,
            decay_threshold: 0,
            economy: false,
            cascade: false,
            neutral_outposts: true,
            cascade_radius: 3,
            wall_army: 250,
            outpost_max_charge: 30,
        }
    }

    /// Set the decay cadence.
    #[must_use]
    pub const fn with_decay(mut self, interval: u64, threshold: i32) -> Self {
        self.decay_interval = interval;
        self.decay_threshold = threshold;
        self
    }

    /// Set the production cadence.
    #[must_use]
    pub const fn with_production_interval(mut self, interval: u64) -> Self {
        self.production_interval = interval;
        self
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::resource_economy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ruleset_enables_economy_and_cascade() {
        let rules = Ruleset::default();
        assert!(rules.economy);
        assert!(rules.cascade);
        assert!(!rules.neutral_outposts);
        assert_eq!(rules.production_interval, 4);
        assert_eq!(rules.decay_interval, 4);
    }

    #[test]
    fn classic_ruleset_keeps_outposts() {
        let rules = Ruleset::classic();
        assert!(!rules.economy);
        assert!(!rules.cascade);
        assert!(rules.neutral_outposts);
    }

    #[test]
    fn decay_cadence_is_configurable() {
        let rules = Ruleset::classic().with_decay(2, 1);
        assert_eq!(rules.decay_interval, 2);
        assert_eq!(rules.decay_threshold, 1);
    }
}
