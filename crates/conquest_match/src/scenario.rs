//! Scenario loading and configuration.
//!
//! Scenarios define how a demo or test match is set up - player roster,
//! layout settings, and the ruleset - as a RON document, so batch runs can
//! be pinned to a file instead of command-line flags.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use conquest_core::game::Game;
use conquest_core::layout::{Layout, LayoutConfig};
use conquest_core::ruleset::Ruleset;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Player roster in index order.
    pub players: Vec<String>,
    /// Layout generation settings.
    pub layout: LayoutConfig,
    /// Ruleset for the match.
    pub ruleset: Ruleset,
}

impl Default for MatchScenario {
    fn default() -> Self {
        Self {
            name: "Default Skirmish".to_string(),
            description: "A basic 1v1 density-map skirmish".to_string(),
            players: vec!["alpha".to_string(), "beta".to_string()],
            layout: LayoutConfig::default(),
            ruleset: Ruleset::resource_economy(),
        }
    }
}

impl MatchScenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] when the file is absent, unreadable, or
    /// not valid RON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: MatchScenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns a [`ScenarioError`] for invalid RON.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: MatchScenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// An island-map free-for-all for four scripted players.
    #[must_use]
    pub fn island_ffa() -> Self {
        Self {
            name: "Island FFA".to_string(),
            description: "Four players on a carved island map".to_string(),
            players: (0..4).map(|i| format!("bot{i}")).collect(),
            layout: LayoutConfig::island(),
            ruleset: Ruleset::resource_economy(),
        }
    }

    /// Builds the match this scenario describes.
    #[must_use]
    pub fn into_game(self) -> Game {
        // Player count is bounded by the u8 index space.
        #[allow(clippy::cast_possible_truncation)]
        let count = self.players.len().min(usize::from(u8::MAX)) as u8;
        let layout = Layout::generate(count, &self.layout);
        Game::new(self.players, &layout, self.ruleset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_builds_a_two_player_match() {
        let game = MatchScenario::default().into_game();
        assert_eq!(game.players().len(), 2);
        assert!(!game.ended());
    }

    #[test]
    fn scenario_roundtrips_through_ron() {
        let scenario = MatchScenario::island_ffa();
        let text = ron::to_string(&scenario).unwrap();
        let parsed = MatchScenario::from_ron_str(&text).unwrap();
        assert_eq!(parsed.players, scenario.players);
        assert_eq!(parsed.ruleset, scenario.ruleset);
    }

    #[test]
    fn malformed_ron_is_reported() {
        assert!(matches!(
            MatchScenario::from_ron_str("(name: oops"),
            Err(ScenarioError::ParseError(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            MatchScenario::load("/definitely/not/here.ron"),
            Err(ScenarioError::FileNotFound(_))
        ));
    }
}
