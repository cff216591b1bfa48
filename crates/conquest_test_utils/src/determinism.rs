//! Determinism testing utilities.
//!
//! The engine must be 100% deterministic: an external scheduler may advance
//! many matches in lockstep, and replays are reconstructed by re-running
//! the same inputs. Sources of non-determinism the engine avoids:
//!
//! - **Hash-order iteration**: all grid and queue walks run in tile-index
//!   or player-index order (`BTreeMap`/`Vec`), never hash order.
//! - **System randomness**: layout generation flows through a seeded
//!   [`conquest_core::layout::LayoutRng`], nothing else is random at all.
//! - **Ambient time**: the engine holds no clock; ticks arrive externally.
//!
//! This harness re-runs a scripted match several times and compares the
//! final state hashes.

use conquest_core::game::Game;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Final state hash from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated per run.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Assert that the runs matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "match diverged across runs!\nruns: {}\nticks: {}\nhashes: {:?}",
            self.hashes.len(),
            self.ticks,
            self.hashes
        );
    }
}

/// Run a scripted match several times and verify determinism.
///
/// `setup` builds the initial match, `script` enqueues whatever inputs the
/// tick should process. Both must be pure functions of their inputs.
pub fn verify_determinism<Setup, Script>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    script: Script,
) -> DeterminismResult
where
    Setup: Fn() -> Game,
    Script: Fn(&mut Game, u64),
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut game = setup();
        for tick in 0..ticks {
            script(&mut game, tick);
            game.tick();
        }
        hashes.push(game.state_hash());
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}
