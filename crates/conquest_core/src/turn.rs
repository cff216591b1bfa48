//! Per-tick effect resolution and move draining.
//!
//! One tick, driven externally, runs three phases in a fixed order:
//! scheduled production (capitals, camps, mines), scheduled hazard decay,
//! then move-queue draining through the conquest resolver. Every pass walks
//! the grid in tile-index order, so a tick is fully deterministic.

use crate::game::Game;
use crate::tile::{Building, Owner};

impl Game {
    /// Advances the match by one turn.
    ///
    /// The engine holds no clock; the external scheduler decides when this
    /// is called. Production and decay run on their ruleset cadences, then
    /// each player's queue drains until its first accepted move.
    pub fn tick(&mut self) {
        self.turn += 1;

        if self.rules.economy && self.turn % self.rules.production_interval == 0 {
            self.production_phase();
        }
        if self.turn % self.rules.decay_interval == 0 {
            self.decay_phase();
        }
        self.drain_moves();

        #[cfg(debug_assertions)]
        {
            tracing::debug!(turn = self.turn, state_hash = self.state_hash(), "turn complete");
        }
    }

    /// Capitals raise army, camps convert one material into one army, and
    /// mines credit their deposit's material, all in one index-ordered pass.
    fn production_phase(&mut self) {
        for index in self.grid.indices() {
            let mut tile = self.grid.get(index);
            let Some(player) = tile.owner.player() else {
                continue;
            };
            match tile.building {
                Building::Capital => {
                    tile.army += 1;
                    self.grid.set(index, tile);
                }
                Building::Camp => {
                    // Iron burns before gold; a camp with nothing to burn
                    // simply idles this cycle.
                    if self.materials[usize::from(player)].consume_any().is_some() {
                        tile.army += 1;
                        self.grid.set(index, tile);
                    }
                }
                Building::Mine => {
                    if let Some(&kind) = self.deposits.get(&index) {
                        self.materials[usize::from(player)].credit(kind);
                    }
                }
                Building::None | Building::Wall => {}
            }
        }
    }

    /// Hazard tiles drain one army and revert to unclaimed when exhausted;
    /// outpost tiles (classic ruleset) charge downward toward their bound.
    fn decay_phase(&mut self) {
        for &index in &self.swamps {
            let mut tile = self.grid.get(index);
            if tile.owner == Owner::Obstacle {
                continue;
            }
            if tile.army > self.rules.decay_threshold {
                tile.army -= 1;
                if tile.army <= 0 {
                    self.grid.clear(index);
                } else {
                    self.grid.set(index, tile);
                }
            } else if tile.owner.player().is_some() && tile.army <= 0 {
                // An exhausted owned tile reverts to unclaimed ground.
                self.grid.clear(index);
            }
        }

        if self.rules.neutral_outposts {
            for (&index, &charge) in &self.outposts {
                let mut tile = self.grid.get(index);
                if tile.owner == Owner::Neutral
                    && tile.building == Building::None
                    && -tile.army < charge
                {
                    tile.army -= 1;
                    self.grid.set(index, tile);
                }
            }
        }
    }

    /// Pops each player's queue until the first accepted move or the queue
    /// empties. Rejected moves are discarded, never requeued; one accepted
    /// move per player per tick is the backpressure against move spam.
    fn drain_moves(&mut self) {
        for player in 0..self.queues.len() {
            // Queue length is bounded by the u8 player index space.
            #[allow(clippy::cast_possible_truncation)]
            let player_index = player as u8;
            if self.surrendered.contains(&player_index) {
                continue;
            }
            while let Some((from, to)) = self.queues[player].pop_front() {
                if self.apply_move(player_index, from, to) {
                    break;
                }
            }
        }
    }
}
