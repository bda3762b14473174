//! Authoring controller
//!
//! Turns already-decoded pointer positions into node selections and beam
//! create/remove transactions under the budget. Everything here is a
//! silent no-op outside the `Building` phase or on an invalid click;
//! player exploration is never an error.

use glam::Vec2;

use super::state::{Phase, Simulation};
use crate::consts::NODE_HIT_RADIUS;

impl Simulation {
    /// The nearest node within the hit radius of a domain-space position.
    pub fn hit_test(&self, pos: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for node in &self.nodes {
            let dist_sq = node.pos.distance_squared(pos);
            if dist_sq <= NODE_HIT_RADIUS * NODE_HIT_RADIUS
                && best.is_none_or(|(_, b)| dist_sq < b)
            {
                best = Some((node.id, dist_sq));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Handle a pointer-down at a domain-space position. Clicks that miss
    /// every node leave the pending selection untouched.
    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.phase != Phase::Building {
            return;
        }
        if let Some(id) = self.hit_test(pos) {
            self.select_or_connect(id);
        }
    }

    /// Select a node, or connect it to the previously selected one.
    ///
    /// First call arms a pending selection. A second call on the same node
    /// cancels it with no side effects. A second call on a different node
    /// toggles the beam between the pair - created (cost deducted) if
    /// absent and affordable, removed (cost refunded) if present - and
    /// clears the pending selection either way.
    pub fn select_or_connect(&mut self, node: usize) {
        if self.phase != Phase::Building || node >= self.nodes.len() {
            return;
        }
        match self.pending {
            None => self.pending = Some(node),
            Some(pending) if pending == node => self.pending = None,
            Some(pending) => {
                if let Some(id) = self.beam_between(pending, node) {
                    self.remove_beam(id);
                } else {
                    // May be a no-op if the budget cannot cover it.
                    self.create_beam(pending, node);
                }
                self.pending = None;
            }
        }
    }
}
