//! Iterative truss relaxation
//!
//! Position-based constraint solving rather than force-based springs:
//! each sub-iteration applies gravity to velocities, nudges every beam's
//! endpoints toward its rest length, then damps and integrates. Stable at
//! low iteration counts where stiff spring forces would demand tiny steps
//! or an implicit solver.

use super::state::{Beam, Node};
use crate::tuning::Tuning;

/// Below this length a beam is degenerate and skips its pass entirely -
/// no stress update, no correction, no division by zero.
pub const MIN_BEAM_LENGTH: f32 = 1e-6;

/// Run one tick of relaxation over the arenas.
///
/// Beams are visited in creation order every sub-iteration; the order
/// shapes the convergence trajectory, so it must never vary between runs.
/// Fixed nodes are never written.
pub fn relax(nodes: &mut [Node], beams: &mut [Beam], tuning: &Tuning) {
    let subs = tuning.effective_sub_iterations();
    let scale = 1.0 / subs as f32;

    for _ in 0..subs {
        for node in nodes.iter_mut() {
            if !node.fixed {
                node.vel.y += tuning.gravity * scale;
            }
        }

        for beam in beams.iter_mut() {
            let delta = nodes[beam.b].pos - nodes[beam.a].pos;
            let dist = delta.length();
            if dist < MIN_BEAM_LENGTH {
                continue;
            }
            let error = (dist - beam.rest_length) / dist;
            beam.stress = error.abs() * tuning.stress_scale;

            // Each movable endpoint takes half the correction; a pinned
            // partner simply leaves the other half unclaimed.
            let correction = delta * (0.5 * error * scale);
            if !nodes[beam.a].fixed {
                nodes[beam.a].pos += correction;
            }
            if !nodes[beam.b].fixed {
                nodes[beam.b].pos -= correction;
            }
        }

        for node in nodes.iter_mut() {
            if !node.fixed {
                node.vel *= tuning.damping;
                node.pos += node.vel * scale;
            }
        }
    }
}
