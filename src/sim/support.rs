//! Deck-surface query for the rolling load
//!
//! Reconciles beam geometry with the vehicle's support needs: of all the
//! beams whose endpoints behave like roadway (not elevated bracing), find
//! one spanning the vehicle's x and read the surface height off it. A
//! plain linear scan in creation order - deterministic, and O(beams) is
//! plenty at this scale.

use super::state::{Beam, Node};

/// Minimum horizontal extent for a beam to carry the vehicle; anything
/// narrower is effectively a post and has no surface to interpolate.
pub const MIN_DECK_WIDTH: f32 = 1e-3;

/// Surface height of the first deck beam under `x`, if any.
///
/// A beam qualifies as deck when both endpoints sit at or below
/// `deck_ceiling` (nodes higher up are bracing) and its horizontal extent
/// contains `x`. The height is linearly interpolated between the
/// endpoints, so a sagging deck carries the vehicle down with it.
pub fn deck_surface_at(nodes: &[Node], beams: &[Beam], x: f32, deck_ceiling: f32) -> Option<f32> {
    for beam in beams {
        let a = &nodes[beam.a];
        let b = &nodes[beam.b];
        if a.pos.y < deck_ceiling || b.pos.y < deck_ceiling {
            continue;
        }
        let (lo, hi) = if a.pos.x <= b.pos.x {
            (a.pos.x, b.pos.x)
        } else {
            (b.pos.x, a.pos.x)
        };
        if x < lo || x > hi || hi - lo < MIN_DECK_WIDTH {
            continue;
        }
        let t = (x - a.pos.x) / (b.pos.x - a.pos.x);
        return Some(a.pos.y + (b.pos.y - a.pos.y) * t);
    }
    None
}
