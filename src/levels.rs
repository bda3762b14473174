//! Static level templates
//!
//! A level is a gap to cross, a pair (or more) of immovable anchors, a set
//! of build sites the player may wire together, and a budget. Templates are
//! plain in-memory data; the simulation copies node positions out of them
//! on every (re)load, so a template is never mutated by play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One level's authoring template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Total budget for this attempt
    pub budget: u32,
    /// Near edge of the gap
    pub gap_start: f32,
    /// Far edge of the gap
    pub gap_end: f32,
    /// Immovable anchor positions, placed on the roadway line
    pub fixed_sites: Vec<Vec2>,
    /// Movable build-site positions
    pub build_sites: Vec<Vec2>,
}

impl Level {
    /// Width of the gap the vehicle has to cross.
    pub fn gap_span(&self) -> f32 {
        self.gap_end - self.gap_start
    }

    /// Whether an x coordinate lies strictly inside the gap.
    pub fn in_gap(&self, x: f32) -> bool {
        x > self.gap_start && x < self.gap_end
    }
}

/// The shipped level list, in play order.
pub fn builtin() -> Vec<Level> {
    vec![
        // A short span: a plain four-beam deck across the build sites
        // holds on its own. The elevated site invites (optional) bracing.
        Level {
            budget: 500,
            gap_start: 200.0,
            gap_end: 500.0,
            fixed_sites: vec![Vec2::new(200.0, 240.0), Vec2::new(500.0, 240.0)],
            build_sites: vec![
                Vec2::new(275.0, 240.0),
                Vec2::new(350.0, 240.0),
                Vec2::new(425.0, 240.0),
                Vec2::new(350.0, 170.0),
            ],
        },
        // Wider gap, two apex sites for a queen-post truss.
        Level {
            budget: 700,
            gap_start: 180.0,
            gap_end: 560.0,
            fixed_sites: vec![Vec2::new(180.0, 240.0), Vec2::new(560.0, 240.0)],
            build_sites: vec![
                Vec2::new(256.0, 240.0),
                Vec2::new(332.0, 240.0),
                Vec2::new(408.0, 240.0),
                Vec2::new(484.0, 240.0),
                Vec2::new(294.0, 172.0),
                Vec2::new(446.0, 172.0),
            ],
        },
        // Widest span, three apex sites.
        Level {
            budget: 900,
            gap_start: 160.0,
            gap_end: 580.0,
            fixed_sites: vec![Vec2::new(160.0, 240.0), Vec2::new(580.0, 240.0)],
            build_sites: vec![
                Vec2::new(230.0, 240.0),
                Vec2::new(300.0, 240.0),
                Vec2::new(370.0, 240.0),
                Vec2::new(440.0, 240.0),
                Vec2::new(510.0, 240.0),
                Vec2::new(265.0, 170.0),
                Vec2::new(370.0, 160.0),
                Vec2::new(475.0, 170.0),
            ],
        },
    ]
}
