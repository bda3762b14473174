//! Simulation state and core types
//!
//! All state that must be snapshotted for determinism lives here. Nodes and
//! beams are arena-stored: dense vectors whose handles stay valid for the
//! whole level and are invalidated only by a full level reload.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::levels::{self, Level};
use crate::tuning::Tuning;

/// Lifecycle of one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Authoring allowed, solver inactive, budget enforced
    Building,
    /// Authoring locked; solver and load model run every tick
    Testing,
    /// Terminal: the vehicle cleared the gap
    Won,
    /// Terminal: a beam snapped or the vehicle lost support
    Failed,
}

/// A point mass in the truss graph: an immovable anchor or a build site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    /// Arena index; stable for the level's lifetime
    pub id: usize,
    /// Live position, deformed by the solver while testing
    pub pos: Vec2,
    /// Authoring-time template position; never changes after level load
    pub rest_pos: Vec2,
    pub fixed: bool,
    pub vel: Vec2,
}

/// An axial distance constraint between two nodes.
///
/// `rest_length` is captured from the endpoints' template positions when
/// the beam is authored, not from their live (possibly deformed) positions,
/// so repeated test/reset cycles reproduce identical structures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub id: u32,
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
    /// Dimensionless overstretch reading, refreshed by every solver pass
    pub stress: f32,
}

impl Beam {
    /// Whether this beam connects the given unordered pair.
    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }

    pub fn touches(&self, node: usize) -> bool {
        self.a == node || self.b == node
    }
}

/// The rolling load crossing the gap, approximated as a box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vehicle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// True while a deck beam is carrying the vehicle
    pub on_span: bool,
    pub finished: bool,
}

impl Vehicle {
    /// Spawn on the roadway, a run-up distance before the gap's near edge.
    pub fn spawn(gap_start: f32) -> Self {
        let mut vehicle = Vehicle {
            pos: Vec2::new(gap_start - VEHICLE_RUN_UP, 0.0),
            width: VEHICLE_WIDTH,
            height: VEHICLE_HEIGHT,
            on_span: false,
            finished: false,
        };
        vehicle.settle_on(ROAD_Y);
        vehicle
    }

    /// Rest the box on a surface at the given height.
    pub fn settle_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.height / 2.0;
    }
}

/// Push payload for the session/UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub level: usize,
    pub budget: u32,
    pub spent: u32,
    pub phase: Phase,
}

/// Host notifications, pushed on every state-affecting mutation and
/// drained with [`Simulation::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    StatusChanged(Status),
    BeamSnapped { beam: u32 },
    VehicleUnsupported { x: f32 },
    GapCleared,
}

/// Complete game state (deterministic, serializable).
///
/// Owns the node/beam arenas, the vehicle, the budget ledger and the level
/// list; the host advances it with [`Simulation::tick`] once per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub levels: Vec<Level>,
    pub level_index: usize,
    pub phase: Phase,
    pub nodes: Vec<Node>,
    /// Beams in creation order; relaxation and support scans rely on it
    pub beams: Vec<Beam>,
    /// Present only from `test_bridge` until the next reload
    pub vehicle: Option<Vehicle>,
    pub total_budget: u32,
    pub spent: u32,
    pub time_ticks: u64,
    pub tuning: Tuning,
    /// Armed selection awaiting a second click
    pub(crate) pending: Option<usize>,
    next_beam_id: u32,
    /// Host notification queue (not gameplay state)
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl Simulation {
    /// Create a simulation over the given level list and load the first
    /// level. The list must be non-empty and well-formed; level data is a
    /// construction-time precondition, not a runtime error.
    pub fn with_levels(levels: Vec<Level>, tuning: Tuning) -> Self {
        debug_assert!(!levels.is_empty(), "at least one level template required");
        let mut sim = Simulation {
            levels,
            level_index: 0,
            phase: Phase::Building,
            nodes: Vec::new(),
            beams: Vec::new(),
            vehicle: None,
            total_budget: 0,
            spent: 0,
            time_ticks: 0,
            tuning,
            pending: None,
            next_beam_id: 1,
            events: Vec::new(),
        };
        sim.load_level(0);
        sim
    }

    /// The shipped campaign with default balance.
    pub fn new() -> Self {
        Self::with_levels(levels::builtin(), Tuning::default())
    }

    /// Rebuild all per-level state from the template at `index`.
    ///
    /// Cancels anything in flight: beams, budget, vehicle, pending
    /// selection and tick counter all start over.
    pub fn load_level(&mut self, index: usize) {
        let index = index % self.levels.len();
        let level = self.levels[index].clone();
        debug_assert!(level.gap_end > level.gap_start, "gap inverted");
        debug_assert!(level.fixed_sites.len() >= 2, "level needs two anchors");

        self.level_index = index;
        self.phase = Phase::Building;
        self.nodes.clear();
        self.beams.clear();
        self.vehicle = None;
        self.total_budget = level.budget;
        self.spent = 0;
        self.time_ticks = 0;
        self.pending = None;
        self.next_beam_id = 1;

        for site in &level.fixed_sites {
            self.create_node(*site, true);
        }
        for site in &level.build_sites {
            self.create_node(*site, false);
        }

        log::info!(
            "level {} loaded: budget {}, gap {:.0}..{:.0}, {} sites",
            index,
            level.budget,
            level.gap_start,
            level.gap_end,
            self.nodes.len()
        );
        self.push_status();
    }

    /// Retry the current level from its template.
    pub fn reset(&mut self) {
        self.load_level(self.level_index);
    }

    /// Advance to the next level (wrapping past the last) and load it.
    pub fn next_level(&mut self) {
        self.load_level(self.level_index + 1);
    }

    /// The level currently loaded.
    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    // --- node store / beam ledger ---

    pub fn create_node(&mut self, pos: Vec2, fixed: bool) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            pos,
            rest_pos: pos,
            fixed,
            vel: Vec2::ZERO,
        });
        id
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn beam(&self, id: u32) -> Option<&Beam> {
        self.beams.iter().find(|bm| bm.id == id)
    }

    /// The beam connecting the unordered pair, if any.
    pub fn beam_between(&self, a: usize, b: usize) -> Option<u32> {
        self.beams.iter().find(|bm| bm.joins(a, b)).map(|bm| bm.id)
    }

    /// All beams incident to a node, in creation order.
    pub fn beams_of(&self, node: usize) -> impl Iterator<Item = &Beam> + '_ {
        self.beams.iter().filter(move |bm| bm.touches(node))
    }

    /// Author a beam between two distinct nodes, deducting its cost.
    ///
    /// Returns `None` without side effects when the pair is degenerate, an
    /// equivalent beam already exists (remove it instead), either handle is
    /// stale, or the cost would exceed the budget. No partial spend.
    pub fn create_beam(&mut self, a: usize, b: usize) -> Option<u32> {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return None;
        }
        if self.beam_between(a, b).is_some() {
            return None;
        }
        let cost = self.tuning.beam_cost;
        if self.spent + cost > self.total_budget {
            return None;
        }

        let rest_length = self.nodes[a].rest_pos.distance(self.nodes[b].rest_pos);
        let id = self.next_beam_id;
        self.next_beam_id += 1;
        self.beams.push(Beam {
            id,
            a,
            b,
            rest_length,
            stress: 0.0,
        });
        self.spent += cost;
        log::debug!("beam {id} built {a}-{b}, rest {rest_length:.1}, spent {}", self.spent);
        self.push_status();
        Some(id)
    }

    /// Remove an authored beam and refund its cost.
    pub fn remove_beam(&mut self, id: u32) -> bool {
        let Some(index) = self.beams.iter().position(|bm| bm.id == id) else {
            return false;
        };
        // Vec::remove keeps the remaining beams in creation order.
        self.beams.remove(index);
        self.spent = self.spent.saturating_sub(self.tuning.beam_cost);
        log::debug!("beam {id} removed, spent {}", self.spent);
        self.push_status();
        true
    }

    // --- host interface ---

    pub fn status(&self) -> Status {
        Status {
            level: self.level_index,
            budget: self.total_budget,
            spent: self.spent,
            phase: self.phase,
        }
    }

    pub(crate) fn push_status(&mut self) {
        let status = self.status();
        self.events.push(SimEvent::StatusChanged(status));
    }

    /// Take all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_selection(&self) -> Option<usize> {
        self.pending
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
