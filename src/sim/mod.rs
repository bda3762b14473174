//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, advanced by explicit [`Simulation::tick`] calls
//! - Stable iteration order (creation order for nodes and beams)
//! - No rendering, timer, or platform dependencies
//!
//! Per-tick ordering is fixed: gravity, beam relaxation, damping and
//! integration, the break check, then the vehicle/support update, so the
//! failure monitor always sees the tick's freshly relaxed stresses.

pub mod authoring;
pub mod solver;
pub mod state;
pub mod support;
pub mod tick;

pub use solver::relax;
pub use state::{Beam, Node, Phase, SimEvent, Simulation, Status, Vehicle};
pub use support::deck_surface_at;
