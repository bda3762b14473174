//! Trussfall - a bridge-building truss puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (truss solver, authoring, rolling load)
//! - `levels`: Static level templates
//! - `tuning`: Data-driven game balance
//!
//! The crate is the structural core only: a host is expected to feed it
//! pointer positions in domain coordinates, call [`Simulation::tick`] once
//! per frame, and draw from the node/beam/vehicle state it exposes.
//! Coordinates are canvas-style: x grows rightward, y grows downward, so
//! gravity pulls toward +y and the roadway sits at `consts::ROAD_Y`.

pub mod levels;
pub mod sim;
pub mod tuning;

pub use levels::Level;
pub use sim::{Beam, Node, Phase, SimEvent, Simulation, Status, Vehicle};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Height of the roadway surface. Level anchors sit on this line.
    pub const ROAD_Y: f32 = 240.0;

    /// Pointer hit-test radius for picking a build site or anchor
    pub const NODE_HIT_RADIUS: f32 = 20.0;

    /// Vehicle box dimensions
    pub const VEHICLE_WIDTH: f32 = 36.0;
    pub const VEHICLE_HEIGHT: f32 = 20.0;

    /// How far before the gap's near edge the vehicle spawns
    pub const VEHICLE_RUN_UP: f32 = 120.0;
}
