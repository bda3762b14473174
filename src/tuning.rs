//! Data-driven game balance
//!
//! Everything a designer might want to retune lives here; structural
//! constants the level data depends on stay in `crate::consts`.

use serde::{Deserialize, Serialize};

/// Solver and gameplay tuning knobs.
///
/// The defaults are the shipped balance: a plain deck across level 0's gap
/// holds with roughly half the breaking stress to spare, while an
/// unsupported span tears itself apart within a few hundred ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward velocity gained per tick by every movable node
    pub gravity: f32,
    /// Velocity retained per sub-iteration (0..1; lower settles faster)
    pub damping: f32,
    /// Relaxation sub-iterations per tick; clamped to at least 2
    pub sub_iterations: u32,
    /// Multiplier turning a beam's stretch ratio into its stress reading
    pub stress_scale: f32,
    /// Stress above which a beam snaps and the test fails
    pub break_threshold: f32,
    /// Budget units deducted per beam, refunded on removal
    pub beam_cost: u32,
    /// Vehicle advance per tick, in domain units
    pub vehicle_speed: f32,
    /// Downward nudge applied to movable nodes under the vehicle
    pub load_sag: f32,
    /// Horizontal half-window around the vehicle that feels its load
    pub load_radius: f32,
    /// How far above the roadway a node may sit and still count as deck
    pub deck_band: f32,
    /// How far past the gap's far edge the vehicle must roll to win
    pub win_clearance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            damping: 0.8,
            sub_iterations: 3,
            stress_scale: 10.0,
            break_threshold: 0.8,
            beam_cost: 50,
            vehicle_speed: 1.4,
            load_sag: 0.25,
            load_radius: 60.0,
            deck_band: 26.0,
            win_clearance: 50.0,
        }
    }
}

impl Tuning {
    /// Sub-iteration count the solver actually runs. A single pass cannot
    /// keep gravity and correction interleaved tightly enough to converge,
    /// so anything below 2 is clamped up.
    pub fn effective_sub_iterations(&self) -> u32 {
        self.sub_iterations.max(2)
    }

    /// Nodes higher than this y value count as bracing, not roadway.
    pub fn deck_ceiling(&self) -> f32 {
        crate::consts::ROAD_Y - self.deck_band
    }
}
