//! Fixed timestep simulation tick
//!
//! Orchestrates one testing step: relaxation, the break check, then the
//! vehicle/support update, always in that order so structural failure
//! preempts a support failure within the same tick. The host calls
//! [`Simulation::tick`] once per frame; outside `Testing` it does nothing.

use glam::Vec2;

use super::state::{Phase, SimEvent, Simulation, Vehicle};
use super::{solver, support};
use crate::consts::ROAD_Y;

impl Simulation {
    /// Lock authoring and start a test run.
    ///
    /// Live node state is restored from the templates and a fresh vehicle
    /// spawns before the gap, so identical structures always produce
    /// identical runs. No-op outside `Building`.
    pub fn test_bridge(&mut self) {
        if self.phase != Phase::Building {
            return;
        }
        self.pending = None;
        for node in &mut self.nodes {
            node.pos = node.rest_pos;
            node.vel = Vec2::ZERO;
        }
        for beam in &mut self.beams {
            beam.stress = 0.0;
        }
        let gap_start = self.level().gap_start;
        self.vehicle = Some(Vehicle::spawn(gap_start));
        self.time_ticks = 0;
        self.phase = Phase::Testing;
        log::info!(
            "testing bridge: {} beams, {} of {} spent",
            self.beams.len(),
            self.spent,
            self.total_budget
        );
        self.push_status();
    }

    /// Advance the simulation by one step while testing.
    pub fn tick(&mut self) {
        if self.phase != Phase::Testing {
            return;
        }
        self.time_ticks += 1;

        solver::relax(&mut self.nodes, &mut self.beams, &self.tuning);
        if self.snap_overstressed() {
            return;
        }
        self.advance_vehicle();
    }

    /// Remove the first over-stressed beam, if any, and fail the run.
    fn snap_overstressed(&mut self) -> bool {
        let threshold = self.tuning.break_threshold;
        let Some(index) = self.beams.iter().position(|bm| bm.stress > threshold) else {
            return false;
        };
        let beam = self.beams.remove(index);
        log::info!("beam {} snapped at stress {:.2}", beam.id, beam.stress);
        self.events.push(SimEvent::BeamSnapped { beam: beam.id });
        self.fail();
        true
    }

    fn fail(&mut self) {
        self.phase = Phase::Failed;
        self.push_status();
    }

    /// Roll the vehicle forward and resolve its support.
    fn advance_vehicle(&mut self) {
        let Some(mut vehicle) = self.vehicle.take() else {
            return;
        };
        vehicle.pos.x += self.tuning.vehicle_speed;
        let x = vehicle.pos.x;
        let (gap_start, gap_end) = {
            let level = self.level();
            (level.gap_start, level.gap_end)
        };

        if x > gap_end + self.tuning.win_clearance {
            vehicle.finished = true;
            vehicle.on_span = false;
            vehicle.settle_on(ROAD_Y);
            self.vehicle = Some(vehicle);
            log::info!("vehicle cleared the gap at x {x:.1}");
            self.events.push(SimEvent::GapCleared);
            self.phase = Phase::Won;
            self.push_status();
            return;
        }

        if x <= gap_start || x >= gap_end {
            // Solid ground on either side of the gap.
            vehicle.on_span = false;
            vehicle.settle_on(ROAD_Y);
            self.vehicle = Some(vehicle);
            return;
        }

        let ceiling = self.tuning.deck_ceiling();
        match support::deck_surface_at(&self.nodes, &self.beams, x, ceiling) {
            Some(surface) => {
                vehicle.on_span = true;
                vehicle.settle_on(surface);
                self.vehicle = Some(vehicle);
                // Transfer the load: press nearby movable nodes downward.
                let radius = self.tuning.load_radius;
                let sag = self.tuning.load_sag;
                for node in &mut self.nodes {
                    if !node.fixed && (node.pos.x - x).abs() < radius {
                        node.pos.y += sag;
                    }
                }
            }
            None => {
                log::info!("no deck under the vehicle at x {x:.1}");
                self.events.push(SimEvent::VehicleUnsupported { x });
                vehicle.on_span = false;
                self.vehicle = Some(vehicle);
                self.fail();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Level;
    use crate::tuning::Tuning;

    /// Wire the level-0 deck chain: anchor 0, sites 2/3/4, anchor 1.
    /// `skip` omits the nth segment.
    fn connect_deck(sim: &mut Simulation, skip: Option<usize>) {
        let path = [0usize, 2, 3, 4, 1];
        for (i, pair) in path.windows(2).enumerate() {
            if Some(i) == skip {
                continue;
            }
            sim.select_or_connect(pair[0]);
            sim.select_or_connect(pair[1]);
        }
    }

    fn run_until_terminal(sim: &mut Simulation, max_ticks: u32) -> Phase {
        for _ in 0..max_ticks {
            sim.tick();
            if matches!(sim.phase, Phase::Won | Phase::Failed) {
                break;
            }
        }
        sim.phase
    }

    #[test]
    fn test_full_deck_wins() {
        let mut sim = Simulation::new();
        connect_deck(&mut sim, None);
        assert_eq!(sim.spent, 200);

        sim.test_bridge();
        assert_eq!(sim.phase, Phase::Testing);
        assert_eq!(run_until_terminal(&mut sim, 500), Phase::Won);

        let vehicle = sim.vehicle.expect("vehicle survives the run");
        assert!(vehicle.finished);
        assert!(vehicle.pos.x > 550.0);
        assert!(sim.events.iter().any(|e| matches!(e, SimEvent::GapCleared)));
    }

    #[test]
    fn test_any_missing_deck_beam_fails() {
        for skip in 0..4 {
            let mut sim = Simulation::new();
            connect_deck(&mut sim, Some(skip));
            assert_eq!(sim.spent, 150);
            sim.test_bridge();
            assert_eq!(
                run_until_terminal(&mut sim, 1000),
                Phase::Failed,
                "deck missing segment {skip} still won"
            );
        }
    }

    #[test]
    fn test_no_beams_fails_on_gap_entry() {
        let mut sim = Simulation::new();
        sim.test_bridge();
        assert_eq!(run_until_terminal(&mut sim, 200), Phase::Failed);

        // Failure lands on the first tick inside the gap: the vehicle is at
        // most one step past the near edge.
        let x = sim.vehicle.expect("vehicle").pos.x;
        let gap_start = sim.level().gap_start;
        assert!(x > gap_start);
        assert!(x <= gap_start + sim.tuning.vehicle_speed + 1e-3);
        assert!(sim
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::VehicleUnsupported { .. })));
    }

    #[test]
    fn test_overstress_snaps_beam_and_preempts_support() {
        // A decked gap keeps the vehicle supported while, off to the side,
        // a short stub bears a long dangling chain. The stub's stretch
        // ratio passes the threshold before the vehicle can finish, so the
        // run ends as a structural failure, never a fall.
        let level = Level {
            budget: 300,
            gap_start: 600.0,
            gap_end: 750.0,
            fixed_sites: vec![
                Vec2::new(600.0, 240.0),
                Vec2::new(750.0, 240.0),
                Vec2::new(200.0, 240.0),
            ],
            build_sites: vec![
                Vec2::new(210.0, 240.0),
                Vec2::new(285.0, 240.0),
                Vec2::new(360.0, 240.0),
                Vec2::new(435.0, 240.0),
                Vec2::new(675.0, 240.0),
            ],
        };
        let mut sim = Simulation::with_levels(vec![level], Tuning::default());
        // Deck across the gap, then the doomed stub-and-chain.
        for pair in [[0usize, 7], [7, 1], [2, 3], [3, 4], [4, 5], [5, 6]] {
            sim.select_or_connect(pair[0]);
            sim.select_or_connect(pair[1]);
        }
        assert_eq!(sim.beams.len(), 6);
        sim.test_bridge();

        assert_eq!(run_until_terminal(&mut sim, 600), Phase::Failed);
        // The snapped beam is gone from the ledger with no refund, and the
        // vehicle was still on the deck when the run ended.
        assert_eq!(sim.beams.len(), 5);
        assert_eq!(sim.spent, 300);
        assert!(sim.events.iter().any(|e| matches!(e, SimEvent::BeamSnapped { .. })));
        assert!(!sim
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::VehicleUnsupported { .. })));
        let vehicle = sim.vehicle.expect("vehicle");
        assert!(vehicle.on_span && !vehicle.finished);
    }

    #[test]
    fn test_tick_is_noop_outside_testing() {
        let mut sim = Simulation::new();
        let before = sim.nodes.clone();
        sim.tick();
        assert_eq!(sim.time_ticks, 0);
        for (a, b) in before.iter().zip(&sim.nodes) {
            assert_eq!(a.pos, b.pos);
        }

        connect_deck(&mut sim, None);
        sim.test_bridge();
        run_until_terminal(&mut sim, 500);
        let ticks_at_end = sim.time_ticks;
        sim.tick();
        assert_eq!(sim.time_ticks, ticks_at_end, "terminal phases do not advance");
    }

    #[test]
    fn test_test_bridge_only_from_building() {
        let mut sim = Simulation::new();
        connect_deck(&mut sim, None);
        sim.test_bridge();
        let spawned_at = sim.vehicle.expect("vehicle").pos.x;
        for _ in 0..10 {
            sim.tick();
        }
        // A second call mid-run must not respawn the vehicle.
        sim.test_bridge();
        assert!(sim.vehicle.expect("vehicle").pos.x > spawned_at);
        assert_eq!(sim.phase, Phase::Testing);
    }

    #[test]
    fn test_reset_cancels_run() {
        let mut sim = Simulation::new();
        connect_deck(&mut sim, None);
        sim.test_bridge();
        for _ in 0..50 {
            sim.tick();
        }
        sim.reset();
        assert_eq!(sim.phase, Phase::Building);
        assert!(sim.vehicle.is_none());
        assert!(sim.beams.is_empty());
        assert_eq!(sim.spent, 0);
        assert_eq!(sim.time_ticks, 0);
        for node in &sim.nodes {
            assert_eq!(node.pos, node.rest_pos);
        }
    }

    #[test]
    fn test_identical_snapshots_run_identically() {
        let mut first = Simulation::new();
        connect_deck(&mut first, None);
        let mut second = first.clone();

        first.test_bridge();
        second.test_bridge();
        for tick in 0..400 {
            first.tick();
            second.tick();
            if tick % 50 == 0 {
                for (a, b) in first.beams.iter().zip(&second.beams) {
                    assert_eq!(a.stress.to_bits(), b.stress.to_bits(), "tick {tick}");
                }
            }
        }
        assert_eq!(first.phase, second.phase);
        assert_eq!(
            serde_json::to_string(&first.nodes).expect("serialize"),
            serde_json::to_string(&second.nodes).expect("serialize")
        );
        assert_eq!(
            serde_json::to_string(&first.vehicle).expect("serialize"),
            serde_json::to_string(&second.vehicle).expect("serialize")
        );
    }

    #[test]
    fn test_vehicle_rides_ground_outside_gap() {
        let mut sim = Simulation::new();
        connect_deck(&mut sim, None);
        sim.test_bridge();
        sim.tick();
        let vehicle = sim.vehicle.expect("vehicle");
        assert!(!vehicle.on_span);
        assert!((vehicle.pos.y - (ROAD_Y - vehicle.height / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_vehicle_rides_deck_inside_gap() {
        let mut sim = Simulation::new();
        connect_deck(&mut sim, None);
        sim.test_bridge();
        // Run until the vehicle is well inside the gap.
        while sim.vehicle.expect("vehicle").pos.x < 300.0 {
            sim.tick();
            assert_eq!(sim.phase, Phase::Testing);
        }
        let vehicle = sim.vehicle.expect("vehicle");
        assert!(vehicle.on_span);
        // The deck sags under load, so the vehicle sits at or below road
        // height, never floating above it.
        assert!(vehicle.pos.y >= ROAD_Y - vehicle.height / 2.0 - 1e-3);
    }
}
