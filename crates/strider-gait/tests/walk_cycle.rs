//! Integration tests for full walk cycles.
//!
//! Drives a body along scripted paths and verifies:
//! - Feet take turns: no foot lifts while the other is mid-swing
//! - Swings finish within the time implied by the swing rate
//! - Targets land on the terrain under the body
//! - Stopping settles the stance exactly once

use approx::assert_relative_eq;
use nalgebra::Vector3;
use strider_gait::{
    BodyPose, FlatGround, GaitConfig, GaitController, GroundProjector, HeightField, NoGround,
    Side, StepKind, Steps,
};

const DT: f64 = 0.02;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Tick {
    steps: Steps,
    /// Whether each foot was mid-swing before the tick ran.
    swinging_before: [bool; 2],
    progress: [f64; 2],
}

struct WalkHarness<G> {
    ctrl: GaitController<G>,
    pose: BodyPose,
    yaw: f64,
}

impl<G: GroundProjector> WalkHarness<G> {
    fn new(config: GaitConfig, ground: G) -> Self {
        let pose = BodyPose::default();
        Self {
            ctrl: GaitController::new(config, ground, pose),
            pose,
            yaw: 0.0,
        }
    }

    /// Move with a body-local velocity and yaw rate for `seconds`.
    fn run(&mut self, local_velocity: Vector3<f64>, yaw_rate: f64, seconds: f64) -> Vec<Tick> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ticks = (seconds / DT).round() as usize;
        (0..ticks)
            .map(|_| {
                let swinging_before = Side::BOTH.map(|s| self.ctrl.foot(s).is_swinging());
                self.yaw += yaw_rate * DT;
                let heading = BodyPose::from_yaw(Vector3::zeros(), self.yaw).orientation;
                self.pose = BodyPose::new(self.pose.position + heading * local_velocity * DT, heading);
                let steps = self.ctrl.advance(DT, &self.pose);
                Tick {
                    steps,
                    swinging_before,
                    progress: Side::BOTH.map(|s| self.ctrl.foot(s).progress()),
                }
            })
            .collect()
    }
}

fn assert_turn_taking(ticks: &[Tick]) {
    for (i, tick) in ticks.iter().enumerate() {
        assert!(tick.steps.count() <= 1, "tick {i}: both feet stepped");
        for (j, side) in Side::BOTH.into_iter().enumerate() {
            if tick.steps.get(side).is_some() {
                assert!(
                    !tick.swinging_before[1 - j],
                    "tick {i}: {side:?} lifted while the other foot swung"
                );
            }
        }
    }
}

fn step_sides(ticks: &[Tick]) -> Vec<Side> {
    ticks
        .iter()
        .flat_map(|t| Side::BOTH.into_iter().filter(|&s| t.steps.get(s).is_some()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn straight_walk_alternates() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    let ticks = walk.run(Vector3::new(0.0, 0.0, 2.0), 0.0, 2.0);
    assert_turn_taking(&ticks);

    let sides = step_sides(&ticks);
    assert!(sides.len() >= 4, "only {} steps in 2s", sides.len());
    for pair in sides.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn swing_completes_within_rate_budget() {
    // base speed 3 + 1 + body speed 2 -> a swing lasts 1/6 s
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    let ticks = walk.run(Vector3::new(0.0, 0.0, 2.0), 0.0, 2.0);

    let mut checked = 0;
    for (start, tick) in ticks.iter().enumerate() {
        for (j, side) in Side::BOTH.into_iter().enumerate() {
            if tick.steps.get(side).is_none() {
                continue;
            }
            let Some(done) = ticks[start..].iter().position(|t| t.progress[j] >= 1.0) else {
                continue;
            };
            #[allow(clippy::cast_precision_loss)]
            let elapsed = (done + 1) as f64 * DT;
            assert!(elapsed <= 1.0 / 6.0 + DT + 1e-9, "{side:?} swing took {elapsed}s");
            checked += 1;
        }
    }
    assert!(checked >= 3);
}

#[test]
fn feet_plant_exactly_on_targets() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    walk.run(Vector3::new(0.0, 0.0, 1.0), 0.0, 1.5);
    walk.run(Vector3::zeros(), 0.0, 1.0);
    for side in Side::BOTH {
        let foot = walk.ctrl.foot(side);
        assert!(foot.is_grounded());
        assert_eq!(foot.position(), foot.target());
        assert_eq!(foot.resting_position(), foot.target());
    }
}

#[test]
fn turning_walk_keeps_feet_near_body() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    // Two radians around a circle of radius 2 m.
    let ticks = walk.run(Vector3::new(0.0, 0.0, 1.0), 0.5, 4.0);
    assert_turn_taking(&ticks);
    assert!(step_sides(&ticks).len() >= 4);

    for side in Side::BOTH {
        let foot = walk.ctrl.foot(side).position();
        let dist = (foot - walk.pose.position).xz().norm();
        assert!(dist < 1.5, "{side:?} foot {dist} m from body");
    }
}

#[test]
fn stop_and_go() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    walk.run(Vector3::new(0.0, 0.0, 1.5), 0.0, 1.0);

    let stop = walk.run(Vector3::zeros(), 0.0, 1.0);
    let settles: Vec<_> = stop
        .iter()
        .flat_map(|t| Side::BOTH.map(|s| t.steps.get(s)))
        .flatten()
        .collect();
    assert_eq!(settles, vec![StepKind::Settle]);

    let again = walk.run(Vector3::new(0.0, 0.0, 1.5), 0.0, 1.5);
    assert_turn_taking(&again);
    assert!(step_sides(&again).len() >= 2);
}

#[test]
fn targets_follow_height_field() {
    // Ramp rising 0.1 per meter along +Z, 20 m square.
    let columns = 21;
    let rows = 21;
    #[allow(clippy::cast_precision_loss)]
    let heights = (0..rows)
        .flat_map(|r| (0..columns).map(move |_| r as f64 * 0.1))
        .collect();
    let ground = HeightField::new([-10.0, -10.0], 1.0, columns, rows, heights).unwrap();

    let mut walk = WalkHarness::new(GaitConfig::default(), ground);
    walk.run(Vector3::new(0.0, 0.0, 1.0), 0.0, 3.0);

    for side in Side::BOTH {
        let target = walk.ctrl.foot(side).target();
        let expected = (target.z + 10.0) * 0.1;
        assert_relative_eq!(target.y, expected, epsilon = 1e-9);
    }
}

#[test]
fn strafing_targets_lead_sideways() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    let ticks = walk.run(Vector3::new(1.5, 0.0, 0.0), 0.0, 2.0);
    assert_turn_taking(&ticks);
    for side in Side::BOTH {
        let target = walk.ctrl.foot(side).target();
        assert!(target.x > 1.0, "{side:?} never stepped sideways: {target:?}");
        assert!(target.x > walk.pose.position.x - 1.0, "{side:?} trails at {target:?}");
    }
}

#[test]
fn walking_off_the_world_degrades_to_raw_targets() {
    let mut walk = WalkHarness::new(GaitConfig::default(), NoGround);
    walk.run(Vector3::new(0.0, 0.0, 2.0), 0.0, 1.0);
    for side in Side::BOTH {
        let target = walk.ctrl.foot(side).target();
        assert_relative_eq!(target.y, 0.0);
        assert!(target.z > 0.5);
    }
}

#[test]
fn frames_serialize_every_tick() {
    let mut walk = WalkHarness::new(GaitConfig::default(), FlatGround::new(0.0));
    for i in 0..10u64 {
        walk.run(Vector3::new(0.0, 0.0, 1.0), 0.0, DT);
        let line = serde_json::to_string(&walk.ctrl.frame(i * 20_000_000)).unwrap();
        assert!(line.contains("center_of_mass"));
    }
}
