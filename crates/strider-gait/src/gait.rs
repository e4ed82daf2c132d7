//! Support-polygon gait controller for a biped.
//!
//! Each tick the controller:
//! 1. Estimates body velocity from the change in position
//! 2. Projects a look-ahead center of mass onto the ground
//! 3. Rebuilds the support rectangle, grown along the direction of travel
//!    and rotated to the body heading
//! 4. Decides whether a foot should step (settling on stop, or alternating
//!    strides while moving) and retargets it to a mapped corner
//! 5. Advances both foot swings
//!
//! ```text
//!        front
//!   FL ─────────── FR
//!    │             │
//!    │     CoM     │   +Z forward, +X right
//!    │             │
//!   BL ─────────── BR
//!        back
//! ```

use nalgebra::Vector3;
use strider_core::{BodyPose, Corner, GaitConfig, Side, TurnTaking};

use crate::ground::GroundProjector;
use crate::polygon::SupportPolygon;
use crate::swing::FootSwing;

/// Why a foot started a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The body just came to rest; the trailing foot closes the stance.
    Settle,
    /// The foot left the support rectangle while moving.
    Stride,
}

/// Swings started during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steps {
    left: Option<StepKind>,
    right: Option<StepKind>,
}

impl Steps {
    pub const fn get(&self, side: Side) -> Option<StepKind> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    pub const fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn record(&mut self, side: Side, kind: StepKind) {
        match side {
            Side::Left => self.left = Some(kind),
            Side::Right => self.right = Some(kind),
        }
    }
}

/// Corner a foot on `side` should step to for a body-local velocity.
///
/// Moving forward (or standing still) picks a front corner, moving backward
/// a back corner. The foot stays on its own side unless the velocity points
/// toward the other side by more than `side_step_angle_deg` off the
/// forward/backward axis, in which case it crosses to the far corner.
/// Only the horizontal (X/Z) part of the velocity counts; Y is ignored.
pub fn map_corner(side: Side, local_velocity: &Vector3<f64>, side_step_angle_deg: f64) -> Corner {
    let speed = local_velocity.x.hypot(local_velocity.z);
    let threshold = speed * side_step_angle_deg.to_radians().sin();
    let front = local_velocity.z >= 0.0;
    // Positive when moving away from this foot's side.
    let toward_other = -side.sign() * local_velocity.x;
    let corner_side = if toward_other > threshold {
        side.other()
    } else {
        side
    };
    Corner::new(corner_side, front)
}

/// Gait controller owning both feet and the support rectangle.
#[derive(Debug, Clone)]
pub struct GaitController<G> {
    config: GaitConfig,
    ground: G,
    body: BodyPose,
    previous_position: Vector3<f64>,
    velocity: Vector3<f64>,
    previous_velocity: Vector3<f64>,
    /// Velocity in the heading frame, refreshed every tick.
    local_velocity: Vector3<f64>,
    center_of_mass: Vector3<f64>,
    polygon: SupportPolygon,
    /// Foot allowed to stride next under [`TurnTaking::Alternating`].
    turn: Side,
    left: FootSwing,
    right: FootSwing,
}

impl<G: GroundProjector> GaitController<G> {
    /// Spawn a controller for a body resting at `pose`.
    ///
    /// Both feet start planted on the ground-projected corners they map to
    /// at rest.
    pub fn new(config: GaitConfig, ground: G, pose: BodyPose) -> Self {
        let center_of_mass = ground.project_to_ground(&pose.position);
        let polygon = rest_polygon(&config, center_of_mass, &pose);
        let place = |side| {
            let corner = map_corner(side, &Vector3::zeros(), config.side_step_angle_deg);
            ground.project_to_ground(polygon.corner(corner))
        };
        let (left, right) = (place(Side::Left), place(Side::Right));
        Self::with_feet(config, ground, pose, left, right)
    }

    /// Spawn a controller with feet planted at explicit positions.
    pub fn with_feet(
        config: GaitConfig,
        ground: G,
        pose: BodyPose,
        left: Vector3<f64>,
        right: Vector3<f64>,
    ) -> Self {
        let center_of_mass = ground.project_to_ground(&pose.position);
        let polygon = rest_polygon(&config, center_of_mass, &pose);
        Self {
            left: FootSwing::planted(left, &config.foot),
            right: FootSwing::planted(right, &config.foot),
            config,
            ground,
            body: pose,
            previous_position: pose.position,
            velocity: Vector3::zeros(),
            previous_velocity: Vector3::zeros(),
            local_velocity: Vector3::zeros(),
            center_of_mass,
            polygon,
            turn: Side::Left,
        }
    }

    /// Run one tick with `dt` seconds elapsed and the body now at `pose`.
    ///
    /// A tick with `dt <= 0` keeps the previous velocity estimate and starts
    /// no new steps; the rectangle still follows the body and swings in
    /// progress are re-evaluated without moving.
    pub fn advance(&mut self, dt: f64, pose: &BodyPose) -> Steps {
        let timed = dt.is_finite() && dt > 0.0;
        self.body = *pose;
        if timed {
            self.previous_velocity = self.velocity;
            self.velocity = (pose.position - self.previous_position) / dt;
            self.previous_position = pose.position;
        }

        let heading = pose.heading();
        self.local_velocity = heading.inverse_transform_vector(&self.velocity);

        let lookahead = Vector3::new(
            self.local_velocity.x * self.config.strafe_lookahead,
            0.0,
            self.local_velocity.z * self.config.stride_lookahead,
        );
        self.center_of_mass = self
            .ground
            .project_to_ground(&(pose.position + heading * lookahead));

        let speed = self.velocity.norm();
        for foot in [&mut self.left, &mut self.right] {
            foot.set_body_speed_hint(speed);
            foot.set_step_height(self.config.foot.step_height);
            foot.set_base_speed(self.config.foot.step_speed);
            foot.set_profile(self.config.foot.profile);
        }

        let (half_width, half_length) = self
            .config
            .half_extents(self.local_velocity.x, self.local_velocity.z);
        self.polygon = SupportPolygon::new(self.center_of_mass, heading, half_width, half_length);

        let steps = if timed { self.plan_steps() } else { Steps::default() };

        self.left.advance(dt);
        self.right.advance(dt);
        steps
    }

    fn plan_steps(&mut self) -> Steps {
        let mut steps = Steps::default();
        let moving = self.velocity.norm() > self.config.rest_speed;
        let was_moving = self.previous_velocity.norm() > self.config.rest_speed;

        if was_moving && !moving {
            let left_dist = (self.center_of_mass - self.left.position()).norm();
            let right_dist = (self.center_of_mass - self.right.position()).norm();
            let farther = if left_dist > right_dist {
                Side::Left
            } else {
                Side::Right
            };
            self.step(farther, StepKind::Settle);
            self.turn = farther.other();
            steps.record(farther, StepKind::Settle);
        } else if moving {
            match self.config.turn_taking {
                TurnTaking::Alternating => {
                    let side = self.turn;
                    if self.may_stride(side) {
                        self.step(side, StepKind::Stride);
                        self.turn = side.other();
                        steps.record(side, StepKind::Stride);
                    }
                }
                TurnTaking::OtherGrounded => {
                    for side in Side::BOTH {
                        if self.may_stride(side) {
                            self.step(side, StepKind::Stride);
                            steps.record(side, StepKind::Stride);
                        }
                    }
                }
            }
        }
        steps
    }

    fn may_stride(&self, side: Side) -> bool {
        !self
            .polygon
            .contains(self.foot(side).position(), self.config.tolerance)
            && self.foot(side.other()).is_grounded()
    }

    fn step(&mut self, side: Side, kind: StepKind) {
        let corner = map_corner(side, &self.local_velocity, self.config.side_step_angle_deg);
        let destination = *self.polygon.corner(corner);
        let foot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        foot.retarget(&destination, &self.ground);
        tracing::debug!(?side, reason = ?kind, ?corner, destination = ?foot.target(), "foot retargeted");
    }

    pub const fn foot(&self, side: Side) -> &FootSwing {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub const fn polygon(&self) -> &SupportPolygon {
        &self.polygon
    }

    pub const fn center_of_mass(&self) -> &Vector3<f64> {
        &self.center_of_mass
    }

    /// World-space velocity estimate.
    pub const fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    /// Velocity in the body heading frame.
    pub const fn local_velocity(&self) -> &Vector3<f64> {
        &self.local_velocity
    }

    pub const fn body(&self) -> &BodyPose {
        &self.body
    }

    /// Foot next in line to stride.
    pub const fn turn(&self) -> Side {
        self.turn
    }

    pub const fn config(&self) -> &GaitConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next tick.
    pub fn config_mut(&mut self) -> &mut GaitConfig {
        &mut self.config
    }

    pub const fn ground(&self) -> &G {
        &self.ground
    }

    pub fn set_step_height(&mut self, step_height: f64) {
        self.config.foot.step_height = step_height;
    }

    pub fn set_step_speed(&mut self, step_speed: f64) {
        self.config.foot.step_speed = step_speed;
    }

    /// Resize the rest rectangle (half-width, half-length).
    pub fn set_stance(&mut self, width: f64, length: f64) {
        self.config.stance_width = width;
        self.config.stance_length = length;
    }
}

fn rest_polygon(config: &GaitConfig, center_of_mass: Vector3<f64>, pose: &BodyPose) -> SupportPolygon {
    let (half_width, half_length) = config.half_extents(0.0, 0.0);
    SupportPolygon::new(center_of_mass, pose.heading(), half_width, half_length)
}
