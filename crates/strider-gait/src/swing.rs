//! Per-foot swing solver.
//!
//! A foot is either planted (`progress >= 1`) or swinging toward a new
//! target. [`FootSwing::retarget`] starts a swing from wherever the foot is
//! currently rendered; [`FootSwing::advance`] consumes elapsed time and moves
//! the foot along its arc. Once progress reaches 1 the foot sits exactly on
//! its target and stays there until the next retarget.

use std::f64::consts::PI;

use nalgebra::Vector3;
use strider_core::{FootConfig, SwingProfile};

use crate::ground::GroundProjector;

/// Position along a swing from `origin` to `target` at `progress` in [0, 1].
///
/// The ground track is a straight blend. With [`SwingProfile::Arc`] a half
/// sine of peak `step_height` is added on +Y. At `progress >= 1` this returns
/// `target` exactly for either profile.
pub fn swing_foot_position(
    origin: &Vector3<f64>,
    target: &Vector3<f64>,
    progress: f64,
    step_height: f64,
    profile: SwingProfile,
) -> Vector3<f64> {
    if progress >= 1.0 {
        return *target;
    }
    let t = progress.max(0.0);
    let mut position = origin.lerp(target, t);
    if profile == SwingProfile::Arc {
        position.y += (t * PI).sin() * step_height;
    }
    position
}

/// Swing state of one foot.
#[derive(Debug, Clone)]
pub struct FootSwing {
    /// Where the foot is drawn this frame.
    position: Vector3<f64>,
    /// Last ground position the foot was committed to.
    resting: Vector3<f64>,
    /// Destination of the current (or most recent) swing, already on the ground.
    target: Vector3<f64>,
    /// Where the current swing lifted off.
    origin: Vector3<f64>,
    /// 0 at liftoff, 1 once planted.
    progress: f64,
    grounded: bool,
    step_height: f64,
    base_speed: f64,
    body_speed_hint: f64,
    profile: SwingProfile,
}

impl FootSwing {
    /// A foot planted at `position`.
    pub fn planted(position: Vector3<f64>, config: &FootConfig) -> Self {
        Self {
            position,
            resting: position,
            target: position,
            origin: position,
            progress: 1.0,
            grounded: true,
            step_height: config.step_height,
            base_speed: config.step_speed,
            body_speed_hint: 0.0,
            profile: config.profile,
        }
    }

    /// Begin a swing toward `destination`.
    ///
    /// The destination is snapped to the ground first; if the probe misses,
    /// the raw point is used. The swing starts from the currently rendered
    /// position. [`is_grounded`](Self::is_grounded) keeps its previous value
    /// until the next [`advance`](Self::advance).
    pub fn retarget(&mut self, destination: &Vector3<f64>, ground: &impl GroundProjector) {
        self.target = ground.project_to_ground(destination);
        self.origin = self.position;
        self.progress = 0.0;
    }

    /// Move the foot along its swing by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero, which leaves both
    /// progress and the rendered position unchanged.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.progress < 1.0 {
            self.progress = (self.progress + dt * self.swing_rate()).min(1.0);
            self.position = swing_foot_position(
                &self.origin,
                &self.target,
                self.progress,
                self.step_height,
                self.profile,
            );
            self.grounded = self.progress >= 1.0;
            if self.grounded {
                self.resting = self.target;
                tracing::trace!(planted_at = ?self.target, "foot planted");
            }
        } else {
            self.position = self.target;
            self.resting = self.target;
            self.grounded = true;
        }
    }

    /// Progress gained per second of swing.
    pub fn swing_rate(&self) -> f64 {
        self.base_speed + 1.0 + self.body_speed_hint
    }

    pub const fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub const fn resting_position(&self) -> &Vector3<f64> {
        &self.resting
    }

    pub const fn target(&self) -> &Vector3<f64> {
        &self.target
    }

    pub const fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Grounded flag as of the last [`advance`](Self::advance).
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_swinging(&self) -> bool {
        self.progress < 1.0
    }

    pub fn set_step_height(&mut self, step_height: f64) {
        self.step_height = step_height;
    }

    pub fn set_base_speed(&mut self, base_speed: f64) {
        self.base_speed = base_speed;
    }

    /// Current body speed, added to the swing rate so faster bodies get faster feet.
    pub fn set_body_speed_hint(&mut self, speed: f64) {
        self.body_speed_hint = speed;
    }

    pub fn set_profile(&mut self, profile: SwingProfile) {
        self.profile = profile;
    }
}
