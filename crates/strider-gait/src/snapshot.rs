//! Read-only snapshot of the gait state for overlays and recordings.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use strider_core::Side;

use crate::gait::GaitController;
use crate::ground::GroundProjector;
use crate::swing::FootSwing;

/// State of one foot at a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::derive_partial_eq_without_eq)] // f64 fields prevent Eq
pub struct FootFrame {
    pub position: Vector3<f64>,
    pub target: Vector3<f64>,
    pub progress: f64,
    pub grounded: bool,
}

impl From<&FootSwing> for FootFrame {
    fn from(foot: &FootSwing) -> Self {
        Self {
            position: *foot.position(),
            target: *foot.target(),
            progress: foot.progress(),
            grounded: foot.is_grounded(),
        }
    }
}

/// Everything a debug overlay needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitFrame {
    /// Host timestamp in nanoseconds.
    pub timestamp_ns: u64,
    pub body_position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub center_of_mass: Vector3<f64>,
    /// Support rectangle corners: front-left, front-right, back-left, back-right.
    pub corners: [Vector3<f64>; 4],
    pub turn: Side,
    pub left: FootFrame,
    pub right: FootFrame,
}

impl<G: GroundProjector> GaitController<G> {
    /// Capture the current state, stamped with `timestamp_ns`.
    pub fn frame(&self, timestamp_ns: u64) -> GaitFrame {
        GaitFrame {
            timestamp_ns,
            body_position: self.body().position,
            velocity: *self.velocity(),
            center_of_mass: *self.center_of_mass(),
            corners: *self.polygon().corners(),
            turn: self.turn(),
            left: self.foot(Side::Left).into(),
            right: self.foot(Side::Right).into(),
        }
    }
}
