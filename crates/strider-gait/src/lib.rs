//! Procedural biped stepping driven by body velocity and ground geometry.
//!
//! No animation clips are involved: each frame the crate decides where each
//! foot should plant, when it should lift, and how it arcs on the way.
//!
//! 1. **Support polygon**: a rectangle around a look-ahead center of mass,
//!    grown with speed and rotated to the body heading
//! 2. **Gait controller**: checks each foot against the rectangle, maps
//!    stepping feet to its corners, and keeps the feet taking turns
//! 3. **Foot swing**: interpolates a foot from its old plant to the new
//!    target along a timed arc
//!
//! # Architecture
//!
//! ```text
//! host tick ──► GaitController::advance ──► SupportPolygon ──► FootSwing::retarget
//!                       │                                           │
//!                       └──────────────► FootSwing::advance ◄───────┘
//! ```
//!
//! The host supplies the body pose and elapsed time each tick, plus a
//! [`GroundProjector`] used to snap targets onto terrain. What the crate
//! hands back is a world-space position per foot; bending a leg to reach it
//! is left to whatever IK rig consumes it.

pub mod gait;
pub mod ground;
#[cfg(feature = "bevy")]
pub mod plugin;
pub mod polygon;
pub mod snapshot;
pub mod swing;

pub use gait::{GaitController, StepKind, Steps, map_corner};
pub use ground::{FlatGround, GroundProjector, HeightField, NoGround, Probe};
#[cfg(feature = "bevy")]
pub use plugin::{Strider, StriderFeet, StriderPlugin, body_pose_from_transform};
pub use polygon::SupportPolygon;
pub use snapshot::{FootFrame, GaitFrame};
pub use swing::{FootSwing, swing_foot_position};

pub use strider_core::{
    BodyPose, Corner, FootConfig, GaitConfig, Side, StriderError, SwingProfile, TurnTaking,
};
