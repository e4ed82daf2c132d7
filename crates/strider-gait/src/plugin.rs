//! Bevy ECS plugin driving gait controllers from entity transforms.
//!
//! Provides [`StriderPlugin`], which ticks every [`Strider`] body once per
//! frame in `Update`: the body's `Transform` is read as the pose, the
//! controller is advanced by the frame delta, and the rendered foot
//! positions are written to the `Transform`s of the entities listed in
//! [`StriderFeet`]. Foot entities should not be parented to the body, since
//! positions are written as world coordinates.

use std::marker::PhantomData;

use bevy::prelude::*;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use strider_core::{BodyPose, Side};

use crate::gait::GaitController;
use crate::ground::GroundProjector;

/// Bevy plugin for procedural stepping over ground type `G`.
pub struct StriderPlugin<G> {
    _ground: PhantomData<fn() -> G>,
}

impl<G> Default for StriderPlugin<G> {
    fn default() -> Self {
        Self {
            _ground: PhantomData,
        }
    }
}

impl<G: GroundProjector + Send + Sync + 'static> Plugin for StriderPlugin<G> {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, strider_system::<G>);
    }
}

/// Gait controller attached to a body entity.
#[derive(Component)]
pub struct Strider<G: GroundProjector + Send + Sync + 'static>(pub GaitController<G>);

/// Entities whose transforms follow the left and right feet.
#[derive(Component, Debug, Clone, Copy)]
pub struct StriderFeet {
    pub left: Entity,
    pub right: Entity,
}

/// Convert a Bevy transform to a body pose.
pub fn body_pose_from_transform(transform: &Transform) -> BodyPose {
    let t = transform.translation;
    let r = transform.rotation;
    BodyPose::new(
        Vector3::new(f64::from(t.x), f64::from(t.y), f64::from(t.z)),
        UnitQuaternion::from_quaternion(Quaternion::new(
            f64::from(r.w),
            f64::from(r.x),
            f64::from(r.y),
            f64::from(r.z),
        )),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn to_vec3(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

#[allow(clippy::needless_pass_by_value)] // Bevy system parameters are extracted by value
fn strider_system<G: GroundProjector + Send + Sync + 'static>(
    time: Res<Time>,
    mut bodies: Query<(&Transform, &mut Strider<G>, &StriderFeet)>,
    mut feet: Query<&mut Transform, Without<Strider<G>>>,
) {
    let dt = f64::from(time.delta_secs());
    for (transform, mut strider, limbs) in &mut bodies {
        let pose = body_pose_from_transform(transform);
        strider.0.advance(dt, &pose);
        for (side, entity) in [(Side::Left, limbs.left), (Side::Right, limbs.right)] {
            if let Ok(mut foot) = feet.get_mut(entity) {
                foot.translation = to_vec3(strider.0.foot(side).position());
            }
        }
    }
}
