//! The support rectangle feet are expected to stay inside.

use nalgebra::{UnitQuaternion, Vector3};
use strider_core::Corner;

/// Rectangle around the projected center of mass, rotated to the body heading.
///
/// Corners are stored in world space. A new polygon is built every tick;
/// nothing mutates one in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPolygon {
    center: Vector3<f64>,
    heading: UnitQuaternion<f64>,
    corners: [Vector3<f64>; 4],
}

impl SupportPolygon {
    /// Build the rectangle from its half extents in the heading frame.
    ///
    /// Negative extents are not rejected; they flip the corners through the
    /// center, which still yields a well-defined (if odd) rectangle.
    pub fn new(
        center: Vector3<f64>,
        heading: UnitQuaternion<f64>,
        half_width: f64,
        half_length: f64,
    ) -> Self {
        let corners =
            Corner::ALL.map(|corner| center + heading * corner.local_offset(half_width, half_length));
        Self {
            center,
            heading,
            corners,
        }
    }

    pub const fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    pub const fn heading(&self) -> &UnitQuaternion<f64> {
        &self.heading
    }

    /// World-space corners, ordered like [`Corner::ALL`].
    pub const fn corners(&self) -> &[Vector3<f64>; 4] {
        &self.corners
    }

    pub const fn corner(&self, corner: Corner) -> &Vector3<f64> {
        &self.corners[corner.index()]
    }

    /// Express a world point in the unrotated frame centered on the polygon.
    pub fn to_local(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.heading.inverse_transform_vector(&(point - self.center))
    }

    /// `[min_x, max_x, min_z, max_z]` of the corners in the local frame.
    pub fn local_bounds(&self) -> [f64; 4] {
        self.corners.iter().map(|c| self.to_local(c)).fold(
            [f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY],
            |[min_x, max_x, min_z, max_z], p| {
                [min_x.min(p.x), max_x.max(p.x), min_z.min(p.z), max_z.max(p.z)]
            },
        )
    }

    /// Whether `point` lies within the rectangle grown by `tolerance` on every side.
    ///
    /// Height is ignored; only the ground-plane footprint matters.
    pub fn contains(&self, point: &Vector3<f64>, tolerance: f64) -> bool {
        let local = self.to_local(point);
        let [min_x, max_x, min_z, max_z] = self.local_bounds();
        local.x >= min_x - tolerance
            && local.x <= max_x + tolerance
            && local.z >= min_z - tolerance
            && local.z <= max_z + tolerance
    }

    /// The same rectangle rotated by `rotation` about `pivot`.
    #[must_use]
    pub fn rotated_about(&self, pivot: &Vector3<f64>, rotation: &UnitQuaternion<f64>) -> Self {
        let rotate = |p: &Vector3<f64>| pivot + rotation * (p - pivot);
        Self {
            center: rotate(&self.center),
            heading: rotation * self.heading,
            corners: self.corners.map(|c| rotate(&c)),
        }
    }
}
