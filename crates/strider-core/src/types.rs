use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which leg of a biped.
///
/// Left is body-local −X, right is body-local +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// The opposite leg.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Sign of this side along the body-local X axis.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Corner
// ---------------------------------------------------------------------------

/// One corner of the support rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Corner {
    /// All corners in storage order.
    pub const ALL: [Self; 4] = [
        Self::FrontLeft,
        Self::FrontRight,
        Self::BackLeft,
        Self::BackRight,
    ];

    /// Corner on `side`, at the front if `front` is true.
    pub const fn new(side: Side, front: bool) -> Self {
        match (side, front) {
            (Side::Left, true) => Self::FrontLeft,
            (Side::Right, true) => Self::FrontRight,
            (Side::Left, false) => Self::BackLeft,
            (Side::Right, false) => Self::BackRight,
        }
    }

    pub const fn side(self) -> Side {
        match self {
            Self::FrontLeft | Self::BackLeft => Side::Left,
            Self::FrontRight | Self::BackRight => Side::Right,
        }
    }

    pub const fn is_front(self) -> bool {
        matches!(self, Self::FrontLeft | Self::FrontRight)
    }

    /// The same corner reflected across the body's forward axis.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(self.side().other(), self.is_front())
    }

    /// Index into a `[_; 4]` laid out like [`Corner::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::FrontLeft => 0,
            Self::FrontRight => 1,
            Self::BackLeft => 2,
            Self::BackRight => 3,
        }
    }

    /// Offset of this corner from the rectangle center, in the body-local frame.
    pub fn local_offset(self, half_width: f64, half_length: f64) -> Vector3<f64> {
        let z = if self.is_front() { half_length } else { -half_length };
        Vector3::new(self.side().sign() * half_width, 0.0, z)
    }
}

// ---------------------------------------------------------------------------
// BodyPose
// ---------------------------------------------------------------------------

/// World-space pose of the character body, read from the host each tick.
///
/// Y is up and body-local +Z is forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self::at(Vector3::zeros())
    }
}

impl BodyPose {
    pub const fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` facing world +Z.
    pub fn at(position: Vector3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Pose at `position` turned `yaw` radians about +Y.
    pub fn from_yaw(position: Vector3<f64>, yaw: f64) -> Self {
        Self::new(
            position,
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw),
        )
    }

    /// Yaw-only part of the orientation.
    ///
    /// Pitch and roll are discarded so the support rectangle always lies in
    /// the ground plane. A body looking straight up or down has no defined
    /// heading and yields the identity.
    pub fn heading(&self) -> UnitQuaternion<f64> {
        let forward = self.orientation * Vector3::z();
        if forward.x.hypot(forward.z) < 1e-9 {
            return UnitQuaternion::identity();
        }
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), forward.x.atan2(forward.z))
    }
}
