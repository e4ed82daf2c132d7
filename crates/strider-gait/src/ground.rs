//! Ground queries used to plant feet and the center of mass.
//!
//! The gait core only ever asks one question of the world: "where is the
//! ground below this point?". Hosts answer it by implementing
//! [`GroundProjector`], usually with a ray cast against their terrain. A miss
//! is never fatal: callers fall back to the unprojected point and the foot is
//! placed flat in world space.

use nalgebra::Vector3;
use strider_core::StriderError;

/// Bounded downward probe.
///
/// The ray starts `lift` above the query point and travels at most
/// `max_distance`. Surfaces outside that window are misses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub lift: f64,
    pub max_distance: f64,
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            lift: 5.0,
            max_distance: 10.0,
        }
    }
}

impl Probe {
    /// Whether a surface at `surface_y` is hit when probing from `query_y`.
    pub fn reaches(&self, query_y: f64, surface_y: f64) -> bool {
        let start = query_y + self.lift;
        surface_y <= start && start - surface_y <= self.max_distance
    }
}

/// Capability to snap a point onto the ground beneath it.
pub trait GroundProjector {
    /// Ground point directly below `point`, or `None` if the probe found nothing.
    fn project(&self, point: &Vector3<f64>) -> Option<Vector3<f64>>;

    /// [`project`](Self::project), falling back to `point` itself on a miss.
    fn project_to_ground(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.project(point).unwrap_or(*point)
    }
}

impl<F> GroundProjector for F
where
    F: Fn(&Vector3<f64>) -> Option<Vector3<f64>>,
{
    fn project(&self, point: &Vector3<f64>) -> Option<Vector3<f64>> {
        self(point)
    }
}

// ---------------------------------------------------------------------------
// FlatGround
// ---------------------------------------------------------------------------

/// Infinite horizontal plane at `height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatGround {
    pub height: f64,
    pub probe: Probe,
}

impl FlatGround {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            probe: Probe::default(),
        }
    }
}

impl GroundProjector for FlatGround {
    fn project(&self, point: &Vector3<f64>) -> Option<Vector3<f64>> {
        self.probe
            .reaches(point.y, self.height)
            .then(|| Vector3::new(point.x, self.height, point.z))
    }
}

// ---------------------------------------------------------------------------
// NoGround
// ---------------------------------------------------------------------------

/// A world with nothing to stand on. Every query misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoGround;

impl GroundProjector for NoGround {
    fn project(&self, _point: &Vector3<f64>) -> Option<Vector3<f64>> {
        None
    }
}

// ---------------------------------------------------------------------------
// HeightField
// ---------------------------------------------------------------------------

/// Regular grid of ground heights over the XZ plane.
///
/// Samples are row-major with rows along +Z and columns along +X, the first
/// sample sitting at `origin`. Heights between samples are bilinearly
/// interpolated; anything outside the grid is a miss.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    origin: [f64; 2],
    spacing: f64,
    columns: usize,
    rows: usize,
    heights: Vec<f64>,
    probe: Probe,
}

impl HeightField {
    /// Build a height field from `columns * rows` samples.
    pub fn new(
        origin: [f64; 2],
        spacing: f64,
        columns: usize,
        rows: usize,
        heights: Vec<f64>,
    ) -> Result<Self, StriderError> {
        let shape_error = |expected| StriderError::HeightFieldShape {
            columns,
            rows,
            expected,
            got: heights.len(),
        };
        let Some(expected) = columns.checked_mul(rows) else {
            return Err(shape_error(usize::MAX));
        };
        if heights.len() != expected || expected == 0 {
            return Err(shape_error(expected));
        }
        Ok(Self {
            origin,
            spacing,
            columns,
            rows,
            heights,
            probe: Probe::default(),
        })
    }

    #[must_use]
    pub const fn with_probe(mut self, probe: Probe) -> Self {
        self.probe = probe;
        self
    }

    fn sample(&self, column: usize, row: usize) -> f64 {
        self.heights[row * self.columns + column]
    }

    /// Interpolated height at `(x, z)`, or `None` outside the grid.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn height_at(&self, x: f64, z: f64) -> Option<f64> {
        let fx = (x - self.origin[0]) / self.spacing;
        let fz = (z - self.origin[1]) / self.spacing;
        let max_x = (self.columns - 1) as f64;
        let max_z = (self.rows - 1) as f64;
        if !(0.0..=max_x).contains(&fx) || !(0.0..=max_z).contains(&fz) {
            return None;
        }

        let c0 = (fx.floor() as usize).min(self.columns.saturating_sub(2));
        let r0 = (fz.floor() as usize).min(self.rows.saturating_sub(2));
        let c1 = (c0 + 1).min(self.columns - 1);
        let r1 = (r0 + 1).min(self.rows - 1);
        let tx = (fx - c0 as f64).clamp(0.0, 1.0);
        let tz = (fz - r0 as f64).clamp(0.0, 1.0);

        let near = self.sample(c0, r0) * (1.0 - tx) + self.sample(c1, r0) * tx;
        let far = self.sample(c0, r1) * (1.0 - tx) + self.sample(c1, r1) * tx;
        Some(near * (1.0 - tz) + far * tz)
    }
}

impl GroundProjector for HeightField {
    fn project(&self, point: &Vector3<f64>) -> Option<Vector3<f64>> {
        let height = self.height_at(point.x, point.z)?;
        self.probe
            .reaches(point.y, height)
            .then(|| Vector3::new(point.x, height, point.z))
    }
}
