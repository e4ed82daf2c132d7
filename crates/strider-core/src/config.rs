use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_stance_width() -> f64 {
    0.3
}
const fn default_stance_length() -> f64 {
    0.2
}
const fn default_box_scale() -> f64 {
    0.5
}
const fn default_lookahead() -> f64 {
    0.2
}
const fn default_tolerance() -> f64 {
    0.01
}
const fn default_side_step_angle_deg() -> f64 {
    45.0
}
const fn default_rest_speed() -> f64 {
    0.01
}
const fn default_step_height() -> f64 {
    0.2
}
const fn default_step_speed() -> f64 {
    3.0
}

// ---------------------------------------------------------------------------
// SwingProfile / TurnTaking
// ---------------------------------------------------------------------------

/// Shape of the path a foot follows between two planted positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingProfile {
    /// Straight ground track with a half-sine lift peaking at `step_height`.
    #[default]
    Arc,
    /// Straight blend, the foot never leaves the line between the two points.
    Linear,
}

/// Rule deciding which foot may start a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnTaking {
    /// A single turn owner flips after every step.
    #[default]
    Alternating,
    /// Any foot may step while the other one is grounded.
    OtherGrounded,
}

// ---------------------------------------------------------------------------
// FootConfig
// ---------------------------------------------------------------------------

/// Per-foot swing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootConfig {
    /// Peak lift above the straight swing path (meters).
    #[serde(default = "default_step_height")]
    pub step_height: f64,

    /// Base swing rate. A swing at rest takes `1 / (step_speed + 1)` seconds.
    #[serde(default = "default_step_speed")]
    pub step_speed: f64,

    #[serde(default)]
    pub profile: SwingProfile,
}

impl Default for FootConfig {
    fn default() -> Self {
        Self {
            step_height: default_step_height(),
            step_speed: default_step_speed(),
            profile: SwingProfile::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// GaitConfig
// ---------------------------------------------------------------------------

/// Support rectangle sizing, look-ahead, and stepping rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Half-width of the support rectangle at rest (meters, body-local X).
    #[serde(default = "default_stance_width")]
    pub stance_width: f64,

    /// Half-length of the support rectangle at rest (meters, body-local Z).
    #[serde(default = "default_stance_length")]
    pub stance_length: f64,

    /// Forward growth of the rectangle per unit of forward speed.
    #[serde(default = "default_box_scale")]
    pub stride_scale: f64,

    /// Sideways growth of the rectangle per unit of lateral speed.
    #[serde(default = "default_box_scale")]
    pub strafe_scale: f64,

    /// Seconds of forward velocity the center of mass is projected ahead.
    #[serde(default = "default_lookahead")]
    pub stride_lookahead: f64,

    /// Seconds of lateral velocity the center of mass is projected ahead.
    #[serde(default = "default_lookahead")]
    pub strafe_lookahead: f64,

    /// Slack added to every side of the rectangle for containment tests.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Angle off the forward axis beyond which motion counts as diagonal
    /// and a foot crosses over to the far corner (degrees).
    #[serde(default = "default_side_step_angle_deg")]
    pub side_step_angle_deg: f64,

    /// Speeds at or below this are treated as standing still (m/s).
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f64,

    #[serde(default)]
    pub turn_taking: TurnTaking,

    #[serde(default)]
    pub foot: FootConfig,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            stance_width: default_stance_width(),
            stance_length: default_stance_length(),
            stride_scale: default_box_scale(),
            strafe_scale: default_box_scale(),
            stride_lookahead: default_lookahead(),
            strafe_lookahead: default_lookahead(),
            tolerance: default_tolerance(),
            side_step_angle_deg: default_side_step_angle_deg(),
            rest_speed: default_rest_speed(),
            turn_taking: TurnTaking::default(),
            foot: FootConfig::default(),
        }
    }
}

impl GaitConfig {
    /// Half extents `(width, length)` of the rectangle for a body-local velocity.
    pub fn half_extents(&self, local_velocity_x: f64, local_velocity_z: f64) -> (f64, f64) {
        (
            self.stance_width + local_velocity_x.abs() * self.strafe_scale / 2.0,
            self.stance_length + local_velocity_z.abs() * self.stride_scale / 2.0,
        )
    }

    /// Parse from a TOML string. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gait_config_default_values() {
        let cfg = GaitConfig::default();
        assert_relative_eq!(cfg.stance_width, 0.3);
        assert_relative_eq!(cfg.stance_length, 0.2);
        assert_relative_eq!(cfg.tolerance, 0.01);
        assert_relative_eq!(cfg.side_step_angle_deg, 45.0);
        assert_eq!(cfg.turn_taking, TurnTaking::Alternating);
        assert_relative_eq!(cfg.foot.step_height, 0.2);
        assert_relative_eq!(cfg.foot.step_speed, 3.0);
        assert_eq!(cfg.foot.profile, SwingProfile::Arc);
    }

    #[test]
    fn half_extents_grow_with_speed() {
        let cfg = GaitConfig::default();
        let (w, l) = cfg.half_extents(0.0, 0.0);
        assert_relative_eq!(w, 0.3);
        assert_relative_eq!(l, 0.2);

        // |v| * scale / 2 on each axis, sign ignored
        let (w, l) = cfg.half_extents(-1.0, 2.0);
        assert_relative_eq!(w, 0.3 + 0.25);
        assert_relative_eq!(l, 0.2 + 0.5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = GaitConfig::from_toml_str(
            r#"
            stance_width = 0.4
            turn_taking = "other_grounded"

            [foot]
            profile = "linear"
            "#,
        )
        .unwrap();
        assert_relative_eq!(cfg.stance_width, 0.4);
        assert_relative_eq!(cfg.stance_length, 0.2);
        assert_eq!(cfg.turn_taking, TurnTaking::OtherGrounded);
        assert_eq!(cfg.foot.profile, SwingProfile::Linear);
        assert_relative_eq!(cfg.foot.step_speed, 3.0);
    }

    #[test]
    fn negative_values_are_accepted() {
        let cfg = GaitConfig::from_toml_str("stance_width = -0.5").unwrap();
        assert_relative_eq!(cfg.stance_width, -0.5);
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let cfg = GaitConfig {
            side_step_angle_deg: 30.0,
            turn_taking: TurnTaking::OtherGrounded,
            ..GaitConfig::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(GaitConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = GaitConfig::from_toml_str("stance_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GaitConfig::from_file("/nonexistent/strider/gait.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
