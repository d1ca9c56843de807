//! Carousel tuning
//!
//! Every feel constant of the ring is a named option here. Defaults reproduce
//! the projects page as it ships.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// A value is NaN or infinite
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    /// A value lies outside its accepted range
    #[error("{name} = {value} is out of range ({expected})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    /// Radius bounds are inverted
    #[error("{profile} radius_min ({min}) exceeds radius_max ({max})")]
    RadiusBounds {
        profile: &'static str,
        min: f32,
        max: f32,
    },
}

/// Physics and timing of the ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Index units per dragged pixel
    pub sensitivity: f32,
    /// Fraction of the current-to-target gap closed each frame
    pub lerp: f32,
    /// Per-frame velocity multiplier after release
    pub friction: f32,
    /// Fraction of the pull toward the nearest slot applied each frame
    pub snap: f32,
    /// Velocity below which a glide may settle
    pub velocity_epsilon: f32,
    /// Remaining pull below which a glide may settle
    pub pull_epsilon: f32,
    /// Gap below which the rendered position is clamped onto the target
    pub settle_epsilon: f32,
    /// Cumulative pointer travel that turns a tap into a drag
    pub tap_threshold_px: f32,
    /// Inactivity before idle drift starts
    pub idle_delay_ms: u64,
    /// Index units advanced per frame while idle
    pub idle_speed: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.0036,
            lerp: 0.18,
            friction: 0.95,
            snap: 0.14,
            velocity_epsilon: 0.00005,
            pull_epsilon: 0.0005,
            settle_epsilon: 0.0005,
            tap_threshold_px: 5.0,
            idle_delay_ms: 4000,
            idle_speed: 0.003,
        }
    }
}

/// Ring shape for one class of viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryProfile {
    /// Radius as a fraction of viewport width, before clamping
    pub radius_fraction: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// How wide the ring fans out horizontally
    pub x_factor: f32,
    /// Degrees of Y rotation per degree of ring angle
    pub rot_factor: f32,
    /// Scale lost between the front and the back of the ring
    pub scale_depth: f32,
}

impl GeometryProfile {
    /// Wide viewports
    pub fn desktop() -> Self {
        Self {
            radius_fraction: 0.35,
            radius_min: 440.0,
            radius_max: 560.0,
            x_factor: 0.55,
            rot_factor: 0.45,
            scale_depth: 0.28,
        }
    }

    /// Narrow viewports
    pub fn mobile() -> Self {
        Self {
            radius_fraction: 0.66,
            radius_min: 340.0,
            radius_max: 420.0,
            x_factor: 0.50,
            rot_factor: 0.45,
            scale_depth: 0.28,
        }
    }

    fn patched(mut self, patch: ProfilePatch) -> Self {
        let ProfilePatch {
            radius_fraction,
            radius_min,
            radius_max,
            x_factor,
            rot_factor,
            scale_depth,
        } = patch;
        self.radius_fraction = radius_fraction.unwrap_or(self.radius_fraction);
        self.radius_min = radius_min.unwrap_or(self.radius_min);
        self.radius_max = radius_max.unwrap_or(self.radius_max);
        self.x_factor = x_factor.unwrap_or(self.x_factor);
        self.rot_factor = rot_factor.unwrap_or(self.rot_factor);
        self.scale_depth = scale_depth.unwrap_or(self.scale_depth);
        self
    }

    fn validate(&self, profile: &'static str) -> Result<(), SettingsError> {
        finite("radius_fraction", self.radius_fraction)?;
        finite("radius_min", self.radius_min)?;
        finite("radius_max", self.radius_max)?;
        finite("x_factor", self.x_factor)?;
        finite("rot_factor", self.rot_factor)?;
        finite("scale_depth", self.scale_depth)?;

        if self.radius_min <= 0.0 {
            return Err(SettingsError::OutOfRange {
                name: "radius_min",
                value: self.radius_min,
                expected: "> 0",
            });
        }
        if self.radius_min > self.radius_max {
            return Err(SettingsError::RadiusBounds {
                profile,
                min: self.radius_min,
                max: self.radius_max,
            });
        }
        if !(0.0..1.0).contains(&self.scale_depth) {
            return Err(SettingsError::OutOfRange {
                name: "scale_depth",
                value: self.scale_depth,
                expected: "0 <= scale_depth < 1",
            });
        }
        Ok(())
    }
}

impl Default for GeometryProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Profile table as written on disk; missing keys keep the profile's own default
#[derive(Deserialize)]
struct ProfilePatch {
    radius_fraction: Option<f32>,
    radius_min: Option<f32>,
    radius_max: Option<f32>,
    x_factor: Option<f32>,
    rot_factor: Option<f32>,
    scale_depth: Option<f32>,
}

fn desktop_profile<'de, D>(deserializer: D) -> Result<GeometryProfile, D::Error>
where
    D: Deserializer<'de>,
{
    let patch = ProfilePatch::deserialize(deserializer)?;
    Ok(GeometryProfile::desktop().patched(patch))
}

fn mobile_profile<'de, D>(deserializer: D) -> Result<GeometryProfile, D::Error>
where
    D: Deserializer<'de>,
{
    let patch = ProfilePatch::deserialize(deserializer)?;
    Ok(GeometryProfile::mobile().patched(patch))
}

/// Responsive ring geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Viewports at most this wide use the mobile profile
    pub mobile_breakpoint_px: f32,
    #[serde(default = "GeometryProfile::desktop", deserialize_with = "desktop_profile")]
    pub desktop: GeometryProfile,
    #[serde(default = "GeometryProfile::mobile", deserialize_with = "mobile_profile")]
    pub mobile: GeometryProfile,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 600.0,
            desktop: GeometryProfile::desktop(),
            mobile: GeometryProfile::mobile(),
        }
    }
}

/// Complete carousel configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub motion: MotionSettings,
    pub geometry: GeometrySettings,
}

impl CarouselSettings {
    /// Check every value the controller relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let m = &self.motion;
        finite("sensitivity", m.sensitivity)?;
        finite("lerp", m.lerp)?;
        finite("friction", m.friction)?;
        finite("snap", m.snap)?;
        finite("velocity_epsilon", m.velocity_epsilon)?;
        finite("pull_epsilon", m.pull_epsilon)?;
        finite("settle_epsilon", m.settle_epsilon)?;
        finite("tap_threshold_px", m.tap_threshold_px)?;
        finite("idle_speed", m.idle_speed)?;

        unit_open_low("lerp", m.lerp)?;
        unit_open_low("snap", m.snap)?;
        if !(0.0..1.0).contains(&m.friction) {
            return Err(SettingsError::OutOfRange {
                name: "friction",
                value: m.friction,
                expected: "0 <= friction < 1",
            });
        }
        non_negative("velocity_epsilon", m.velocity_epsilon)?;
        non_negative("pull_epsilon", m.pull_epsilon)?;
        non_negative("settle_epsilon", m.settle_epsilon)?;
        non_negative("tap_threshold_px", m.tap_threshold_px)?;
        non_negative("idle_speed", m.idle_speed)?;

        finite("mobile_breakpoint_px", self.geometry.mobile_breakpoint_px)?;
        self.geometry.desktop.validate("desktop")?;
        self.geometry.mobile.validate("mobile")?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::NotFinite(name))
    }
}

fn unit_open_low(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            expected: "0 < value <= 1",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            name,
            value,
            expected: ">= 0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(CarouselSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_friction_must_decay() {
        let mut settings = CarouselSettings::default();
        settings.motion.friction = 1.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::OutOfRange { name: "friction", .. })
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let mut settings = CarouselSettings::default();
        settings.motion.sensitivity = f32::NAN;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::NotFinite("sensitivity"))
        );
    }

    #[test]
    fn test_rejects_inverted_radius() {
        let mut settings = CarouselSettings::default();
        settings.geometry.mobile.radius_min = 500.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::RadiusBounds { profile: "mobile", .. })
        ));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: CarouselSettings = toml::from_str(
            r#"
            [motion]
            friction = 0.9
            idle_delay_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(settings.motion.friction, 0.9);
        assert_eq!(settings.motion.idle_delay_ms, 2500);
        assert_eq!(settings.motion.snap, MotionSettings::default().snap);
        assert_eq!(settings.geometry, GeometrySettings::default());
    }

    #[test]
    fn test_partial_profile_fills_defaults() {
        let settings: CarouselSettings = toml::from_str(
            r#"
            [geometry.desktop]
            x_factor = 0.7

            [geometry.mobile]
            radius_max = 400.0
            "#,
        )
        .unwrap();
        let desktop = &settings.geometry.desktop;
        assert_eq!(desktop.x_factor, 0.7);
        assert_eq!(desktop.radius_fraction, 0.35);
        assert_eq!(desktop.radius_min, 440.0);

        let mobile = &settings.geometry.mobile;
        assert_eq!(mobile.radius_max, 400.0);
        assert_eq!(mobile.radius_fraction, 0.66);
        assert_eq!(mobile.radius_min, 340.0);
        assert_eq!(settings.validate(), Ok(()));
    }
}
