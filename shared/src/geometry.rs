//! Ring geometry - responsive sizing and per-card projection
//!
//! Coordinates follow the page's 3D convention: `x` grows to the right and
//! `z` grows toward the viewer, so the card at angle 0 sits at `z = radius`.

use crate::circular::{nearest_slot, slot_distance};
use crate::settings::{GeometryProfile, GeometrySettings};

/// Offset added to depth before rounding into a stacking order
const DEPTH_ORDER_BIAS: f32 = 2000.0;

/// Styling class of a card by its distance from the front slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// The card facing the viewer
    Center,
    /// Immediate neighbours of the center card
    Adjacent,
    /// Everything else
    Far,
}

/// Screen transform of one card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub slot: usize,
    /// Horizontal offset from the ring centre
    pub x: f32,
    /// Depth, positive toward the viewer
    pub z: f32,
    /// Y-axis rotation in degrees
    pub rot_y_deg: f32,
    pub scale: f32,
    /// Paint order; higher draws on top
    pub depth_order: i32,
    pub emphasis: Emphasis,
}

/// Viewport-dependent ring shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub radius: f32,
    pub x_factor: f32,
    pub rot_factor: f32,
    pub scale_depth: f32,
}

impl Geometry {
    /// Pick the profile for a viewport width and clamp the radius
    pub fn for_viewport(width: f32, settings: &GeometrySettings) -> Self {
        let profile = if width <= settings.mobile_breakpoint_px {
            &settings.mobile
        } else {
            &settings.desktop
        };
        Self::from_profile(width, profile)
    }

    fn from_profile(width: f32, profile: &GeometryProfile) -> Self {
        let radius = (width * profile.radius_fraction).clamp(profile.radius_min, profile.radius_max);
        Self {
            radius,
            x_factor: profile.x_factor,
            rot_factor: profile.rot_factor,
            scale_depth: profile.scale_depth,
        }
    }

    /// Project the card at `slot` for a ring rotated to `position`
    pub fn project(&self, slot: usize, position: f32, total: usize) -> CardPose {
        let step = 360.0 / total as f32;
        let angle_deg = slot as f32 * step - position * step;
        let rad = angle_deg.to_radians();

        let x = rad.sin() * self.radius * self.x_factor;
        let z = rad.cos() * self.radius;
        let rot_y_deg = angle_deg * self.rot_factor;
        // 1.0 at the front, 1 - scale_depth at the back
        let scale = 1.0 - ((self.radius - z) / (2.0 * self.radius)) * self.scale_depth;

        let front = nearest_slot(position, total);
        let distance = slot_distance(slot, front as f32, total);
        let emphasis = if distance < 0.5 {
            Emphasis::Center
        } else if distance < 1.5 {
            Emphasis::Adjacent
        } else {
            Emphasis::Far
        };

        CardPose {
            slot,
            x,
            z,
            rot_y_deg,
            scale,
            depth_order: (z + DEPTH_ORDER_BIAS).round() as i32,
            emphasis,
        }
    }

    /// Project every slot of a ring of `total` cards
    pub fn project_ring(&self, position: f32, total: usize) -> Vec<CardPose> {
        (0..total).map(|slot| self.project(slot, position, total)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::for_viewport(1400.0, &GeometrySettings::default())
    }

    #[test]
    fn test_desktop_radius_clamped() {
        let settings = GeometrySettings::default();
        // 1400 * 0.35 = 490, inside [440, 560]
        assert!((Geometry::for_viewport(1400.0, &settings).radius - 490.0).abs() < 1e-3);
        assert_eq!(Geometry::for_viewport(3000.0, &settings).radius, 560.0);
        assert_eq!(Geometry::for_viewport(700.0, &settings).radius, 440.0);
    }

    #[test]
    fn test_mobile_profile_below_breakpoint() {
        let settings = GeometrySettings::default();
        let g = Geometry::for_viewport(390.0, &settings);
        assert_eq!(g.x_factor, 0.50);
        // 390 * 0.66 = 257.4, clamped up to 340
        assert_eq!(g.radius, 340.0);
    }

    #[test]
    fn test_front_card_pose() {
        let g = geometry();
        let pose = g.project(0, 0.0, 5);
        assert!(pose.x.abs() < 1e-3);
        assert!((pose.z - g.radius).abs() < 1e-3);
        assert_eq!(pose.rot_y_deg, 0.0);
        assert!((pose.scale - 1.0).abs() < 1e-6);
        assert_eq!(pose.emphasis, Emphasis::Center);
    }

    #[test]
    fn test_scale_grows_toward_viewer() {
        let g = geometry();
        let poses = g.project_ring(0.0, 6);
        let back = poses[3];
        assert!((back.scale - (1.0 - g.scale_depth)).abs() < 1e-4);
        assert!(poses[0].scale > poses[1].scale);
        assert!(poses[1].scale > back.scale);
        assert!(poses[0].depth_order > back.depth_order);
    }

    #[test]
    fn test_emphasis_classes_wrap() {
        let g = geometry();
        let poses = g.project_ring(0.0, 5);
        assert_eq!(poses[0].emphasis, Emphasis::Center);
        assert_eq!(poses[1].emphasis, Emphasis::Adjacent);
        assert_eq!(poses[4].emphasis, Emphasis::Adjacent);
        assert_eq!(poses[2].emphasis, Emphasis::Far);
        assert_eq!(poses[3].emphasis, Emphasis::Far);
    }

    #[test]
    fn test_rotation_moves_center() {
        let g = geometry();
        let poses = g.project_ring(2.2, 5);
        assert_eq!(poses[2].emphasis, Emphasis::Center);
        // card 2 sits slightly left of centre once the ring has turned past it
        assert!(poses[2].x < 0.0);
    }
}
