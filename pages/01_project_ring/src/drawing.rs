//! Drawing module - ring cards, lightbox overlay and on-screen easing
//!
//! The carousel hands out poses in ring space. This module eases the drawn
//! cards toward those poses, paints them back to front and answers hit tests
//! against what is actually on screen.

use std::time::Duration;

use nannou::prelude::*;
use shared::{CardPose, Emphasis, Playback, Ring};

/// Card dimensions at scale 1.0
pub const CARD_WIDTH: f32 = 220.0;
pub const CARD_HEIGHT: f32 = 300.0;

/// Lightbox panel dimensions
pub const LIGHTBOX_WIDTH: f32 = 720.0;
pub const LIGHTBOX_HEIGHT: f32 = 440.0;

/// On-screen easing time constant while transitions are on
const TRANSITION_TAU_SECS: f32 = 0.075;

/// Color palette for the project ring
#[allow(dead_code)]
pub mod colors {
    use nannou::prelude::*;

    /// Page background
    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 8,
        green: 8,
        blue: 10,
        standard: std::marker::PhantomData,
    };

    /// Card face
    pub const CARD_BG: Srgb<u8> = Srgb {
        red: 24,
        green: 24,
        blue: 28,
        standard: std::marker::PhantomData,
    };

    /// Center card border
    pub const BORDER_CENTER: Srgb<u8> = Srgb {
        red: 235,
        green: 235,
        blue: 240,
        standard: std::marker::PhantomData,
    };

    /// Adjacent card border
    pub const BORDER_ADJACENT: Srgb<u8> = Srgb {
        red: 120,
        green: 120,
        blue: 130,
        standard: std::marker::PhantomData,
    };

    /// Far card border
    pub const BORDER_FAR: Srgb<u8> = Srgb {
        red: 55,
        green: 55,
        blue: 62,
        standard: std::marker::PhantomData,
    };

    /// Primary text
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 230,
        green: 230,
        blue: 235,
        standard: std::marker::PhantomData,
    };

    /// Secondary text
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 140,
        green: 140,
        blue: 150,
        standard: std::marker::PhantomData,
    };

    /// Video badge and progress bar
    pub const ACCENT: Srgb<u8> = Srgb {
        red: 200,
        green: 40,
        blue: 40,
        standard: std::marker::PhantomData,
    };

    /// Lightbox backdrop
    pub fn backdrop() -> Srgba<u8> {
        srgba(0, 0, 0, 210)
    }

    /// Lightbox panel
    pub fn panel() -> Srgba<u8> {
        srgba(16, 16, 20, 250)
    }
}

/// A card as currently drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPose {
    pub x: f32,
    pub z: f32,
    pub rot_y_deg: f32,
    pub scale: f32,
}

impl From<&CardPose> for DisplayPose {
    fn from(pose: &CardPose) -> Self {
        Self {
            x: pose.x,
            z: pose.z,
            rot_y_deg: pose.rot_y_deg,
            scale: pose.scale,
        }
    }
}

impl DisplayPose {
    fn approach(&mut self, target: &DisplayPose, alpha: f32) {
        self.x += (target.x - self.x) * alpha;
        self.z += (target.z - self.z) * alpha;
        self.rot_y_deg += (target.rot_y_deg - self.rot_y_deg) * alpha;
        self.scale += (target.scale - self.scale) * alpha;
    }

    /// Screen rectangle around a ring centre
    pub fn rect(&self, center: Point2) -> Rect {
        // Y rotation foreshortens the card horizontally
        let squash = self.rot_y_deg.to_radians().cos().abs().max(0.15);
        Rect::from_x_y_w_h(
            center.x + self.x,
            center.y,
            CARD_WIDTH * self.scale * squash,
            CARD_HEIGHT * self.scale,
        )
    }
}

/// Eased on-screen copy of the ring
#[derive(Debug, Default)]
pub struct DisplayedRing {
    poses: Vec<DisplayPose>,
    /// Paint order, back to front
    order: Vec<usize>,
}

impl DisplayedRing {
    pub fn new(targets: &[CardPose]) -> Self {
        let mut ring = Self::default();
        ring.follow(targets, Duration::ZERO, false);
        ring
    }

    /// Move drawn cards toward the projected poses
    ///
    /// With `ease` off the drawn cards jump straight to their targets.
    pub fn follow(&mut self, targets: &[CardPose], dt: Duration, ease: bool) {
        if self.poses.len() != targets.len() || !ease {
            self.poses = targets.iter().map(DisplayPose::from).collect();
        } else {
            let alpha = 1.0 - (-dt.as_secs_f32() / TRANSITION_TAU_SECS).exp();
            for (shown, target) in self.poses.iter_mut().zip(targets) {
                shown.approach(&DisplayPose::from(target), alpha);
            }
        }

        self.order = (0..targets.len()).collect();
        self.order.sort_by_key(|&slot| targets[slot].depth_order);
    }

    pub fn pose(&self, slot: usize) -> Option<&DisplayPose> {
        self.poses.get(slot)
    }

    /// Topmost card under a point
    pub fn hit_test(&self, center: Point2, point: Point2) -> Option<usize> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&slot| self.poses[slot].rect(center).contains(point))
    }

    /// Bounding box of every drawn card
    pub fn bounds(&self, center: Point2) -> Option<Rect> {
        let mut rects = self.poses.iter().map(|p| p.rect(center));
        let first = rects.next()?;
        let (mut left, mut right, mut bottom, mut top) =
            (first.left(), first.right(), first.bottom(), first.top());
        for r in rects {
            left = left.min(r.left());
            right = right.max(r.right());
            bottom = bottom.min(r.bottom());
            top = top.max(r.top());
        }
        Some(Rect::from_x_y_w_h(
            (left + right) / 2.0,
            (bottom + top) / 2.0,
            right - left,
            top - bottom,
        ))
    }
}

/// Paint the ring back to front
pub fn draw_ring(
    draw: &Draw,
    center: Point2,
    ring: &Ring,
    shown: &DisplayedRing,
    targets: &[CardPose],
    hovered: Option<usize>,
) {
    for &slot in &shown.order {
        let (Some(pose), Some(target)) = (shown.pose(slot), targets.get(slot)) else {
            continue;
        };
        let card = ring.get(slot);
        let rect = pose.rect(center);

        let (border, border_weight, face_alpha) = match target.emphasis {
            Emphasis::Center => (colors::BORDER_CENTER, 3.0, 1.0),
            Emphasis::Adjacent => (colors::BORDER_ADJACENT, 2.0, 0.85),
            Emphasis::Far => (colors::BORDER_FAR, 1.0, 0.6),
        };
        let face_alpha = if card.ghost { face_alpha * 0.7 } else { face_alpha };
        let border_weight = if hovered == Some(slot) {
            border_weight + 1.5
        } else {
            border_weight
        };

        let bg = colors::CARD_BG;
        draw.rect()
            .xy(rect.xy())
            .wh(rect.wh())
            .color(srgba(bg.red, bg.green, bg.blue, (face_alpha * 255.0) as u8))
            .stroke(border)
            .stroke_weight(border_weight);

        let text_alpha = (face_alpha * 255.0) as u8;
        let title = colors::TEXT_PRIMARY;
        draw.text(&card.title)
            .xy(pt2(rect.x(), rect.bottom() + 28.0 * pose.scale))
            .w(rect.w() - 12.0)
            .font_size((16.0 * pose.scale).max(8.0) as u32)
            .color(srgba(title.red, title.green, title.blue, text_alpha));

        if card.video.is_some() {
            draw_play_badge(draw, rect.xy(), 22.0 * pose.scale, text_alpha);
        }
    }
}

fn draw_play_badge(draw: &Draw, center: Point2, radius: f32, alpha: u8) {
    let accent = colors::ACCENT;
    draw.ellipse()
        .xy(center)
        .radius(radius)
        .color(srgba(accent.red, accent.green, accent.blue, alpha));
    let r = radius * 0.45;
    draw.tri()
        .points(
            pt2(center.x - r * 0.6, center.y + r),
            pt2(center.x - r * 0.6, center.y - r),
            pt2(center.x + r, center.y),
        )
        .color(srgba(255, 255, 255, alpha));
}

/// Lightbox panel rectangle for a window
pub fn lightbox_rect(window_rect: Rect) -> Rect {
    let w = LIGHTBOX_WIDTH.min(window_rect.w() - 40.0);
    let h = LIGHTBOX_HEIGHT.min(window_rect.h() - 120.0);
    Rect::from_x_y_w_h(window_rect.x(), window_rect.y() + 30.0, w, h)
}

/// Backdrop, panel and playhead of the open lightbox
pub fn draw_lightbox(
    draw: &Draw,
    window_rect: Rect,
    title: &str,
    video: &str,
    playback: Playback,
    position: Duration,
) {
    draw.rect()
        .xy(window_rect.xy())
        .wh(window_rect.wh())
        .color(colors::backdrop());

    let panel = lightbox_rect(window_rect);
    draw.rect()
        .xy(panel.xy())
        .wh(panel.wh())
        .color(colors::panel())
        .stroke(colors::BORDER_ADJACENT)
        .stroke_weight(1.0);

    draw.text(title)
        .xy(pt2(panel.x(), panel.top() - 30.0))
        .w(panel.w() - 40.0)
        .font_size(22)
        .color(colors::TEXT_PRIMARY);

    draw.text(video)
        .xy(pt2(panel.x(), panel.top() - 60.0))
        .w(panel.w() - 40.0)
        .font_size(12)
        .color(colors::TEXT_SECONDARY);

    let state = match playback {
        Playback::Paused => "PAUSED",
        Playback::Playing => "PLAYING",
    };
    draw.text(state)
        .xy(panel.xy())
        .font_size(28)
        .color(colors::TEXT_PRIMARY);

    draw_playhead(draw, panel, position);
}

fn draw_playhead(draw: &Draw, panel: Rect, position: Duration) {
    let secs = position.as_secs();
    let label = format!("{:02}:{:02}", secs / 60, secs % 60);
    let bar_y = panel.bottom() + 40.0;
    let bar_w = panel.w() - 80.0;

    draw.rect()
        .x_y(panel.x(), bar_y)
        .w_h(bar_w, 4.0)
        .color(colors::BORDER_FAR);

    // One sweep per minute; the preview has no real duration
    let fraction = (position.as_secs_f32() % 60.0) / 60.0;
    let filled = bar_w * fraction;
    draw.rect()
        .x_y(panel.x() - bar_w / 2.0 + filled / 2.0, bar_y)
        .w_h(filled, 4.0)
        .color(colors::ACCENT);

    draw.text(&label)
        .x_y(panel.x(), bar_y + 18.0)
        .font_size(12)
        .color(colors::TEXT_SECONDARY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Geometry, GeometrySettings};

    fn targets(position: f32) -> Vec<CardPose> {
        Geometry::for_viewport(1280.0, &GeometrySettings::default()).project_ring(position, 5)
    }

    #[test]
    fn test_follow_without_easing_is_exact() {
        let t = targets(0.3);
        let mut shown = DisplayedRing::new(&targets(0.0));
        shown.follow(&t, Duration::from_millis(16), false);
        assert_eq!(shown.pose(1), Some(&DisplayPose::from(&t[1])));
    }

    #[test]
    fn test_follow_with_easing_moves_partway() {
        let start = targets(0.0);
        let end = targets(1.0);
        let mut shown = DisplayedRing::new(&start);
        shown.follow(&end, Duration::from_millis(16), true);

        let x = shown.pose(0).unwrap().x;
        assert!(x < start[0].x && x > end[0].x);
    }

    #[test]
    fn test_hit_test_prefers_front_card() {
        let shown = DisplayedRing::new(&targets(0.0));
        let center = pt2(0.0, 0.0);
        assert_eq!(shown.hit_test(center, center), Some(0));
        assert_eq!(shown.hit_test(center, pt2(5000.0, 0.0)), None);
    }

    #[test]
    fn test_bounds_cover_front_card() {
        let shown = DisplayedRing::new(&targets(0.0));
        let center = pt2(0.0, 0.0);
        let bounds = shown.bounds(center).unwrap();
        let front = shown.pose(0).unwrap().rect(center);
        assert!(bounds.left() <= front.left() + 1e-3);
        assert!(bounds.right() >= front.right() - 1e-3);
        assert!(bounds.top() >= front.top() - 1e-3);
        assert!(bounds.w() > front.w());
    }
}
