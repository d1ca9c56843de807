//! Carousel controller
//!
//! Owns the ring, its rotation, pointer and keyboard interaction, the idle
//! timer and the video lightbox. Input handlers and the per-frame [`tick`]
//! are the only mutators, and all of them take the current instant so the
//! controller never reads a clock itself.
//!
//! Positions are continuous ring indices: `current` is what is drawn,
//! `target` is where the ring is heading. Both may wind past `len()`; only
//! their value modulo the ring size is meaningful.
//!
//! [`tick`]: Carousel::tick

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::circular::{nearest_slot, shortest_delta, wrap_index};
use crate::geometry::{CardPose, Geometry};
use crate::lightbox::{Lightbox, LightboxError, VideoBackend};
use crate::ring::{Ring, VideoRef};
use crate::settings::{CarouselSettings, SettingsError};

/// Winding past which both positions are shifted back by whole turns
const REBASE_LIMIT: f32 = 4096.0;

/// Keys the carousel reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselKey {
    Left,
    Right,
    Escape,
    /// Any other key; still counts as activity
    Other,
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Target moved by one slot in this direction
    Stepped(i32),
    /// The lightbox was closed
    ClosedLightbox,
    /// Activity only
    Noted,
    /// Swallowed by the open lightbox
    Ignored,
}

/// What a click on a card did
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// The click ended a drag and is discarded
    Suppressed,
    /// The lightbox is open; the ring does not take clicks
    Blocked,
    /// The card was off centre and is now being rotated to the front
    Centering(usize),
    /// Centred card without a video
    AlreadyCentered,
    /// Centred card opened its video
    Opened(VideoRef),
}

/// Continuous rotation of the ring
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub current: f32,
    pub target: f32,
    /// Index units per frame, carried after a drag is released
    pub velocity: f32,
}

/// Pointer bookkeeping for the drag in progress
#[derive(Debug, Clone, Copy, Default)]
struct InteractionState {
    dragging: bool,
    start_x: f32,
    last_x: f32,
    start_target: f32,
    moved_px: f32,
    suppress_click: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct IdleState {
    idle: bool,
    deadline: Option<Instant>,
}

/// A mounted 3D ring of cards
#[derive(Debug)]
pub struct Carousel<B> {
    ring: Ring,
    settings: CarouselSettings,
    viewport_width: f32,
    geometry: Geometry,
    rotation: RotationState,
    interaction: InteractionState,
    idle: IdleState,
    transitions_enabled: bool,
    poses: Vec<CardPose>,
    lightbox: Lightbox<B>,
}

impl<B: VideoBackend> Carousel<B> {
    /// Mount a carousel showing slot 0 with the idle timer armed
    pub fn new(
        ring: Ring,
        settings: CarouselSettings,
        viewport_width: f32,
        backend: B,
        now: Instant,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let geometry = Geometry::for_viewport(viewport_width, &settings.geometry);
        let mut carousel = Self {
            ring,
            settings,
            viewport_width,
            geometry,
            rotation: RotationState::default(),
            interaction: InteractionState::default(),
            idle: IdleState::default(),
            transitions_enabled: true,
            poses: Vec::new(),
            lightbox: Lightbox::new(backend),
        };
        carousel.reproject();
        carousel.bump_activity(now);
        info!(
            "carousel mounted with {} slots ({} ghosts), radius {:.0}",
            carousel.ring.len(),
            carousel.ring.len() - carousel.ring.original_count(),
            carousel.geometry.radius
        );
        Ok(carousel)
    }

    /// Pointer went down on the ring
    pub fn begin_drag(&mut self, x: f32, now: Instant) {
        if self.lightbox.is_open() {
            return;
        }
        self.interaction = InteractionState {
            dragging: true,
            start_x: x,
            last_x: x,
            start_target: self.rotation.target,
            moved_px: 0.0,
            suppress_click: false,
        };
        self.rotation.velocity = 0.0;
        self.transitions_enabled = false;
        self.bump_activity(now);
    }

    /// Pointer moved while down; the ring follows it without easing
    pub fn update_drag(&mut self, x: f32, now: Instant) {
        if !self.interaction.dragging {
            return;
        }
        let sensitivity = self.settings.motion.sensitivity;
        let step_px = x - self.interaction.last_x;

        self.interaction.moved_px += step_px.abs();
        self.rotation.target =
            self.interaction.start_target - (x - self.interaction.start_x) * sensitivity;
        self.rotation.current = self.rotation.target;
        self.rotation.velocity = -step_px * sensitivity;
        self.interaction.last_x = x;
        if self.interaction.moved_px >= self.settings.motion.tap_threshold_px {
            self.interaction.suppress_click = true;
        }

        self.reproject();
        self.bump_activity(now);
    }

    /// Pointer released; a tap snaps straight to the nearest slot
    pub fn end_drag(&mut self, now: Instant) {
        if !self.interaction.dragging {
            return;
        }
        self.interaction.dragging = false;
        self.transitions_enabled = true;
        if self.interaction.moved_px < self.settings.motion.tap_threshold_px {
            self.rotation.target = self.rotation.target.round();
        }
        self.bump_activity(now);
    }

    /// Pointer lost mid-drag (touch cancelled, window unfocused)
    pub fn cancel_drag(&mut self, now: Instant) {
        self.end_drag(now);
    }

    /// A card was clicked
    ///
    /// The first click on an off-centre card brings it to the front. A click
    /// on the centred card opens its video.
    pub fn activate_card(&mut self, slot: usize, now: Instant) -> Result<Activation, LightboxError> {
        if self.lightbox.is_open() {
            return Ok(Activation::Blocked);
        }
        if self.interaction.suppress_click {
            return Ok(Activation::Suppressed);
        }

        let total = self.ring.len();
        let slot = slot % total;
        let outcome = if self.centered_slot() != slot {
            let from = self.rotation.current.round();
            self.rotation.target = from + shortest_delta(from, slot as f32, total).round();
            Activation::Centering(slot)
        } else if let Some(video) = self.ring.get(slot).video.clone() {
            if let Err(e) = self.lightbox.open(video.clone()) {
                self.bump_activity(now);
                return Err(e);
            }
            self.idle.idle = false;
            info!("opened video {} from card {}", video, self.ring.get(slot).id);
            Activation::Opened(video)
        } else {
            Activation::AlreadyCentered
        };

        self.bump_activity(now);
        Ok(outcome)
    }

    /// A key went down
    pub fn on_key(&mut self, key: CarouselKey, now: Instant) -> KeyOutcome {
        if self.lightbox.is_open() {
            if key == CarouselKey::Escape {
                self.close_lightbox(now);
                return KeyOutcome::ClosedLightbox;
            }
            return KeyOutcome::Ignored;
        }

        let outcome = match key {
            CarouselKey::Right => {
                self.rotation.target += 1.0;
                KeyOutcome::Stepped(1)
            }
            CarouselKey::Left => {
                self.rotation.target -= 1.0;
                KeyOutcome::Stepped(-1)
            }
            CarouselKey::Escape | CarouselKey::Other => KeyOutcome::Noted,
        };
        self.bump_activity(now);
        outcome
    }

    /// Close button, backdrop or Escape
    pub fn close_lightbox(&mut self, now: Instant) {
        self.lightbox.close();
        self.bump_activity(now);
    }

    /// Start or pause the lightbox video; a refusal is logged and dropped
    pub fn toggle_playback(&mut self) {
        if let Err(e) = self.lightbox.toggle_playback() {
            warn!("lightbox playback toggle failed: {}", e);
        }
    }

    /// Advance one display frame
    ///
    /// Returns whether the ring moved. Nothing moves while a drag is active
    /// or the lightbox is open.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.poll_idle(now);
        if self.interaction.dragging || self.lightbox.is_open() {
            return false;
        }

        let m = &self.settings.motion;
        let total = self.ring.len();
        let rot = &mut self.rotation;

        if self.idle.idle {
            rot.target += m.idle_speed;
        } else {
            rot.target += rot.velocity;
            rot.velocity *= m.friction;

            let nearest = rot.target.round();
            let pull = shortest_delta(rot.target, nearest, total);
            rot.target += pull * m.snap;
            if rot.velocity.abs() < m.velocity_epsilon && pull.abs() < m.pull_epsilon {
                rot.target = nearest;
                rot.velocity = 0.0;
            }
        }

        let gap = shortest_delta(rot.current, rot.target, total);
        rot.current += gap * m.lerp;

        let at_rest = !self.idle.idle && rot.velocity == 0.0 && rot.target == rot.target.round();
        if at_rest && shortest_delta(rot.current, rot.target, total).abs() < m.settle_epsilon {
            rot.current = rot.target;
        }

        self.rebase();
        self.reproject();
        true
    }

    /// Viewport changed size
    pub fn on_resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        self.geometry = Geometry::for_viewport(viewport_width, &self.settings.geometry);
        debug!(
            "carousel resized to {:.0}px, radius {:.0}",
            viewport_width, self.geometry.radius
        );
        self.reproject();
    }

    /// Replace tuning at runtime
    pub fn set_settings(&mut self, settings: CarouselSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        self.on_resize(self.viewport_width);
        Ok(())
    }

    /// Release the video and stop reacting to the current gesture
    pub fn shutdown(&mut self) {
        self.interaction = InteractionState::default();
        self.idle = IdleState::default();
        self.lightbox.close();
        self.transitions_enabled = true;
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn current(&self) -> f32 {
        self.rotation.current
    }

    pub fn target(&self) -> f32 {
        self.rotation.target
    }

    pub fn velocity(&self) -> f32 {
        self.rotation.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.dragging
    }

    pub fn is_idle(&self) -> bool {
        self.idle.idle
    }

    /// Whether card poses should be eased on screen rather than applied directly
    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    /// Poses from the last projection, indexed by slot
    pub fn poses(&self) -> &[CardPose] {
        &self.poses
    }

    /// Slot nearest the front
    pub fn centered_slot(&self) -> usize {
        nearest_slot(self.rotation.current, self.ring.len())
    }

    /// Resting exactly on a slot with no momentum left
    pub fn is_settled(&self) -> bool {
        let r = &self.rotation;
        r.velocity == 0.0 && r.target == r.target.round() && r.current == r.target
    }

    pub fn lightbox(&self) -> &Lightbox<B> {
        &self.lightbox
    }

    pub fn lightbox_mut(&mut self) -> &mut Lightbox<B> {
        &mut self.lightbox
    }

    fn bump_activity(&mut self, now: Instant) {
        if self.idle.idle {
            debug!("idle drift stopped");
        }
        self.idle.idle = false;
        self.idle.deadline = Some(now + Duration::from_millis(self.settings.motion.idle_delay_ms));
    }

    fn poll_idle(&mut self, now: Instant) {
        let Some(deadline) = self.idle.deadline else {
            return;
        };
        if now < deadline {
            return;
        }
        self.idle.deadline = None;
        if !self.interaction.dragging && !self.lightbox.is_open() {
            debug!("idle drift started");
            self.idle.idle = true;
        }
    }

    fn rebase(&mut self) {
        if self.rotation.current.abs() < REBASE_LIMIT {
            return;
        }
        let total = self.ring.len() as f32;
        let turns = (self.rotation.current / total).trunc() * total;
        self.rotation.current -= turns;
        self.rotation.target -= turns;
    }

    fn reproject(&mut self) {
        let total = self.ring.len();
        let position = wrap_index(self.rotation.current, total);
        self.poses = self.geometry.project_ring(position, total);
    }
}
