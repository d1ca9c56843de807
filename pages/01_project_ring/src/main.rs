//! Project Ring
//!
//! The projects page: a 360° ring of cards that follows the pointer, glides
//! and snaps to the nearest card after release, drifts on its own when left
//! alone, and opens a card's video in a lightbox on a second click.

mod drawing;
mod playback;
mod ui;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{error, info, warn};
use nannou::prelude::*;
use nannou::winit::event::{TouchPhase as WinitTouchPhase, WindowEvent};
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::{Activation, Carousel, CarouselKey, CarouselSettings, DeckManifest, Ring};

use crate::drawing::{colors, draw_lightbox, draw_ring, lightbox_rect, DisplayedRing};
use crate::playback::PreviewBackend;
use crate::ui::{draw_lightbox_controls, draw_tuning_panel, RingStatus};

const PAGE_NAME: &str = "project_ring";

/// Deck used when no manifest is given or it cannot be read
const BUILTIN_DECK: &str = r#"
ghosts = 2

[[cards]]
id = "tenebrous"
title = "TENEBROUS"
video = "https://liveoffsilence.com/videos/tenebrous.mp4"

[[cards]]
id = "ghost"
title = "GHOST"
video = "https://liveoffsilence.com/videos/ghost.mp4"

[[cards]]
id = "silence"
title = "LIVE OFF SILENCE"
video = "https://liveoffsilence.com/videos/silence.mp4"

[[cards]]
id = "manifesto"
title = "THE MANIFESTO"

[[cards]]
id = "store"
title = "STORE"
"#;

/// Command line options
#[derive(Debug, Parser)]
#[command(name = "project_ring", about = "360° project carousel")]
struct Args {
    /// Deck manifest (TOML) describing the cards
    #[arg(long)]
    deck: Option<PathBuf>,
    /// Discard saved tuning and start from the defaults
    #[arg(long)]
    reset_settings: bool,
}

/// Persisted configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    settings: CarouselSettings,
    show_tuning: bool,
}

/// Press that may turn into a click
#[derive(Debug, Clone, Copy)]
struct PendingPress {
    slot: Option<usize>,
}

/// Application state
pub struct Model {
    carousel: Carousel<PreviewBackend>,
    /// Drawn cards, eased toward the carousel's poses
    displayed: DisplayedRing,
    /// Settings being edited in the tuning panel
    draft: CarouselSettings,
    show_tuning: bool,
    pending_press: Option<PendingPress>,
    hovered_slot: Option<usize>,
    last_frame: Instant,
    egui: Egui,
}

impl Model {
    fn ring_center(window_rect: Rect) -> Point2 {
        pt2(window_rect.x(), window_rect.y() + 20.0)
    }

    fn pointer_down(&mut self, window_rect: Rect, pos: Point2) {
        let now = Instant::now();
        if self.carousel.lightbox().is_open() {
            // backdrop click
            if !lightbox_rect(window_rect).contains(pos) {
                self.carousel.close_lightbox(now);
            }
            return;
        }

        let center = Self::ring_center(window_rect);
        let on_ring = self
            .displayed
            .bounds(center)
            .map_or(false, |bounds| bounds.contains(pos));
        if !on_ring {
            return;
        }
        self.pending_press = Some(PendingPress {
            slot: self.displayed.hit_test(center, pos),
        });
        self.carousel.begin_drag(pos.x, now);
    }

    fn pointer_moved(&mut self, window_rect: Rect, pos: Point2) {
        if self.carousel.is_dragging() {
            self.carousel.update_drag(pos.x, Instant::now());
        }
        self.hovered_slot = if self.carousel.lightbox().is_open() {
            None
        } else {
            self.displayed.hit_test(Self::ring_center(window_rect), pos)
        };
    }

    fn pointer_up(&mut self, window_rect: Rect, pos: Point2) {
        let now = Instant::now();
        self.carousel.end_drag(now);

        let Some(press) = self.pending_press.take() else {
            return;
        };
        let released_on = self.displayed.hit_test(Self::ring_center(window_rect), pos);
        if let (Some(pressed), Some(released)) = (press.slot, released_on) {
            if pressed == released {
                self.activate(released, now);
            }
        }
    }

    fn pointer_cancelled(&mut self) {
        self.pending_press = None;
        self.carousel.cancel_drag(Instant::now());
    }

    fn activate(&mut self, slot: usize, now: Instant) {
        match self.carousel.activate_card(slot, now) {
            Ok(Activation::Opened(video)) => info!("playing {} in lightbox", video),
            Ok(_) => {}
            Err(e) => warn!("could not open video for slot {}: {}", slot, e),
        }
    }

    fn apply_draft(&mut self) {
        if let Err(e) = self.carousel.set_settings(self.draft.clone()) {
            warn!("rejected tuning: {}", e);
            self.draft = self.carousel.settings().clone();
        }
    }

    fn status(&self) -> RingStatus {
        RingStatus {
            current: self.carousel.current(),
            target: self.carousel.target(),
            velocity: self.carousel.velocity(),
            centered_slot: self.carousel.centered_slot(),
            idle: self.carousel.is_idle(),
            radius: self.carousel.geometry().radius,
        }
    }
}

fn save_config(model: &Model) {
    let config = Config {
        settings: model.carousel.settings().clone(),
        show_tuning: model.show_tuning,
    };
    if let Err(e) = shared::save_config(PAGE_NAME, &config) {
        error!("Failed to save config: {}", e);
    }
}

fn load_config(reset: bool) -> Config {
    if reset {
        if let Err(e) = shared::delete_config(PAGE_NAME) {
            warn!("could not delete saved config: {}", e);
        }
        return Config::default();
    }
    let config: Config = match shared::load_config(PAGE_NAME) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!("ignoring unreadable config: {}", e);
            Config::default()
        }
    };
    match config.settings.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("saved tuning is invalid ({}), using defaults", e);
            Config {
                settings: CarouselSettings::default(),
                ..config
            }
        }
    }
}

fn load_ring(deck: Option<&PathBuf>) -> Ring {
    if let Some(path) = deck {
        match DeckManifest::load(path).and_then(DeckManifest::into_ring) {
            Ok(ring) => return ring,
            Err(e) => warn!("deck {} unusable ({}), using built-in deck", path.display(), e),
        }
    }
    DeckManifest::from_toml_str(BUILTIN_DECK)
        .and_then(DeckManifest::into_ring)
        .expect("built-in deck is valid")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    let args = Args::parse();

    // Escape belongs to the lightbox
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("Projects")
        .size(1280, 800)
        .min_size(360, 560)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config = load_config(args.reset_settings);
    let ring = load_ring(args.deck.as_ref());
    let now = Instant::now();

    let carousel = Carousel::new(
        ring,
        config.settings.clone(),
        app.window_rect().w(),
        PreviewBackend::new(),
        now,
    )
    .expect("settings were validated on load");
    let displayed = DisplayedRing::new(carousel.poses());

    Model {
        carousel,
        displayed,
        draft: config.settings,
        show_tuning: config.show_tuning,
        pending_press: None,
        hovered_slot: None,
        last_frame: now,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    let now = Instant::now();
    let dt = now.duration_since(model.last_frame);
    model.last_frame = now;

    model.carousel.tick(now);
    model.displayed.follow(
        model.carousel.poses(),
        dt,
        model.carousel.transitions_enabled(),
    );

    let status = model.status();
    let lightbox_state = model
        .carousel
        .lightbox()
        .playback()
        .zip(model.carousel.lightbox().position());

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let tuning = if model.show_tuning {
        Some(draw_tuning_panel(&ctx, &mut model.draft, &status))
    } else {
        None
    };
    let controls = lightbox_state.map(|(playback, position)| {
        draw_lightbox_controls(&ctx, playback, position, 40.0)
    });

    drop(ctx);

    if let Some(tuning) = tuning {
        if tuning.reset {
            model.draft = CarouselSettings::default();
            model.apply_draft();
            save_config(model);
        } else if tuning.changed {
            model.apply_draft();
        }
        if tuning.save {
            save_config(model);
        }
    }
    if let Some(controls) = controls {
        if controls.toggle_playback {
            model.carousel.toggle_playback();
        }
        if controls.close {
            model.carousel.close_lightbox(Instant::now());
        }
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(colors::BACKGROUND);

    draw_ring(
        &draw,
        Model::ring_center(window_rect),
        model.carousel.ring(),
        &model.displayed,
        model.carousel.poses(),
        model.hovered_slot,
    );

    draw.text("PROJECTS")
        .x_y(window_rect.x(), window_rect.top() - 30.0)
        .color(colors::TEXT_PRIMARY)
        .font_size(18)
        .w(300.0);

    let lightbox = model.carousel.lightbox();
    if let (Some(video), Some(playback)) = (lightbox.video(), lightbox.playback()) {
        let title = &model.carousel.ring().get(model.carousel.centered_slot()).title;
        draw_lightbox(
            &draw,
            window_rect,
            title,
            video.as_str(),
            playback,
            lightbox.position().unwrap_or_default(),
        );
    }

    draw.to_frame(app, &frame).unwrap();

    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let now = Instant::now();
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::H => {
            model.show_tuning = !model.show_tuning;
            save_config(model);
        }
        Key::Space if model.carousel.lightbox().is_open() => {
            model.carousel.toggle_playback();
        }
        _ => {}
    }

    let key = match key {
        Key::Left => CarouselKey::Left,
        Key::Right => CarouselKey::Right,
        Key::Escape => CarouselKey::Escape,
        _ => CarouselKey::Other,
    };
    model.carousel.on_key(key, now);
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.egui.ctx().is_pointer_over_area() {
        return;
    }
    model.pointer_down(app.window_rect(), app.mouse.position());
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.pointer_up(app.window_rect(), app.mouse.position());
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    model.pointer_moved(app.window_rect(), pos);
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.carousel.on_resize(size.x);
}

fn raw_window_event(app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);

    match event {
        WindowEvent::Focused(false) => model.pointer_cancelled(),
        // Handle touch events (map to mouse-like behavior)
        WindowEvent::Touch(touch) => {
            let window_rect = app.window_rect();
            let pos = pt2(
                touch.location.x as f32 - window_rect.w() / 2.0,
                window_rect.h() / 2.0 - touch.location.y as f32,
            );
            match touch.phase {
                WinitTouchPhase::Started => model.pointer_down(window_rect, pos),
                WinitTouchPhase::Moved => model.pointer_moved(window_rect, pos),
                WinitTouchPhase::Ended => model.pointer_up(window_rect, pos),
                WinitTouchPhase::Cancelled => model.pointer_cancelled(),
            }
        }
        _ => {}
    }
}

fn exit(_app: &App, mut model: Model) {
    model.carousel.shutdown();
    save_config(&model);
    info!("project ring closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_parses() {
        let ring = load_ring(None);
        assert_eq!(ring.original_count(), 5);
        assert_eq!(ring.len(), 7);
    }

    #[test]
    fn test_missing_deck_falls_back() {
        let ring = load_ring(Some(&PathBuf::from("no/such/deck.toml")));
        assert_eq!(ring.get(0).id, "tenebrous");
    }

    #[test]
    fn test_config_defaults_when_missing_fields() {
        let config: Config = toml::from_str("show_tuning = true").unwrap();
        assert!(config.show_tuning);
        assert_eq!(config.settings, CarouselSettings::default());
    }

    #[test]
    fn test_centered_builtin_video_card_opens_lightbox() {
        let now = Instant::now();
        let mut carousel = Carousel::new(
            load_ring(None),
            CarouselSettings::default(),
            1280.0,
            PreviewBackend::new(),
            now,
        )
        .unwrap();

        for slot in 0..3 {
            if slot != 0 {
                assert_eq!(
                    carousel.activate_card(slot, now).unwrap(),
                    Activation::Centering(slot)
                );
                for _ in 0..600 {
                    carousel.tick(now);
                }
            }
            assert!(matches!(
                carousel.activate_card(slot, now).unwrap(),
                Activation::Opened(_)
            ));
            assert!(carousel.lightbox().is_open());
            carousel.close_lightbox(now);
        }
    }
}
