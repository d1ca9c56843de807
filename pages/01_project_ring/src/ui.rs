//! UI module - egui tuning panel and lightbox controls

use std::time::Duration;

use nannou_egui::egui;
use shared::{CarouselSettings, GeometryProfile, Playback};

/// Result of tuning panel interactions
#[derive(Default)]
pub struct TuningResult {
    /// Any slider moved
    pub changed: bool,
    /// Save clicked
    pub save: bool,
    /// Reset to defaults clicked
    pub reset: bool,
}

/// Result of lightbox control interactions
#[derive(Default)]
pub struct LightboxControlsResult {
    pub toggle_playback: bool,
    pub close: bool,
}

/// Live readout shown under the sliders
pub struct RingStatus {
    pub current: f32,
    pub target: f32,
    pub velocity: f32,
    pub centered_slot: usize,
    pub idle: bool,
    pub radius: f32,
}

/// Draw the tuning panel (right side)
pub fn draw_tuning_panel(
    ctx: &egui::Context,
    settings: &mut CarouselSettings,
    status: &RingStatus,
) -> TuningResult {
    let mut result = TuningResult::default();

    egui::SidePanel::right("tuning_panel")
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Ring Feel");
            ui.add_space(6.0);

            let m = &mut settings.motion;
            let mut changed = false;
            changed |= slider(ui, "Sensitivity", &mut m.sensitivity, 0.0005..=0.02);
            changed |= slider(ui, "Easing (lerp)", &mut m.lerp, 0.01..=1.0);
            changed |= slider(ui, "Friction", &mut m.friction, 0.5..=0.995);
            changed |= slider(ui, "Snap", &mut m.snap, 0.01..=1.0);
            changed |= slider(ui, "Tap threshold (px)", &mut m.tap_threshold_px, 0.0..=40.0);
            changed |= slider(ui, "Idle speed", &mut m.idle_speed, 0.0..=0.03);

            let mut delay_secs = m.idle_delay_ms as f32 / 1000.0;
            if ui
                .add(egui::Slider::new(&mut delay_secs, 0.5..=20.0).text("Idle delay (s)"))
                .changed()
            {
                m.idle_delay_ms = (delay_secs * 1000.0).round() as u64;
                changed = true;
            }

            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Desktop geometry").strong());
            changed |= profile_sliders(ui, &mut settings.geometry.desktop);

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Mobile geometry").strong());
            changed |= slider(
                ui,
                "Breakpoint (px)",
                &mut settings.geometry.mobile_breakpoint_px,
                320.0..=1200.0,
            );
            changed |= profile_sliders(ui, &mut settings.geometry.mobile);
            result.changed = changed;

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    result.save = true;
                }
                if ui
                    .button("Reset")
                    .on_hover_text("Restore the shipped feel")
                    .clicked()
                {
                    result.reset = true;
                }
            });

            ui.add_space(10.0);
            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "current {:.3}  target {:.3}\nvelocity {:.5}\ncentered slot {}  radius {:.0}{}",
                    status.current,
                    status.target,
                    status.velocity,
                    status.centered_slot,
                    status.radius,
                    if status.idle { "\nidle drift" } else { "" },
                ))
                .monospace()
                .size(11.0)
                .color(egui::Color32::from_rgb(150, 150, 160)),
            );
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new("← → step  ·  drag to spin  ·  H hides this panel")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(120, 120, 130)),
            );
        });

    result
}

fn slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
) -> bool {
    ui.add(egui::Slider::new(value, range).text(label)).changed()
}

fn profile_sliders(ui: &mut egui::Ui, profile: &mut GeometryProfile) -> bool {
    let mut changed = false;
    changed |= slider(ui, "Radius min", &mut profile.radius_min, 100.0..=900.0);
    changed |= slider(ui, "Radius max", &mut profile.radius_max, 100.0..=900.0);
    changed |= slider(ui, "Radius / width", &mut profile.radius_fraction, 0.1..=1.0);
    changed |= slider(ui, "Spread", &mut profile.x_factor, 0.1..=1.2);
    changed |= slider(ui, "Tilt", &mut profile.rot_factor, 0.0..=1.0);
    changed |= slider(ui, "Depth scale", &mut profile.scale_depth, 0.0..=0.9);
    changed
}

/// Draw Play/Pause and Close under the lightbox panel
pub fn draw_lightbox_controls(
    ctx: &egui::Context,
    playback: Playback,
    position: Duration,
    anchor_offset_y: f32,
) -> LightboxControlsResult {
    let mut result = LightboxControlsResult::default();

    egui::Area::new("lightbox_controls")
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -anchor_offset_y))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = match playback {
                    Playback::Paused => "▶ Play",
                    Playback::Playing => "❚❚ Pause",
                };
                if ui.button(label).clicked() {
                    result.toggle_playback = true;
                }
                ui.label(format!("{:.1}s", position.as_secs_f32()));
                if ui.button("✕ Close").on_hover_text("Esc").clicked() {
                    result.close = true;
                }
            });
        });

    result
}
