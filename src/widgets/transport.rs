//! Playback transport: play/pause button plus a painted scrubber track.
//!
//! One widget serves both players; the discrete player maps the scrub
//! ratio to a frame index, the video controller maps it to seconds.
//! Scrubbing is immediate - no animation toward the target.

use eframe::egui::{self, Color32, Pos2, Rect, Sense, Ui, Vec2};

use crate::core::playback::PlaybackState;

// Track colors
const COLOR_ELAPSED: Color32 = Color32::from_rgb(84, 139, 244);
const COLOR_REMAINING: Color32 = Color32::from_rgb(192, 192, 192);
const COLOR_DISABLED: Color32 = Color32::from_rgb(70, 70, 75);
const TRACK_HEIGHT: f32 = 6.0;
const THUMB_RADIUS: f32 = 7.0;

/// User interaction with the transport for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportAction {
    /// Play/pause button pressed.
    Toggle,
    /// Scrubber moved; position as a ratio in [0, 1] of the timeline.
    Scrub(f32),
}

fn button_glyph(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "⏸",
        PlaybackState::Completed => "↻",
        _ => "▶",
    }
}

/// Draw the transport row. Returns the user's action, if any. With a
/// disabled player the controls are drawn greyed out and ignore input.
pub fn transport_bar(ui: &mut Ui, state: PlaybackState, progress: f32) -> Option<TransportAction> {
    let enabled = state != PlaybackState::Disabled;
    let mut action = None;

    ui.horizontal(|ui| {
        let button = egui::Button::new(button_glyph(state)).min_size(Vec2::splat(26.0));
        if ui.add_enabled(enabled, button).clicked() {
            action = Some(TransportAction::Toggle);
        }

        let desired = Vec2::new(ui.available_width(), THUMB_RADIUS * 2.0 + 4.0);
        let sense = if enabled {
            Sense::click_and_drag()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(desired, sense);

        if ui.is_rect_visible(rect) {
            paint_track(ui, rect, progress.clamp(0.0, 1.0), enabled);
        }

        if enabled && (response.dragged() || response.clicked()) {
            if let Some(pos) = response.interact_pointer_pos() {
                let ratio = ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0);
                action = Some(TransportAction::Scrub(ratio));
            }
        }
    });

    action
}

fn paint_track(ui: &Ui, rect: Rect, progress: f32, enabled: bool) {
    let painter = ui.painter();
    let center_y = rect.center().y;
    let track = Rect::from_min_max(
        Pos2::new(rect.min.x + THUMB_RADIUS, center_y - TRACK_HEIGHT / 2.0),
        Pos2::new(rect.max.x - THUMB_RADIUS, center_y + TRACK_HEIGHT / 2.0),
    );

    if !enabled {
        painter.rect_filled(track, TRACK_HEIGHT / 2.0, COLOR_DISABLED);
        return;
    }

    let thumb_x = track.min.x + progress * track.width();
    let elapsed = Rect::from_min_max(track.min, Pos2::new(thumb_x, track.max.y));
    let remaining = Rect::from_min_max(Pos2::new(thumb_x, track.min.y), track.max);

    painter.rect_filled(remaining, TRACK_HEIGHT / 2.0, COLOR_REMAINING);
    painter.rect_filled(elapsed, TRACK_HEIGHT / 2.0, COLOR_ELAPSED);
    painter.circle_filled(Pos2::new(thumb_x, center_y), THUMB_RADIUS, Color32::WHITE);
    painter.circle_stroke(
        Pos2::new(thumb_x, center_y),
        THUMB_RADIUS,
        (1.0, COLOR_ELAPSED),
    );
}

/// Scrub ratio -> frame index for a sequence of `len` frames.
pub fn ratio_to_index(ratio: f32, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len - 1;
    ((ratio * last as f32).round() as usize).min(last)
}

/// Frame index -> scrub ratio.
pub fn index_to_ratio(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 0.0;
    }
    index as f32 / (len - 1) as f32
}
