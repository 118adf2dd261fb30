//! Stand-in scene panel.
//!
//! The real robot renderer is an external collaborator; this panel is the
//! in-crate consumer of the emitted samples: a top-down sketch of the
//! manipulated object against its goal, plus a joint readout. It keeps the
//! replay observable without a mesh pipeline.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::entities::{Pose, SceneSample};

const BACKGROUND: Color32 = Color32::from_rgb(18, 18, 22);
const OBJECT_COLOR: Color32 = Color32::from_rgb(84, 139, 244);
const GOAL_COLOR: Color32 = Color32::from_rgb(90, 200, 120);
/// Half-width of the visible workspace, meters.
const WORKSPACE_HALF: f64 = 0.5;

pub struct SceneView;

impl SceneView {
    /// Draw the current sample against the goal. With no sample yet (e.g.
    /// while the first episode loads) only the backdrop is drawn.
    pub fn show(ui: &mut Ui, goal: Option<&Pose>, sample: Option<&SceneSample>) {
        let width = ui.available_width().min(420.0);
        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, width * 0.75), Sense::hover());
        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, BACKGROUND);

        let sketch = Rect::from_min_max(
            rect.min + Vec2::splat(8.0),
            Pos2::new(rect.max.x - 8.0, rect.max.y - 36.0),
        );

        if let Some(goal) = goal {
            Self::paint_marker(&painter, sketch, goal, GOAL_COLOR, false);
        }
        if let Some(sample) = sample {
            Self::paint_marker(&painter, sketch, &sample.object, OBJECT_COLOR, true);
            Self::paint_joints(&painter, rect, &sample.joints);
            painter.text(
                rect.right_top() + Vec2::new(-8.0, 6.0),
                Align2::RIGHT_TOP,
                format!("t = {:.2}s", sample.time_from_start),
                FontId::monospace(11.0),
                Color32::from_gray(200),
            );
        }
    }

    /// Top-down marker: circle at XY with a heading tick along yaw.
    fn paint_marker(painter: &egui::Painter, rect: Rect, pose: &Pose, color: Color32, filled: bool) {
        let to_screen = |x: f64, y: f64| -> Pos2 {
            let u = ((x + WORKSPACE_HALF) / (2.0 * WORKSPACE_HALF)).clamp(0.0, 1.0) as f32;
            let v = ((y + WORKSPACE_HALF) / (2.0 * WORKSPACE_HALF)).clamp(0.0, 1.0) as f32;
            Pos2::new(
                rect.min.x + u * rect.width(),
                rect.max.y - v * rect.height(),
            )
        };

        let center = to_screen(pose.position.x, pose.position.y);
        let radius = rect.width() * 0.035;
        if filled {
            painter.circle_filled(center, radius, color);
        } else {
            painter.circle_stroke(center, radius, Stroke::new(2.0, color));
        }

        let yaw = pose.rotation.yaw() as f32;
        let tip = center + Vec2::new(yaw.cos(), -yaw.sin()) * radius * 1.8;
        painter.line_segment([center, tip], Stroke::new(2.0, color));
    }

    /// Joint positions as a row of bars, each normalized by +/-pi.
    fn paint_joints(painter: &egui::Painter, rect: Rect, joints: &[f64]) {
        if joints.is_empty() {
            return;
        }
        let strip = Rect::from_min_max(
            Pos2::new(rect.min.x + 8.0, rect.max.y - 30.0),
            rect.max - Vec2::splat(8.0),
        );
        let slot = strip.width() / joints.len() as f32;
        let mid = strip.center().y;
        for (i, angle) in joints.iter().enumerate() {
            let x = strip.min.x + i as f32 * slot;
            let extent = (angle / std::f64::consts::PI).clamp(-1.0, 1.0) as f32;
            let bar = Rect::from_min_max(
                Pos2::new(x + 1.0, mid.min(mid - extent * strip.height() * 0.5)),
                Pos2::new(x + slot - 1.0, mid.max(mid - extent * strip.height() * 0.5)),
            );
            painter.rect_filled(bar, 1.0, Color32::from_gray(150));
        }
        painter.line_segment(
            [Pos2::new(strip.min.x, mid), Pos2::new(strip.max.x, mid)],
            Stroke::new(1.0, Color32::from_gray(80)),
        );
    }
}
