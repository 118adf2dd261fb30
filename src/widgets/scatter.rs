//! Projected 3D scatter of episode goals.
//!
//! Points are placed by the selector's derived feature, colored by the
//! clamped error ramp, and drawn on the egui painter with a simple
//! orbiting orthographic projection (drag to rotate). Clicking the plot
//! picks the nearest marker within a small radius and reports its episode
//! identifier; the caller resolves it against the live summary list.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use glam::{Mat3, Vec3};

use crate::entities::ErrorMetric;
use crate::selector::{self, ScatterPoint};

const MARKER_RADIUS: f32 = 4.5;
const PICK_RADIUS: f32 = 9.0;
const BACKGROUND: Color32 = Color32::from_rgb(240, 240, 240);
const AXIS_COLOR: Color32 = Color32::from_rgb(120, 120, 120);

/// Interactive scatter view. Owns only the camera orbit and hover state;
/// the points are rebuilt by the caller whenever summaries or the error
/// metric change.
pub struct ScatterView {
    yaw: f32,
    pitch: f32,
}

impl Default for ScatterView {
    fn default() -> Self {
        // Matches the original's initial three-quarter camera.
        Self {
            yaw: -0.7,
            pitch: 0.5,
        }
    }
}

struct Projected {
    screen: Pos2,
    depth: f32,
    index: usize,
}

impl ScatterView {
    /// Draw the plot; returns the clicked episode id, if any.
    ///
    /// An empty or not-yet-loaded point list renders nothing.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        points: &[ScatterPoint],
        metric: ErrorMetric,
    ) -> Option<String> {
        if points.is_empty() {
            return None;
        }

        let side = ui.available_width().min(420.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(side), Sense::click_and_drag());
        if !ui.is_rect_visible(rect) {
            return None;
        }

        if response.dragged() {
            let delta = response.drag_delta();
            self.yaw += delta.x * 0.01;
            self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.4, 1.4);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, BACKGROUND);

        // Normalize each feature axis to [-1, 1] so differently scaled
        // deltas (meters vs radians) share one cube.
        let mut scale = [0.0f64; 3];
        for p in points {
            for (axis, v) in p.feature.iter().enumerate() {
                scale[axis] = scale[axis].max(v.abs());
            }
        }
        for s in &mut scale {
            if *s < 1e-9 {
                *s = 1.0;
            }
        }

        let rotation = Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_z(self.yaw);
        let center = rect.center();
        let extent = rect.width() * 0.33;
        let project = |v: Vec3| -> (Pos2, f32) {
            let r = rotation * v;
            (
                Pos2::new(center.x + r.x * extent, center.y - r.z * extent),
                r.y,
            )
        };

        self.paint_axes(&painter, metric, project);

        let mut projected: Vec<Projected> = points
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let v = Vec3::new(
                    (p.feature[0] / scale[0]) as f32,
                    (p.feature[1] / scale[1]) as f32,
                    (p.feature[2] / scale[2]) as f32,
                );
                let (screen, depth) = project(v);
                Projected {
                    screen,
                    depth,
                    index,
                }
            })
            .collect();

        // Back to front so near markers overdraw far ones.
        projected.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for p in &projected {
            let color = selector::error_color(points[p.index].error, metric);
            painter.circle_filled(p.screen, MARKER_RADIUS, color);
            painter.circle_stroke(p.screen, MARKER_RADIUS, Stroke::new(0.5, Color32::from_gray(60)));
        }

        self.paint_colorbar(&painter, rect, metric);

        let pointer = response.hover_pos().or(response.interact_pointer_pos());
        let nearest = pointer.and_then(|pos| {
            projected
                .iter()
                .map(|p| (p.index, p.screen.distance(pos)))
                .filter(|(_, d)| *d <= PICK_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _)| index)
        });

        if let Some(index) = nearest {
            let point = &points[index];
            let label = if point.tag.is_blank() {
                format!("error {:.4}", point.error)
            } else {
                format!("{}  error {:.4}", point.tag.label(), point.error)
            };
            painter.text(
                rect.left_bottom() + Vec2::new(6.0, -6.0),
                Align2::LEFT_BOTTOM,
                label,
                FontId::proportional(12.0),
                Color32::from_gray(40),
            );
        }

        // A drag that ends on a marker is a rotation, not a pick.
        if response.clicked() && response.drag_delta() == Vec2::ZERO {
            if let Some(index) = nearest {
                return Some(points[index].id.clone());
            }
        }
        None
    }

    fn paint_axes(
        &self,
        painter: &egui::Painter,
        metric: ErrorMetric,
        project: impl Fn(Vec3) -> (Pos2, f32),
    ) {
        let labels = selector::axis_labels(metric);
        let axes = [Vec3::X, Vec3::Y, Vec3::Z];
        for (axis, label) in axes.iter().zip(labels) {
            let (origin, _) = project(-*axis);
            let (tip, _) = project(*axis);
            painter.line_segment([origin, tip], Stroke::new(1.0, AXIS_COLOR));
            painter.text(
                tip,
                Align2::CENTER_BOTTOM,
                label,
                FontId::proportional(11.0),
                AXIS_COLOR,
            );
        }
    }

    fn paint_colorbar(&self, painter: &egui::Painter, rect: Rect, metric: ErrorMetric) {
        let bar = Rect::from_min_max(
            Pos2::new(rect.max.x - 16.0, rect.min.y + rect.height() * 0.1),
            Pos2::new(rect.max.x - 8.0, rect.max.y - rect.height() * 0.1),
        );
        let steps = 48;
        let step_h = bar.height() / steps as f32;
        for i in 0..steps {
            // Top of the bar is the ceiling.
            let t = 1.0 - i as f32 / (steps - 1) as f32;
            let seg = Rect::from_min_size(
                Pos2::new(bar.min.x, bar.min.y + i as f32 * step_h),
                Vec2::new(bar.width(), step_h + 0.5),
            );
            painter.rect_filled(seg, 0.0, selector::viridis(t));
        }
        painter.text(
            bar.center_top() - Vec2::new(0.0, 2.0),
            Align2::CENTER_BOTTOM,
            format!("{:.2}", selector::error_ceiling(metric)),
            FontId::proportional(10.0),
            Color32::from_gray(60),
        );
        painter.text(
            bar.center_bottom() + Vec2::new(0.0, 2.0),
            Align2::CENTER_TOP,
            "0",
            FontId::proportional(10.0),
            Color32::from_gray(60),
        );
    }
}
