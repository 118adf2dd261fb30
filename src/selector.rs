//! Scatter-plot selector glue: summaries in, picked episode out.
//!
//! Each episode summary becomes one 3D point placed by the goal-minus-
//! initial delta and colored by its error. Clicking resolves back to the
//! summary by identifier (never by array index - the list may have been
//! filtered or reordered since the points were built).

use eframe::egui::Color32;

use crate::entities::{EpisodeSummary, EpisodeTag, ErrorMetric};

// A few episodes have much larger errors than the rest. Coloring against
// the observed maximum would push most points into the dark end of the
// ramp and make plots from different dataset slices incomparable, so the
// color domain is clamped at fixed ceilings instead.
pub const MAX_ROTATION_ERROR: f64 = 0.4; // rad
pub const MAX_TRANSLATION_ERROR: f64 = 0.1; // m

/// One selectable marker on the scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub id: String,
    pub tag: EpisodeTag,
    /// Derived 3D feature: (droll, dpitch, dyaw) for the rotation metric,
    /// (dx, dy, dtheta) for the translation metric.
    pub feature: [f64; 3],
    pub error: f64,
}

/// Fixed upper bound of the color domain for a metric.
pub fn error_ceiling(metric: ErrorMetric) -> f64 {
    match metric {
        ErrorMetric::Rotation => MAX_ROTATION_ERROR,
        ErrorMetric::Translation => MAX_TRANSLATION_ERROR,
    }
}

/// Axis labels matching the feature layout of [`build_points`].
pub fn axis_labels(metric: ErrorMetric) -> [&'static str; 3] {
    match metric {
        ErrorMetric::Rotation => ["Δroll", "Δpitch", "Δyaw"],
        ErrorMetric::Translation => ["Δx", "Δy", "Δθ"],
    }
}

/// Project summaries into scatter points. An empty input yields an empty
/// plot, which the widget renders as nothing.
pub fn build_points(summaries: &[EpisodeSummary], metric: ErrorMetric) -> Vec<ScatterPoint> {
    summaries
        .iter()
        .map(|summary| {
            let feature = match metric {
                ErrorMetric::Rotation => {
                    let (dr, dp, dy) = summary.goal.delta_rpy(&summary.initial_pose);
                    [dr, dp, dy]
                }
                ErrorMetric::Translation => {
                    let dpos = summary.goal.delta_position(&summary.initial_pose);
                    [dpos.x, dpos.y, summary.goal.delta_yaw(&summary.initial_pose)]
                }
            };
            let error = match metric {
                ErrorMetric::Rotation => summary.rotation_error,
                ErrorMetric::Translation => summary.translation_error,
            };
            ScatterPoint {
                id: summary.episode_id.clone(),
                tag: EpisodeTag::parse(&summary.episode_id),
                feature,
                error,
            }
        })
        .collect()
}

/// Look a clicked point back up by identifier. `None` on a miss (stale
/// plot data); the caller drops the selection silently.
pub fn resolve<'a>(summaries: &'a [EpisodeSummary], id: &str) -> Option<&'a EpisodeSummary> {
    summaries.iter().find(|s| s.episode_id == id)
}

/// Color for an error value: clamped to the metric ceiling, then mapped
/// through the Viridis ramp. Errors past the ceiling saturate at the
/// ceiling color rather than extrapolating.
pub fn error_color(error: f64, metric: ErrorMetric) -> Color32 {
    let ceiling = error_ceiling(metric);
    let t = (error / ceiling).clamp(0.0, 1.0);
    viridis(t as f32)
}

// Viridis anchor colors at 1/8 steps.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (253, 231, 37),
];

/// Sample the Viridis ramp at `t` in [0, 1] (clamped).
pub fn viridis(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f32;
    let i = (t.floor() as usize).min(VIRIDIS.len() - 2);
    let f = t - i as f32;
    let (r0, g0, b0) = VIRIDIS[i];
    let (r1, g1, b1) = VIRIDIS[i + 1];
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
    Color32::from_rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
