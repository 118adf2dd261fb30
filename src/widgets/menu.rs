//! Top menu: mutually-exclusive dataset and display choices.

use eframe::egui::Ui;

use crate::entities::{ControlMode, DataOrigin, ErrorMetric};

/// In-memory UI selections, reset on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuSelection {
    pub metric: ErrorMetric,
    pub mode: ControlMode,
    pub origin: DataOrigin,
    /// Show the recorded hardware video instead of the scene view.
    /// Only effective for hardware data.
    pub show_video: bool,
}

impl MenuSelection {
    pub fn filter(&self) -> crate::entities::Filter {
        crate::entities::Filter::new(self.mode, self.origin)
    }

    /// Whether the video panel (vs the scene panel) should be displayed.
    pub fn video_visible(&self) -> bool {
        self.show_video && self.origin == DataOrigin::Hardware
    }
}

/// What changed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuResponse {
    /// Control mode or data origin changed: the summary set must be
    /// refetched.
    pub filter_changed: bool,
    /// Error metric changed: scatter points must be rebuilt.
    pub metric_changed: bool,
}

/// Draw the menu row, mutating `selection` in place.
pub fn menu_bar(ui: &mut Ui, selection: &mut MenuSelection) -> MenuResponse {
    let before = *selection;

    ui.horizontal_wrapped(|ui| {
        ui.label("Error:");
        ui.selectable_value(&mut selection.metric, ErrorMetric::Rotation, "Rotation");
        ui.selectable_value(&mut selection.metric, ErrorMetric::Translation, "Position");
        ui.separator();

        ui.label("Control:");
        ui.selectable_value(&mut selection.mode, ControlMode::OpenLoop, "Open loop");
        ui.selectable_value(&mut selection.mode, ControlMode::ClosedLoop, "Closed loop");
        ui.separator();

        ui.label("Data:");
        ui.selectable_value(&mut selection.origin, DataOrigin::Simulation, "Simulation");
        ui.selectable_value(&mut selection.origin, DataOrigin::Hardware, "Hardware");
        ui.separator();

        // Videos exist only for hardware recordings.
        ui.add_enabled_ui(selection.origin == DataOrigin::Hardware, |ui| {
            ui.checkbox(&mut selection.show_video, "Video");
        });
    });

    MenuResponse {
        filter_changed: selection.mode != before.mode || selection.origin != before.origin,
        metric_changed: selection.metric != before.metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_visible_requires_hardware() {
        let mut sel = MenuSelection {
            show_video: true,
            ..Default::default()
        };
        assert_eq!(sel.origin, DataOrigin::Simulation);
        assert!(!sel.video_visible());
        sel.origin = DataOrigin::Hardware;
        assert!(sel.video_visible());
        sel.show_video = false;
        assert!(!sel.video_visible());
    }

    #[test]
    fn test_filter_mapping() {
        let sel = MenuSelection {
            mode: ControlMode::ClosedLoop,
            origin: DataOrigin::Hardware,
            ..Default::default()
        };
        assert_eq!(sel.filter().rel_dir(), "hardware/closed_loop");
    }
}
