//! Control Panel Widget
//! Left side panel with the upload controls and mapping settings.

use crate::config::DashboardConfig;
use crate::data::SourceFormat;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// User settings applied to the next upload
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub file_path: Option<PathBuf>,
    pub format: SourceFormat,
    pub identifier_columns: usize,
}

impl UserSettings {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            file_path: None,
            format: config.default_format,
            identifier_columns: config.identifier_columns,
        }
    }
}

/// Left side control panel with file selection and processing controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
}

impl ControlPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            settings: UserSettings::from_config(config),
            status: "Ready".to_string(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Questionnaire Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Likert scale 1-5").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Format Section =====
        ui.label(RichText::new("⚙️ File Format").size(14.0).strong());
        ui.add_space(5.0);

        let mut format = self.settings.format;
        ui.horizontal(|ui| {
            ui.radio_value(&mut format, SourceFormat::Csv, "CSV");
            ui.radio_value(&mut format, SourceFormat::Excel, "Excel");
        });
        self.select_format(format);

        ui.add_space(5.0);
        let hint = match self.settings.format {
            SourceFormat::Csv => "Numeric columns are used, other columns are dropped.",
            SourceFormat::Excel => "Codes STS, TS, CS, S, SS are mapped to scores 1-5.",
        };
        ui.label(RichText::new(hint).size(11.0).color(Color32::GRAY));

        if self.settings.format == SourceFormat::Excel {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Identifier columns:");
                let changed = ui
                    .add(egui::DragValue::new(&mut self.settings.identifier_columns).range(0..=10))
                    .changed();
                if changed && self.settings.file_path.is_some() {
                    action = ControlPanelAction::Reload;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .file_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let path_color = if self.settings.file_path.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::Browse;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📋 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// A file picked for one format is not reloaded under the other; it has to be browsed again.
    pub fn select_format(&mut self, format: SourceFormat) {
        if format == self.settings.format {
            return;
        }
        self.settings.format = format;
        if self.settings.file_path.take().is_some() {
            self.set_status(format!("Format changed to {format}, select a file"));
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Browse,
    Reload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_start_from_config() {
        let config = DashboardConfig {
            identifier_columns: 2,
            default_format: SourceFormat::Excel,
            ..DashboardConfig::default()
        };
        let panel = ControlPanel::new(&config);

        assert_eq!(panel.settings.format, SourceFormat::Excel);
        assert_eq!(panel.settings.identifier_columns, 2);
        assert!(panel.settings.file_path.is_none());
        assert_eq!(panel.status, "Ready");
    }

    #[test]
    fn switching_format_forgets_the_loaded_file() {
        let mut panel = ControlPanel::new(&DashboardConfig::default());
        panel.settings.file_path = Some(PathBuf::from("answers.csv"));

        panel.select_format(SourceFormat::Csv);
        assert!(panel.settings.file_path.is_some());

        panel.select_format(SourceFormat::Excel);
        assert_eq!(panel.settings.format, SourceFormat::Excel);
        assert!(panel.settings.file_path.is_none());
        assert_eq!(panel.status, "Format changed to Excel, select a file");
    }
}
