//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::{DataLoader, MappingOptions, SourceFormat};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::{error, info};
use std::path::PathBuf;

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// Result of the current upload, replaced on every load
    dashboard: Option<Dashboard>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        startup_file: Option<(PathBuf, Option<SourceFormat>)>,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(&config),
            chart_viewer: ChartViewer::new(config.preview_rows),
            config,
            dashboard: None,
        };

        if let Some((path, format)) = startup_file {
            let format = format.or_else(|| SourceFormat::from_path(&path).ok());
            if let Some(format) = format {
                app.control_panel.settings.format = format;
            }
            app.load_file(path);
        }
        app
    }

    fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            identifier_columns: self.control_panel.settings.identifier_columns,
            ..self.config.mapping_options()
        }
    }

    /// Handle file selection, filtered by the declared format
    fn handle_browse(&mut self) {
        let format = self.control_panel.settings.format;
        let filter = format!("{} Files", format.label());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(filter.as_str(), format.extensions())
            .pick_file()
        {
            self.load_file(path);
        }
    }

    fn handle_reload(&mut self) {
        if let Some(path) = self.control_panel.settings.file_path.clone() {
            self.load_file(path);
        }
    }

    /// Load, map and aggregate synchronously; a failure clears the charts.
    fn load_file(&mut self, path: PathBuf) {
        let loader = DataLoader::new(self.mapping_options());
        let format = self.control_panel.settings.format;

        match Dashboard::load(&loader, &path, Some(format)) {
            Ok(dashboard) => {
                let summary = dashboard.summary();
                info!("{}", summary);
                self.control_panel.set_status(summary);
                self.dashboard = Some(dashboard);
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.control_panel.set_status(format!("Error: {}", e));
                self.dashboard = None;
            }
        }
        self.control_panel.settings.file_path = Some(path);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Browse => self.handle_browse(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.dashboard.as_ref());
        });
    }
}
