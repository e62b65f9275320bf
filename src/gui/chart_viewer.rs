//! Chart Viewer Widget
//! Central scrollable panel: data preview followed by the five dashboard charts.

use crate::charts::ChartPlotter;
use crate::dashboard::Dashboard;
use crate::data::ResponseTable;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const PLACEHOLDER: &str = "Upload a CSV or Excel questionnaire file to display the dashboard.";

/// Scrollable dashboard display. Holds nothing between uploads.
pub struct ChartViewer {
    pub preview_rows: usize,
}

impl ChartViewer {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Draw the dashboard, or the upload placeholder when nothing is loaded
    pub fn show(&self, ui: &mut egui::Ui, dashboard: Option<&Dashboard>) {
        let Some(dashboard) = dashboard else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(PLACEHOLDER).size(18.0).color(Color32::GRAY));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(format!("📊 {}", dashboard.source));
                ui.add_space(CARD_SPACING);

                Self::card(ui, "Data Preview", |ui| {
                    Self::draw_preview(ui, &dashboard.table, self.preview_rows);
                });

                let stats = &dashboard.stats;
                let questions = dashboard.table.question_names();

                Self::card(ui, "1. Overall Answer Distribution", |ui| {
                    ChartPlotter::draw_overall_distribution(ui, &stats.overall);
                });
                Self::card(ui, "2. Answer Proportions", |ui| {
                    ChartPlotter::draw_proportion_pie(ui, &stats.overall);
                });
                Self::card(ui, "3. Answer Distribution per Question", |ui| {
                    ChartPlotter::draw_stacked_distribution(ui, &questions, &stats.per_question);
                });
                Self::card(ui, "4. Mean Score per Question", |ui| {
                    ChartPlotter::draw_mean_scores(ui, &stats.means);
                });
                Self::card(ui, "5. Positive, Neutral and Negative Answers", |ui| {
                    ChartPlotter::draw_sentiment(ui, &stats.sentiment);
                });
            });
    }

    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(8.0);
                add_contents(ui);
            });
        ui.add_space(CARD_SPACING);
    }

    fn draw_preview(ui: &mut egui::Ui, table: &ResponseTable, rows: usize) {
        if table.question_count() == 0 {
            ui.label(RichText::new("No numeric question columns").italics().color(Color32::GRAY));
            return;
        }
        if table.is_empty() {
            ui.label(RichText::new("No respondents").italics().color(Color32::GRAY));
            return;
        }

        ScrollArea::horizontal().id_salt("preview_scroll").show(ui, |ui| {
            egui::Grid::new("data_preview")
                .striped(true)
                .min_col_width(40.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for name in table.question_names() {
                        ui.label(RichText::new(name).strong().size(11.0));
                    }
                    ui.end_row();

                    for row in table.head(rows) {
                        for cell in row {
                            let text = cell
                                .map(|s| s.to_string())
                                .unwrap_or_else(|| "–".to_string());
                            ui.label(RichText::new(text).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });

        ui.label(
            RichText::new(format!(
                "{} of {} respondents shown",
                table.row_count().min(rows),
                table.row_count()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }
}
