//! Chart Plotter Module
//! Draws the five dashboard charts using egui_plot and the egui painter.

use crate::data::Score;
use crate::stats::{
    FrequencyTable, PerQuestionFrequency, PerQuestionMean, SentimentBucket, SentimentCounts,
};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotUi, Text};
use std::f32::consts::{FRAC_PI_2, TAU};

const CHART_HEIGHT: f32 = 260.0;
const BAR_WIDTH: f64 = 0.6;

/// One color per score, from strongly disagree (red) to strongly agree (green).
pub const SCORE_COLORS: [Color32; 5] = [
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(149, 165, 166), // Grey
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(46, 204, 113),  // Green
];

pub fn score_color(score: Score) -> Color32 {
    SCORE_COLORS[usize::from(score.value() - Score::MIN)]
}

pub fn sentiment_color(bucket: SentimentBucket) -> Color32 {
    match bucket {
        SentimentBucket::Positive => Color32::from_rgb(46, 204, 113),
        SentimentBucket::Neutral => Color32::from_rgb(149, 165, 166),
        SentimentBucket::Negative => Color32::from_rgb(231, 76, 60),
    }
}

/// Text printed above a mean bar.
pub fn mean_label(mean: Option<f64>) -> String {
    match mean {
        Some(m) => format!("{:.2}", m),
        None => "n/a".to_string(),
    }
}

/// Angular extent of one pie slice, in radians from 12 o'clock, clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub score: Score,
    pub share: f64,
    pub start: f32,
    pub sweep: f32,
}

pub fn pie_slices(freq: &FrequencyTable) -> Vec<PieSlice> {
    let mut start = 0.0f32;
    freq.proportions()
        .into_iter()
        .map(|(score, share)| {
            let sweep = share as f32 * TAU;
            let slice = PieSlice {
                score,
                share,
                start,
                sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}

/// Label for a category axis mark; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    fn no_data(ui: &mut egui::Ui) {
        ui.label(RichText::new("No data to display").italics().color(Color32::GRAY));
    }

    /// Bar plot over named categories placed at x = 0, 1, 2, ...
    fn show_category_plot(
        ui: &mut egui::Ui,
        id: &str,
        axes: (&str, &str),
        labels: Vec<String>,
        y_max: Option<f64>,
        add: impl FnOnce(&mut PlotUi),
    ) {
        let mut plot = Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_x(-0.5)
            .include_x(labels.len() as f64 - 0.5)
            .x_axis_label(axes.0.to_string())
            .y_axis_label(axes.1.to_string())
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value));
        if let Some(y_max) = y_max {
            plot = plot.include_y(y_max);
        }
        plot.show(ui, add);
    }

    /// Chart 1: count of every score across all questions.
    pub fn draw_overall_distribution(ui: &mut egui::Ui, freq: &FrequencyTable) {
        if freq.is_empty() {
            Self::no_data(ui);
        }

        let bars: Vec<Bar> = freq
            .iter()
            .map(|(score, count)| {
                Bar::new(score.as_f64(), count as f64)
                    .width(BAR_WIDTH)
                    .name(format!("Score {}", score))
                    .fill(score_color(score))
            })
            .collect();

        Plot::new("overall_distribution")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_x(f64::from(Score::MIN) - 0.5)
            .include_x(f64::from(Score::MAX) + 0.5)
            .x_axis_label("Score")
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Answers"));
            });
    }

    /// Chart 2: share of each score as a pie with a legend.
    pub fn draw_proportion_pie(ui: &mut egui::Ui, freq: &FrequencyTable) {
        let slices = pie_slices(freq);
        if slices.is_empty() {
            Self::no_data(ui);
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(CHART_HEIGHT, CHART_HEIGHT), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = rect.width().min(rect.height()) * 0.45;

            for slice in &slices {
                let color = score_color(slice.score);
                // Convex pieces of at most a quarter turn each
                let pieces = (slice.sweep / FRAC_PI_2).ceil().max(1.0) as usize;
                let piece_sweep = slice.sweep / pieces as f32;
                for p in 0..pieces {
                    let from = slice.start + p as f32 * piece_sweep;
                    let steps = 16;
                    let mut points = vec![center];
                    points.extend((0..=steps).map(|i| {
                        let angle = from + piece_sweep * i as f32 / steps as f32;
                        Self::polar(center, radius, angle)
                    }));
                    painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
                }

                if slice.share >= 0.04 {
                    let label_pos =
                        Self::polar(center, radius * 0.65, slice.start + slice.sweep / 2.0);
                    painter.text(
                        label_pos,
                        Align2::CENTER_CENTER,
                        format!("{:.1}%", slice.share * 100.0),
                        FontId::proportional(12.0),
                        Color32::WHITE,
                    );
                }
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for slice in &slices {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, score_color(slice.score));
                        ui.label(format!(
                            "Score {}: {} ({:.1}%)",
                            slice.score,
                            freq.get(slice.score),
                            slice.share * 100.0
                        ));
                    });
                }
            });
        });
    }

    fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
        // Angle 0 points up, growing clockwise
        Pos2::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
    }

    /// Chart 3: per-question distribution, one stacked layer per score.
    pub fn draw_stacked_distribution(
        ui: &mut egui::Ui,
        questions: &[String],
        freq: &PerQuestionFrequency,
    ) {
        if freq.is_empty() {
            Self::no_data(ui);
        }

        let mut layers: Vec<BarChart> = Vec::new();
        for score in Score::all() {
            let bars: Vec<Bar> = questions
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    Bar::new(i as f64, freq.get(q, score) as f64)
                        .width(BAR_WIDTH)
                        .name(q)
                })
                .collect();
            let below: Vec<&BarChart> = layers.iter().collect();
            let layer = BarChart::new(bars)
                .name(format!("Score {}", score))
                .color(score_color(score))
                .stack_on(&below);
            layers.push(layer);
        }

        Self::show_category_plot(
            ui,
            "stacked_distribution",
            ("Question", "Count"),
            questions.to_vec(),
            None,
            |plot_ui| {
                for layer in layers {
                    plot_ui.bar_chart(layer);
                }
            },
        );
    }

    /// Chart 4: mean score per question, labelled with two decimals.
    pub fn draw_mean_scores(ui: &mut egui::Ui, means: &PerQuestionMean) {
        if means.is_empty() {
            Self::no_data(ui);
        }

        let labels: Vec<String> = means.iter().map(|m| m.question.clone()).collect();
        let bars: Vec<Bar> = means
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                m.mean.map(|mean| {
                    Bar::new(i as f64, mean)
                        .width(BAR_WIDTH)
                        .name(&m.question)
                        .fill(Color32::from_rgb(52, 152, 219))
                })
            })
            .collect();

        Self::show_category_plot(
            ui,
            "mean_scores",
            ("Question", "Mean score"),
            labels,
            Some(f64::from(Score::MAX) + 0.5),
            |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Mean"));
                for (i, m) in means.iter().enumerate() {
                    let y = m.mean.unwrap_or(0.0);
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, y + 0.05), mean_label(m.mean))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            },
        );
    }

    /// Chart 5: positive, neutral and negative answers.
    pub fn draw_sentiment(ui: &mut egui::Ui, counts: &SentimentCounts) {
        if counts.is_empty() {
            Self::no_data(ui);
        }

        let labels: Vec<String> = SentimentBucket::ALL
            .iter()
            .map(|b| b.label().to_string())
            .collect();
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, (bucket, count))| {
                Bar::new(i as f64, count as f64)
                    .width(BAR_WIDTH)
                    .name(bucket.label())
                    .fill(sentiment_color(bucket))
            })
            .collect();

        Self::show_category_plot(ui, "sentiment", ("Category", "Count"), labels, None, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Answers"));
        });
    }
}
