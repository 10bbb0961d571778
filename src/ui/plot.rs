use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, HLine, Line, LineStyle, Plot, PlotPoints, Points, VLine,
};

use crate::color::{self, TimepointColors};
use crate::data::model::{RnaCategory, Timepoint};
use crate::data::summary::box_stats;
use crate::state::AppState;
use crate::volcano::{Significance, SignificanceThresholds, VolcanoCard, X_RANGE, Y_RANGE};

const BOX_PLOT_HEIGHT: f32 = 360.0;
const VOLCANO_CARD_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Timepoint box plot
// ---------------------------------------------------------------------------

/// One box per timepoint with every sample drawn beside it and the summary
/// statistic joined across the boxes.
pub fn timepoint_box_plot(ui: &mut Ui, state: &AppState, colors: &TimepointColors) {
    let title = match &state.feature {
        Some(f) => format!("{f} ({})", state.category),
        None => "Boxplot".to_string(),
    };
    ui.vertical_centered(|ui: &mut Ui| ui.heading(title));

    if state.data.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(if state.loading {
                "Loading…"
            } else {
                "Open a data folder to view counts  (File → Open data folder…)"
            });
        });
        return;
    }

    egui::Frame::new()
        .fill(color::PANEL_BACKGROUND)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            Plot::new("timepoint_box_plot")
                .height(BOX_PLOT_HEIGHT)
                .x_axis_label("timepoint")
                .y_axis_label("DESeq2 normalized count")
                .include_y(0.0)
                .include_x(-0.75)
                .include_x(Timepoint::ALL.len() as f64 - 0.25)
                .allow_scroll(false)
                .x_axis_formatter(|mark, _range| {
                    let idx = mark.value.round();
                    if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                        return String::new();
                    }
                    Timepoint::ALL
                        .get(idx as usize)
                        .map(|tp| tp.axis_label())
                        .unwrap_or_default()
                })
                .show(ui, |plot_ui| {
                    for (tp, values) in state.series.iter() {
                        let x = tp.index() as f64;
                        let c = colors.color_for(tp);

                        if let Some(stats) = box_stats(values) {
                            let elem = BoxElem::new(
                                x,
                                BoxSpread::new(
                                    stats.lower_whisker,
                                    stats.q1,
                                    stats.median,
                                    stats.q3,
                                    stats.upper_whisker,
                                ),
                            )
                            .box_width(0.4)
                            .fill(c.gamma_multiply(0.3))
                            .stroke(Stroke::new(2.0, c));
                            plot_ui.box_plot(
                                BoxPlot::new(vec![elem])
                                    .name(format!("{} (n={})", tp.axis_label(), values.len())),
                            );
                        }

                        let points: PlotPoints = values
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| [x - 0.35 + jitter(i), v])
                            .collect();
                        plot_ui.points(
                            Points::new(points)
                                .radius(3.0)
                                .color(c)
                                .name(format!("{} samples", tp.axis_label())),
                        );
                    }

                    let trend: PlotPoints = Timepoint::ALL
                        .iter()
                        .filter_map(|tp| state.summary.get(*tp).map(|v| [tp.index() as f64, v]))
                        .collect();
                    plot_ui.line(
                        Line::new(trend)
                            .color(color::TREND_LINE)
                            .width(2.0)
                            .name(state.summary.statistic.label()),
                    );
                });
        });

    ui.vertical_centered(|ui: &mut Ui| {
        if state.series.is_empty() {
            ui.label(RichText::new("No numeric values for this feature.").italics());
        }
        ui.small("x-axis: timepoint, y-axis: DESeq2 normalized count");
    });
}

/// Small deterministic horizontal spread so overlapping samples stay visible.
fn jitter(i: usize) -> f64 {
    let golden = (i as f64 * 0.618_033_988_75).fract();
    (golden - 0.5) * 0.2
}

// ---------------------------------------------------------------------------
// Volcano grid
// ---------------------------------------------------------------------------

/// Three volcano cards (15, 30, 60 min) for the active category.
pub fn volcano_grid(
    ui: &mut Ui,
    category: RnaCategory,
    cards: &[VolcanoCard],
    thresholds: &SignificanceThresholds,
) {
    ui.vertical_centered(|ui: &mut Ui| ui.heading("Volcano plots"));

    ui.columns(cards.len(), |columns| {
        for (ui, card) in columns.iter_mut().zip(cards) {
            volcano_card(ui, category, card, thresholds);
        }
    });

    ui.vertical_centered(|ui: &mut Ui| {
        ui.small("x-axis: log2(Fold Change), y-axis: -log10(p-value)");
    });
}

fn volcano_card(
    ui: &mut Ui,
    category: RnaCategory,
    card: &VolcanoCard,
    thresholds: &SignificanceThresholds,
) {
    let tp = card.timepoint;
    let guide = Color32::from_gray(0x77);

    Plot::new(("volcano", category.label(), tp.minutes()))
        .height(VOLCANO_CARD_HEIGHT)
        .x_axis_label("log2(Fold Change)")
        .y_axis_label("-log10(p-value)")
        .include_x(X_RANGE.0)
        .include_x(X_RANGE.1)
        .include_y(Y_RANGE.0)
        .include_y(Y_RANGE.1)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for sig in [Significance::NotSignificant, Significance::Down, Significance::Up] {
                let xy: PlotPoints = card
                    .points
                    .iter()
                    .filter(|p| p.significance == sig)
                    .map(|p| [p.log2_fc, p.neg_log_p])
                    .collect();
                plot_ui.points(
                    Points::new(xy)
                        .radius(3.0)
                        .color(color::significance_color(sig)),
                );
            }

            let dotted = LineStyle::dotted_dense();
            plot_ui.vline(VLine::new(-thresholds.fold_change).color(guide).style(dotted));
            plot_ui.vline(VLine::new(thresholds.fold_change).color(guide).style(dotted));
            plot_ui.hline(HLine::new(thresholds.guide_neg_log_p).color(guide).style(dotted));
        });

    ui.vertical_centered(|ui: &mut Ui| ui.label(RichText::new(tp.axis_label()).strong()));
}

// ---------------------------------------------------------------------------
// UMAP image
// ---------------------------------------------------------------------------

/// Pre-rendered UMAP for the selected feature, when one exists on disk.
pub fn umap_panel(ui: &mut Ui, state: &AppState) {
    let Some(feature) = &state.feature else {
        return;
    };
    let Some(path) = state.config.umap_path(feature).filter(|p| p.is_file()) else {
        return;
    };

    egui::CollapsingHeader::new(RichText::new("UMAP Plot").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.add(
                    egui::Image::new(format!("file://{}", path.display()))
                        .max_width(600.0)
                        .max_height(400.0),
                );
            });
        });
}
