use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::TimepointColors;
use crate::data::model::{RnaCategory, Statistic};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Returns the category to (re)load, if the
/// user asked for one.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<RnaCategory> {
    let mut requested = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                if open_folder_dialog(state) {
                    requested = Some(state.category);
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                requested = Some(state.category);
                ui.close_menu();
            }
        });

        ui.separator();

        for category in RnaCategory::ALL {
            let active = state.category == category;
            if ui
                .selectable_label(active, RichText::new(category.label()).strong())
                .clicked()
                && !active
            {
                requested = Some(category);
            }
        }

        ui.separator();

        let statistic = state.statistic();
        for option in [Statistic::Mean, Statistic::Median] {
            if ui
                .selectable_label(statistic == option, format!("Trend: {}", option.label()))
                .clicked()
            {
                state.set_statistic(option);
            }
        }

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label(format!("Loading {}…", state.category));
        } else if let Some(data) = &state.data {
            ui.label(format!(
                "{} features, {} samples with a timepoint",
                data.index.names().len(),
                data.timepoints.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    requested
}

// ---------------------------------------------------------------------------
// Left side panel – feature picker
// ---------------------------------------------------------------------------

/// Render the feature search box, feature list and bucket sizes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, colors: &TimepointColors) {
    ui.heading(format!("{} name", state.category));
    ui.separator();

    if state.data.is_none() {
        ui.label(if state.loading {
            "Loading…"
        } else {
            "No data loaded."
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search");
        if ui.text_edit_singleline(&mut state.feature_filter).changed() {
            state.refilter_features();
        }
    });

    // Bucket sizes for the selected feature.
    egui::Grid::new("bucket_sizes").striped(true).show(ui, |ui: &mut Ui| {
        for (tp, values) in state.series.iter() {
            ui.label(RichText::new(tp.axis_label()).color(colors.color_for(tp)));
            ui.label(format!("n = {}", values.len()));
            ui.end_row();
        }
    });
    ui.separator();

    let mut clicked = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &state.visible_features {
                let selected = state.feature.as_deref() == Some(name.as_str());
                if ui.selectable_label(selected, name.as_str()).clicked() && !selected {
                    clicked = Some(name.clone());
                }
            }
        });
    if let Some(name) = clicked {
        state.select_feature(name);
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

/// Let the user point the dashboard at another data folder. Returns whether
/// a folder was picked.
pub fn open_folder_dialog(state: &mut AppState) -> bool {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder with Metadata.csv and *_countsnorm.csv")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    match folder {
        Some(path) => {
            log::info!("Data folder set to {}", path.display());
            state.config.data_dir = path;
            true
        }
        None => false,
    }
}

