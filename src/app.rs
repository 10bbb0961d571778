use eframe::egui;

use crate::color::TimepointColors;
use crate::config::DashboardConfig;
use crate::data::loader::BackgroundLoader;
use crate::data::model::RnaCategory;
use crate::state::AppState;
use crate::ui::{panels, plot};
use crate::volcano::{SignificanceThresholds, VolcanoCache};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TimecourseApp {
    pub state: AppState,
    loader: BackgroundLoader,
    colors: TimepointColors,
    thresholds: SignificanceThresholds,
    volcano: VolcanoCache,
}

impl TimecourseApp {
    pub fn new(ctx: &egui::Context, config: DashboardConfig) -> Self {
        let mut app = Self {
            state: AppState::new(config),
            loader: BackgroundLoader::default(),
            colors: TimepointColors::default(),
            thresholds: SignificanceThresholds::default(),
            volcano: VolcanoCache::default(),
        };
        let initial = app.state.category;
        app.load_category(ctx, initial);
        app
    }

    /// Start a background load; whatever was in flight becomes stale.
    fn load_category(&mut self, ctx: &egui::Context, category: RnaCategory) {
        let request = self.state.begin_load(category);
        log::info!(
            "Loading {category} from {} and {}",
            request.counts_path.display(),
            request.metadata_path.display()
        );
        let ctx = ctx.clone();
        self.loader.submit(request, move || ctx.request_repaint());
    }
}

impl eframe::App for TimecourseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for outcome in self.loader.poll() {
            self.state.apply_load(outcome);
        }

        // ---- Top panel: categories, statistic, status ----
        let requested = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;

        // ---- Left side panel: feature picker ----
        egui::SidePanel::left("feature_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.colors);
            });

        // ---- Central panel: volcano grid + box plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let category = self.state.category;
                    let cards = self.volcano.cards(category, &self.thresholds);
                    plot::volcano_grid(ui, category, cards, &self.thresholds);
                    ui.add_space(16.0);
                    plot::timepoint_box_plot(ui, &self.state, &self.colors);
                    ui.add_space(16.0);
                    plot::umap_panel(ui, &self.state);
                });
        });

        if let Some(category) = requested {
            self.load_category(ctx, category);
        }
    }
}
