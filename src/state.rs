use crate::config::DashboardConfig;
use crate::data::grouper::{build_timepoint_map, group_at, FeatureIndex};
use crate::data::loader::{LoadOutcome, LoadRequest, LoadedTables};
use crate::data::model::{
    FeatureSeries, RawTable, RnaCategory, SampleTimepointMap, Statistic, SummaryLine,
};
use crate::data::summary::summarize;

/// Most feature names listed at once; narrow with the search box.
pub const MAX_LISTED_FEATURES: usize = 5000;

// ---------------------------------------------------------------------------
// Per-category data
// ---------------------------------------------------------------------------

/// Parsed tables of the active category plus the lookups derived from them.
#[derive(Debug, Clone)]
pub struct CategoryData {
    pub counts: RawTable,
    pub timepoints: SampleTimepointMap,
    pub index: FeatureIndex,
}

impl CategoryData {
    pub fn from_tables(tables: LoadedTables, config: &DashboardConfig) -> Self {
        let timepoints = build_timepoint_map(&tables.metadata, &config.columns);
        let index = FeatureIndex::build(&tables.counts);
        Self {
            counts: tables.counts,
            timepoints,
            index,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Category whose files are shown (or being loaded).
    pub category: RnaCategory,

    /// Tables for `category`; None while loading or after a failure.
    pub data: Option<CategoryData>,

    /// Selected feature name.
    pub feature: Option<String>,

    /// Text typed into the feature search box.
    pub feature_filter: String,

    /// Feature names matching `feature_filter` (cached, capped at
    /// [`MAX_LISTED_FEATURES`]).
    pub visible_features: Vec<String>,

    /// Values of the selected feature per timepoint (cached).
    pub series: FeatureSeries,

    /// Trend line over `series`.
    pub summary: SummaryLine,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a category load is in flight.
    pub loading: bool,

    /// Generation of the newest load; older outcomes are ignored.
    generation: u64,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let statistic = config.statistic;
        let series = FeatureSeries::new();
        let summary = summarize(&series, statistic);
        Self {
            category: config.initial_category,
            config,
            data: None,
            feature: None,
            feature_filter: String::new(),
            visible_features: Vec::new(),
            series,
            summary,
            status_message: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn statistic(&self) -> Statistic {
        self.summary.statistic
    }

    /// Start loading `category`. Everything shown for the previous category
    /// is cleared and any load still in flight becomes stale.
    pub fn begin_load(&mut self, category: RnaCategory) -> LoadRequest {
        self.generation += 1;
        self.category = category;
        self.data = None;
        self.status_message = None;
        self.loading = true;
        self.visible_features.clear();
        self.set_series(FeatureSeries::new());

        LoadRequest {
            generation: self.generation,
            category,
            counts_path: self.config.counts_path(category),
            metadata_path: self.config.metadata_path(),
            delimiter: self.config.delimiter,
        }
    }

    /// Ingest a finished load. Returns false when the outcome belongs to a
    /// superseded selection and was ignored.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            log::debug!(
                "Ignoring stale load of {} (generation {}, current {})",
                outcome.category,
                outcome.generation,
                self.generation
            );
            return false;
        }
        self.loading = false;

        match outcome.result {
            Ok(tables) => {
                if tables.counts.is_empty() {
                    log::warn!("{} counts table has no feature rows", outcome.category);
                }
                let data = CategoryData::from_tables(tables, &self.config);
                log::info!(
                    "Loaded {}: {} features, {} samples mapped to timepoints",
                    outcome.category,
                    data.index.names().len(),
                    data.timepoints.len()
                );

                // Keep the selected feature if the new category has it.
                let keep = self
                    .feature
                    .as_deref()
                    .is_some_and(|f| data.index.contains(f));
                if !keep {
                    self.feature = data.index.names().first().cloned();
                }
                self.data = Some(data);
                self.refilter_features();
                self.regroup();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", outcome.category);
                self.status_message = Some(format!(
                    "Could not load CSVs. Expecting files in {}",
                    self.config.data_dir.display()
                ));
            }
        }
        true
    }

    /// Select a feature and regroup from the tables already in memory.
    pub fn select_feature(&mut self, feature: String) {
        self.feature = Some(feature);
        self.regroup();
    }

    pub fn set_statistic(&mut self, statistic: Statistic) {
        self.summary = summarize(&self.series, statistic);
    }

    /// Recompute `series` and `summary` for the selected feature.
    pub fn regroup(&mut self) {
        let resolver = self.config.resolver();
        let series = match (&self.data, &self.feature) {
            (Some(data), Some(feature)) => match data.index.row_of(feature) {
                Some(row) => group_at(&data.counts, &data.timepoints, row, &resolver),
                None => FeatureSeries::new(),
            },
            _ => FeatureSeries::new(),
        };
        self.set_series(series);
    }

    fn set_series(&mut self, series: FeatureSeries) {
        self.summary = summarize(&series, self.summary.statistic);
        self.series = series;
    }

    /// Recompute `visible_features` after the search text or the data changed.
    pub fn refilter_features(&mut self) {
        self.visible_features = match &self.data {
            Some(data) => matching_features(
                data.index.names(),
                &self.feature_filter,
                MAX_LISTED_FEATURES,
            ),
            None => Vec::new(),
        };
    }
}

/// Names containing `filter`, ignoring case, capped at `limit`.
fn matching_features(names: &[String], filter: &str, limit: usize) -> Vec<String> {
    let needle = filter.trim().to_lowercase();
    names
        .iter()
        .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}
