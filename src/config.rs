use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::grouper::{ColumnStrategy, SampleResolver};
use crate::data::model::{RnaCategory, Statistic};
use crate::data::table::Delimiter;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "RNA_TIMECOURSE_CONFIG";
/// Config file picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "timecourse.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Runtime settings. Every field has a default, so `{}` is a valid file.
///
/// ```json
/// {
///   "data_dir": "public/interactive_boxplot",
///   "columns": { "strategy": "fuzzy" },
///   "statistic": "median",
///   "prefix_fallback": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Folder holding `Metadata.csv` and the `*_countsnorm.csv` tables.
    pub data_dir: PathBuf,
    /// Folder holding per-feature UMAP images (`<feature>.png`).
    pub umap_dir: PathBuf,
    pub metadata_file: String,
    pub delimiter: Delimiter,
    pub columns: ColumnStrategy,
    pub statistic: Statistic,
    /// Guess timepoints from the first letter of unmapped sample names.
    pub prefix_fallback: bool,
    pub initial_category: RnaCategory,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public/interactive_boxplot"),
            umap_dir: PathBuf::from("public/interactive_umap"),
            metadata_file: "Metadata.csv".to_string(),
            delimiter: Delimiter::Comma,
            columns: ColumnStrategy::default(),
            statistic: Statistic::Mean,
            prefix_fallback: false,
            initial_category: RnaCategory::Trf,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the config from, in order: an explicit path (first CLI
    /// argument), [`CONFIG_ENV`], [`DEFAULT_CONFIG_FILE`] if it exists, and
    /// finally the built-in defaults.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        let path = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(p) => Self::from_file(&p),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn counts_path(&self, category: RnaCategory) -> PathBuf {
        self.data_dir.join(category.counts_file_name())
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    /// UMAP image for `feature`. `None` when the name would not stay a single
    /// file inside `umap_dir` (empty, or holding a separator or drive prefix).
    pub fn umap_path(&self, feature: &str) -> Option<PathBuf> {
        if feature.is_empty() || feature.contains(|c: char| c == '/' || c == '\\') {
            return None;
        }
        let file_name = format!("{feature}.png");
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.umap_dir.join(file_name)),
            _ => None,
        }
    }

    pub fn resolver(&self) -> SampleResolver {
        SampleResolver {
            prefix_fallback: self.prefix_fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(
            cfg.counts_path(RnaCategory::Mir),
            PathBuf::from("public/interactive_boxplot/miR_countsnorm.csv")
        );
        assert!(!cfg.resolver().prefix_fallback);
    }

    #[test]
    fn parses_every_option() {
        let json = r#"{
            "data_dir": "/data",
            "umap_dir": "/umap",
            "metadata_file": "meta.tsv",
            "delimiter": "tab",
            "columns": { "strategy": "fuzzy" },
            "statistic": "median",
            "prefix_fallback": true,
            "initial_category": "lncRNAs"
        }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.metadata_path(), PathBuf::from("/data/meta.tsv"));
        assert_eq!(cfg.umap_path("miR-21"), Some(PathBuf::from("/umap/miR-21.png")));
        assert_eq!(cfg.delimiter, Delimiter::Tab);
        assert_eq!(cfg.columns, ColumnStrategy::Fuzzy);
        assert_eq!(cfg.statistic, Statistic::Median);
        assert!(cfg.prefix_fallback);
        assert_eq!(cfg.initial_category, RnaCategory::LncRna);
    }

    #[test]
    fn exact_columns_from_json() {
        let json = r#"{ "columns": {
            "strategy": "exact",
            "sample_headers": ["Sample"],
            "timepoint_headers": ["Time"]
        } }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            cfg.columns,
            ColumnStrategy::Exact {
                sample_headers: vec!["Sample".into()],
                timepoint_headers: vec!["Time".into()],
            }
        );
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "statistic": "median" }"#).unwrap();
        let cfg = DashboardConfig::discover(Some(path)).unwrap();
        assert_eq!(cfg.statistic, Statistic::Median);
    }

    #[test]
    fn broken_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("cfg.json"));
    }

    #[test]
    fn umap_path_stays_inside_umap_dir() {
        let cfg = DashboardConfig {
            umap_dir: PathBuf::from("/umap"),
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.umap_path("let-7a.1"), Some(PathBuf::from("/umap/let-7a.1.png")));
        assert_eq!(cfg.umap_path("../secret"), None);
        assert_eq!(cfg.umap_path("a/b"), None);
        assert_eq!(cfg.umap_path("..\\x"), None);
        assert_eq!(cfg.umap_path("/etc/passwd"), None);
        assert_eq!(cfg.umap_path(""), None);
    }
}
