use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawTable – header + rows of untyped cells
// ---------------------------------------------------------------------------

/// A parsed delimited file. Every cell is kept as text.
///
/// Rows are not forced to the header length; ragged rows are passed through
/// and consumers treat missing cells as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `(row, col)`, `None` when the row is too short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Timepoint – the four experimental conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timepoint {
    Baseline,
    Min15,
    Min30,
    Min60,
}

impl Timepoint {
    /// All timepoints in display order.
    pub const ALL: [Timepoint; 4] = [
        Timepoint::Baseline,
        Timepoint::Min15,
        Timepoint::Min30,
        Timepoint::Min60,
    ];

    /// Position in [`Timepoint::ALL`].
    pub fn index(self) -> usize {
        match self {
            Timepoint::Baseline => 0,
            Timepoint::Min15 => 1,
            Timepoint::Min30 => 2,
            Timepoint::Min60 => 3,
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            Timepoint::Baseline => 0,
            Timepoint::Min15 => 15,
            Timepoint::Min30 => 30,
            Timepoint::Min60 => 60,
        }
    }

    /// Canonical metadata label.
    pub fn label(self) -> &'static str {
        match self {
            Timepoint::Baseline => "Baseline",
            Timepoint::Min15 => "15",
            Timepoint::Min30 => "30",
            Timepoint::Min60 => "60",
        }
    }

    /// Label used on plot axes.
    pub fn axis_label(self) -> String {
        format!("{} min", self.minutes())
    }

    /// Normalise a metadata cell to a timepoint.
    ///
    /// `baseline` (any case) wins first, then a leading `15`, `30` or `60`.
    /// Anything else has no timepoint.
    pub fn parse_label(raw: &str) -> Option<Timepoint> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("baseline") {
            Some(Timepoint::Baseline)
        } else if s.starts_with("15") {
            Some(Timepoint::Min15)
        } else if s.starts_with("30") {
            Some(Timepoint::Min30)
        } else if s.starts_with("60") {
            Some(Timepoint::Min60)
        } else {
            None
        }
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RnaCategory – which counts file is shown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RnaCategory {
    #[serde(rename = "tRFs")]
    Trf,
    #[serde(rename = "miRs")]
    Mir,
    #[serde(rename = "lncRNAs")]
    LncRna,
    #[serde(rename = "mRNAs")]
    MRna,
}

impl RnaCategory {
    pub const ALL: [RnaCategory; 4] = [
        RnaCategory::Trf,
        RnaCategory::Mir,
        RnaCategory::LncRna,
        RnaCategory::MRna,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RnaCategory::Trf => "tRFs",
            RnaCategory::Mir => "miRs",
            RnaCategory::LncRna => "lncRNAs",
            RnaCategory::MRna => "mRNAs",
        }
    }

    /// File name of the normalised counts table for this category.
    pub fn counts_file_name(self) -> String {
        let prefix = match self {
            RnaCategory::Trf => "tRF",
            RnaCategory::Mir => "miR",
            RnaCategory::LncRna => "lncRNA",
            RnaCategory::MRna => "mRNA",
        };
        format!("{prefix}_countsnorm.csv")
    }
}

impl fmt::Display for RnaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Grouped values
// ---------------------------------------------------------------------------

/// Sample identifier → timepoint, built from the metadata table.
pub type SampleTimepointMap = HashMap<String, Timepoint>;

/// One feature's values split into per-timepoint buckets.
///
/// All four buckets always exist; values keep the column order of the
/// counts header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSeries {
    buckets: [Vec<f64>; 4],
}

impl FeatureSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timepoint: Timepoint, value: f64) {
        self.buckets[timepoint.index()].push(value);
    }

    pub fn bucket(&self, timepoint: Timepoint) -> &[f64] {
        &self.buckets[timepoint.index()]
    }

    /// Buckets paired with their timepoint, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Timepoint, &[f64])> + '_ {
        Timepoint::ALL
            .into_iter()
            .map(move |tp| (tp, self.bucket(tp)))
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

/// Statistic drawn as the trend line across the boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    #[default]
    Mean,
    Median,
}

impl Statistic {
    pub fn label(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
        }
    }
}

/// One summary value per timepoint, in display order.
///
/// An empty bucket yields `Some(0.0)` under [`Statistic::Mean`] and `None`
/// under [`Statistic::Median`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub statistic: Statistic,
    pub values: [Option<f64>; 4],
}

impl SummaryLine {
    pub fn get(&self, timepoint: Timepoint) -> Option<f64> {
        self.values[timepoint.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timepoint_labels_normalise() {
        assert_eq!(Timepoint::parse_label("Baseline"), Some(Timepoint::Baseline));
        assert_eq!(Timepoint::parse_label(" baseline "), Some(Timepoint::Baseline));
        assert_eq!(Timepoint::parse_label("15 min"), Some(Timepoint::Min15));
        assert_eq!(Timepoint::parse_label("30"), Some(Timepoint::Min30));
        assert_eq!(Timepoint::parse_label("60min"), Some(Timepoint::Min60));
        assert_eq!(Timepoint::parse_label("99"), None);
        assert_eq!(Timepoint::parse_label("0"), None);
        assert_eq!(Timepoint::parse_label(""), None);
    }

    #[test]
    fn counts_file_names() {
        assert_eq!(RnaCategory::Trf.counts_file_name(), "tRF_countsnorm.csv");
        assert_eq!(RnaCategory::LncRna.counts_file_name(), "lncRNA_countsnorm.csv");
    }

    #[test]
    fn category_serde_uses_display_labels() {
        let cat: RnaCategory = serde_json::from_str("\"miRs\"").unwrap();
        assert_eq!(cat, RnaCategory::Mir);
        assert_eq!(serde_json::to_string(&RnaCategory::MRna).unwrap(), "\"mRNAs\"");
    }

    #[test]
    fn ragged_rows_have_no_missing_cells() {
        let table = RawTable {
            header: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into()]],
        };
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(3, 0), None);
    }
}
