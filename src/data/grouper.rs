use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::{FeatureSeries, RawTable, SampleTimepointMap, Timepoint};

// ---------------------------------------------------------------------------
// Metadata column resolution
// ---------------------------------------------------------------------------

/// How the sample-id and timepoint columns of the metadata table are found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ColumnStrategy {
    /// First header equal (case-sensitive) to one of the accepted names.
    Exact {
        sample_headers: Vec<String>,
        timepoint_headers: Vec<String>,
    },
    /// First header containing `sample`, and first other header containing
    /// `time`, `timepoint` or `min`, ignoring case.
    Fuzzy,
}

impl Default for ColumnStrategy {
    fn default() -> Self {
        ColumnStrategy::Exact {
            sample_headers: vec!["SampleID".to_string()],
            timepoint_headers: vec!["Group".to_string()],
        }
    }
}

const FUZZY_SAMPLE_KEYS: &[&str] = &["sample"];
const FUZZY_TIME_KEYS: &[&str] = &["time", "timepoint", "min"];

impl ColumnStrategy {
    /// Indices of the `(sample, timepoint)` columns, `None` if either is missing.
    pub fn resolve(&self, header: &[String]) -> Option<(usize, usize)> {
        match self {
            ColumnStrategy::Exact {
                sample_headers,
                timepoint_headers,
            } => {
                let sample = header.iter().position(|h| sample_headers.contains(h))?;
                let time = header
                    .iter()
                    .enumerate()
                    .position(|(i, h)| i != sample && timepoint_headers.contains(h))?;
                Some((sample, time))
            }
            ColumnStrategy::Fuzzy => {
                let sample = header
                    .iter()
                    .position(|h| contains_any_ignore_case(h, FUZZY_SAMPLE_KEYS))?;
                let time = header
                    .iter()
                    .enumerate()
                    .position(|(i, h)| i != sample && contains_any_ignore_case(h, FUZZY_TIME_KEYS))?;
                Some((sample, time))
            }
        }
    }
}

fn contains_any_ignore_case(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Build the sample → timepoint map from the metadata table.
///
/// Rows whose timepoint cannot be normalised, or whose sample id is empty,
/// are dropped. A repeated sample id overwrites the earlier entry. When the
/// columns cannot be found the map is empty.
pub fn build_timepoint_map(metadata: &RawTable, strategy: &ColumnStrategy) -> SampleTimepointMap {
    let mut map = SampleTimepointMap::new();

    let Some((sample_idx, time_idx)) = strategy.resolve(&metadata.header) else {
        log::warn!(
            "Metadata header {:?} has no sample/timepoint columns for {strategy:?}",
            metadata.header
        );
        return map;
    };

    for row in &metadata.rows {
        let (Some(sample), Some(time)) = (row.get(sample_idx), row.get(time_idx)) else {
            continue;
        };
        let sample = sample.trim();
        if sample.is_empty() {
            continue;
        }
        if let Some(tp) = Timepoint::parse_label(time) {
            map.insert(sample.to_string(), tp);
        }
    }
    map
}

// ---------------------------------------------------------------------------
// Sample resolution
// ---------------------------------------------------------------------------

/// Resolves a counts column name to a timepoint.
///
/// The metadata map is always consulted first. The prefix-letter fallback
/// (`A`→Baseline, `B`→15, `C`→30, `D`→60) only runs when it is switched on
/// and the map has no entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleResolver {
    pub prefix_fallback: bool,
}

impl SampleResolver {
    pub fn resolve(&self, map: &SampleTimepointMap, sample: &str) -> Option<Timepoint> {
        let sample = sample.trim();
        map.get(sample).copied().or_else(|| {
            if self.prefix_fallback {
                prefix_timepoint(sample)
            } else {
                None
            }
        })
    }
}

fn prefix_timepoint(sample: &str) -> Option<Timepoint> {
    match sample.chars().next()?.to_ascii_uppercase() {
        'A' => Some(Timepoint::Baseline),
        'B' => Some(Timepoint::Min15),
        'C' => Some(Timepoint::Min30),
        'D' => Some(Timepoint::Min60),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Split one feature's values into per-timepoint buckets.
///
/// The feature row is the first whose first cell equals `feature` exactly.
/// An unknown feature yields four empty buckets.
pub fn group_by_timepoint(
    counts: &RawTable,
    map: &SampleTimepointMap,
    feature: &str,
    resolver: &SampleResolver,
) -> FeatureSeries {
    match find_feature_row(counts, feature) {
        Some(row) => group_at(counts, map, row, resolver),
        None => FeatureSeries::new(),
    }
}

/// Same as [`group_by_timepoint`] for a known row offset.
pub fn group_at(
    counts: &RawTable,
    map: &SampleTimepointMap,
    row: usize,
    resolver: &SampleResolver,
) -> FeatureSeries {
    let mut series = FeatureSeries::new();
    for (col, sample) in counts.header.iter().enumerate().skip(1) {
        let Some(tp) = resolver.resolve(map, sample) else {
            continue;
        };
        let Some(cell) = counts.cell(row, col) else {
            continue;
        };
        match cell.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => series.push(tp, v),
            _ => {}
        }
    }
    series
}

fn find_feature_row(counts: &RawTable, feature: &str) -> Option<usize> {
    counts
        .rows
        .iter()
        .position(|r| r.first().is_some_and(|name| name == feature))
}

// ---------------------------------------------------------------------------
// FeatureIndex – feature name → row offset
// ---------------------------------------------------------------------------

/// Row offsets of every feature in a counts table, built once per load so
/// that switching features does not rescan the table.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    offsets: HashMap<String, usize>,
    /// Feature names in file order, duplicates removed.
    names: Vec<String>,
}

impl FeatureIndex {
    pub fn build(counts: &RawTable) -> Self {
        let mut offsets = HashMap::with_capacity(counts.len());
        let mut names = Vec::with_capacity(counts.len());
        for (i, row) in counts.rows.iter().enumerate() {
            let Some(name) = row.first() else { continue };
            if !offsets.contains_key(name) {
                offsets.insert(name.clone(), i);
                names.push(name.clone());
            }
        }
        Self { offsets, names }
    }

    pub fn row_of(&self, feature: &str) -> Option<usize> {
        self.offsets.get(feature).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.offsets.contains_key(feature)
    }
}
