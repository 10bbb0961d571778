use crate::data::model::{RnaCategory, Timepoint};

// ---------------------------------------------------------------------------
// Significance classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Significance {
    Up,
    Down,
    NotSignificant,
}

/// Cut-offs on log2 fold change and −log10 p.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceThresholds {
    pub fold_change: f64,
    pub up_neg_log_p: f64,
    pub down_neg_log_p: f64,
    /// Horizontal guide line drawn on the plot.
    pub guide_neg_log_p: f64,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            fold_change: 0.8,
            up_neg_log_p: 4.0,
            down_neg_log_p: 3.2,
            guide_neg_log_p: 3.0,
        }
    }
}

impl SignificanceThresholds {
    pub fn classify(&self, log2_fc: f64, neg_log_p: f64) -> Significance {
        if neg_log_p > self.up_neg_log_p && log2_fc > self.fold_change {
            Significance::Up
        } else if neg_log_p > self.down_neg_log_p && log2_fc < -self.fold_change {
            Significance::Down
        } else {
            Significance::NotSignificant
        }
    }
}

// ---------------------------------------------------------------------------
// Placeholder points
// ---------------------------------------------------------------------------

/// Points per volcano card.
pub const POINTS_PER_CARD: usize = 220;
/// Fixed axis ranges shared by every card.
pub const X_RANGE: (f64, f64) = (-3.0, 3.0);
pub const Y_RANGE: (f64, f64) = (0.0, 7.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolcanoPoint {
    pub log2_fc: f64,
    pub neg_log_p: f64,
    pub significance: Significance,
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

fn base_seed(category: RnaCategory) -> u32 {
    match category {
        RnaCategory::Trf => 11,
        RnaCategory::Mir => 22,
        RnaCategory::LncRna => 33,
        RnaCategory::MRna => 44,
    }
}

/// Placeholder volcano points until differential-expression tables exist.
/// Stable for a given category and timepoint.
pub fn synthetic_points(
    category: RnaCategory,
    timepoint: Timepoint,
    n: usize,
    thresholds: &SignificanceThresholds,
) -> Vec<VolcanoPoint> {
    let seed = f64::from(base_seed(category) + timepoint.minutes());
    (0..n)
        .map(|i| {
            let r1 = seeded_random(seed + i as f64);
            let r2 = seeded_random(seed + 1000.0 + i as f64);
            let log2_fc = (r1 - 0.5) * 5.5;
            let neg_log_p = ((r2 - 0.2) * 6.5).abs();
            VolcanoPoint {
                log2_fc,
                neg_log_p,
                significance: thresholds.classify(log2_fc, neg_log_p),
            }
        })
        .collect()
}

/// Timepoints that get a volcano card (each compared against baseline).
pub fn compared_timepoints() -> impl Iterator<Item = Timepoint> {
    Timepoint::ALL
        .into_iter()
        .filter(|tp| *tp != Timepoint::Baseline)
}

/// One volcano card: a timepoint compared against baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct VolcanoCard {
    pub timepoint: Timepoint,
    pub points: Vec<VolcanoPoint>,
}

/// Cards for the category on screen. Rebuilt only when the category or the
/// thresholds change, not every frame.
#[derive(Debug, Default)]
pub struct VolcanoCache {
    key: Option<(RnaCategory, SignificanceThresholds)>,
    cards: Vec<VolcanoCard>,
}

impl VolcanoCache {
    pub fn cards(
        &mut self,
        category: RnaCategory,
        thresholds: &SignificanceThresholds,
    ) -> &[VolcanoCard] {
        let key = (category, *thresholds);
        if self.key != Some(key) {
            log::debug!("Building volcano cards for {category}");
            self.cards = compared_timepoints()
                .map(|timepoint| VolcanoCard {
                    timepoint,
                    points: synthetic_points(category, timepoint, POINTS_PER_CARD, thresholds),
                })
                .collect();
            self.key = Some(key);
        }
        &self.cards
    }
}
