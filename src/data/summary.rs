use super::model::{FeatureSeries, Statistic, SummaryLine, Timepoint};

/// Reduce every bucket of `series` to one value of `statistic`.
pub fn summarize(series: &FeatureSeries, statistic: Statistic) -> SummaryLine {
    let mut values = [None; 4];
    for tp in Timepoint::ALL {
        let bucket = series.bucket(tp);
        values[tp.index()] = match statistic {
            Statistic::Mean => Some(mean(bucket)),
            Statistic::Median => median(bucket),
        };
    }
    SummaryLine { statistic, values }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values for even sizes.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

// ---------------------------------------------------------------------------
// Box geometry
// ---------------------------------------------------------------------------

/// Five-number summary used to draw one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Quartiles by linear interpolation; whiskers end at the most extreme
/// values inside 1.5 × IQR of the box.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let q1 = percentile(&sorted, 25.0);
    let median = percentile(&sorted, 50.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= q1 - 1.5 * iqr)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= q3 + 1.5 * iqr)
        .unwrap_or(q3);

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
    })
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `sorted_values` must be non-empty and ascending.
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 1 {
        return sorted_values[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;
    sorted_values[lower] + frac * (sorted_values[upper] - sorted_values[lower])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(Timepoint, &[f64])]) -> FeatureSeries {
        let mut s = FeatureSeries::new();
        for (tp, vals) in pairs {
            for v in *vals {
                s.push(*tp, *v);
            }
        }
        s
    }

    #[test]
    fn mean_line_defaults_to_zero_for_empty_buckets() {
        let s = series(&[(Timepoint::Baseline, &[2.0, 4.0])]);
        let line = summarize(&s, Statistic::Mean);
        assert_eq!(line.statistic, Statistic::Mean);
        assert_eq!(line.get(Timepoint::Baseline), Some(3.0));
        assert_eq!(line.get(Timepoint::Min15), Some(0.0));
        assert_eq!(line.values, [Some(3.0), Some(0.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn median_line_is_absent_for_empty_buckets() {
        let s = series(&[
            (Timepoint::Baseline, &[4.0, 1.0, 3.0, 2.0]),
            (Timepoint::Min30, &[5.0]),
        ]);
        let line = summarize(&s, Statistic::Median);
        assert_eq!(line.values, [Some(2.5), None, Some(5.0), None]);
    }

    #[test]
    fn median_of_odd_and_even_sizes() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[5.0]), Some(5.0));
        assert_eq!(median(&[9.0, 1.0, 5.0]), Some(5.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn box_stats_interpolates_quartiles() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn box_whiskers_stop_before_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
    }

    #[test]
    fn box_stats_single_and_empty() {
        let stats = box_stats(&[7.0]).unwrap();
        assert_eq!(stats.q1, 7.0);
        assert_eq!(stats.upper_whisker, 7.0);
        assert!(box_stats(&[]).is_none());
    }
}
