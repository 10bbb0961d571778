//! Writes a small demo dataset: `Metadata.csv` plus one `<prefix>_countsnorm.csv`
//! per RNA category, in the folder given as the first argument
//! (default `public/interactive_boxplot`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const SAMPLES_PER_TIMEPOINT: usize = 6;

/// Metadata label written for each timepoint, in the mixed spellings seen in
/// real sheets.
const GROUPS: [(char, &str, f64); 4] = [
    ('A', "Baseline", 1.0),
    ('B', "15 min", 1.6),
    ('C', "30", 2.2),
    ('D', "60 min", 1.3),
];

const CATEGORIES: [(&str, &str, usize); 4] = [
    ("tRF", "tRF", 300),
    ("miR", "hsa-miR", 250),
    ("lncRNA", "LINC", 400),
    ("mRNA", "GENE", 600),
];

/// splitmix64, enough for reproducible demo data.
struct DemoRng(u64);

impl DemoRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal via Box-Muller.
    fn normal(&mut self) -> f64 {
        let u1 = self.unit().max(1e-15);
        let u2 = self.unit();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

fn sample_names() -> Vec<(String, usize)> {
    GROUPS
        .iter()
        .enumerate()
        .flat_map(|(g, (letter, _, _))| {
            (1..=SAMPLES_PER_TIMEPOINT).map(move |i| (format!("{letter}{i}"), g))
        })
        .collect()
}

fn write_metadata(dir: &Path, samples: &[(String, usize)]) -> Result<()> {
    let path = dir.join("Metadata.csv");
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["SampleID", "Group", "Batch"])?;
    for (name, g) in samples {
        writer.write_record([name.as_str(), GROUPS[*g].1, "1"])?;
    }
    // A QC sample with no timepoint; the viewer leaves it out.
    writer.write_record(["QC1", "pool", "1"])?;
    writer.flush()?;
    Ok(())
}

fn write_counts(
    dir: &Path,
    file_prefix: &str,
    feature_prefix: &str,
    n_features: usize,
    samples: &[(String, usize)],
    rng: &mut DemoRng,
) -> Result<()> {
    let path = dir.join(format!("{file_prefix}_countsnorm.csv"));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Feature".to_string()];
    header.extend(samples.iter().map(|(name, _)| name.clone()));
    header.push("QC1".to_string());
    writer.write_record(&header)?;

    for f in 0..n_features {
        let base = (3.0 + 4.0 * rng.unit()).exp();
        // Only some features respond to the stimulus.
        let responsive = rng.unit() < 0.3;

        let mut record = vec![format!("{feature_prefix}-{}", f + 1)];
        for (_, g) in samples {
            if rng.unit() < 0.02 {
                record.push(String::new());
                continue;
            }
            let fold = if responsive { GROUPS[*g].2 } else { 1.0 };
            let value = base * fold * (0.25 * rng.normal()).exp();
            record.push(format!("{value:.3}"));
        }
        record.push(format!("{:.3}", base));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    println!("Wrote {n_features} features to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public/interactive_boxplot"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = DemoRng(42);
    let samples = sample_names();

    write_metadata(&dir, &samples)?;
    for (file_prefix, feature_prefix, n) in CATEGORIES {
        write_counts(&dir, file_prefix, feature_prefix, n, &samples, &mut rng)?;
    }

    println!(
        "Wrote metadata for {} samples to {}",
        samples.len(),
        dir.display()
    );
    Ok(())
}
