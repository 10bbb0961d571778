use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use super::model::{RawTable, RnaCategory};
use super::table::{parse_with, Delimiter};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{what} CSV not readable at {}: {source}", .path.display())]
    Fetch {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("loader thread exited before reporting")]
    WorkerGone,
}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// Everything needed to load one category.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Increases with every selection; outcomes carry it back.
    pub generation: u64,
    pub category: RnaCategory,
    pub counts_path: PathBuf,
    pub metadata_path: PathBuf,
    pub delimiter: Delimiter,
}

/// Both tables of one category, freshly parsed.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub counts: RawTable,
    pub metadata: RawTable,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub category: RnaCategory,
    pub result: Result<LoadedTables, LoadError>,
}

// ---------------------------------------------------------------------------
// Synchronous load
// ---------------------------------------------------------------------------

/// Read the counts and metadata files concurrently, then parse both.
///
/// Both reads finish before anything is parsed. If either fails the whole
/// load fails; the counts file is reported first. `is_current` is asked
/// between reading and parsing; `None` means the request was superseded and
/// nothing was parsed.
pub fn load_tables<F>(
    request: &LoadRequest,
    is_current: F,
) -> Option<Result<LoadedTables, LoadError>>
where
    F: Fn() -> bool,
{
    let texts = read_pair(request);
    if !is_current() {
        return None;
    }
    Some(texts.map(|(counts, metadata)| LoadedTables {
        counts: parse_with(&counts, request.delimiter),
        metadata: parse_with(&metadata, request.delimiter),
    }))
}

fn read_pair(request: &LoadRequest) -> Result<(String, String), LoadError> {
    let (counts, metadata) = thread::scope(|s| {
        let counts = s.spawn(|| read_text("counts", &request.counts_path));
        let metadata = s.spawn(|| read_text("metadata", &request.metadata_path));
        (counts.join(), metadata.join())
    });
    let counts = counts.map_err(|_| LoadError::WorkerGone)??;
    let metadata = metadata.map_err(|_| LoadError::WorkerGone)??;
    Ok((counts, metadata))
}

fn read_text(what: &'static str, path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Fetch {
        what,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Background loader
// ---------------------------------------------------------------------------

/// Runs loads off the UI thread and hands results back through a channel.
///
/// Only the most recently submitted generation is worth finishing: a worker
/// that finds itself superseded skips parsing and sends nothing.
pub struct BackgroundLoader {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    latest: Arc<AtomicU64>,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl BackgroundLoader {
    /// Start loading `request` on a worker thread. `notify` runs after the
    /// outcome has been queued (used to wake the UI).
    pub fn submit<F>(&self, request: LoadRequest, notify: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.latest.store(request.generation, Ordering::SeqCst);
        let tx = self.tx.clone();
        let latest = Arc::clone(&self.latest);

        thread::spawn(move || {
            if run_load(request, &latest, &tx) {
                notify();
            }
        });
    }

    /// Take every queued outcome without blocking.
    pub fn poll(&self) -> Vec<LoadOutcome> {
        self.rx.try_iter().collect()
    }

}

/// Load `request` and queue its outcome unless a newer generation has been
/// submitted meanwhile. Returns whether an outcome was queued.
fn run_load(request: LoadRequest, latest: &AtomicU64, tx: &Sender<LoadOutcome>) -> bool {
    let is_current = || latest.load(Ordering::SeqCst) == request.generation;

    let Some(result) = load_tables(&request, is_current) else {
        log::debug!(
            "Dropping superseded load of {} (generation {})",
            request.category,
            request.generation
        );
        return false;
    };
    if !is_current() {
        return false;
    }

    let outcome = LoadOutcome {
        generation: request.generation,
        category: request.category,
        result,
    };
    tx.send(outcome).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn wait(loader: &BackgroundLoader) -> LoadOutcome {
        loader.rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    fn request(dir: &Path, generation: u64, category: RnaCategory) -> LoadRequest {
        LoadRequest {
            generation,
            category,
            counts_path: dir.join(category.counts_file_name()),
            metadata_path: dir.join("Metadata.csv"),
            delimiter: Delimiter::Comma,
        }
    }

    #[test]
    fn loads_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tRF_countsnorm.csv", "Feature,A1\nGeneX,1.5\n");
        write(dir.path(), "Metadata.csv", "\u{feff}SampleID,Group\r\nA1,Baseline\r\n");

        let tables = load_tables(&request(dir.path(), 1, RnaCategory::Trf), || true)
            .unwrap()
            .unwrap();
        assert_eq!(tables.counts.header, vec!["Feature", "A1"]);
        assert_eq!(tables.counts.len(), 1);
        assert_eq!(tables.metadata.header, vec!["SampleID", "Group"]);
        assert_eq!(tables.metadata.rows[0], vec!["A1", "Baseline"]);
    }

    #[test]
    fn missing_file_is_a_fetch_failure() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tRF_countsnorm.csv", "Feature,A1\nGeneX,1\n");

        let err = load_tables(&request(dir.path(), 1, RnaCategory::Trf), || true)
            .unwrap()
            .unwrap_err();
        match err {
            LoadError::Fetch { what, path, .. } => {
                assert_eq!(what, "metadata");
                assert!(path.ends_with("Metadata.csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn counts_failure_is_reported_first() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tables(&request(dir.path(), 1, RnaCategory::Mir), || true)
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, LoadError::Fetch { what: "counts", .. }));
        assert!(err.to_string().contains("miR_countsnorm.csv"));
    }

    #[test]
    fn background_load_delivers_outcome_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mRNA_countsnorm.csv", "Feature,A1\nGeneX,1\n");
        write(dir.path(), "Metadata.csv", "SampleID,Group\nA1,15\n");

        let loader = BackgroundLoader::default();
        let (note_tx, note_rx) = mpsc::channel();
        loader.submit(request(dir.path(), 7, RnaCategory::MRna), move || {
            note_tx.send(()).unwrap();
        });

        let outcome = wait(&loader);
        assert_eq!(outcome.generation, 7);
        assert_eq!(outcome.category, RnaCategory::MRna);
        assert!(outcome.result.is_ok());
        note_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn superseded_worker_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tRF_countsnorm.csv", "Feature,A1\nGeneX,1\n");
        write(dir.path(), "miR_countsnorm.csv", "Feature,A1\nmiR-1,2\n");
        write(dir.path(), "Metadata.csv", "SampleID,Group\nA1,15\n");

        let loader = BackgroundLoader::default();
        loader.latest.store(2, Ordering::SeqCst);
        let stale = request(dir.path(), 1, RnaCategory::Trf);
        assert!(!run_load(stale, &loader.latest, &loader.tx));
        assert!(loader.poll().is_empty());

        loader.submit(request(dir.path(), 2, RnaCategory::Mir), || {});
        let outcome = wait(&loader);
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.category, RnaCategory::Mir);
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn superseded_request_is_not_parsed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tRF_countsnorm.csv", "Feature,A1\nGeneX,1\n");
        write(dir.path(), "Metadata.csv", "SampleID,Group\nA1,15\n");

        assert!(load_tables(&request(dir.path(), 1, RnaCategory::Trf), || false).is_none());
    }
}
