use crate::error::CacheError;
use runtally_primitives::{Run, RunId};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};
use tracing::{debug, warn};

/// The persistent, deduplicated store of resolved runs.
///
/// An in-memory map keyed by run id, mirrored to a JSON file. Merges are
/// last-write-wins, which is safe because ledger data is immutable once a run
/// has ended and complete runs are never re-resolved.
#[derive(Debug)]
pub struct RunCache {
    runs: HashMap<RunId, Run>,
    path: PathBuf,
}

impl RunCache {
    /// Loads the cache persisted at `path`.
    ///
    /// A missing file is a first run and yields an empty cache. A file that
    /// cannot be parsed also yields an empty cache, so a corrupt cache never
    /// blocks a sync pass; the runs it held are simply re-resolved.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let runs = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(runs) => runs,
                Err(err) => {
                    warn!(
                        target: "sync::cache",
                        path = %path.display(),
                        %err,
                        "Discarding unparseable run cache"
                    );
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!(
                    target: "sync::cache",
                    path = %path.display(),
                    %err,
                    "Failed to read run cache, starting empty"
                );
                HashMap::new()
            }
        };
        debug!(target: "sync::cache", runs = runs.len(), path = %path.display(), "Loaded run cache");
        Self { runs, path }
    }

    /// The run stored for `run_id`, if any.
    pub fn get(&self, run_id: &RunId) -> Option<&Run> {
        self.runs.get(run_id)
    }

    /// Merges a resolved run into the cache, replacing any previous entry for
    /// the same run id.
    pub fn insert(&mut self, run: Run) {
        self.runs.insert(run.run_id, run);
    }

    /// Number of cached runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the cache holds no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Iterates over all cached runs in unspecified order.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.values()
    }

    /// Atomically rewrites the cache file with the full current mapping.
    ///
    /// The contents go to a sibling temp file first and are renamed over the
    /// target, so a reader never observes a half-written cache.
    pub fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&self.runs)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            target: "sync::cache",
            runs = self.runs.len(),
            path = %self.path.display(),
            "Persisted run cache"
        );
        Ok(())
    }
}
