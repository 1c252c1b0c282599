//! Trial history store.
//!
//! Holds every audit trial, merges assessment sections as their oracle calls
//! finish, and snapshots the full history to disk after each mutation.
//! Deletion leaves a tombstone so that late-arriving oracle results for a
//! deleted trial are silently dropped instead of resurrecting it.

pub mod error;


pub use error::StoreError;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::trial::{Evaluation, FactCheck, HumanFeedback, Trial};

/// File name of the history snapshot inside the storage directory.
pub const TRIAL_HISTORY_FILENAME: &str = "axiom_audit_history.json";

/// Thread-safe trial store with optional disk persistence.
#[derive(Debug)]
pub struct TrialStore {
    inner: RwLock<Inner>,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Inner {
    trials: HashMap<String, Trial>,
    tombstones: HashSet<String>,
}

impl TrialStore {
    /// Creates a store with no disk persistence.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            snapshot_path: None,
        }
    }

    /// Opens (or initializes) a persistent store rooted at `storage_dir`.
    ///
    /// A missing snapshot file starts an empty history. A corrupt snapshot is
    /// an error: silently discarding history is worse than refusing to start.
    pub fn open(storage_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(storage_dir).map_err(|e| StoreError::Io {
            path: storage_dir.to_path_buf(),
            source: e,
        })?;

        let path = storage_dir.join(TRIAL_HISTORY_FILENAME);
        let trials: Vec<Trial> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source: e,
                });
            }
        };

        debug!(count = trials.len(), path = %path.display(), "trial history loaded");

        Ok(Self {
            inner: RwLock::new(Inner {
                trials: trials.into_iter().map(|t| (t.id.clone(), t)).collect(),
                tombstones: HashSet::new(),
            }),
            snapshot_path: Some(path),
        })
    }

    /// Inserts a freshly derived trial.
    pub fn insert(&self, trial: Trial) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.trials.insert(trial.id.clone(), trial);
        self.persist(&inner)
    }

    /// Returns a snapshot of the trial, if it exists.
    pub fn get(&self, id: &str) -> Option<Trial> {
        self.inner.read().trials.get(id).cloned()
    }

    /// All trials, newest first.
    pub fn list(&self) -> Vec<Trial> {
        let inner = self.inner.read();
        let mut trials: Vec<Trial> = inner.trials.values().cloned().collect();
        trials.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        trials
    }

    pub fn len(&self) -> usize {
        self.inner.read().trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().trials.is_empty()
    }

    /// Removes a trial and tombstones its id. Returns `false` if the id was
    /// unknown (already deleted ids stay tombstoned, so a repeat delete is a
    /// no-op that still reports `false`).
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        if inner.trials.remove(id).is_none() {
            return Ok(false);
        }
        inner.tombstones.insert(id.to_string());
        self.persist(&inner)?;
        Ok(true)
    }

    /// Merges a scoring result into the trial. Returns `false` when the trial
    /// was deleted (or never existed) and the result was dropped.
    pub fn merge_evaluation(&self, id: &str, evaluation: Evaluation) -> Result<bool, StoreError> {
        self.merge(id, "evaluation", |t| t.evaluation = Some(evaluation))
    }

    /// Merges a fact-check result into the trial. Returns `false` when dropped.
    pub fn merge_fact_check(&self, id: &str, fact_check: FactCheck) -> Result<bool, StoreError> {
        self.merge(id, "fact_check", |t| t.fact_check = Some(fact_check))
    }

    /// Merges persona feedback into the trial. Returns `false` when dropped.
    pub fn merge_feedback(&self, id: &str, feedback: HumanFeedback) -> Result<bool, StoreError> {
        self.merge(id, "human_feedback", |t| t.human_feedback = Some(feedback))
    }

    fn merge(
        &self,
        id: &str,
        section: &'static str,
        apply: impl FnOnce(&mut Trial),
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();

        if inner.tombstones.contains(id) {
            debug!(trial_id = %id, section, "dropping result for deleted trial");
            return Ok(false);
        }

        let Some(trial) = inner.trials.get_mut(id) else {
            warn!(trial_id = %id, section, "merge target not found");
            return Ok(false);
        };

        apply(trial);
        self.persist(&inner)?;
        Ok(true)
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let mut trials: Vec<&Trial> = inner.trials.values().collect();
        trials.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));

        let bytes = serde_json::to_vec_pretty(&trials)?;
        fs::write(path, bytes).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })
    }
}
