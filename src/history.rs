//! Committed history plus the buffer of not-yet-committed steps.
//!
//! A [`HistoryState`] is never changed in place: every edit and every commit
//! produces a new snapshot, and older snapshots stay valid. Commits are held
//! behind `Arc` so snapshots share them, and so a commit's identity is the
//! allocation it lives in.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rope::Rope;
use serde::{Deserialize, Serialize};

use crate::attribution::{AttributionMap, CommitId};
use crate::mapping::{Mapping, StepMap};
use crate::step::{Step, Transform};
use crate::Result;

/// A named, timestamped group of edits.
///
/// `operations[i]` undoes the i-th original step and `maps[i]` is that step's
/// forward map, both in the order the steps were first applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    message: String,
    time: DateTime<Utc>,
    operations: Vec<Step>,
    maps: Vec<StepMap>,
}

impl Commit {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn operations(&self) -> &[Step] {
        &self.operations
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// The commit's step maps as a pipeline.
    pub fn mapping(&self) -> Mapping {
        Mapping::new(self.maps.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a commit value. It is not part of any history until committed there.
    pub fn from_json(json: &str) -> Result<Commit> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug)]
pub struct HistoryState {
    attribution: AttributionMap,
    commits: Vec<Arc<Commit>>,
    pending_operations: Vec<Step>,
    pending_maps: Vec<StepMap>,
}

impl HistoryState {
    /// State for a freshly opened document: everything unattributed, no commits.
    pub fn new(doc: &Rope) -> HistoryState {
        HistoryState {
            attribution: AttributionMap::new(doc.len()),
            commits: Vec::new(),
            pending_operations: Vec::new(),
            pending_maps: Vec::new(),
        }
    }

    pub fn attribution(&self) -> &AttributionMap {
        &self.attribution
    }

    pub fn commits(&self) -> &[Arc<Commit>] {
        &self.commits
    }

    pub fn pending_operations(&self) -> &[Step] {
        &self.pending_operations
    }

    pub fn pending_maps(&self) -> &[StepMap] {
        &self.pending_maps
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_operations.is_empty()
    }

    /// Id the next commit will get, and the one spans from uncommitted edits carry.
    pub fn pending_id(&self) -> CommitId {
        self.commits.len()
    }

    /// Position of `commit` in this history, by identity.
    pub fn index_of(&self, commit: &Commit) -> Option<CommitId> {
        self.commits
            .iter()
            .position(|c| std::ptr::eq(Arc::as_ptr(c), commit))
    }

    pub fn commit(&self, id: CommitId) -> Option<&Arc<Commit>> {
        self.commits.get(id)
    }

    /// Record the steps of `tr` as pending and carry attribution across them.
    pub fn apply_transform(&self, tr: &Transform) -> HistoryState {
        if !tr.doc_changed() {
            return self.clone();
        }
        let inverted = tr
            .steps()
            .iter()
            .zip(tr.docs())
            .map(|(step, pre)| step.invert(pre));

        let mut pending_operations = self.pending_operations.clone();
        pending_operations.extend(inverted);
        let mut pending_maps = self.pending_maps.clone();
        pending_maps.extend(tr.mapping().maps().iter().cloned());

        HistoryState {
            attribution: self.attribution.update(tr, self.pending_id()),
            commits: self.commits.clone(),
            pending_operations,
            pending_maps,
        }
    }

    /// Fold the pending steps into a new commit. No-op when nothing is pending.
    pub fn apply_commit<S: Into<String>>(&self, message: S, time: DateTime<Utc>) -> HistoryState {
        if !self.has_pending() {
            return self.clone();
        }
        let commit = Commit {
            message: message.into(),
            time,
            operations: self.pending_operations.clone(),
            maps: self.pending_maps.clone(),
        };
        tracing::debug!(
            "commit {} {:?} with {} steps",
            self.pending_id(),
            commit.message,
            commit.operations.len()
        );
        let mut commits = self.commits.clone();
        commits.push(Arc::new(commit));
        HistoryState {
            attribution: self.attribution.clone(),
            commits,
            pending_operations: Vec::new(),
            pending_maps: Vec::new(),
        }
    }
}
