use std::sync::Arc;

use rope::Rope;

use crate::config::TrackerConfig;
use crate::highlight::{HighlightAction, HighlightState};
use crate::history::{Commit, HistoryState};
use crate::revert::revert_commit;
use crate::state::{TrackState, Transaction};
use crate::step::Transform;

/// A tracked document and the commands a host drives it with.
#[derive(Debug)]
pub struct Tracker {
    state: TrackState,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(text: &str, config: TrackerConfig) -> Tracker {
        Tracker::with_doc(Rope::from(text), config)
    }

    pub fn with_doc(doc: Rope, config: TrackerConfig) -> Tracker {
        Tracker {
            state: TrackState::init(doc, &config),
            config,
        }
    }

    pub fn doc(&self) -> &Rope {
        self.state.doc()
    }

    pub fn text(&self) -> String {
        crate::text_of(self.state.doc())
    }

    /// Current snapshot; stays valid after further edits.
    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn history(&self) -> &HistoryState {
        self.state.history()
    }

    pub fn highlights(&self) -> &HighlightState {
        self.state.highlight()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Fresh transform against the current document.
    pub fn transform(&self) -> Transform {
        Transform::new(self.state.doc().clone())
    }

    pub fn dispatch(&mut self, tr: Transaction) {
        self.state = self.state.apply(&tr);
    }

    pub fn edit(&mut self, transform: Transform) {
        self.dispatch(Transaction::new(transform));
    }

    pub fn list_commits(&self) -> &[Arc<Commit>] {
        self.history().commits()
    }

    /// Commit pending edits. False when there is nothing to commit.
    pub fn commit(&mut self, message: &str) -> bool {
        if !self.history().has_pending() {
            return false;
        }
        let tr = Transaction::new(self.transform()).with_commit(message);
        self.dispatch(tr);
        true
    }

    /// Undo `commit` as far as it still applies. False when the revert was refused.
    pub fn revert(&mut self, commit: &Commit) -> bool {
        match revert_commit(self.history(), self.doc(), commit, &self.config) {
            Ok(tr) => {
                self.dispatch(tr);
                true
            }
            Err(err) => {
                tracing::warn!("revert of {:?} refused: {}", commit.message(), err);
                false
            }
        }
    }

    pub fn highlight(&mut self, commit: &Commit) {
        self.toggle_highlight(commit, HighlightAction::Add);
    }

    pub fn clear_highlight(&mut self, commit: &Commit) {
        self.toggle_highlight(commit, HighlightAction::Clear);
    }

    fn toggle_highlight<F>(&mut self, commit: &Commit, action: F)
    where
        F: FnOnce(usize) -> HighlightAction,
    {
        match self.history().index_of(commit) {
            Some(id) => {
                let tr = Transaction::new(self.transform()).with_highlight(action(id));
                self.dispatch(tr);
            }
            None => tracing::warn!("commit {:?} is not in history, ignoring highlight", commit.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tracker;
    use crate::config::TrackerConfig;

    #[test]
    fn commit_needs_pending_edits() {
        let mut tracker = Tracker::new("abc", TrackerConfig::default());
        assert!(!tracker.commit("empty"));
        let mut tr = tracker.transform();
        tr.insert(3, "!").unwrap();
        tracker.edit(tr);
        assert!(tracker.commit("bang"));
        assert_eq!(tracker.list_commits().len(), 1);
        assert!(!tracker.commit("again"));
    }

    #[test]
    fn revert_becomes_its_own_commit() {
        let mut tracker = Tracker::new("abc", TrackerConfig::default());
        let mut tr = tracker.transform();
        tr.delete(0, 1).unwrap();
        tracker.edit(tr);
        tracker.commit("drop a");

        let target = tracker.list_commits()[0].clone();
        assert!(tracker.revert(&target));
        assert_eq!(tracker.text(), "abc");
        assert_eq!(tracker.list_commits().len(), 2);
        assert_eq!(tracker.list_commits()[1].message(), "Revert 'drop a'");
        assert_eq!(*tracker.history().attribution(), &[(0, 1, Some(1)), (1, 3, None)][..]);
    }
}
