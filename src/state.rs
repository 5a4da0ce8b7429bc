//! Transactions and the snapshot they advance.
//!
//! [`TrackState::init`] and [`TrackState::apply`] are the whole state machine:
//! a host feeds one transaction at a time and keeps the returned snapshot.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rope::Rope;

use crate::config::TrackerConfig;
use crate::highlight::{HighlightAction, HighlightState};
use crate::history::HistoryState;
use crate::step::Transform;

/// An edit plus the metadata the tracker reacts to.
#[derive(Clone, Debug)]
pub struct Transaction {
    transform: Transform,
    time: DateTime<Utc>,
    commit_message: Option<String>,
    highlight: Option<HighlightAction>,
}

impl Transaction {
    pub fn new(transform: Transform) -> Transaction {
        Transaction {
            transform,
            time: Utc::now(),
            commit_message: None,
            highlight: None,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Transaction {
        self.time = time;
        self
    }

    /// Commit pending edits, including this transaction's own, under `message`.
    pub fn with_commit<S: Into<String>>(mut self, message: S) -> Transaction {
        self.commit_message = Some(message.into());
        self
    }

    pub fn with_highlight(mut self, action: HighlightAction) -> Transaction {
        self.highlight = Some(action);
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn doc_changed(&self) -> bool {
        self.transform.doc_changed()
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn commit_message(&self) -> Option<&str> {
        self.commit_message.as_deref()
    }

    pub fn highlight(&self) -> Option<HighlightAction> {
        self.highlight
    }
}

/// Document, history and overlay as of one transaction.
#[derive(Clone)]
pub struct TrackState {
    doc: Rope,
    history: Arc<HistoryState>,
    highlight: HighlightState,
}

impl TrackState {
    pub fn init(doc: Rope, config: &TrackerConfig) -> TrackState {
        TrackState {
            history: Arc::new(HistoryState::new(&doc)),
            highlight: HighlightState::new(&config.highlight_class),
            doc,
        }
    }

    pub fn doc(&self) -> &Rope {
        &self.doc
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    /// The snapshot after `tr`. `tr` must have been built against `self.doc()`.
    pub fn apply(&self, tr: &Transaction) -> TrackState {
        debug_assert_eq!(tr.transform().before().len(), self.doc.len());

        let mut history = if tr.doc_changed() {
            Arc::new(self.history.apply_transform(tr.transform()))
        } else {
            self.history.clone()
        };
        if let Some(message) = tr.commit_message() {
            if history.has_pending() {
                history = Arc::new(history.apply_commit(message, tr.time()));
            }
        }
        let highlight = self.highlight.apply(tr, &history);
        let doc = if tr.doc_changed() {
            tr.transform().doc().clone()
        } else {
            self.doc.clone()
        };

        TrackState {
            doc,
            history,
            highlight,
        }
    }
}

impl fmt::Debug for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TrackState")
            .field("doc", &crate::text_of(&self.doc))
            .field("history", &self.history)
            .field("highlight", &self.highlight)
            .finish()
    }
}
