//! Render-only overlay marking the ranges attributed to one commit.

use std::sync::Arc;

use crate::attribution::CommitId;
use crate::history::HistoryState;
use crate::interval::Interval;
use crate::mapping::{Bias, Mappable, Mapping};
use crate::state::Transaction;

/// Request carried by a transaction to toggle the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightAction {
    Add(CommitId),
    Clear(CommitId),
}

/// A styled range for the host to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoration {
    pub iv: Interval,
    pub class: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightState {
    decorations: Vec<Decoration>,
    active: Option<CommitId>,
    class: Arc<str>,
}

impl HighlightState {
    /// Idle overlay whose decorations will carry `class`.
    pub fn new(class: &str) -> HighlightState {
        HighlightState {
            decorations: Vec::new(),
            active: None,
            class: Arc::from(class),
        }
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn active(&self) -> Option<CommitId> {
        self.active
    }

    fn for_commit(&self, history: &HistoryState, commit: CommitId) -> HighlightState {
        let decorations = history
            .attribution()
            .spans_for(commit)
            .map(|span| Decoration {
                iv: span.iv,
                class: self.class.clone(),
            })
            .collect();
        HighlightState {
            decorations,
            active: Some(commit),
            class: self.class.clone(),
        }
    }

    /// Shift decorations across an edit, dropping any whose text is gone.
    fn map(&self, mapping: &Mapping) -> HighlightState {
        let decorations = self
            .decorations
            .iter()
            .filter_map(|deco| {
                let beg = mapping.map(deco.iv.beg, Bias::Right);
                let end = mapping.map(deco.iv.end, Bias::Left);
                if beg < end {
                    Some(Decoration {
                        iv: Interval::new(beg, end),
                        class: deco.class.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();
        HighlightState {
            decorations,
            active: self.active,
            class: self.class.clone(),
        }
    }

    /// Next overlay state. `history` is the history after `tr`.
    pub fn apply(&self, tr: &Transaction, history: &HistoryState) -> HighlightState {
        match tr.highlight() {
            Some(HighlightAction::Add(commit)) if self.active != Some(commit) => {
                self.for_commit(history, commit)
            }
            Some(HighlightAction::Clear(commit)) if self.active == Some(commit) => {
                HighlightState::new(&self.class)
            }
            _ if tr.doc_changed() && self.active.is_some() => self.map(tr.transform().mapping()),
            _ => self.clone(),
        }
    }
}
