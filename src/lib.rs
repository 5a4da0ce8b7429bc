//! Commit attribution and selective revert for an edited text buffer.
//!
//! Every edit is a [`Transform`]: a run of invertible replace [`Step`]s over an
//! `xi_rope::Rope`. The tracker keeps an [`AttributionMap`] saying which commit
//! inserted each live byte range, buffers inverse steps until they are grouped
//! into a named [`Commit`], and can later synthesize a transaction undoing any
//! one commit, rebased over everything that happened since.
//!
//! # Attribution
//!
//! Spans produced by edits that are not committed yet carry the id the next
//! commit will get (`HistoryState::pending_id`), so committing never has to
//! touch the map.
//!
//! # Revert
//!
//! Reverting is best effort: inverse steps that no longer map onto the current
//! document are skipped, and a revert that changes nothing is still a success.
//! Reverting needs a clean buffer and a commit that belongs to this history.

extern crate xi_rope as rope;

mod attribution;
mod config;
mod error;
mod highlight;
mod history;
mod interval;
mod mapping;
mod revert;
mod state;
mod step;
mod tracker;

pub use attribution::{AttributionMap, CommitId, Span};
pub use config::TrackerConfig;
pub use error::TrackError;
pub use highlight::{Decoration, HighlightAction, HighlightState};
pub use history::{Commit, HistoryState};
pub use interval::Interval;
pub use mapping::{Bias, MapResult, Mappable, Mapping, Recover, StepMap};
pub use revert::revert_commit;
pub use state::{TrackState, Transaction};
pub use step::{Step, Transform};
pub use tracker::Tracker;

pub use rope::Rope;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Contents of a rope as an owned string.
pub fn text_of(rope: &Rope) -> String {
    rope.slice_to_cow(..).into_owned()
}
