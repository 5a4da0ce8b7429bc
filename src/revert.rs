use rope::Rope;

use crate::config::TrackerConfig;
use crate::error::TrackError;
use crate::history::{Commit, HistoryState};
use crate::mapping::Mapping;
use crate::state::Transaction;
use crate::step::Transform;
use crate::Result;

/// Build a transaction against `doc` that undoes `target` as far as it still applies.
///
/// Each inverse step is rebased through everything that happened after it,
/// including the parts of this revert already applied. Steps that no longer
/// map or no longer fit the document are skipped, so the result may undo only
/// part of the commit, or nothing at all. A transaction that changes the
/// document carries a commit message so it lands as its own commit.
pub fn revert_commit(
    history: &HistoryState,
    doc: &Rope,
    target: &Commit,
    config: &TrackerConfig,
) -> Result<Transaction> {
    let index = history
        .index_of(target)
        .ok_or(TrackError::CommitNotInHistory)?;
    if history.has_pending() {
        return Err(TrackError::UncommittedChanges(history.pending_operations().len()));
    }

    let mut remap = history.commits()[index..]
        .iter()
        .fold(Mapping::default(), |acc, commit| acc.concat(&commit.mapping()));
    let mut tr = Transform::new(doc.clone());
    let mut skipped = 0;

    for (i, op) in target.operations().iter().enumerate().rev() {
        let remapped = match op.map(&remap.slice(i + 1)) {
            Some(step) => step,
            None => {
                skipped += 1;
                continue;
            }
        };
        let map = remapped.get_map();
        if tr.maybe_step(remapped) {
            remap.append_map(map, Some(i));
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        "revert of commit {} {:?}: {} steps applied, {} skipped",
        index,
        target.message(),
        tr.steps().len(),
        skipped
    );

    let transaction = Transaction::new(tr);
    if transaction.doc_changed() {
        Ok(transaction.with_commit(config.revert_message_for(target.message())))
    } else {
        Ok(transaction)
    }
}
