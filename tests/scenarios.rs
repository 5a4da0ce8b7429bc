//! End-to-end scenarios driven through the host command surface.

use blame_track::{Commit, Interval, Tracker, TrackerConfig};

// =============================================================================
// Helpers
// =============================================================================

fn tracker(text: &str) -> Tracker {
    Tracker::new(text, TrackerConfig::default())
}

fn insert(tracker: &mut Tracker, pos: usize, text: &str) {
    let mut tr = tracker.transform();
    tr.insert(pos, text).unwrap();
    tracker.edit(tr);
}

fn delete(tracker: &mut Tracker, from: usize, to: usize) {
    let mut tr = tracker.transform();
    tr.delete(from, to).unwrap();
    tracker.edit(tr);
}

// =============================================================================
// Attribution
// =============================================================================

#[test]
fn insertion_is_attributed_to_its_commit() {
    let mut t = tracker("Hello");
    insert(&mut t, 5, " world");
    assert!(t.commit("add world"));

    assert_eq!(t.text(), "Hello world");
    assert_eq!(t.list_commits().len(), 1);
    assert_eq!(t.list_commits()[0].message(), "add world");
    assert_eq!(*t.history().attribution(), &[(0, 5, None), (5, 11, Some(0))][..]);
}

#[test]
fn deleting_committed_text_removes_its_span() {
    let mut t = tracker("Hello");
    insert(&mut t, 5, " world");
    t.commit("add world");
    delete(&mut t, 5, 11);
    assert!(t.commit("remove world"));

    assert_eq!(t.text(), "Hello");
    assert_eq!(t.list_commits().len(), 2);
    assert_eq!(*t.history().attribution(), &[(0, 5, None)][..]);
}

#[test]
fn uncommitted_edits_share_the_prospective_id() {
    let mut t = tracker("abc");
    insert(&mut t, 0, "1");
    insert(&mut t, 4, "2");
    let pending = t.history().pending_id();
    assert_eq!(
        *t.history().attribution(),
        &[(0, 1, Some(pending)), (1, 4, None), (4, 5, Some(pending))][..]
    );
    t.commit("both ends");
    assert_eq!(t.list_commits().len() - 1, pending);
}

// =============================================================================
// Revert
// =============================================================================

#[test]
fn revert_keeps_later_commit() {
    let mut t = tracker("abc");
    insert(&mut t, 1, "X");
    t.commit("c0");
    insert(&mut t, 3, "Y");
    t.commit("c1");
    assert_eq!(t.text(), "aXbYc");

    let c0 = t.list_commits()[0].clone();
    assert!(t.revert(&c0));
    assert_eq!(t.text(), "abYc");
    assert_eq!(t.list_commits().last().unwrap().message(), "Revert 'c0'");
}

#[test]
fn revert_with_pending_edits_is_refused() {
    let mut t = tracker("abc");
    insert(&mut t, 0, "#");
    t.commit("c0");
    insert(&mut t, 1, "X");

    let c0 = t.list_commits()[0].clone();
    assert!(!t.revert(&c0));
    assert_eq!(t.text(), "#Xabc");
    assert_eq!(t.list_commits().len(), 1);
}

#[test]
fn revert_of_commit_from_other_session_is_refused() {
    let mut other = tracker("abc");
    insert(&mut other, 1, "X");
    other.commit("c0");
    let stranger: Commit = (*other.list_commits()[0]).clone();

    let mut t = tracker("abc");
    insert(&mut t, 1, "X");
    t.commit("c0");
    assert!(!t.revert(&stranger));
    assert_eq!(t.text(), "aXbc");
}

#[test]
fn revert_right_after_commit_restores_text() {
    let mut t = tracker("The quick fox");
    let mut tr = t.transform();
    tr.replace(4, 9, "slow")
        .unwrap()
        .insert(0, ">> ")
        .unwrap()
        .delete(11, 12)
        .unwrap();
    t.edit(tr);
    t.commit("rewrite");
    assert_eq!(t.text(), ">> The slowfox");

    let target = t.list_commits()[0].clone();
    assert!(t.revert(&target));
    assert_eq!(t.text(), "The quick fox");
}

#[test]
fn conflicting_revert_is_partial() {
    let mut t = tracker("one");
    insert(&mut t, 3, " two");
    insert(&mut t, 0, "zero ");
    t.commit("grow");
    delete(&mut t, 8, 12);
    t.commit("drop two");
    assert_eq!(t.text(), "zero one");

    let grow = t.list_commits()[0].clone();
    assert!(t.revert(&grow));
    assert_eq!(t.text(), "one");
}

#[test]
fn fully_conflicted_revert_changes_nothing() {
    let mut t = tracker("ab");
    insert(&mut t, 2, "cd");
    t.commit("cd");
    delete(&mut t, 1, 4);
    t.commit("cut");

    let cd = t.list_commits()[0].clone();
    assert!(t.revert(&cd));
    assert_eq!(t.text(), "a");
    assert_eq!(t.list_commits().len(), 2);
}

// =============================================================================
// Highlight
// =============================================================================

#[test]
fn highlight_follows_edits() {
    let mut t = tracker("Hello");
    insert(&mut t, 5, " world");
    t.commit("c0");
    let c0 = t.list_commits()[0].clone();

    t.highlight(&c0);
    assert_eq!(t.highlights().decorations()[0].iv, Interval::new(5, 11));

    insert(&mut t, 0, ">>> ");
    assert_eq!(t.highlights().active(), Some(0));
    assert_eq!(t.highlights().decorations()[0].iv, Interval::new(9, 15));
}

#[test]
fn highlight_twice_equals_once() {
    let mut t = tracker("Hello");
    insert(&mut t, 0, "Oh ");
    t.commit("c0");
    let c0 = t.list_commits()[0].clone();

    t.highlight(&c0);
    let once = t.highlights().clone();
    t.highlight(&c0);
    assert_eq!(*t.highlights(), once);
}

#[test]
fn clearing_another_commit_keeps_highlight() {
    let mut t = tracker("ab");
    insert(&mut t, 0, "1");
    t.commit("c0");
    insert(&mut t, 3, "2");
    t.commit("c1");
    let (c0, c1) = (t.list_commits()[0].clone(), t.list_commits()[1].clone());

    t.highlight(&c0);
    t.clear_highlight(&c1);
    assert_eq!(t.highlights().active(), Some(0));

    t.highlight(&c1);
    assert_eq!(t.highlights().active(), Some(1));
    assert_eq!(t.highlights().decorations()[0].iv, Interval::new(3, 4));
}

#[test]
fn custom_highlight_class() {
    let config = TrackerConfig::from_json(r#"{"highlight_class": "changed"}"#).unwrap();
    let mut t = Tracker::new("x", config);
    insert(&mut t, 1, "y");
    t.commit("y");
    let c0 = t.list_commits()[0].clone();
    t.highlight(&c0);
    assert_eq!(&*t.highlights().decorations()[0].class, "changed");
}
