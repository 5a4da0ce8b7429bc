use std::{cmp, fmt};

use crate::interval::Interval;
use crate::mapping::{Bias, Mappable};
use crate::step::Transform;

/// Index of a commit in the history.
pub type CommitId = usize;

/// A live byte range and the commit that inserted it (`None` for pre-history content).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub iv: Interval,
    pub commit: Option<CommitId>,
}

impl Span {
    pub fn new(beg: usize, end: usize, commit: Option<CommitId>) -> Span {
        Span {
            iv: Interval { beg, end },
            commit,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.commit {
            Some(id) => write!(f, "{:?}@{}", self.iv, id),
            None => write!(f, "{:?}@-", self.iv),
        }
    }
}

/// Ordered, gapless, coalesced spans covering the whole document.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AttributionMap {
    inner: Vec<Span>, // FIXME optimize; use a tree
}

impl fmt::Debug for AttributionMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a> PartialEq<&'a [(usize, usize, Option<CommitId>)]> for AttributionMap {
    fn eq(&self, other: &&'a [(usize, usize, Option<CommitId>)]) -> bool {
        self.inner.len() == other.len()
            && self
                .inner
                .iter()
                .zip(*other)
                .all(|(this, &(beg, end, commit))| *this == Span::new(beg, end, commit))
    }
}

impl AttributionMap {
    /// Map for a freshly opened document: one unattributed span (none if empty).
    pub fn new(doc_len: usize) -> AttributionMap {
        let mut inner = Vec::new();
        if doc_len > 0 {
            inner.push(Span::new(0, doc_len, None));
        }
        AttributionMap { inner }
    }

    pub fn spans(&self) -> &[Span] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Commit responsible for the byte at `pos`; outer `None` past the end.
    pub fn attribution_at(&self, pos: usize) -> Option<Option<CommitId>> {
        let idx = self.inner.partition_point(|span| span.iv.end <= pos);
        self.inner
            .get(idx)
            .filter(|span| span.iv.contains(pos))
            .map(|span| span.commit)
    }

    pub fn spans_for(&self, commit: CommitId) -> impl Iterator<Item = &Span> + '_ {
        self.inner.iter().filter(move |span| span.commit == Some(commit))
    }

    /// Checks sortedness, full coverage of `[0, doc_len)` and maximal coalescing.
    pub fn is_well_formed(&self, doc_len: usize) -> bool {
        let mut at = 0;
        let mut prev: Option<&Span> = None;
        for span in &self.inner {
            if span.iv.beg != at || span.iv.is_empty() {
                return false;
            }
            if prev.map_or(false, |p| p.commit == span.commit) {
                return false;
            }
            at = span.iv.end;
            prev = Some(span);
        }
        at == doc_len
    }

    /// Carry the map across `tr`, attributing everything it inserts to `commit`.
    pub fn update(&self, tr: &Transform, commit: CommitId) -> AttributionMap {
        let mapping = tr.mapping();
        let mut inner: Vec<Span> = Vec::with_capacity(self.inner.len() + 2);
        for span in &self.inner {
            let beg = mapping.map(span.iv.beg, Bias::Left);
            let end = mapping.map(span.iv.end, Bias::Right);
            if beg >= end {
                continue;
            }
            match inner.last_mut() {
                Some(last) if last.commit == span.commit && last.iv.end >= beg => {
                    last.iv.end = cmp::max(last.iv.end, end);
                }
                _ => inner.push(Span::new(beg, end, span.commit)),
            }
        }

        let mut map = AttributionMap { inner };
        for (i, step_map) in mapping.maps().iter().enumerate() {
            let after = mapping.slice(i + 1);
            step_map.for_each_change(|_, _, beg, end| {
                let iv = Interval::new(after.map(beg, Bias::Right), after.map(end, Bias::Left));
                map.insert_span(iv, commit);
            });
        }
        map
    }

    /// Overwrite `iv` with `commit`, splitting, truncating and absorbing neighbours.
    pub fn insert_span<T>(&mut self, iv: T, commit: CommitId)
    where
        T: Into<Interval>,
    {
        let Interval { mut beg, mut end } = iv.into();
        if beg >= end {
            return;
        }
        let commit = Some(commit);

        let mut pos = 0;
        while let Some(next) = self.inner.get(pos).copied() {
            if next.commit == commit {
                if next.iv.end >= beg {
                    break;
                }
            } else if next.iv.end > beg {
                // sticks out to the left; keep that part
                if next.iv.beg < beg {
                    let left = Span::new(next.iv.beg, beg, next.commit);
                    if next.iv.end > end {
                        self.inner.insert(pos, left);
                    } else {
                        self.inner[pos] = left;
                    }
                    pos += 1;
                }
                break;
            }
            pos += 1;
        }

        let mut stop = pos;
        let mut tail = None;
        while let Some(next) = self.inner.get(stop).copied() {
            if next.commit == commit {
                if next.iv.beg > end {
                    break;
                }
                beg = cmp::min(beg, next.iv.beg);
                end = cmp::max(end, next.iv.end);
            } else {
                if next.iv.beg >= end {
                    break;
                }
                if next.iv.end > end {
                    tail = Some(Span::new(end, next.iv.end, next.commit));
                    stop += 1;
                    break;
                }
            }
            stop += 1;
        }

        tracing::trace!("span ({}--{})@{:?} replaces {} spans", beg, end, commit, stop - pos);
        let new = Span::new(beg, end, commit);
        self.inner.splice(pos..stop, Some(new).into_iter().chain(tail));
    }
}

#[cfg(test)]
mod tests {
    use super::AttributionMap;
    use crate::step::Transform;
    use rope::Rope;

    #[test]
    fn insert_span_splits_and_coalesces() {
        let mut map = AttributionMap::new(10);
        map.insert_span((3, 5), 0);
        assert_eq!(map, &[(0, 3, None), (3, 5, Some(0)), (5, 10, None)][..]);
        map.insert_span((5, 7), 0);
        assert_eq!(map, &[(0, 3, None), (3, 7, Some(0)), (7, 10, None)][..]);
        map.insert_span((4, 8), 1);
        assert_eq!(map, &[(0, 3, None), (3, 4, Some(0)), (4, 8, Some(1)), (8, 10, None)][..]);
        map.insert_span((2, 10), 0);
        assert_eq!(map, &[(0, 2, None), (2, 10, Some(0))][..]);
        assert!(map.is_well_formed(10));
    }

    #[test]
    fn insert_span_ignores_empty_range() {
        let mut map = AttributionMap::new(4);
        map.insert_span((2, 2), 0);
        assert_eq!(map, &[(0, 4, None)][..]);
    }

    #[test]
    fn update_attributes_insertion() {
        let map = AttributionMap::new(5);
        let mut tr = Transform::new(Rope::from("Hello"));
        tr.insert(5, " world").unwrap();
        let map = map.update(&tr, 0);
        assert_eq!(map, &[(0, 5, None), (5, 11, Some(0))][..]);
        assert_eq!(map.attribution_at(7), Some(Some(0)));
        assert_eq!(map.attribution_at(11), None);
    }

    #[test]
    fn update_drops_deleted_spans_and_merges_neighbours() {
        let mut map = AttributionMap::new(9);
        map.insert_span((3, 6), 0);
        let mut tr = Transform::new(Rope::from("abcdefghi"));
        tr.delete(3, 6).unwrap();
        let map = map.update(&tr, 1);
        assert_eq!(map, &[(0, 6, None)][..]);
    }

    #[test]
    fn update_handles_replace_inside_span() {
        let map = AttributionMap::new(6);
        let mut tr = Transform::new(Rope::from("abcdef"));
        tr.replace(2, 4, "XYZ").unwrap().insert(0, "_").unwrap();
        let map = map.update(&tr, 2);
        assert_eq!(
            map,
            &[(0, 1, Some(2)), (1, 3, None), (3, 6, Some(2)), (6, 8, None)][..]
        );
        assert!(map.is_well_formed(8));
    }

    #[test]
    fn empty_document_has_no_spans() {
        let map = AttributionMap::new(0);
        assert!(map.is_empty());
        assert!(map.is_well_formed(0));
        let mut tr = Transform::new(Rope::from(""));
        tr.insert(0, "abc").unwrap();
        assert_eq!(map.update(&tr, 0), &[(0, 3, Some(0))][..]);
    }
}
