//! Position mapping through a pipeline of edits.
//!
//! Every step produces a [`StepMap`]: a list of `(start, old_size, new_size)`
//! triples describing which ranges it replaced. A [`Mapping`] is an ordered
//! pipeline of step maps that can be sliced to a suffix, extended at the end,
//! or have a fragment inserted at an arbitrary slot.
//!
//! Two fragments can be linked as mirrors (a step and the step that undoes it).
//! When a position is swallowed by the first and restored by the second, the
//! pipeline recovers its exact offset instead of collapsing it to a boundary.

use serde::{Deserialize, Serialize};

/// Which side a position sticks to when content is inserted exactly at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bias {
    Left,
    Right,
}

/// Token pointing into a replaced range, used to recover positions through mirrors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recover {
    index: usize,
    offset: usize,
}

/// Result of mapping a single position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapResult {
    pub pos: usize,
    /// The content on the biased side of the position was deleted.
    pub deleted: bool,
    /// The position was strictly inside a replaced range.
    pub deleted_across: bool,
    recover: Option<Recover>,
}

/// Anything positions can be mapped through.
pub trait Mappable {
    fn map_result(&self, pos: usize, bias: Bias) -> MapResult;

    fn map(&self, pos: usize, bias: Bias) -> usize {
        self.map_result(pos, bias).pos
    }
}

/// Position map of a single step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMap {
    ranges: Vec<usize>,
    #[serde(default)]
    inverted: bool,
}

impl StepMap {
    /// `ranges` holds `(start, old_size, new_size)` triples in increasing order.
    pub fn new(ranges: Vec<usize>) -> StepMap {
        debug_assert!(ranges.len() % 3 == 0);
        StepMap {
            ranges,
            inverted: false,
        }
    }

    pub fn ranges(&self) -> &[usize] {
        &self.ranges
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Map positions in the document after the step back to the one before.
    pub fn invert(&self) -> StepMap {
        StepMap {
            ranges: self.ranges.clone(),
            inverted: !self.inverted,
        }
    }

    fn sizes(&self) -> (usize, usize) {
        if self.inverted { (2, 1) } else { (1, 2) }
    }

    /// Calls `f(old_start, old_end, new_start, new_end)` for every changed range.
    pub fn for_each_change<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, usize, usize),
    {
        let (old_index, new_index) = self.sizes();
        let mut diff: isize = 0;
        for chunk in self.ranges.chunks(3) {
            let start = chunk[0] as isize;
            let old_start = if self.inverted { start - diff } else { start };
            let new_start = if self.inverted { start } else { start + diff };
            let (old_size, new_size) = (chunk[old_index], chunk[new_index]);
            f(
                old_start as usize,
                old_start as usize + old_size,
                new_start as usize,
                new_start as usize + new_size,
            );
            diff += new_size as isize - old_size as isize;
        }
    }

    /// Position inside the replacement that corresponds to a recover token.
    pub fn recover(&self, token: Recover) -> usize {
        let mut diff: isize = 0;
        if !self.inverted {
            for chunk in self.ranges.chunks(3).take(token.index) {
                diff += chunk[2] as isize - chunk[1] as isize;
            }
        }
        (self.ranges[token.index * 3] as isize + diff) as usize + token.offset
    }
}

impl Mappable for StepMap {
    fn map_result(&self, pos: usize, bias: Bias) -> MapResult {
        let (old_index, new_index) = self.sizes();
        let mut diff: isize = 0;
        for (index, chunk) in self.ranges.chunks(3).enumerate() {
            let start = (chunk[0] as isize - if self.inverted { diff } else { 0 }) as usize;
            if start > pos {
                break;
            }
            let (old_size, new_size) = (chunk[old_index], chunk[new_index]);
            let end = start + old_size;
            if pos <= end {
                let side = if old_size == 0 {
                    bias
                } else if pos == start {
                    Bias::Left
                } else if pos == end {
                    Bias::Right
                } else {
                    bias
                };
                let base = (start as isize + diff) as usize;
                let biased_edge = match bias {
                    Bias::Left => start,
                    Bias::Right => end,
                };
                return MapResult {
                    pos: if side == Bias::Left { base } else { base + new_size },
                    deleted: pos != biased_edge,
                    deleted_across: pos != start && pos != end,
                    recover: if pos == biased_edge {
                        None
                    } else {
                        Some(Recover { index, offset: pos - start })
                    },
                };
            }
            diff += new_size as isize - old_size as isize;
        }
        MapResult {
            pos: (pos as isize + diff) as usize,
            deleted: false,
            deleted_across: false,
            recover: None,
        }
    }
}

/// Ordered pipeline of step maps, optionally restricted to a suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
    mirrors: Vec<(usize, usize)>,
    from: usize,
}

impl Mapping {
    pub fn new(maps: Vec<StepMap>) -> Mapping {
        Mapping {
            maps,
            mirrors: Vec::new(),
            from: 0,
        }
    }

    /// All fragments, including any before the slice start.
    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    /// Number of fragments the mapping actually runs through.
    pub fn len(&self) -> usize {
        self.maps.len() - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restrict to the fragments at index `from` and later.
    pub fn slice(&self, from: usize) -> Mapping {
        Mapping {
            maps: self.maps.clone(),
            mirrors: self.mirrors.clone(),
            from: from.min(self.maps.len()),
        }
    }

    pub fn mirror_of(&self, n: usize) -> Option<usize> {
        self.mirrors.iter().find_map(|&(a, b)| {
            if a == n {
                Some(b)
            } else if b == n {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Append a fragment, optionally linking it as the mirror of slot `mirror_of`.
    pub fn append_map(&mut self, map: StepMap, mirror_of: Option<usize>) {
        self.maps.push(map);
        if let Some(m) = mirror_of {
            self.mirrors.push((self.maps.len() - 1, m));
        }
    }

    /// Append the active fragments of `other`, keeping its internal mirror links.
    pub fn append_mapping(&mut self, other: &Mapping) {
        let start_size = self.maps.len();
        for i in other.from..other.maps.len() {
            let mirror = other
                .mirror_of(i)
                .filter(|&m| m < i && m >= other.from)
                .map(|m| start_size + m - other.from);
            self.append_map(other.maps[i].clone(), mirror);
        }
    }

    /// `self` followed by `other`.
    pub fn concat(mut self, other: &Mapping) -> Mapping {
        self.append_mapping(other);
        self
    }

    /// Insert a fragment at slot `at`, shifting later fragments and their mirror links.
    pub fn insert_map(&mut self, at: usize, map: StepMap) {
        let at = at.min(self.maps.len());
        self.maps.insert(at, map);
        let shift = |n: usize| if n >= at { n + 1 } else { n };
        for pair in self.mirrors.iter_mut() {
            *pair = (shift(pair.0), shift(pair.1));
        }
        if at < self.from {
            self.from += 1;
        }
    }
}

impl Mappable for Mapping {
    fn map_result(&self, pos: usize, bias: Bias) -> MapResult {
        let mut pos = pos;
        let mut deleted = false;
        let mut deleted_across = false;
        let mut i = self.from;
        while i < self.maps.len() {
            let result = self.maps[i].map_result(pos, bias);
            if let Some(token) = result.recover {
                if let Some(corr) = self.mirror_of(i).filter(|&c| c > i && c < self.maps.len()) {
                    pos = self.maps[corr].recover(token);
                    i = corr + 1;
                    continue;
                }
            }
            deleted |= result.deleted;
            deleted_across |= result.deleted_across;
            pos = result.pos;
            i += 1;
        }
        MapResult {
            pos,
            deleted,
            deleted_across,
            recover: None,
        }
    }
}

impl From<Vec<StepMap>> for Mapping {
    fn from(maps: Vec<StepMap>) -> Mapping {
        Mapping::new(maps)
    }
}
