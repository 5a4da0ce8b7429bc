//! Invertible replace steps and transforms built from them.

use std::fmt;

use rope::Rope;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::interval::Interval;
use crate::mapping::{Bias, Mappable, Mapping, StepMap};
use crate::Result;

/// Replace the byte range `[from, to)` with `text`.
///
/// Pure insertions have `from == to`, pure deletions an empty `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub from: usize,
    pub to: usize,
    pub text: String,
}

impl Step {
    pub fn replace<S: Into<String>>(from: usize, to: usize, text: S) -> Step {
        Step {
            from,
            to,
            text: text.into(),
        }
    }

    pub fn range(&self) -> Interval {
        Interval::new(self.from, self.to)
    }

    /// Replaces nothing with nothing.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.text.is_empty()
    }

    fn check(&self, doc: &Rope) -> Result<()> {
        if self.from > self.to || self.to > doc.len() {
            return Err(TrackError::StepOutOfRange {
                from: self.from,
                to: self.to,
                len: doc.len(),
            });
        }
        for &offset in &[self.from, self.to] {
            if offset != doc.len() && !doc.is_codepoint_boundary(offset) {
                return Err(TrackError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }

    /// Produce the document after this step, rejecting ranges the document can't hold.
    pub fn apply(&self, doc: &Rope) -> Result<Rope> {
        self.check(doc)?;
        let mut out = doc.clone();
        out.edit(self.from..self.to, self.text.as_str());
        Ok(out)
    }

    /// The step undoing this one. `pre` must be the document this step was applied to.
    pub fn invert(&self, pre: &Rope) -> Step {
        Step {
            from: self.from,
            to: self.from + self.text.len(),
            text: pre.slice_to_cow(self.from..self.to).into_owned(),
        }
    }

    pub fn get_map(&self) -> StepMap {
        StepMap::new(vec![self.from, self.to - self.from, self.text.len()])
    }

    /// Rebase the step through `mapping`; `None` when the whole range was deleted.
    pub fn map<M: Mappable>(&self, mapping: &M) -> Option<Step> {
        let from = mapping.map_result(self.from, Bias::Right);
        let to = mapping.map_result(self.to, Bias::Left);
        if from.deleted_across && to.deleted_across {
            return None;
        }
        Some(Step {
            from: from.pos,
            to: from.pos.max(to.pos),
            text: self.text.clone(),
        })
    }
}

/// An ordered run of steps applied to a document.
///
/// Keeps the document before every step so inverses can be computed later.
#[derive(Clone)]
pub struct Transform {
    before: Rope,
    doc: Rope,
    steps: Vec<Step>,
    docs: Vec<Rope>,
    mapping: Mapping,
}

impl Transform {
    pub fn new(doc: Rope) -> Transform {
        Transform {
            before: doc.clone(),
            doc,
            steps: Vec::new(),
            docs: Vec::new(),
            mapping: Mapping::default(),
        }
    }

    /// Document the transform started from.
    pub fn before(&self) -> &Rope {
        &self.before
    }

    /// Document after all steps.
    pub fn doc(&self) -> &Rope {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// `docs()[i]` is the document `steps()[i]` was applied to.
    pub fn docs(&self) -> &[Rope] {
        &self.docs
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    fn add_step(&mut self, step: Step, next: Rope) {
        let prev = std::mem::replace(&mut self.doc, next);
        self.docs.push(prev);
        self.mapping.append_map(step.get_map(), None);
        self.steps.push(step);
    }

    /// Apply a step, failing if the current document doesn't admit it.
    ///
    /// No-op steps are validated but not recorded.
    pub fn step(&mut self, step: Step) -> Result<&mut Transform> {
        let next = step.apply(&self.doc)?;
        if !step.is_noop() {
            self.add_step(step, next);
        }
        Ok(self)
    }

    /// Apply a step if it fits and changes something; otherwise leave the transform untouched.
    pub fn maybe_step(&mut self, step: Step) -> bool {
        if step.is_noop() {
            return false;
        }
        match step.apply(&self.doc) {
            Ok(next) => {
                self.add_step(step, next);
                true
            }
            Err(err) => {
                tracing::trace!("skipping step {:?}: {}", step.range(), err);
                false
            }
        }
    }

    pub fn replace<S: Into<String>>(&mut self, from: usize, to: usize, text: S) -> Result<&mut Transform> {
        self.step(Step::replace(from, to, text))
    }

    pub fn insert<S: Into<String>>(&mut self, pos: usize, text: S) -> Result<&mut Transform> {
        self.replace(pos, pos, text)
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Transform> {
        self.replace(from, to, String::new())
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transform")
            .field("steps", &self.steps)
            .field("doc", &crate::text_of(&self.doc))
            .finish()
    }
}
