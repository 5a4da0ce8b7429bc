use std::fmt;

/// Half open interval: [beg, end)
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Interval {
    pub beg: usize,
    pub end: usize,
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}--{})", self.beg, self.end)
    }
}

impl From<(usize, usize)> for Interval {
    fn from((beg, end): (usize, usize)) -> Interval {
        Interval { beg, end }
    }
}

impl Interval {
    pub fn new(beg: usize, end: usize) -> Interval {
        Interval { beg, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.beg)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.beg
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.beg <= pos && pos < self.end
    }
}
