use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::location::Vertex;

/// The error returned when two vertices do not delimit a segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("vertices {0} and {1} are not lattice-adjacent")]
pub struct NotAdjacent(pub Vertex, pub Vertex);

fn adjacent(a: Vertex, b: Vertex) -> bool {
    (a.0 == b.0 && a.1.abs_diff(b.1) == 1) || (a.1 == b.1 && a.0.abs_diff(b.0) == 1)
}

/// An undirected connection between two lattice-adjacent vertices.
///
/// Identity is order-blind: the endpoint pair is normalized at construction,
/// so the same physical edge always compares, hashes, and sorts the same no
/// matter which way around it was named.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Segment {
    ends: UnorderedPair<Vertex>,
}

impl Segment {
    /// Build the segment between `a` and `b`, rejecting pairs that are not
    /// lattice-adjacent (differing by 1 in exactly one coordinate).
    pub fn new(a: Vertex, b: Vertex) -> Result<Self, NotAdjacent> {
        match adjacent(a, b) {
            true => Ok(Self::join(a, b)),
            false => Err(NotAdjacent(a, b)),
        }
    }

    /// [`Segment::new`] for endpoints already known to be adjacent.
    pub(crate) fn join(a: Vertex, b: Vertex) -> Self {
        debug_assert!(adjacent(a, b), "{a} and {b} are not lattice-adjacent");
        let (lo, hi) = match a.cmp(&b) {
            Ordering::Less => (a, b),
            _ => (b, a),
        };
        Self {
            ends: UnorderedPair(lo, hi),
        }
    }

    /// Both endpoints, lowest (row-major) first.
    pub fn endpoints(self) -> (Vertex, Vertex) {
        (self.ends.0, self.ends.1)
    }

    /// Whether `vertex` is one of the two endpoints.
    pub fn touches(self, vertex: Vertex) -> bool {
        self.ends.0 == vertex || self.ends.1 == vertex
    }

    /// The endpoint that is not `vertex`.
    ///
    /// # Panics
    /// Panics if `vertex` is not an endpoint of this segment.
    pub fn other_end(self, vertex: Vertex) -> Vertex {
        if self.ends.0 == vertex {
            self.ends.1
        } else if self.ends.1 == vertex {
            self.ends.0
        } else {
            panic!("{vertex} is not an endpoint of {self}")
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.endpoints().cmp(&other.endpoints())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.ends.0, self.ends.1)
    }
}
