use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::location::Vertex;
use crate::segment::Segment;

/// The state recorded for one segment in a [`Marks`] store. Absence of a
/// record means the segment is blank.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mark {
    /// Part of the loop being drawn.
    Drawn,
    /// Crossed out; must not carry a line.
    Forbidden,
}

/// Every segment mark of one puzzle session: the mutable drawing state that
/// the player or the solver works against.
///
/// Internally the marks sit on an undirected graph keyed by [`Vertex`], so a
/// segment's identity is order-blind and the marked segments incident to a
/// vertex can be enumerated without scanning the whole store. The structure
/// holds at most one mark per segment, which keeps drawn and forbidden
/// mutually exclusive by construction; mutators return the displaced mark so
/// a caller that needs to restore the exact prior state can.
#[derive(Clone)]
pub struct Marks {
    graph: UnGraphMap<Vertex, Mark>,
}

impl Marks {
    /// An empty store: every segment blank.
    pub fn new() -> Self {
        Self {
            graph: UnGraphMap::new(),
        }
    }

    /// The mark on `seg`, if any.
    pub fn mark(&self, seg: Segment) -> Option<Mark> {
        let (a, b) = seg.endpoints();
        self.graph.edge_weight(a, b).copied()
    }

    /// Whether `seg` carries a line.
    pub fn is_drawn(&self, seg: Segment) -> bool {
        self.mark(seg) == Some(Mark::Drawn)
    }

    /// Whether `seg` is crossed out.
    pub fn is_forbidden(&self, seg: Segment) -> bool {
        self.mark(seg) == Some(Mark::Forbidden)
    }

    /// Whether `seg` carries no mark at all.
    pub fn is_blank(&self, seg: Segment) -> bool {
        self.mark(seg).is_none()
    }

    /// Draw a line on `seg`, returning the mark it displaced.
    ///
    /// The replacement is atomic: a forbidden segment becomes drawn with no
    /// blank state observable in between.
    pub fn draw(&mut self, seg: Segment) -> Option<Mark> {
        self.set(seg, Mark::Drawn)
    }

    /// Cross out `seg`, returning the mark it displaced.
    pub fn forbid(&mut self, seg: Segment) -> Option<Mark> {
        self.set(seg, Mark::Forbidden)
    }

    fn set(&mut self, seg: Segment, mark: Mark) -> Option<Mark> {
        let (a, b) = seg.endpoints();
        self.graph.add_edge(a, b, mark)
    }

    /// Blank `seg`, returning the mark it held.
    ///
    /// # Panics
    /// Panics if `seg` is already blank. Erasing is only meaningful on a
    /// marked segment; check with [`Marks::is_blank`] or one of its sibling
    /// queries first.
    pub fn erase(&mut self, seg: Segment) -> Mark {
        let (a, b) = seg.endpoints();
        self.graph
            .remove_edge(a, b)
            .unwrap_or_else(|| panic!("erased blank segment {seg}"))
    }

    /// Left-click play semantics: blank a drawn segment, otherwise draw it,
    /// replacing any cross. Returns the resulting mark.
    pub fn toggle_draw(&mut self, seg: Segment) -> Option<Mark> {
        match self.is_drawn(seg) {
            true => {
                self.erase(seg);
                None
            }
            false => {
                self.draw(seg);
                Some(Mark::Drawn)
            }
        }
    }

    /// Right-click play semantics: blank a forbidden segment, otherwise
    /// cross it out, replacing any line. Returns the resulting mark.
    pub fn toggle_forbid(&mut self, seg: Segment) -> Option<Mark> {
        match self.is_forbidden(seg) {
            true => {
                self.erase(seg);
                None
            }
            false => {
                self.forbid(seg);
                Some(Mark::Forbidden)
            }
        }
    }

    /// Number of marked (drawn or forbidden) segments.
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether no segment is marked.
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Number of drawn segments in the whole store.
    pub fn line_count(&self) -> usize {
        self.graph
            .all_edges()
            .filter(|(_, _, mark)| **mark == Mark::Drawn)
            .count()
    }

    /// The drawn segments incident to `vertex`.
    pub fn drawn_at(&self, vertex: Vertex) -> Vec<Segment> {
        if !self.graph.contains_node(vertex) {
            return Vec::new();
        }
        self.graph
            .edges(vertex)
            .filter(|(_, _, mark)| **mark == Mark::Drawn)
            .map(|(a, b, _)| Segment::join(a, b))
            .collect_vec()
    }

    /// How many drawn segments meet at `vertex`.
    pub fn drawn_degree(&self, vertex: Vertex) -> usize {
        if !self.graph.contains_node(vertex) {
            return 0;
        }
        self.graph
            .edges(vertex)
            .filter(|(_, _, mark)| **mark == Mark::Drawn)
            .count()
    }

    /// Length of the single simple loop running through `start`, or `None`
    /// if the drawn segments reachable from it branch, dead-end, or fail to
    /// close.
    ///
    /// Walks drawn segments from one endpoint of `start`, requiring exactly
    /// two drawn segments at every vertex passed through, until the walk
    /// comes back around to where it began; the closing edge is counted.
    /// `start` itself must be drawn for the result to be meaningful.
    pub fn loop_length(&self, start: Segment) -> Option<usize> {
        let (origin, mut current) = start.endpoints();
        let mut previous = origin;
        let mut steps = 0usize;

        while current != origin {
            let incident = self.drawn_at(current);
            if incident.len() != 2 {
                return None;
            }
            let onward = incident.into_iter().find(|seg| !seg.touches(previous))?;
            previous = current;
            current = onward.other_end(previous);
            steps += 1;
        }

        Some(steps + 1)
    }

    /// Every `(segment, mark)` entry, sorted by segment.
    ///
    /// Together with the [`FromIterator`] impl this is the abstract shape a
    /// persistence collaborator serializes and restores; the store never
    /// sees the textual encoding itself.
    pub fn entries(&self) -> Vec<(Segment, Mark)> {
        self.graph
            .all_edges()
            .map(|(a, b, mark)| (Segment::join(a, b), *mark))
            .sorted()
            .collect_vec()
    }
}

impl Default for Marks {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(Segment, Mark)> for Marks {
    fn from_iter<I: IntoIterator<Item = (Segment, Mark)>>(iter: I) -> Self {
        let mut marks = Marks::new();
        for (seg, mark) in iter {
            marks.set(seg, mark);
        }
        marks
    }
}

impl PartialEq for Marks {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for Marks {}

impl Debug for Marks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries()
                    .into_iter()
                    .map(|(seg, mark)| (seg.to_string(), mark)),
            )
            .finish()
    }
}
