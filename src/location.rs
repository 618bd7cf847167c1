use std::fmt::{Display, Formatter};
use std::num::NonZero;

use crate::segment::Segment;

/// Scalar grid coordinate.
pub type Coord = usize;
/// A nonzero cell count along one axis of a grid.
pub type Dimension = NonZero<Coord>;

/// A lattice intersection `(row, col)`. The top-left corner of a grid is
/// `Vertex(0, 0)`; a grid of H×W cells has (H+1)×(W+1) vertices.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Vertex(pub Coord, pub Coord);

impl Vertex {
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(
            self.0.wrapping_add_signed(rhs.0),
            self.1.wrapping_add_signed(rhs.1),
        )
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// A cell `(row, col)` of a clue grid. `Cell(0, 0)` spans the square between
/// `Vertex(0, 0)` and `Vertex(1, 1)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cell(pub Coord, pub Coord);

impl Cell {
    /// The four vertices around this cell: top-left, top-right, bottom-left,
    /// bottom-right.
    pub fn corners(self) -> [Vertex; 4] {
        let Cell(r, c) = self;
        [
            Vertex(r, c),
            Vertex(r, c + 1),
            Vertex(r + 1, c),
            Vertex(r + 1, c + 1),
        ]
    }

    /// The four border segments of this cell: top, left, bottom, right.
    ///
    /// Derived arithmetically from the cell coordinates; cells on the grid
    /// boundary have borders like any other.
    pub fn border(self) -> [Segment; 4] {
        let Cell(r, c) = self;
        [
            Segment::join(Vertex(r, c), Vertex(r, c + 1)),
            Segment::join(Vertex(r, c), Vertex(r + 1, c)),
            Segment::join(Vertex(r + 1, c), Vertex(r + 1, c + 1)),
            Segment::join(Vertex(r, c + 1), Vertex(r + 1, c + 1)),
        ]
    }
}

impl From<(Coord, Coord)> for Cell {
    fn from(value: (Coord, Coord)) -> Self {
        Self(value.0, value.1)
    }
}
