use strum::VariantArray;

use crate::location::Vertex;

/// A unit move between lattice-adjacent vertices.
///
/// `Step::VARIANTS` lists the directions in the order the solver tries
/// candidate segments out of a vertex: right, down, left, up.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Step {
    /// Toward `(row, col + 1)`.
    Right,
    /// Toward `(row + 1, col)`.
    Down,
    /// Toward `(row, col - 1)`.
    Left,
    /// Toward `(row - 1, col)`.
    Up,
}

impl Step {
    /// Step from `vertex` in this direction.
    ///
    /// Coordinates wrap on underflow, which lands the result far outside any
    /// real grid; callers bounds-check the destination.
    pub fn attempt_from(&self, vertex: Vertex) -> Vertex {
        match self {
            Self::Right => vertex.offset_by((0, 1)),
            Self::Down => vertex.offset_by((1, 0)),
            Self::Left => vertex.offset_by((0, -1)),
            Self::Up => vertex.offset_by((-1, 0)),
        }
    }
}
