#![warn(missing_docs)]

//! # `ringfence`
//!
//! The logic engine for [Slitherlink](https://en.wikipedia.org/wiki/Slitherlink)
//! (also sold as Fences or Loop the Loop) puzzles: the player draws segments
//! between adjacent lattice vertices so that the drawing closes into a single
//! simple loop and every clued cell is bordered by exactly its clue's worth of
//! drawn segments.
//!
//! Begin with a [`ClueGrid`] (parse the `_`-and-digits text shape, supply row
//! data, or edit one through a [`GridBuilder`]), keep the drawing state in a
//! [`Marks`] store, and either validate play moves with
//! [`ClueGrid::is_win`] or hand the whole thing to a [`Solver`]:
//!
//! ```
//! use ringfence::{ClueGrid, Marks, SearchOutcome, Solver};
//!
//! let grid: ClueGrid = "22\n22".parse().unwrap();
//! let mut marks = Marks::new();
//! let mut solver = Solver::new(&grid);
//!
//! assert_eq!(solver.solve(&mut marks), SearchOutcome::Solved);
//! assert_eq!(marks.line_count(), 8);
//! ```
//!
//! Rendering, input mapping, persistence encodings, and timing are left to
//! the surrounding application; the engine only consumes and produces the
//! abstract grid and mark shapes.
//!
//! # Internals
//! Drawing state lives on an undirected graph over lattice vertices, so a
//! segment's identity is order-blind and the segments meeting at a vertex can
//! be enumerated directly. Loop detection exploits the invariant that every
//! vertex of a valid solution touches exactly zero or two drawn segments: a
//! single deterministic walk either comes back around to its starting vertex
//! or proves the drawing is not one simple loop. The solver is a depth-first
//! backtracking search that seeds itself at the corners of high-clue cells
//! first, draws one trial segment at a time, and prunes any branch that
//! overfills a clue. This is slower than encoding the puzzle for a SAT
//! solver, but it keeps the search transparent: it can be watched one vertex
//! at a time and cancelled cooperatively mid-flight.

pub use builder::{BuildInvalidReason, GridBuilder};
pub use grid::{CellStatus, Clue, ClueGrid, GridError};
pub use location::{Cell, Coord, Dimension, Vertex};
pub use marks::{Mark, Marks};
pub use segment::{NotAdjacent, Segment};
pub use solver::{CancelToken, SearchOutcome, SearchStats, Solver};
pub use step::Step;

pub mod builder;
pub(crate) mod grid;
pub(crate) mod location;
pub(crate) mod marks;
pub(crate) mod segment;
pub(crate) mod solver;
pub(crate) mod step;
mod tests;
