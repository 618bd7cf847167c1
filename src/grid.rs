use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ndarray::Array2;
use thiserror::Error;

use crate::location::{Cell, Dimension, Vertex};
use crate::marks::{Mark, Marks};
use crate::segment::Segment;

/// Reasons a clue grid cannot be built from caller-supplied data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum GridError {
    /// A clue value above [`Clue::MAX`].
    #[error("clue value {0} is out of range (expected 0..=3)")]
    ClueRange(u8),
    /// A character that is neither `_` nor a digit.
    #[error("unrecognized cell character {0:?} (expected '_' or a digit)")]
    BadCell(char),
    /// No cells at all.
    #[error("grid has no cells")]
    Empty,
    /// A row whose width disagrees with the first row's.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the offending row.
        found: usize,
        /// Width of the first row.
        expected: usize,
    },
}

/// A cell's required count of drawn border segments, `0..=3`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Clue(u8);

impl Clue {
    /// The largest representable clue.
    pub const MAX: u8 = 3;

    /// Validate `value` as a clue.
    pub fn new(value: u8) -> Result<Self, GridError> {
        match value <= Self::MAX {
            true => Ok(Self(value)),
            false => Err(GridError::ClueRange(value)),
        }
    }

    /// The clue value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<char> for Clue {
    type Error = GridError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_digit(10) {
            Some(digit) => Self::new(digit as u8),
            None => Err(GridError::BadCell(value)),
        }
    }
}

impl Display for Clue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a cell's drawn border count compares to its clue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellStatus {
    /// The drawn border count equals the clue.
    Satisfied,
    /// Fewer drawn borders than the clue asks for.
    Under,
    /// More drawn borders than the clue allows.
    Over,
    /// The cell has no clue.
    Unconstrained,
}

/// An immutable table of optional clues, one per cell.
///
/// Built once per puzzle (from text, from row data, or through a
/// [`GridBuilder`](crate::GridBuilder)) and read-only afterwards; all
/// drawing state lives in a separate [`Marks`] store.
#[derive(Clone, Debug, PartialEq)]
pub struct ClueGrid {
    pub(crate) clues: Array2<Option<Clue>>,
}

impl ClueGrid {
    /// A grid of `(height, width)` cells with no clues at all.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            clues: Array2::from_shape_simple_fn((dims.0.get(), dims.1.get()), || None),
        }
    }

    /// Build a grid from one `Vec` of optional clue values per row.
    ///
    /// Rejects values above [`Clue::MAX`], ragged rows, and empty input.
    /// This is the single validation point; evaluation never re-checks clue
    /// ranges.
    pub fn from_rows(rows: &[Vec<Option<u8>>]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::Ragged {
                    row,
                    found: cells.len(),
                    expected: width,
                });
            }
        }

        let mut clues = Array2::from_shape_simple_fn((height, width), || None);
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                clues[[r, c]] = match value {
                    Some(value) => Some(Clue::new(*value)?),
                    None => None,
                };
            }
        }
        Ok(Self { clues })
    }

    /// Cell rows in the grid.
    pub fn height(&self) -> usize {
        self.clues.nrows()
    }

    /// Cell columns in the grid.
    pub fn width(&self) -> usize {
        self.clues.ncols()
    }

    /// The clue on `cell`, if any.
    ///
    /// # Panics
    /// Panics if `cell` lies outside the grid; bounds are the caller's
    /// contract.
    pub fn clue(&self, cell: Cell) -> Option<Clue> {
        self.clues[[cell.0, cell.1]]
    }

    /// Whether `vertex` lies on this grid's lattice, which has one more row
    /// and column of vertices than of cells.
    pub fn contains_vertex(&self, vertex: Vertex) -> bool {
        vertex.0 <= self.height() && vertex.1 <= self.width()
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (height, width) = (self.height(), self.width());
        (0..height).flat_map(move |r| (0..width).map(move |c| Cell(r, c)))
    }

    /// All clued cells with their clues, row-major.
    pub fn clued_cells(&self) -> impl Iterator<Item = (Cell, Clue)> + '_ {
        self.clues
            .indexed_iter()
            .filter_map(|(index, &clue)| clue.map(|clue| (Cell::from(index), clue)))
    }

    /// Classify `cell` by comparing its drawn border count to its clue.
    ///
    /// # Panics
    /// Panics if `cell` lies outside the grid, like [`ClueGrid::clue`].
    pub fn cell_status(&self, marks: &Marks, cell: Cell) -> CellStatus {
        let Some(clue) = self.clue(cell) else {
            return CellStatus::Unconstrained;
        };
        let drawn = cell
            .border()
            .iter()
            .filter(|seg| marks.is_drawn(**seg))
            .count();
        match drawn.cmp(&usize::from(clue.get())) {
            Ordering::Less => CellStatus::Under,
            Ordering::Equal => CellStatus::Satisfied,
            Ordering::Greater => CellStatus::Over,
        }
    }

    /// Whether every clued cell is exactly satisfied.
    ///
    /// Vacuously true on a grid with no clues. This is a completion check,
    /// not a pruning check: an underfull cell fails it even though further
    /// drawing could still satisfy that cell.
    pub fn all_satisfied(&self, marks: &Marks) -> bool {
        self.clued_cells()
            .all(|(cell, _)| self.cell_status(marks, cell) == CellStatus::Satisfied)
    }

    /// Whether some clued cell already has more drawn borders than its clue.
    ///
    /// No amount of further drawing can mend an overfull cell, which makes
    /// this the pruning counterpart to [`ClueGrid::all_satisfied`].
    pub fn any_overfull(&self, marks: &Marks) -> bool {
        self.clued_cells()
            .any(|(cell, _)| self.cell_status(marks, cell) == CellStatus::Over)
    }

    /// Whether `marks` is a complete, valid solution, judged after drawing
    /// `last_drawn`.
    ///
    /// True iff a segment was actually just drawn, every clue is exactly
    /// met, and the full set of drawn segments forms one simple closed loop
    /// through `last_drawn`, leaving no stray lines elsewhere.
    pub fn is_win(&self, marks: &Marks, last_drawn: Option<Segment>) -> bool {
        match last_drawn {
            Some(seg) => {
                self.all_satisfied(marks) && marks.loop_length(seg) == Some(marks.line_count())
            }
            None => false,
        }
    }

    /// Draw the grid and `marks` as ASCII art: `+` vertices, `-` and `|`
    /// lines, `x` crosses, and clue digits inside cells.
    pub fn render(&self, marks: &Marks) -> String {
        let (height, width) = (self.height(), self.width());
        let mut out = String::new();
        for r in 0..=height {
            for c in 0..=width {
                out.push('+');
                if c < width {
                    let seg = Segment::join(Vertex(r, c), Vertex(r, c + 1));
                    out.push_str(match marks.mark(seg) {
                        Some(Mark::Drawn) => "---",
                        Some(Mark::Forbidden) => " x ",
                        None => "   ",
                    });
                }
            }
            out.push('\n');
            if r == height {
                break;
            }
            for c in 0..=width {
                let seg = Segment::join(Vertex(r, c), Vertex(r + 1, c));
                out.push(match marks.mark(seg) {
                    Some(Mark::Drawn) => '|',
                    Some(Mark::Forbidden) => 'x',
                    None => ' ',
                });
                if c < width {
                    match self.clue(Cell(r, c)) {
                        Some(clue) => {
                            out.push(' ');
                            out.push(char::from(b'0' + clue.get()));
                            out.push(' ');
                        }
                        None => out.push_str("   "),
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for ClueGrid {
    type Err = GridError;

    /// Parse the line-oriented clue shape: one character per cell, `_` for
    /// an unclued cell, a digit otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for line in s.lines() {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                row.push(match ch {
                    '_' => None,
                    ch => Some(Clue::try_from(ch)?.get()),
                });
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

impl Display for ClueGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.clues.rows() {
            for clue in row {
                match clue {
                    Some(clue) => write!(f, "{clue}")?,
                    None => f.write_str("_")?,
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
