use std::num::NonZero;

use ndarray::Array2;

use crate::grid::{Clue, ClueGrid};
use crate::location::{Cell, Dimension};

/// Reasons a builder may become invalid while building.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildInvalidReason {
    /// A clue was placed outside the bounds specified by `with_dims`.
    ClueOutOfBounds,
    /// A clue value above [`Clue::MAX`] was supplied.
    ClueOutOfRange(u8),
}

/// An incremental editor for clue grids: the mutable stage a [`ClueGrid`]
/// passes through before it freezes.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save
/// their state at some point.
#[derive(Clone)]
pub struct GridBuilder {
    dims: (Dimension, Dimension),
    clues: Array2<Option<Clue>>,
    invalid_reasons: Vec<BuildInvalidReason>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::new(5).unwrap(), NonZero::new(5).unwrap()))
    }
}

impl GridBuilder {
    /// Start an all-blank builder of `(height, width)` cells.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            clues: Array2::from_shape_simple_fn((dims.0.get(), dims.1.get()), || None),
            invalid_reasons: Vec::new(),
        }
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.dims.0.get() && cell.1 < self.dims.1.get()
    }

    /// Put a clue of `value` on `cell`.
    ///
    /// May cause the builder to enter a [`ClueOutOfBounds`](BuildInvalidReason::ClueOutOfBounds)
    /// or [`ClueOutOfRange`](BuildInvalidReason::ClueOutOfRange) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn clue(&mut self, cell: Cell, value: u8) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }
        if !self.in_bounds(cell) {
            self.invalid_reasons.push(BuildInvalidReason::ClueOutOfBounds);
            return self;
        }
        match Clue::new(value) {
            Ok(clue) => self.clues[[cell.0, cell.1]] = Some(clue),
            Err(_) => self
                .invalid_reasons
                .push(BuildInvalidReason::ClueOutOfRange(value)),
        }
        self
    }

    /// Remove any clue from `cell`.
    ///
    /// Follows the same invalid-state rules as [`GridBuilder::clue`].
    pub fn clear_clue(&mut self, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }
        if !self.in_bounds(cell) {
            self.invalid_reasons.push(BuildInvalidReason::ClueOutOfBounds);
            return self;
        }
        self.clues[[cell.0, cell.1]] = None;
        self
    }

    /// Step `cell` through the editing cycle blank → 0 → 1 → 2 → 3 → blank,
    /// one click at a time.
    ///
    /// Follows the same invalid-state rules as [`GridBuilder::clue`].
    pub fn cycle_clue(&mut self, cell: Cell) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }
        if !self.in_bounds(cell) {
            self.invalid_reasons.push(BuildInvalidReason::ClueOutOfBounds);
            return self;
        }
        let slot = &mut self.clues[[cell.0, cell.1]];
        *slot = match slot {
            None => Some(Clue::new(0).unwrap()),
            Some(clue) if clue.get() < Clue::MAX => Some(Clue::new(clue.get() + 1).unwrap()),
            Some(_) => None,
        };
        self
    }

    /// Check the validity of this builder, ensuring no
    /// [`BuildInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuildInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuildInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Freeze the state of this builder into a [`ClueGrid`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of
    /// [`BuildInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<ClueGrid, &Vec<BuildInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }
        Ok(ClueGrid {
            clues: self.clues.clone(),
        })
    }
}
