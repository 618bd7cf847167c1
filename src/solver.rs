use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use strum::VariantArray;

use crate::grid::{Clue, ClueGrid};
use crate::location::Vertex;
use crate::marks::{Mark, Marks};
use crate::segment::Segment;
use crate::step::Step;

/// A cooperative stop signal for a running search.
///
/// Clone the token, hand the clone to whatever wants to interrupt the search
/// (a UI thread, a deadline watcher), and call [`CancelToken::cancel`]; the
/// search polls the flag once per vertex visit and winds down promptly.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unraised token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the stop signal.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the stop signal has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a search ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum SearchOutcome {
    /// A complete clue-satisfying drawing was found and left in the store.
    Solved,
    /// Every branch was tried without success; the grid has no solution
    /// reachable from the given starting state.
    Exhausted,
    /// The cancel token was raised. The store holds whatever partial drawing
    /// was in progress, which is not claimed to be a solution.
    Aborted,
}

/// Search counters, reset by each `solve*` call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Vertices visited, counting revisits.
    pub visits: u64,
    /// Trial segments drawn.
    pub lines_drawn: u64,
    /// Trial segments rolled back.
    pub backtracks: u64,
}

enum Search {
    Solved,
    Dead,
    Aborted,
}

/// Exhaustive depth-first solver over one clue grid.
///
/// The search draws one trial segment at a time, recurses into the far
/// endpoint of the segment it just drew, and rolls the draw back when the
/// branch dies, so the store passed to [`Solver::solve`] is only ever one
/// inverse operation away from its pre-trial state. Branches die as soon as
/// any clue is overfull; worst-case running time is still exponential on
/// adversarial grids, which is the accepted price of an exhaustive search.
///
/// A visit declares success when its vertex already touches exactly two
/// drawn segments and every clue is satisfied. That check is local: it does
/// not walk the whole drawing, so a search resumed from a state that already
/// contains several disjoint closed loops will accept that state as solved.
/// [`ClueGrid::is_win`] remains the strict single-loop authority; run it
/// over the result when resuming from foreign state.
///
/// Recursion depth is bounded by the number of drawable segments, which on
/// very large grids may warrant a generous thread stack.
pub struct Solver<'g> {
    grid: &'g ClueGrid,
    cancel: CancelToken,
    visit_hook: Option<Box<dyn FnMut(&Marks, Vertex) + 'g>>,
    stats: SearchStats,
}

impl<'g> Solver<'g> {
    /// A solver for `grid` with a fresh cancel token and no visit hook.
    pub fn new(grid: &'g ClueGrid) -> Self {
        Self {
            grid,
            cancel: CancelToken::new(),
            visit_hook: None,
            stats: SearchStats::default(),
        }
    }

    /// Poll `token` instead of the solver's own.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Call `hook` once per vertex visit, before the visit inspects any
    /// state.
    ///
    /// This is the suspension point an interactive front end uses to redraw
    /// the partial drawing and pump its event loop; headless searches simply
    /// set no hook.
    pub fn on_visit(mut self, hook: impl FnMut(&Marks, Vertex) + 'g) -> Self {
        self.visit_hook = Some(Box::new(hook));
        self
    }

    /// A clone of the cancel token polled by this solver.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Counters from the most recent `solve*` call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search for a solution, choosing starting vertices by clue priority.
    ///
    /// Cells are taken in descending clue bands 3, 2, 1, then unclued,
    /// row-major within each band, and the four corners of each cell seed
    /// the search in turn. Higher clues constrain more of their border, so
    /// starting next to them prunes earlier.
    ///
    /// On [`SearchOutcome::Solved`] the solution is left in `marks`; on
    /// [`SearchOutcome::Exhausted`] every trial has been rolled back and
    /// `marks` is exactly its starting state.
    pub fn solve(&mut self, marks: &mut Marks) -> SearchOutcome {
        self.stats = SearchStats::default();
        let grid = self.grid;
        debug!(
            "searching {}x{} grid by clue priority",
            grid.height(),
            grid.width()
        );
        for priority in [Some(3), Some(2), Some(1), None] {
            for cell in grid.cells() {
                if grid.clue(cell).map(Clue::get) != priority {
                    continue;
                }
                for corner in cell.corners() {
                    match self.visit(marks, corner) {
                        Search::Solved => return self.finish(SearchOutcome::Solved),
                        Search::Aborted => return self.finish(SearchOutcome::Aborted),
                        Search::Dead => {}
                    }
                }
            }
        }
        self.finish(SearchOutcome::Exhausted)
    }

    /// Search for a solution seeded at `start` only.
    pub fn solve_from(&mut self, marks: &mut Marks, start: Vertex) -> SearchOutcome {
        self.stats = SearchStats::default();
        debug!(
            "searching {}x{} grid from {start}",
            self.grid.height(),
            self.grid.width()
        );
        let outcome = match self.visit(marks, start) {
            Search::Solved => SearchOutcome::Solved,
            Search::Aborted => SearchOutcome::Aborted,
            Search::Dead => SearchOutcome::Exhausted,
        };
        self.finish(outcome)
    }

    fn finish(&self, outcome: SearchOutcome) -> SearchOutcome {
        debug!(
            "search ended {:?} after {} visits, {} lines drawn, {} backtracks",
            outcome, self.stats.visits, self.stats.lines_drawn, self.stats.backtracks
        );
        outcome
    }

    fn visit(&mut self, marks: &mut Marks, vertex: Vertex) -> Search {
        self.stats.visits += 1;
        if let Some(hook) = self.visit_hook.as_mut() {
            hook(marks, vertex);
        }
        if marks.drawn_degree(vertex) == 2 && self.grid.all_satisfied(marks) {
            return Search::Solved;
        }
        if self.cancel.is_cancelled() {
            trace!("cancelled at {vertex}");
            return Search::Aborted;
        }
        if marks.drawn_degree(vertex) >= 2 || self.grid.any_overfull(marks) {
            return Search::Dead;
        }

        for step in Step::VARIANTS {
            let far = step.attempt_from(vertex);
            if !self.grid.contains_vertex(far) {
                continue;
            }
            let seg = Segment::join(vertex, far);
            if marks.is_drawn(seg) {
                continue;
            }

            let displaced = marks.draw(seg);
            self.stats.lines_drawn += 1;
            match self.visit(marks, far) {
                Search::Solved => return Search::Solved,
                Search::Aborted => return Search::Aborted,
                Search::Dead => {
                    self.stats.backtracks += 1;
                    // roll the trial back to exactly the prior mark
                    match displaced {
                        Some(Mark::Forbidden) => {
                            marks.forbid(seg);
                        }
                        _ => {
                            marks.erase(seg);
                        }
                    }
                }
            }
        }
        Search::Dead
    }
}
