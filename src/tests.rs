#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;
    use pretty_assertions::{assert_eq, assert_ne};
    use proptest::prelude::*;

    use crate::builder::{BuildInvalidReason, GridBuilder};
    use crate::grid::{CellStatus, ClueGrid, GridError};
    use crate::location::{Cell, Vertex};
    use crate::marks::{Mark, Marks};
    use crate::segment::Segment;
    use crate::solver::{CancelToken, SearchOutcome, Solver};

    fn seg(a: (usize, usize), b: (usize, usize)) -> Segment {
        Segment::new(Vertex(a.0, a.1), Vertex(b.0, b.1)).unwrap()
    }

    fn draw_all(marks: &mut Marks, segs: impl IntoIterator<Item = Segment>) {
        for seg in segs {
            marks.draw(seg);
        }
    }

    /// The eight segments around the outside of a grid of 2x2 cells.
    fn two_by_two_perimeter() -> Vec<Segment> {
        vec![
            seg((0, 0), (0, 1)),
            seg((0, 1), (0, 2)),
            seg((0, 2), (1, 2)),
            seg((1, 2), (2, 2)),
            seg((2, 1), (2, 2)),
            seg((2, 0), (2, 1)),
            seg((1, 0), (2, 0)),
            seg((0, 0), (1, 0)),
        ]
    }

    #[test]
    fn segment_identity_is_order_blind() {
        let ab = Segment::new(Vertex(1, 1), Vertex(1, 2)).unwrap();
        let ba = Segment::new(Vertex(1, 2), Vertex(1, 1)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.endpoints(), (Vertex(1, 1), Vertex(1, 2)));
        assert_eq!(ba.endpoints(), (Vertex(1, 1), Vertex(1, 2)));
    }

    #[test]
    fn segments_must_join_adjacent_vertices() {
        assert!(Segment::new(Vertex(0, 0), Vertex(1, 1)).is_err());
        assert!(Segment::new(Vertex(0, 0), Vertex(0, 2)).is_err());
        assert!(Segment::new(Vertex(2, 2), Vertex(2, 2)).is_err());
    }

    #[test]
    fn draw_then_erase_restores_the_prior_store() {
        let mut marks = Marks::new();
        draw_all(&mut marks, [seg((0, 0), (0, 1)), seg((1, 0), (1, 1))]);
        marks.forbid(seg((0, 0), (1, 0)));
        let before = marks.clone();

        let trial = seg((0, 1), (1, 1));
        marks.draw(trial);
        assert_ne!(marks, before);
        marks.erase(trial);
        assert_eq!(marks, before);
    }

    #[test]
    fn a_mark_replaces_its_predecessor() {
        let mut marks = Marks::new();
        let edge = seg((0, 0), (0, 1));

        assert_eq!(marks.draw(edge), None);
        assert_eq!(marks.forbid(edge), Some(Mark::Drawn));
        assert!(marks.is_forbidden(edge) && !marks.is_drawn(edge));

        assert_eq!(marks.draw(edge), Some(Mark::Forbidden));
        assert!(marks.is_drawn(edge) && !marks.is_forbidden(edge));
    }

    #[test]
    fn toggles_follow_play_semantics() {
        let mut marks = Marks::new();
        let edge = seg((2, 2), (2, 3));

        assert_eq!(marks.toggle_draw(edge), Some(Mark::Drawn));
        assert_eq!(marks.toggle_draw(edge), None);
        assert!(marks.is_blank(edge));

        // a cross turns into a line and back, never stacking
        marks.toggle_forbid(edge);
        assert_eq!(marks.toggle_draw(edge), Some(Mark::Drawn));
        assert_eq!(marks.toggle_forbid(edge), Some(Mark::Forbidden));
        assert_eq!(marks.toggle_forbid(edge), None);
        assert!(marks.is_blank(edge));
    }

    #[test]
    #[should_panic(expected = "blank segment")]
    fn erasing_a_blank_segment_is_a_contract_violation() {
        let mut marks = Marks::new();
        marks.erase(seg((0, 0), (0, 1)));
    }

    #[test]
    fn cell_status_tracks_the_drawn_border_count() {
        let grid: ClueGrid = "2".parse().unwrap();
        let cell = Cell(0, 0);
        for subset in cell.border().into_iter().powerset() {
            let mut marks = Marks::new();
            draw_all(&mut marks, subset.iter().copied());
            let expected = match subset.len() {
                n if n < 2 => CellStatus::Under,
                2 => CellStatus::Satisfied,
                _ => CellStatus::Over,
            };
            assert_eq!(grid.cell_status(&marks, cell), expected, "subset {subset:?}");
        }
    }

    #[test]
    fn unclued_cells_are_unconstrained() {
        let grid: ClueGrid = "_2\n__".parse().unwrap();
        let marks = Marks::new();
        assert_eq!(grid.cell_status(&marks, Cell(0, 0)), CellStatus::Unconstrained);
        assert_eq!(grid.cell_status(&marks, Cell(0, 1)), CellStatus::Under);
        assert!(!grid.any_overfull(&marks));
        assert!(!grid.all_satisfied(&marks));
    }

    #[test]
    fn a_unit_square_is_a_loop_of_four() {
        let mut marks = Marks::new();
        draw_all(&mut marks, Cell(1, 1).border());
        for edge in Cell(1, 1).border() {
            assert_eq!(marks.loop_length(edge), Some(4));
        }
    }

    #[test]
    fn a_branch_is_not_a_loop() {
        let mut marks = Marks::new();
        // three lines meeting at (1, 1)
        draw_all(
            &mut marks,
            [seg((0, 1), (1, 1)), seg((1, 0), (1, 1)), seg((1, 1), (1, 2))],
        );
        assert_eq!(marks.loop_length(seg((0, 1), (1, 1))), None);
    }

    #[test]
    fn an_open_chain_is_not_a_loop() {
        let mut marks = Marks::new();
        draw_all(&mut marks, [seg((0, 0), (0, 1)), seg((0, 1), (1, 1))]);
        assert_eq!(marks.loop_length(seg((0, 1), (1, 1))), None);
    }

    #[test]
    fn the_perimeter_wins_a_two_by_two_grid() {
        let grid: ClueGrid = "22\n22".parse().unwrap();
        let mut marks: Marks = two_by_two_perimeter()
            .into_iter()
            .map(|s| (s, Mark::Drawn))
            .collect();
        let last = seg((0, 0), (1, 0));

        assert!(grid.is_win(&marks, Some(last)));
        assert!(!grid.is_win(&marks, None));

        // removing any one boundary segment breaks the win
        for missing in two_by_two_perimeter() {
            assert_eq!(marks.erase(missing), Mark::Drawn);
            let survivor = two_by_two_perimeter()
                .into_iter()
                .find(|s| *s != missing)
                .unwrap();
            assert!(!grid.is_win(&marks, Some(survivor)));
            marks.draw(missing);
        }
    }

    #[test]
    fn solver_closes_the_two_by_two_perimeter() {
        let grid: ClueGrid = "22\n22".parse().unwrap();
        let mut marks = Marks::new();
        let mut solver = Solver::new(&grid);

        assert_eq!(solver.solve(&mut marks), SearchOutcome::Solved);
        assert!(solver.stats().visits > 0);

        let expected: Marks = two_by_two_perimeter()
            .into_iter()
            .map(|s| (s, Mark::Drawn))
            .collect();
        assert_eq!(marks, expected);
        assert_eq!(
            grid.render(&marks),
            "+---+---+
| 2   2 |
+   +   +
| 2   2 |
+---+---+
"
        );
    }

    #[test]
    fn a_clueless_grid_solves_to_a_single_loop() {
        let grid = ClueGrid::with_dims((NonZero::new(1).unwrap(), NonZero::new(1).unwrap()));
        let mut marks = Marks::new();
        let mut solver = Solver::new(&grid);

        assert_eq!(solver.solve_from(&mut marks, Vertex(0, 0)), SearchOutcome::Solved);
        assert_eq!(marks.line_count(), 4);
        assert_eq!(marks.loop_length(seg((0, 0), (0, 1))), Some(4));
    }

    #[test]
    fn an_impossible_clue_exhausts_cleanly() {
        // a lone cell asking for three borders can only ever close with four
        let grid: ClueGrid = "3".parse().unwrap();
        let mut marks = Marks::new();
        let mut solver = Solver::new(&grid);

        assert_eq!(solver.solve(&mut marks), SearchOutcome::Exhausted);
        assert!(marks.is_empty());
        assert_eq!(marks, Marks::new());
    }

    #[test]
    fn a_raised_token_aborts_before_any_claim() {
        let grid: ClueGrid = "22\n22".parse().unwrap();
        let mut marks = Marks::new();
        let token = CancelToken::new();
        token.cancel();
        let mut solver = Solver::new(&grid).with_cancel_token(token);

        assert_eq!(solver.solve(&mut marks), SearchOutcome::Aborted);
        assert!(!grid.all_satisfied(&marks));
    }

    #[test]
    fn cancelling_mid_search_stops_the_walk() {
        let grid: ClueGrid = "22\n22".parse().unwrap();
        let mut marks = Marks::new();
        let solver = Solver::new(&grid);
        let token = solver.cancel_token();
        let mut visits = 0u32;
        let mut solver = solver.on_visit(move |_, _| {
            visits += 1;
            if visits == 5 {
                token.cancel();
            }
        });

        assert_eq!(solver.solve(&mut marks), SearchOutcome::Aborted);
        assert!(!grid.all_satisfied(&marks));
    }

    #[test]
    fn resuming_on_two_disjoint_loops_satisfies_the_local_check() {
        let grid: ClueGrid = "_2_".parse().unwrap();
        let mut marks: Marks = Cell(0, 0)
            .border()
            .into_iter()
            .chain(Cell(0, 2).border())
            .map(|s| (s, Mark::Drawn))
            .collect();
        let mut solver = Solver::new(&grid);

        // the vertex-local success check sees degree two plus satisfied
        // clues and accepts the pair of loops without walking the drawing
        assert_eq!(solver.solve(&mut marks), SearchOutcome::Solved);
        assert_eq!(marks.line_count(), 8);

        // the full win check walks the loop through one segment and notices
        // the stray second loop
        let on_first_loop = seg((0, 0), (0, 1));
        assert_eq!(marks.loop_length(on_first_loop), Some(4));
        assert!(!grid.is_win(&marks, Some(on_first_loop)));
    }

    #[test]
    fn entries_round_trip_a_partial_session() {
        let mut marks = Marks::new();
        marks.draw(seg((0, 0), (0, 1)));
        marks.forbid(seg((1, 1), (2, 1)));
        marks.draw(seg((3, 0), (3, 1)));

        let resumed: Marks = marks.entries().into_iter().collect();
        assert_eq!(resumed, marks);
        assert_eq!(resumed.len(), 3);
        assert_eq!(resumed.line_count(), 2);
    }

    #[test]
    fn grid_text_parses_and_prints_back() {
        let text = "3_\n_1\n";
        let grid: ClueGrid = text.parse().unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.clue(Cell(0, 0)).map(|c| c.get()), Some(3));
        assert_eq!(grid.clue(Cell(1, 0)), None);
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn grid_text_rejects_bad_shapes() {
        assert_eq!("4".parse::<ClueGrid>().unwrap_err(), GridError::ClueRange(4));
        assert_eq!("a".parse::<ClueGrid>().unwrap_err(), GridError::BadCell('a'));
        assert_eq!("".parse::<ClueGrid>().unwrap_err(), GridError::Empty);
        assert_eq!(
            "22\n2".parse::<ClueGrid>().unwrap_err(),
            GridError::Ragged {
                row: 1,
                found: 1,
                expected: 2
            },
        );
    }

    #[test]
    fn from_rows_validates_clue_values() {
        assert!(ClueGrid::from_rows(&[vec![Some(0), None], vec![Some(3), Some(1)]]).is_ok());
        assert_eq!(
            ClueGrid::from_rows(&[vec![Some(7)]]).unwrap_err(),
            GridError::ClueRange(7),
        );
    }

    #[test]
    fn builder_edits_then_freezes() {
        let grid = GridBuilder::with_dims((NonZero::new(2).unwrap(), NonZero::new(3).unwrap()))
            .clue(Cell(0, 0), 3)
            .clue(Cell(1, 2), 0)
            .clue(Cell(0, 1), 2)
            .clear_clue(Cell(0, 1))
            .build()
            .unwrap();

        assert_eq!(grid.to_string(), "3__\n__0\n");
    }

    #[test]
    fn builder_cycles_a_cell_through_every_clue() {
        let mut builder = GridBuilder::default();
        for expected in [Some(0), Some(1), Some(2), Some(3), None] {
            builder.cycle_clue(Cell(2, 2));
            let grid = builder.build().unwrap();
            assert_eq!(grid.clue(Cell(2, 2)).map(|c| c.get()), expected);
        }
    }

    #[test]
    fn builder_flags_out_of_bounds_clues() {
        let mut builder = GridBuilder::with_dims((NonZero::new(2).unwrap(), NonZero::new(2).unwrap()));
        builder.clue(Cell(2, 0), 1);
        assert_eq!(builder.is_valid(), Some(&vec![BuildInvalidReason::ClueOutOfBounds]));
        assert!(builder.build().is_err());
    }

    #[test]
    fn builder_flags_oversized_clues() {
        let mut builder = GridBuilder::default();
        builder.clue(Cell(0, 0), 9);
        assert_eq!(
            builder.is_valid(),
            Some(&vec![BuildInvalidReason::ClueOutOfRange(9)])
        );
    }

    /// Any segment on a small lattice, named by corner vertex and
    /// orientation.
    fn any_segment() -> impl Strategy<Value = Segment> {
        (0..3usize, 0..3usize, any::<bool>()).prop_map(|(r, c, horizontal)| {
            let far = if horizontal { Vertex(r, c + 1) } else { Vertex(r + 1, c) };
            Segment::new(Vertex(r, c), far).unwrap()
        })
    }

    fn any_op() -> impl Strategy<Value = (u8, Segment)> {
        (0..5u8, any_segment())
    }

    fn apply(marks: &mut Marks, op: (u8, Segment)) {
        let (kind, seg) = op;
        match kind {
            0 => {
                marks.draw(seg);
            }
            1 => {
                marks.forbid(seg);
            }
            2 => {
                marks.toggle_draw(seg);
            }
            3 => {
                marks.toggle_forbid(seg);
            }
            _ => {
                if !marks.is_blank(seg) {
                    marks.erase(seg);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn every_segment_holds_exactly_one_state(ops in prop::collection::vec(any_op(), 0..48)) {
            let mut marks = Marks::new();
            for op in ops {
                apply(&mut marks, op);
            }
            for r in 0..3usize {
                for c in 0..3usize {
                    for seg in [
                        Segment::new(Vertex(r, c), Vertex(r, c + 1)).unwrap(),
                        Segment::new(Vertex(r, c), Vertex(r + 1, c)).unwrap(),
                    ] {
                        let states =
                            [marks.is_blank(seg), marks.is_drawn(seg), marks.is_forbidden(seg)];
                        prop_assert_eq!(states.iter().filter(|held| **held).count(), 1);
                    }
                }
            }
        }

        #[test]
        fn drawing_then_erasing_a_blank_segment_is_identity(
            ops in prop::collection::vec(any_op(), 0..24),
            probe in any_segment(),
        ) {
            let mut marks = Marks::new();
            for op in ops {
                apply(&mut marks, op);
            }
            prop_assume!(marks.is_blank(probe));
            let before = marks.clone();
            marks.draw(probe);
            marks.erase(probe);
            prop_assert_eq!(marks, before);
        }
    }
}
