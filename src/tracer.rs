use crate::layout::Layout;
use crate::process::Process;
use crate::scribe::Scribe;

/// Traces an efficient outline of a polygon, exploiting an even-odd fill
/// rule.
///
/// The tracer walks the layout's steps, consuming each one along with its
/// inverse, and emits the resulting closed paths to a scribe. At a
/// crossing it carries straight on: of the available continuations, any
/// that is antiparallel to another is taken only as a last resort, which
/// guarantees the crossing is traversed once per pass and the even-odd
/// interpretation survives.
///
/// Each call to [`Process::process`] handles one step transition. The
/// tracer is total: a layout with no available steps simply yields no
/// paths.
pub struct Tracer<L: Layout, S> {
    layout: L,
    scribe: S,
    step: Option<usize>,
    found_corner: bool,
}

impl<L: Layout, S: Scribe<L::Pos>> Tracer<L, S> {
    pub fn new(layout: L, scribe: S) -> Self {
        Self {
            layout,
            scribe,
            step: None,
            found_corner: false,
        }
    }

    pub fn scribe(&self) -> &S {
        &self.scribe
    }

    pub fn into_scribe(self) -> S {
        self.scribe
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }
}

impl<L: Layout, S: Scribe<L::Pos>> Process for Tracer<L, S> {
    fn process(&mut self) -> bool {
        let step = match self.step {
            Some(step) => step,
            None => {
                let Some(step) = self.layout.any_step() else {
                    return false;
                };
                self.found_corner = false;
                step
            }
        };

        // Until the first corner is found the walk is provisional, so the
        // steps stay available for the pass that draws them.
        if self.found_corner {
            self.layout.consume(step);
        }

        let alts = self.layout.options(step);
        let mut chosen = None;
        let mut secondary = None;
        let mut turn = true;
        for (index, &cand) in alts.iter().enumerate() {
            let Some(cand) = cand else { continue };

            // A candidate that carries straight on is taken at once.
            if self.layout.parallel(cand, step) {
                turn = false;
                chosen = Some(cand);
                break;
            }

            // A candidate that is antiparallel to a later one belongs to a
            // crossing; prefer to leave it for the opposite pass.
            for &other in &alts[index + 1..] {
                let Some(other) = other else { continue };
                if self.layout.antiparallel(cand, other) {
                    secondary = Some(cand);
                }
            }
            if secondary == Some(cand) {
                continue;
            }

            chosen = Some(cand);
        }
        let next = chosen.or(secondary);

        if self.found_corner {
            if turn || next.is_none() {
                self.scribe.line_to(self.layout.end(step));
            }
            if next.is_none() {
                self.scribe.close();
            }
        } else if turn {
            self.found_corner = true;
            self.scribe.move_to(self.layout.end(step));
        }
        self.step = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BitGrid;
    use crate::layout::{Point, RectLayout};
    use crate::scribe::{CountingScribe, PathOp, ReplayingScribe};

    fn trace(grid: &BitGrid) -> Vec<PathOp<Point>> {
        let mut tracer = Tracer::new(RectLayout::new(grid), ReplayingScribe::new());
        tracer.run();
        tracer.into_scribe().ops().to_vec()
    }

    fn solid_cells(cells: &[(i32, i32)], width: u32, height: u32) -> BitGrid {
        let mut grid = BitGrid::new(width, height);
        for &(x, y) in cells {
            grid.set(x, y);
        }
        grid
    }

    /// Split an op sequence into closed subpaths of points.
    fn paths(ops: &[PathOp<Point>]) -> Vec<Vec<Point>> {
        let mut result = Vec::new();
        let mut current = Vec::new();
        for op in ops {
            match op {
                PathOp::MoveTo(p) => {
                    assert!(current.is_empty(), "move before close");
                    current.push(*p);
                }
                PathOp::LineTo(p) => {
                    assert!(!current.is_empty(), "draw outside a path");
                    current.push(*p);
                }
                PathOp::Close => {
                    assert!(!current.is_empty(), "close outside a path");
                    result.push(std::mem::take(&mut current));
                }
            }
        }
        assert!(current.is_empty(), "unterminated path");
        result
    }

    mod unit {
        use super::*;

        #[test]
        fn empty_grid_yields_no_paths() {
            let ops = trace(&BitGrid::new(3, 3));
            assert!(ops.is_empty());
        }

        #[test]
        fn unit_square_visits_all_four_corners() {
            let ops = trace(&solid_cells(&[(0, 0)], 1, 1));
            let paths = paths(&ops);
            assert_eq!(paths.len(), 1);
            let path = &paths[0];
            // One move plus four draws, ending back at the start.
            assert_eq!(path.len(), 5);
            assert_eq!(path.first(), path.last());
            let mut corners = path[..4].to_vec();
            corners.sort_by_key(|p| (p.x, p.y));
            assert_eq!(
                corners,
                vec![
                    Point::new(0, 0),
                    Point::new(0, 1),
                    Point::new(1, 0),
                    Point::new(1, 1)
                ]
            );
        }

        #[test]
        fn centre_cell_of_three_by_three() {
            let ops = trace(&solid_cells(&[(1, 1)], 3, 3));
            let paths = paths(&ops);
            assert_eq!(paths.len(), 1);
            // Four distinct corner points.
            let mut corners = paths[0][..4].to_vec();
            corners.sort_by_key(|p| (p.x, p.y));
            assert_eq!(
                corners,
                vec![
                    Point::new(1, 1),
                    Point::new(1, 2),
                    Point::new(2, 1),
                    Point::new(2, 2)
                ]
            );
        }

        #[test]
        fn solid_row_traces_one_rectangle() {
            let ops = trace(&solid_cells(&[(0, 1), (1, 1), (2, 1)], 3, 3));
            let paths = paths(&ops);
            assert_eq!(paths.len(), 1);
            let mut corners = paths[0][..paths[0].len() - 1].to_vec();
            corners.sort_by_key(|p| (p.x, p.y));
            assert_eq!(
                corners,
                vec![
                    Point::new(0, 1),
                    Point::new(0, 2),
                    Point::new(3, 1),
                    Point::new(3, 2)
                ]
            );
        }

        #[test]
        fn diagonal_cells_merge_into_one_crossing_path() {
            // The shared corner is a crossing, crossed straight through,
            // so both squares come out as a single six-corner path that
            // still fills correctly under the even-odd rule.
            let ops = trace(&solid_cells(&[(0, 0), (1, 1)], 2, 2));
            let paths = paths(&ops);
            assert_eq!(paths.len(), 1);
            let path = &paths[0];
            assert_eq!(path.len(), 7);
            assert_eq!(path.first(), path.last());
            // The crossing vertex itself is never a drawn corner.
            assert!(!path.contains(&Point::new(1, 1)));
        }

        #[test]
        fn every_step_is_consumed_with_its_inverse() {
            let grid = solid_cells(&[(0, 0), (1, 1), (2, 0), (0, 2)], 3, 3);
            let mut tracer = Tracer::new(RectLayout::new(&grid), CountingScribe::default());
            tracer.run();
            assert_eq!(tracer.layout().remaining_edges(), 0);
            assert_eq!(tracer.layout().any_step(), None);
        }

        #[test]
        fn counts_match_the_recorded_ops() {
            let grid = solid_cells(&[(0, 0), (1, 0), (1, 1)], 2, 2);
            let mut counter = Tracer::new(RectLayout::new(&grid), CountingScribe::default());
            counter.run();
            let mut recorder = Tracer::new(RectLayout::new(&grid), ReplayingScribe::new());
            recorder.run();
            assert_eq!(counter.scribe().score(), recorder.scribe().score());
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn traces_are_closed_and_exhaustive(
                cells in proptest::collection::vec(any::<bool>(), 25),
            ) {
                let mut grid = BitGrid::new(5, 5);
                for (index, &solid) in cells.iter().enumerate() {
                    if solid {
                        grid.set(index as i32 % 5, index as i32 / 5);
                    }
                }
                let mut tracer = Tracer::new(RectLayout::new(&grid), ReplayingScribe::new());
                tracer.run();
                // Paths are well formed and all edges consumed.
                let subpaths = paths(tracer.scribe().ops());
                prop_assert_eq!(tracer.layout().remaining_edges(), 0);
                for path in &subpaths {
                    prop_assert!(path.len() >= 5);
                    prop_assert_eq!(path.first(), path.last());
                    for p in path {
                        prop_assert!((0..=5).contains(&p.x));
                        prop_assert!((0..=5).contains(&p.y));
                    }
                }
            }
        }
    }
}
