use crate::bits::{BitSet, ColorSet};
use crate::error::TraceResult;
use crate::grid::{BitGrid, Grid};
use crate::process::Process;
use crate::savings;

use super::{ColorOptimizer, Optimization, ScoreFn, check_args};

/// Assumes no future cells should be included, then gradually accretes
/// those whose 3×3 saving says they pay for themselves.
///
/// Cells of the current colour are never unset; the working grid only
/// grows, so the job terminates.
pub struct AccretingOptimizer {
    scorer: ScoreFn,
    eager: bool,
}

impl AccretingOptimizer {
    /// Create an accreting optimiser.
    ///
    /// `scorer` projects a saving onto a single number: positive means the
    /// flip improves tracing. With `eager` set, flips that change nothing
    /// are applied too.
    pub fn new(scorer: ScoreFn, eager: bool) -> Self {
        Self { scorer, eager }
    }
}

impl ColorOptimizer for AccretingOptimizer {
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>> {
        check_args(current, future)?;
        Ok(Box::new(AccretionJob::new(
            grid,
            future.clone(),
            self.scorer,
            self.eager,
            BitGrid::from_grid(grid, |color| color == current),
        )))
    }
}

pub(super) struct AccretionJob<'g> {
    source: &'g dyn Grid,
    future: ColorSet,
    scorer: ScoreFn,
    eager: bool,
    result: BitGrid,
    remaining: BitSet,
    width: usize,
}

impl<'g> AccretionJob<'g> {
    pub(super) fn new(
        source: &'g dyn Grid,
        future: ColorSet,
        scorer: ScoreFn,
        eager: bool,
        result: BitGrid,
    ) -> Self {
        let width = source.width() as usize;
        let height = source.height() as usize;
        let mut remaining = BitSet::new(width * height);
        remaining.set_first(width * height);
        Self {
            source,
            future,
            scorer,
            eager,
            result,
            remaining,
            width,
        }
    }

    fn accepts(&self, projected: i32) -> bool {
        if self.eager {
            projected >= 0
        } else {
            projected > 0
        }
    }

    /// Re-queue the cells around (x, y) whose solidity matches `state`;
    /// the others cannot have been affected by the flip.
    fn requeue_around(&mut self, x: i32, y: i32, state: bool) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0
                    || ny < 0
                    || nx >= self.source.width() as i32
                    || ny >= self.source.height() as i32
                {
                    continue;
                }
                if self.result.solid(nx, ny) == state {
                    self.remaining.set(nx as usize + ny as usize * self.width);
                }
            }
        }
    }
}

impl Process for AccretionJob<'_> {
    fn process(&mut self) -> bool {
        let Some(index) = self.remaining.next_set_bit(0) else {
            return false;
        };
        self.remaining.clear(index);
        let x = (index % self.width) as i32;
        let y = (index / self.width) as i32;

        // Only cells of future colours are candidates, and once solid they
        // stay solid.
        if !self.future.contains(self.source.color(x, y)) {
            return true;
        }
        if self.result.solid(x, y) {
            return true;
        }

        let saving = savings::saving_at(&self.result, x, y);
        if self.accepts((self.scorer)(saving)) {
            self.result.set(x, y);
            self.requeue_around(x, y, false);
        }
        true
    }
}

impl Optimization for AccretionJob<'_> {
    fn optimized_grid(&self) -> &BitGrid {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{byte_grid, color_set, run_job};
    use super::*;

    fn accreting() -> AccretingOptimizer {
        AccretingOptimizer::new(|s| s.moves_and_draws(), true)
    }

    mod unit {
        use super::*;

        #[test]
        fn lone_cell_with_unrelated_future_is_unchanged() {
            let grid = byte_grid(&[&[1]]);
            let result = run_job(&accreting(), &grid, 1, &color_set(&[2]));
            assert!(result.solid(0, 0));
            assert_eq!(result, BitGrid::from_grid(&grid, |c| c == 1));
        }

        #[test]
        fn gap_in_a_bar_is_filled() {
            // 1 2 1: borrowing the middle cell turns two squares into one
            // rectangle.
            let grid = byte_grid(&[&[1, 2, 1]]);
            let result = run_job(&accreting(), &grid, 1, &color_set(&[2]));
            assert!(result.solid(0, 0));
            assert!(result.solid(1, 0));
            assert!(result.solid(2, 0));
        }

        #[test]
        fn isolated_future_cell_is_not_borrowed() {
            // Adding a detached square would cost a whole new path.
            let grid = byte_grid(&[&[1, 0, 2]]);
            let result = run_job(&accreting(), &grid, 1, &color_set(&[2]));
            assert!(result.solid(0, 0));
            assert!(!result.solid(2, 0));
        }

        #[test]
        fn past_cells_are_never_borrowed() {
            // Colour 3 is past; the gap must stay open.
            let grid = byte_grid(&[&[1, 3, 1]]);
            let result = run_job(&accreting(), &grid, 1, &color_set(&[2]));
            assert!(!result.solid(1, 0));
        }

        #[test]
        fn accretion_never_removes_cells() {
            let grid = byte_grid(&[&[1, 2, 1], &[2, 1, 2], &[1, 2, 1]]);
            let minimal = BitGrid::from_grid(&grid, |c| c == 1);
            let result = run_job(&accreting(), &grid, 1, &color_set(&[2]));
            for y in 0..3 {
                for x in 0..3 {
                    if minimal.solid(x, y) {
                        assert!(result.solid(x, y), "cell ({x}, {y}) was removed");
                    }
                }
            }
        }
    }
}
