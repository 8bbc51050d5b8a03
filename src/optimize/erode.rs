use crate::bits::{BitSet, ColorSet};
use crate::error::TraceResult;
use crate::grid::{BitGrid, Grid};
use crate::process::Process;
use crate::savings;

use super::{ColorOptimizer, Optimization, ScoreFn, check_args};

/// Assumes all future cells should be included, then gradually erodes the
/// ones whose removal simplifies the outline.
///
/// Cells of the current colour cannot be removed; the working grid only
/// shrinks, so the job terminates.
pub struct ErodingOptimizer {
    scorer: ScoreFn,
    eager: bool,
}

impl ErodingOptimizer {
    /// Create an eroding optimiser.
    ///
    /// `scorer` projects a saving onto a single number: positive means the
    /// flip improves tracing. With `eager` set, flips that change nothing
    /// are applied too.
    pub fn new(scorer: ScoreFn, eager: bool) -> Self {
        Self { scorer, eager }
    }
}

impl ColorOptimizer for ErodingOptimizer {
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>> {
        check_args(current, future)?;
        Ok(Box::new(ErosionJob::new(
            grid,
            future.clone(),
            self.scorer,
            self.eager,
            BitGrid::from_grid(grid, |color| color == current || future.contains(color)),
        )))
    }
}

struct ErosionJob<'g> {
    source: &'g dyn Grid,
    future: ColorSet,
    scorer: ScoreFn,
    eager: bool,
    result: BitGrid,
    remaining: BitSet,
    width: usize,
}

impl<'g> ErosionJob<'g> {
    fn new(
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
}

impl Process for ErosionJob<'_> {
    fn process(&mut self) -> bool {
        let Some(index) = self.remaining.next_set_bit(0) else {
            return false;
        };
        self.remaining.clear(index);
        let x = (index % self.width) as i32;
        let y = (index / self.width) as i32;

        // Only still-solid cells of future colours may be removed.
        if !self.future.contains(self.source.color(x, y)) {
            return true;
        }
        if !self.result.solid(x, y) {
            return true;
        }

        let saving = savings::saving_at(&self.result, x, y);
        if self.accepts((self.scorer)(saving)) {
            self.result.clear(x, y);

            // Solid neighbours may now erode in turn.
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let (nx, ny) = (x + dx, y + dy);
                    if self.result.solid(nx, ny) {
                        self.remaining.set(nx as usize + ny as usize * self.width);
                    }
                }
            }
        }
        true
    }
}

impl Optimization for ErosionJob<'_> {
    fn optimized_grid(&self) -> &BitGrid {
        &self.result
    }
}
