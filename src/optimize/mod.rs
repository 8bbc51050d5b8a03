//! Per-colour cell-map rewriters.
//!
//! An optimiser prepares a cooperative job that turns the current colour's
//! cells into a one-bit grid, optionally borrowing cells of future colours
//! where that makes the traced outline cheaper. Borrowed cells are painted
//! over later, so the final image is unchanged.

mod accrete;
mod clever;
mod erode;

pub use accrete::AccretingOptimizer;
pub use clever::CleverOptimizer;
pub use erode::ErodingOptimizer;

use crate::bits::ColorSet;
use crate::error::{TraceError, TraceResult};
use crate::grid::{BitGrid, Grid};
use crate::process::Process;
use crate::score::Score;

/// Projects a saving onto the single number a cell-flip decision is made
/// on.
pub type ScoreFn = fn(Score) -> i32;

/// Rewrites the cell map for one colour ahead of tracing.
pub trait ColorOptimizer: Sync {
    /// Prepare an optimisation job for tracing `current` while the colours
    /// in `future` remain untraced.
    ///
    /// Fails if `current` is 0 or appears in `future`.
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>>;
}

/// A running optimisation. Drive it to completion before reading the grid.
pub trait Optimization: Process {
    /// The working grid: solid cells are those the outline should enclose.
    fn optimized_grid(&self) -> &BitGrid;
}

fn check_args(current: u32, future: &ColorSet) -> TraceResult<()> {
    if current == 0 {
        return Err(TraceError::TransparentCurrent);
    }
    if future.contains(current) {
        return Err(TraceError::CurrentInFuture(current));
    }
    Ok(())
}

/// A completed job whose grid needed no iterative work.
struct Immediate {
    result: BitGrid,
}

impl Process for Immediate {
    fn process(&mut self) -> bool {
        false
    }
}

impl Optimization for Immediate {
    fn optimized_grid(&self) -> &BitGrid {
        &self.result
    }
}

/// Keeps the current colour's cells exactly as they are.
pub struct MinimalOptimizer;

impl ColorOptimizer for MinimalOptimizer {
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>> {
        check_args(current, future)?;
        let result = BitGrid::from_grid(grid, |color| color == current);
        Ok(Box::new(Immediate { result }))
    }
}

/// Treats every current and future cell as solid.
pub struct MappedOptimizer;

impl ColorOptimizer for MappedOptimizer {
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>> {
        check_args(current, future)?;
        let result = BitGrid::from_grid(grid, |color| color == current || future.contains(color));
        Ok(Box::new(Immediate { result }))
    }
}
