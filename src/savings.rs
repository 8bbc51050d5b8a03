use std::sync::OnceLock;

use crate::grid::BitGrid;
use crate::layout::RectLayout;
use crate::process::Process;
use crate::score::Score;
use crate::scribe::CountingScribe;
use crate::tracer::Tracer;

/// The number of distinct 3×3 cell patterns.
pub const PATTERNS: usize = 512;

/// The bit representing the centre cell of a 3×3 pattern.
pub const CENTER: u16 = 1 << 4;

static TABLE: OnceLock<[Score; PATTERNS]> = OnceLock::new();

/// The full saving table, built on first use and read-only thereafter.
///
/// Call this before spawning workers to publish the table eagerly; any
/// later concurrent access just reads it.
pub fn table() -> &'static [Score; PATTERNS] {
    TABLE.get_or_init(build)
}

/// The change in drawing cost from flipping the centre cell of a 3×3 grid
/// expressed as a bit pattern, bit 0 top-left, row-major.
///
/// A positive component means flipping the centre reduces the output.
pub fn saving(pattern: u16) -> Score {
    assert!((pattern as usize) < PATTERNS, "not a 3x3 pattern: {pattern}");
    table()[pattern as usize]
}

/// The 3×3 pattern around (x, y) in a one-bit grid. Cells outside the grid
/// read as clear.
pub fn pattern_at(grid: &BitGrid, x: i32, y: i32) -> u16 {
    let mut pattern = 0;
    let mut bit = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if grid.solid(x + dx, y + dy) {
                pattern |= 1 << bit;
            }
            bit += 1;
        }
    }
    pattern
}

/// The saving for flipping the cell at (x, y) of a one-bit grid.
pub fn saving_at(grid: &BitGrid, x: i32, y: i32) -> Score {
    saving(pattern_at(grid, x, y))
}

fn build() -> [Score; PATTERNS] {
    let mut table = [Score::default(); PATTERNS];
    for (pattern, slot) in table.iter_mut().enumerate() {
        let pattern = pattern as u16;
        *slot = trace_cost(pattern) - trace_cost(pattern ^ CENTER);
    }
    table
}

/// Trace a single 3×3 pattern and count the commands it takes.
fn trace_cost(pattern: u16) -> Score {
    let grid = BitGrid::from_pattern(pattern);
    let mut tracer = Tracer::new(RectLayout::new(&grid), CountingScribe::default());
    tracer.run();
    tracer.scribe().score()
}
