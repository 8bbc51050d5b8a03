use crate::bits::{BitSet, ColorSet};
use crate::error::TraceResult;
use crate::grid::{BitGrid, Grid};
use crate::process::Process;
use crate::savings;

use super::{ColorOptimizer, Optimization, ScoreFn, check_args};

/// An axis direction on the grid, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    fn turned(self, turn: Turn) -> Direction {
        match (self, turn) {
            (Direction::Right, Turn::Right) => Direction::Down,
            (Direction::Down, Turn::Right) => Direction::Left,
            (Direction::Left, Turn::Right) => Direction::Up,
            (Direction::Up, Turn::Right) => Direction::Right,
            (Direction::Right, Turn::Left) => Direction::Up,
            (Direction::Up, Turn::Left) => Direction::Left,
            (Direction::Left, Turn::Left) => Direction::Down,
            (Direction::Down, Turn::Left) => Direction::Right,
        }
    }
}

/// A 90° turn, clockwise being right in screen co-ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

impl Turn {
    fn flipped(self) -> Turn {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
        }
    }
}

/// A 3×3 shape that marks the start of a linear corner worth filling.
///
/// A pattern matches when every `included` bit is set and every `excluded`
/// bit is clear. The walks give the fill direction paired with the turn
/// towards the solid side; they are tried in order and the first success
/// wins.
struct Template {
    included: u16,
    excluded: u16,
    walks: &'static [(Direction, Turn)],
}

const fn template(
    included: u16,
    excluded: u16,
    walks: &'static [(Direction, Turn)],
) -> Template {
    Template {
        included,
        excluded,
        walks,
    }
}

/// Pattern bits, row-major from the top-left: 1, 2, 4 across the top row,
/// 8, 16, 32 across the middle, 64, 128, 256 across the bottom.
///
/// Projections come first, then for each corner its two single-arm shapes
/// and the full shape that can extend either way. Matching stops at the
/// first hit, so the more specific full-corner shapes sit after the arms
/// they extend.
const TEMPLATES: &[Template] = &[
    // Projections: a two-cell wall with an empty lane beside it.
    template(8 + 64, 1 + 16 + 128, &[(Direction::Down, Turn::Right)]),
    template(32 + 256, 4 + 16 + 128, &[(Direction::Down, Turn::Left)]),
    template(1 + 2, 4 + 8 + 16, &[(Direction::Left, Turn::Right)]),
    template(64 + 128, 8 + 16 + 256, &[(Direction::Left, Turn::Left)]),
    template(1 + 8, 2 + 16 + 64, &[(Direction::Up, Turn::Left)]),
    template(4 + 32, 2 + 16 + 256, &[(Direction::Up, Turn::Right)]),
    template(2 + 4, 1 + 16 + 32, &[(Direction::Right, Turn::Left)]),
    template(128 + 256, 16 + 32 + 64, &[(Direction::Right, Turn::Right)]),
    // Top-left corner.
    template(1 + 2 + 8 + 64, 4 + 128, &[(Direction::Down, Turn::Right)]),
    template(1 + 2 + 4 + 8, 32 + 64, &[(Direction::Right, Turn::Left)]),
    template(
        1 + 2 + 4 + 8 + 64,
        32 + 128,
        &[(Direction::Down, Turn::Right), (Direction::Right, Turn::Left)],
    ),
    // Top-right corner.
    template(2 + 4 + 32 + 256, 1 + 128, &[(Direction::Down, Turn::Left)]),
    template(1 + 2 + 4 + 32, 8 + 256, &[(Direction::Left, Turn::Right)]),
    template(
        1 + 2 + 4 + 32 + 256,
        8 + 128,
        &[(Direction::Left, Turn::Right), (Direction::Down, Turn::Left)],
    ),
    // Bottom-right corner.
    template(4 + 32 + 128 + 256, 2 + 64, &[(Direction::Up, Turn::Right)]),
    template(32 + 64 + 128 + 256, 4 + 8, &[(Direction::Left, Turn::Left)]),
    template(
        4 + 32 + 64 + 128 + 256,
        2 + 8,
        &[(Direction::Left, Turn::Left), (Direction::Up, Turn::Right)],
    ),
    // Bottom-left corner.
    template(1 + 8 + 64 + 128, 2 + 256, &[(Direction::Up, Turn::Left)]),
    template(8 + 64 + 128 + 256, 1 + 32, &[(Direction::Right, Turn::Right)]),
    template(
        1 + 8 + 64 + 128 + 256,
        2 + 32,
        &[(Direction::Right, Turn::Right), (Direction::Up, Turn::Left)],
    ),
];

/// Assumes no future cells should be included, then accretes desirable
/// cells, fills in corners, extends projections, and finally erodes
/// reluctantly.
///
/// The accretion phase works like [`AccretingOptimizer`], except that a
/// cell rejected by scoring is also matched against the corner templates:
/// a hit fills the whole lane the corner opens onto, provided no past
/// colour lies on it. Once nothing is left to accrete, every solid cell is
/// revisited and removed only if removal strictly improves the score.
///
/// [`AccretingOptimizer`]: super::AccretingOptimizer
pub struct CleverOptimizer {
    accretion_scorer: ScoreFn,
    erosion_scorer: ScoreFn,
    eager: bool,
}

impl CleverOptimizer {
    /// Create an optimiser using one scorer for both phases.
    pub fn new(scorer: ScoreFn, eager: bool) -> Self {
        Self::with_scorers(scorer, scorer, eager)
    }

    /// Create an optimiser with separate accretion and erosion scorers.
    pub fn with_scorers(accretion_scorer: ScoreFn, erosion_scorer: ScoreFn, eager: bool) -> Self {
        Self {
            accretion_scorer,
            erosion_scorer,
            eager,
        }
    }

    /// The parameter combination that has worked best in practice.
    pub fn best() -> Self {
        Self::with_scorers(|s| s.draws, |s| s.moves_and_draws(), true)
    }
}

impl ColorOptimizer for CleverOptimizer {
    fn prepare<'g>(
        &self,
        grid: &'g dyn Grid,
        current: u32,
        future: &ColorSet,
    ) -> TraceResult<Box<dyn Optimization + 'g>> {
        check_args(current, future)?;
        let width = grid.width() as usize;
        let height = grid.height() as usize;
        let mut remaining = BitSet::new(width * height);
        remaining.set_first(width * height);
        Ok(Box::new(CleverJob {
            source: grid,
            future: future.clone(),
            accretion_scorer: self.accretion_scorer,
            erosion_scorer: self.erosion_scorer,
            eager: self.eager,
            result: BitGrid::from_grid(grid, |color| color == current),
            remaining,
            width,
            height,
            current,
            eroding: false,
        }))
    }
}

struct CleverJob<'g> {
    source: &'g dyn Grid,
    future: ColorSet,
    current: u32,
    accretion_scorer: ScoreFn,
    erosion_scorer: ScoreFn,
    eager: bool,
    result: BitGrid,
    remaining: BitSet,
    width: usize,
    height: usize,
    eroding: bool,
}

impl CleverJob<'_> {
    /// Whether a source colour reads as solid in this slice.
    fn passes(&self, color: u32) -> bool {
        color == self.current || self.future.contains(color)
    }

    fn accepts(&self, projected: i32) -> bool {
        if self.eager {
            projected >= 0
        } else {
            projected > 0
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Re-queue the cells around (x, y) whose solidity matches `state`.
    fn requeue_around(&mut self, x: i32, y: i32, state: bool) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if self.in_bounds(nx, ny) && self.result.solid(nx, ny) == state {
                    self.remaining.set(nx as usize + ny as usize * self.width);
                }
            }
        }
    }

    /// Mark a cell for reprocessing, if it is clear and on the grid.
    fn unresolved(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) && !self.result.solid(x, y) {
            self.remaining.set(x as usize + y as usize * self.width);
        }
    }

    fn resolved(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.remaining.clear(x as usize + y as usize * self.width);
        }
    }

    /// Try the corner templates against the pattern around a cell that
    /// scoring declined to accrete.
    fn fill_corner(&mut self, x: i32, y: i32, pattern: u16) {
        for template in TEMPLATES {
            if pattern & template.included != template.included
                || pattern & template.excluded != 0
            {
                continue;
            }
            for &(direction, turn) in template.walks {
                if self.walk_corner(x, y, direction, turn) {
                    break;
                }
            }
            return;
        }
    }

    /// Walk the lane starting at (x, y) and fill it if it is clean.
    ///
    /// The walk advances while the forward cell is clear and the cell on
    /// the turn side is solid; a past colour anywhere along it vetoes the
    /// whole fill. Off-grid cells read as clear, so walks stop at the
    /// boundary.
    fn walk_corner(&mut self, x: i32, y: i32, direction: Direction, turn: Turn) -> bool {
        let (dx, dy) = direction.delta();
        let (sx, sy) = direction.turned(turn).delta();

        let mut length = 0;
        {
            let (mut px, mut py) = (x, y);
            loop {
                length += 1;
                px += dx;
                py += dy;
                if self.result.solid(px, py) {
                    break;
                }
                if !self.result.solid(px + sx, py + sy) {
                    break;
                }
                if !self.passes(self.source.color(px, py)) {
                    return false;
                }
            }
        }
        // The template shapes guarantee at least one clear forward cell
        // with a solid side, so a lane is never shorter than two cells.
        debug_assert!(length >= 2);

        let (ox, oy) = direction.turned(turn.flipped()).delta();
        let mark_line = |job: &mut Self, px: i32, py: i32| {
            job.unresolved(px, py);
            job.unresolved(px + sx, py + sy);
            job.unresolved(px + ox, py + oy);
        };

        // The line behind the start may become worth revisiting.
        let (mut px, mut py) = (x - dx, y - dy);
        mark_line(self, px, py);
        for _ in 0..length {
            px += dx;
            py += dy;
            self.result.set(px, py);
            self.resolved(px, py);
            self.unresolved(px + sx, py + sy);
            self.unresolved(px + ox, py + oy);
        }
        // And the line just beyond the end.
        px += dx;
        py += dy;
        mark_line(self, px, py);
        true
    }
}

impl Process for CleverJob<'_> {
    fn process(&mut self) -> bool {
        let Some(index) = self.remaining.next_set_bit(0) else {
            if self.eroding {
                return false;
            }
            // Accretion is exhausted; revisit every solid cell
            // reluctantly.
            self.eroding = true;
            self.remaining.union_with(self.result.bits());
            return true;
        };
        self.remaining.clear(index);
        let x = (index % self.width) as i32;
        let y = (index / self.width) as i32;

        if !self.future.contains(self.source.color(x, y)) {
            return true;
        }

        let pattern = savings::pattern_at(&self.result, x, y);
        let saving = savings::saving(pattern);
        if self.eroding {
            // Removal must strictly improve; a neutral cell stays.
            if (self.erosion_scorer)(saving) > 0 {
                self.result.clear(x, y);
                self.requeue_around(x, y, true);
            }
        } else if self.accepts((self.accretion_scorer)(saving)) {
            self.result.set(x, y);
            self.requeue_around(x, y, false);
        } else {
            self.fill_corner(x, y, pattern);
        }
        true
    }
}

impl Optimization for CleverJob<'_> {
    fn optimized_grid(&self) -> &BitGrid {
        &self.result
    }
}
