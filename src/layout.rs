use std::fmt;

use crate::bits::BitSet;
use crate::grid::Grid;

/// A lattice point at the corner of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A polygon expressed as a finite set of directed unit steps.
///
/// Each step has an inverse with swapped endpoints. Consuming a step also
/// consumes its inverse; consumed steps never reappear in [`Layout::options`]
/// or [`Layout::any_step`].
pub trait Layout {
    /// The co-ordinate type for the starts and ends of steps.
    type Pos;

    /// Get an unconsumed step, preferably one starting at a corner, or
    /// `None` if none are left.
    fn any_step(&self) -> Option<usize>;

    /// Get the steps that could follow `id`: their starts equal its end,
    /// its inverse excluded.
    fn options(&self, id: usize) -> [Option<usize>; 3];

    /// Whether two steps point in the same direction.
    fn parallel(&self, a: usize, b: usize) -> bool;

    /// Whether two steps point in opposite directions.
    fn antiparallel(&self, a: usize, b: usize) -> bool;

    /// Mark a step and its inverse as traced.
    fn consume(&mut self, id: usize);

    /// The end co-ordinates of a step.
    fn end(&self, id: usize) -> Self::Pos;
}

/// A layout over the outline of the solid cells of a rectangular grid.
///
/// Step ids assume row 0 at the top and column 0 on the left. Steps along
/// the top edge to the right are numbered 0, 2, 4, …; adding 1 gives the
/// inverse. Horizontal steps occupy ids below 2w(h+1); the step from the
/// top-left corner downwards is the first vertical id, and so on across
/// each row of vertical edges. Availability is one bit per undirected edge,
/// set where the two adjoining cells differ in solidity.
pub struct RectLayout {
    width: usize,
    height: usize,
    horizontals: usize,
    max_steps: usize,
    edges: BitSet,
}

impl RectLayout {
    /// Derive the layout of a grid's solid region.
    pub fn new(grid: &dyn Grid) -> Self {
        let width = grid.width() as usize;
        let height = grid.height() as usize;
        let half_horizontals = (height + 1) * width;
        let half_verticals = (width + 1) * height;
        let horizontals = 2 * half_horizontals;
        let max_steps = horizontals + 2 * half_verticals;
        let mut edges = BitSet::new(half_horizontals + half_verticals);

        for y in 0..=height {
            for x in 0..=width {
                let here = grid.color(x as i32, y as i32) != 0;
                let left = grid.color(x as i32 - 1, y as i32) != 0;
                let up = grid.color(x as i32, y as i32 - 1) != 0;
                if here != up {
                    edges.set(width * y + x);
                }
                if here != left {
                    edges.set(half_horizontals + (width + 1) * y + x);
                }
            }
        }

        Self {
            width,
            height,
            horizontals,
            max_steps,
            edges,
        }
    }

    /// The id of the inverse of a step.
    pub fn invert(id: usize) -> usize {
        id ^ 1
    }

    /// The start co-ordinates of a step.
    pub fn start(&self, id: usize) -> Point {
        self.end(Self::invert(id))
    }

    /// How many undirected edges are still available.
    pub fn remaining_edges(&self) -> usize {
        self.edges.count()
    }

    fn available(&self, id: usize) -> bool {
        self.edges.get(id >> 1)
    }

    fn validate(&self, id: usize) {
        assert!(
            id < self.max_steps,
            "invalid step id {id} in {}x{} layout",
            self.width,
            self.height
        );
    }
}

impl Layout for RectLayout {
    type Pos = Point;

    fn any_step(&self) -> Option<usize> {
        // The reverse direction of the lowest available edge starts at a
        // corner in practice: nothing solid lies above or left of it.
        self.edges.next_set_bit(0).map(|half| (half << 1) + 1)
    }

    fn options(&self, id: usize) -> [Option<usize>; 3] {
        let end = self.end(id);
        let (x, y) = (end.x as usize, end.y as usize);
        let inverse = Self::invert(id);

        let mut result = [None; 3];
        let mut count = 0;
        let mut offer = |cand: usize| {
            if self.available(cand) && cand != inverse {
                result[count] = Some(cand);
                count += 1;
            }
        };

        let rightward = 2 * (self.width * y + x);
        let downward = self.horizontals + 2 * ((self.width + 1) * y + x);
        if x > 0 {
            offer(rightward - 1);
        }
        if x < self.width {
            offer(rightward);
        }
        if y > 0 {
            offer(downward - 2 * (self.width + 1) + 1);
        }
        if y < self.height {
            offer(downward);
        }
        result
    }

    fn parallel(&self, a: usize, b: usize) -> bool {
        self.validate(a);
        self.validate(b);
        (a < self.horizontals) == (b < self.horizontals) && (a ^ b) & 1 == 0
    }

    fn antiparallel(&self, a: usize, b: usize) -> bool {
        self.validate(a);
        self.validate(b);
        (a < self.horizontals) == (b < self.horizontals) && (a ^ b) & 1 != 0
    }

    fn consume(&mut self, id: usize) {
        self.validate(id);
        self.edges.clear(id >> 1);
    }

    fn end(&self, id: usize) -> Point {
        self.validate(id);
        let (base, scale, dx, dy) = if id < self.horizontals {
            (id, self.width, 1 - (id & 1), 0)
        } else {
            let base = id - self.horizontals;
            (base, self.width + 1, 0, 1 - (base & 1))
        };
        let half = base >> 1;
        let y = half / scale + dy;
        let x = half % scale + dx;
        Point::new(x as i32, y as i32)
    }
}
