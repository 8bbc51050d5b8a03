use std::collections::BTreeMap;

use crate::bits::ColorSet;
use crate::grid::Grid;

/// Chooses which colour a slicer should trace next.
pub trait ColorSelector: Sync {
    /// Pick a colour from `candidates`, or `None` to stop slicing.
    fn select(&self, grid: &dyn Grid, candidates: &ColorSet) -> Option<u32>;
}

/// Selects the colour most exposed to already-traced cells.
///
/// Every lattice point is examined along with the four cells around it.
/// A candidate cell sharing an edge with a non-candidate cell scores the
/// orthogonal weight, sharing only the point scores the diagonal weight.
/// The highest total wins; ties break towards the lowest colour index, and
/// a colour with no exposure at all is never picked.
pub struct PerimeterSelector {
    pub orthogonal: f64,
    pub diagonal: f64,
}

impl PerimeterSelector {
    pub const DEFAULT_ORTHOGONAL: f64 = 1.0;
    pub const DEFAULT_DIAGONAL: f64 = 0.7;

    pub fn new(orthogonal: f64, diagonal: f64) -> Self {
        Self {
            orthogonal,
            diagonal,
        }
    }
}

impl Default for PerimeterSelector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ORTHOGONAL, Self::DEFAULT_DIAGONAL)
    }
}

impl ColorSelector for PerimeterSelector {
    fn select(&self, grid: &dyn Grid, candidates: &ColorSet) -> Option<u32> {
        let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
        for y in 0..=grid.height() as i32 {
            for x in 0..=grid.width() as i32 {
                let diagonal = grid.color(x - 1, y - 1);
                let beside = grid.color(x - 1, y);
                let above = grid.color(x, y - 1);
                let here = grid.color(x, y);
                if candidates.contains(here) {
                    // Count this cell against each traced neighbour.
                    let exposure = (if candidates.contains(diagonal) {
                        0.0
                    } else {
                        self.diagonal
                    }) + (if candidates.contains(beside) {
                        0.0
                    } else {
                        self.orthogonal
                    }) + (if candidates.contains(above) {
                        0.0
                    } else {
                        self.orthogonal
                    });
                    *totals.entry(here).or_default() += exposure;
                } else {
                    // This cell is traced; count its candidate neighbours.
                    if candidates.contains(diagonal) {
                        *totals.entry(diagonal).or_default() += self.diagonal;
                    }
                    if candidates.contains(beside) {
                        *totals.entry(beside).or_default() += self.orthogonal;
                    }
                    if candidates.contains(above) {
                        *totals.entry(above).or_default() += self.orthogonal;
                    }
                }
            }
        }

        let mut best = None;
        let mut best_total = 0.0;
        for (&color, &total) in &totals {
            if total > best_total {
                best_total = total;
                best = Some(color);
            }
        }
        best
    }
}
