use crate::bits::{BitSet, ColorSet};

/// A rectangular grid of cells carrying colour indices.
///
/// Colour 0 is transparent. Co-ordinates may lie outside the grid, in which
/// case the colour is 0. Grids are read-only for the lifetime of a slice,
/// so sharing them across worker threads is always sound.
pub trait Grid: Sync {
    /// The grid width in cells.
    fn width(&self) -> u32;

    /// The grid height in cells.
    fn height(&self) -> u32;

    /// The colour of the cell at (x, y), or 0 outside the grid.
    fn color(&self, x: i32, y: i32) -> u32;
}

/// A sub-rectangle view of another grid.
///
/// Reads outside the view return 0, even where the parent has cells there.
pub struct GridView<'g> {
    parent: &'g dyn Grid,
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

impl<'g> GridView<'g> {
    pub fn new(parent: &'g dyn Grid, left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            parent,
            left,
            top,
            width,
            height,
        }
    }
}

impl Grid for GridView<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.parent.color(x + self.left, y + self.top)
    }
}

/// A one-bit-per-cell grid: set cells read as colour 1, clear cells as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: u32,
    height: u32,
    bits: BitSet,
}

impl BitGrid {
    /// Create a grid with every cell clear.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: BitSet::new(width as usize * height as usize),
        }
    }

    /// Reduce another grid to one bit per cell.
    pub fn from_grid(grid: &dyn Grid, solid: impl Fn(u32) -> bool) -> Self {
        let mut result = Self::new(grid.width(), grid.height());
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if solid(grid.color(x, y)) {
                    result.set(x, y);
                }
            }
        }
        result
    }

    /// Build the 3×3 grid described by a bit pattern, bit 0 top-left,
    /// row-major.
    pub fn from_pattern(pattern: u16) -> Self {
        debug_assert!(pattern < 512);
        let mut result = Self::new(3, 3);
        for bit in 0..9 {
            if pattern >> bit & 1 != 0 {
                result.set(bit % 3, bit / 3);
            }
        }
        result
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at (x, y) is set. Cells outside the grid are not.
    pub fn solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits.get(self.index(x, y))
    }

    pub fn set(&mut self, x: i32, y: i32) {
        let index = self.checked_index(x, y);
        self.bits.set(index);
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        let index = self.checked_index(x, y);
        self.bits.clear(index);
    }

    /// The underlying cell bits, row-major.
    pub fn bits(&self) -> &BitSet {
        &self.bits
    }

    fn index(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    fn checked_index(&self, x: i32, y: i32) -> usize {
        assert!(
            x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        self.index(x, y)
    }
}

impl Grid for BitGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color(&self, x: i32, y: i32) -> u32 {
        self.solid(x, y) as u32
    }
}

/// An indexed grid with one byte per cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl ByteGrid {
    /// Create a grid over `cells`, which must hold exactly width × height
    /// entries.
    pub fn new(width: u32, height: u32, cells: Vec<u8>) -> Self {
        assert_eq!(
            cells.len(),
            width as usize * height as usize,
            "cell data does not match {width}x{height}"
        );
        Self {
            width,
            height,
            cells,
        }
    }
}

impl Grid for ByteGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.cells[x as usize + y as usize * self.width as usize] as u32
    }
}

/// Collect the non-transparent colours present in a grid.
pub fn collect_colors(grid: &dyn Grid) -> ColorSet {
    let mut colors = ColorSet::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let color = grid.color(x, y);
            if color != 0 {
                colors.insert(color);
            }
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn byte_grid(rows: &[&[u8]]) -> ByteGrid {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        let cells = rows.concat();
        ByteGrid::new(width, height, cells)
    }

    mod unit {
        use super::*;

        #[test]
        fn byte_grid_reads_zero_outside() {
            let grid = byte_grid(&[&[1, 2], &[3, 4]]);
            assert_eq!(grid.color(0, 0), 1);
            assert_eq!(grid.color(1, 1), 4);
            assert_eq!(grid.color(-1, 0), 0);
            assert_eq!(grid.color(0, -1), 0);
            assert_eq!(grid.color(2, 0), 0);
            assert_eq!(grid.color(0, 2), 0);
        }

        #[test]
        fn view_clips_to_its_rectangle() {
            let grid = byte_grid(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
            let view = GridView::new(&grid, 1, 1, 2, 2);
            assert_eq!(view.color(0, 0), 5);
            assert_eq!(view.color(1, 1), 9);
            // The parent has cells there, but the view does not.
            assert_eq!(view.color(-1, 0), 0);
            assert_eq!(view.color(2, 0), 0);
        }

        #[test]
        fn bit_grid_from_grid_applies_the_reducer() {
            let grid = byte_grid(&[&[1, 2], &[0, 1]]);
            let ones = BitGrid::from_grid(&grid, |c| c == 1);
            assert!(ones.solid(0, 0));
            assert!(!ones.solid(1, 0));
            assert!(!ones.solid(0, 1));
            assert!(ones.solid(1, 1));
        }

        #[test]
        fn bit_grid_pattern_round_trip() {
            let grid = BitGrid::from_pattern(0b100010001);
            assert!(grid.solid(0, 0));
            assert!(grid.solid(1, 1));
            assert!(grid.solid(2, 2));
            assert!(!grid.solid(1, 0));
            assert_eq!(grid.color(1, 1), 1);
            assert_eq!(grid.color(3, 1), 0);
        }

        #[test]
        fn collect_colors_skips_transparent() {
            let grid = byte_grid(&[&[0, 3], &[1, 3]]);
            let colors = collect_colors(&grid);
            assert_eq!(colors.iter().collect::<Vec<_>>(), vec![1, 3]);
        }

        #[test]
        fn empty_grid_has_no_colors() {
            let grid = ByteGrid::new(0, 0, Vec::new());
            assert!(collect_colors(&grid).is_empty());
        }
    }
}
