use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use log::debug;

use crate::error::{TraceError, TraceResult};
use crate::grid::Grid;

/// The palette rejection threshold: an image needing this many entries,
/// the transparent one included, is refused.
pub const MAX_COLORS: usize = 20;

/// An indexed-colour grid decoded from an image.
///
/// Palette index 0 is transparent; opaque colours are numbered from 1 in
/// scan order of first appearance.
pub struct PaletteGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    palette: Vec<[u8; 4]>,
}

impl PaletteGrid {
    /// Decode the image at `path` into an indexed grid.
    pub fn load(path: impl AsRef<Path>) -> TraceResult<Self> {
        let image = image::open(path)?.to_rgba8();
        Self::from_image(&image)
    }

    /// Index the pixels of an RGBA image.
    ///
    /// Every pixel must be fully opaque or fully transparent, and at most
    /// [`MAX_COLORS`] palette entries may be needed.
    pub fn from_image(image: &RgbaImage) -> TraceResult<Self> {
        let (width, height) = image.dimensions();
        let mut indices: HashMap<[u8; 4], u8> = HashMap::new();
        let mut palette = vec![[0, 0, 0, 0]];
        let mut cells = Vec::with_capacity(width as usize * height as usize);

        for (x, y, pixel) in image.enumerate_pixels() {
            let rgba = pixel.0;
            match rgba[3] {
                0 => cells.push(0),
                255 => {
                    let next = palette.len();
                    let index = *indices.entry(rgba).or_insert_with(|| {
                        palette.push(rgba);
                        next as u8
                    });
                    if palette.len() >= MAX_COLORS {
                        return Err(TraceError::PaletteOverflow { limit: MAX_COLORS });
                    }
                    cells.push(index);
                }
                alpha => return Err(TraceError::UnsupportedAlpha { x, y, alpha }),
            }
        }

        debug!(
            "indexed {width}x{height} image with {} opaque colours",
            palette.len() - 1
        );
        Ok(Self {
            width,
            height,
            cells,
            palette,
        })
    }

    /// How many palette entries are in use, the transparent one included.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// The RGB value behind a palette index.
    pub fn rgb(&self, index: u32) -> [u8; 3] {
        let [r, g, b, _] = self.palette[index as usize];
        [r, g, b]
    }
}

impl Grid for PaletteGrid {
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
