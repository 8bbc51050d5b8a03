use std::fmt::Write as _;
use std::io::{self, Write};

use crate::grid::Grid;
use crate::layout::Point;
use crate::palette::PaletteGrid;
use crate::scribe::Scribe;
use crate::slicer::Layer;

/// A scribe that accumulates SVG path data.
///
/// Tracers draw the move point again as the closing line of each subpath,
/// so `move_to` is dropped and the subpath opens at the first `line_to`
/// instead; nothing is lost and a co-ordinate pair is saved.
#[derive(Debug, Clone, Default)]
pub struct PathScribe {
    data: String,
    down: bool,
}

impl PathScribe {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated path data.
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl Scribe<Point> for PathScribe {
    fn move_to(&mut self, _to: Point) {}

    fn line_to(&mut self, to: Point) {
        let command = if self.down {
            'L'
        } else {
            self.down = true;
            'M'
        };
        let _ = write!(self.data, "{command}{} {}", to.x, to.y);
    }

    fn close(&mut self) {
        self.down = false;
        self.data.push('z');
    }
}

/// Write a complete SVG document: one evenodd-filled path per layer, in
/// render order, over a viewBox matching the grid.
pub fn write_document<W: Write>(
    out: &mut W,
    grid: &PaletteGrid,
    layers: &[Layer<PathScribe>],
) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        grid.width(),
        grid.height()
    )?;
    writeln!(out, r#"  <g style="stroke: none; fill-rule: evenodd">"#)?;
    for layer in layers {
        let [r, g, b] = grid.rgb(layer.color());
        writeln!(
            out,
            r#"    <path style="fill: #{r:02x}{g:02x}{b:02x}" d="{}"/>"#,
            layer.scribe().data()
        )?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, "</svg>")
}
