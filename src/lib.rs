pub mod bits;
pub mod error;
pub mod grid;
pub mod layout;
pub mod optimize;
pub mod palette;
pub mod process;
pub mod savings;
pub mod score;
pub mod scribe;
pub mod select;
pub mod slicer;
pub mod svg;
pub mod tracer;

pub use bits::{BitSet, ColorSet};
pub use error::{TraceError, TraceResult};
pub use grid::{BitGrid, ByteGrid, Grid, GridView, collect_colors};
pub use layout::{Layout, Point, RectLayout};
pub use optimize::{
    AccretingOptimizer, CleverOptimizer, ColorOptimizer, ErodingOptimizer, MappedOptimizer,
    MinimalOptimizer, Optimization,
};
pub use palette::PaletteGrid;
pub use process::{Process, run_all};
pub use score::Score;
pub use scribe::{CountingScribe, PathOp, Replay, ReplayingScribe, Scribe};
pub use select::{ColorSelector, PerimeterSelector};
pub use slicer::{BasicSlicer, Layer, MultiOptimizerSlicer};
pub use svg::PathScribe;
pub use tracer::Tracer;
