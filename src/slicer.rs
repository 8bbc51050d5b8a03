use std::cmp::Ordering;

use log::debug;
use rayon::prelude::*;

use crate::error::TraceResult;
use crate::grid::{Grid, collect_colors};
use crate::layout::{Point, RectLayout};
use crate::optimize::ColorOptimizer;
use crate::process::Process;
use crate::score::Score;
use crate::scribe::{Replay, ReplayingScribe, Scribe};
use crate::select::ColorSelector;
use crate::tracer::Tracer;

/// The pending work for one colour of a sliced grid.
///
/// A layer owns its scribe; drive the layer to completion, then take the
/// scribe back with [`Layer::into_scribe`]. Layers from one slicing run
/// share nothing and may be driven in any order, or in parallel with
/// [`run_all`].
///
/// [`run_all`]: crate::process::run_all
pub struct Layer<S> {
    color: u32,
    work: LayerWork<S>,
}

enum LayerWork<S> {
    Trace(Tracer<RectLayout, S>),
    Replay(Replay<Point, S>),
}

impl<S: Scribe<Point>> Layer<S> {
    /// The colour this layer paints.
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn scribe(&self) -> &S {
        match &self.work {
            LayerWork::Trace(tracer) => tracer.scribe(),
            LayerWork::Replay(replay) => replay.scribe(),
        }
    }

    pub fn into_scribe(self) -> S {
        match self.work {
            LayerWork::Trace(tracer) => tracer.into_scribe(),
            LayerWork::Replay(replay) => replay.into_scribe(),
        }
    }
}

impl<S: Scribe<Point>> Process for Layer<S> {
    fn process(&mut self) -> bool {
        match &mut self.work {
            LayerWork::Trace(tracer) => tracer.process(),
            LayerWork::Replay(replay) => replay.process(),
        }
    }
}

/// Slices a multicolour grid into per-colour layers with a single
/// optimiser.
pub struct BasicSlicer<'a> {
    selector: &'a dyn ColorSelector,
    optimizer: &'a dyn ColorOptimizer,
}

impl<'a> BasicSlicer<'a> {
    pub fn new(selector: &'a dyn ColorSelector, optimizer: &'a dyn ColorOptimizer) -> Self {
        Self {
            selector,
            optimizer,
        }
    }

    /// Slice a grid, obtaining each layer's scribe from `scribes`.
    ///
    /// The returned vector is in render order: painting the layers in
    /// order reproduces the grid, because each layer may overpaint cells
    /// of the layers after it.
    pub fn slice<S, F>(&self, grid: &dyn Grid, mut scribes: F) -> TraceResult<Vec<Layer<S>>>
    where
        S: Scribe<Point>,
        F: FnMut(u32) -> S,
    {
        let mut colors = collect_colors(grid);
        colors.remove(0);
        let mut layers = Vec::new();
        while let Some(color) = self.selector.select(grid, &colors) {
            colors.remove(color);
            debug!("slicing colour {color}, {} left", colors.len());

            let mut job = self.optimizer.prepare(grid, color, &colors)?;
            job.run();
            let layout = RectLayout::new(job.optimized_grid());
            layers.push(Layer {
                color,
                work: LayerWork::Trace(Tracer::new(layout, scribes(color))),
            });
        }
        Ok(layers)
    }
}

/// Slices a multicolour grid, racing several optimisers on every layer and
/// keeping the best trace.
///
/// Each optimiser drives a private tracer into a recording scribe; the
/// recordings are compared under the given ordering and the winner is
/// replayed into the layer's real scribe. Ties go to the optimiser listed
/// first.
pub struct MultiOptimizerSlicer<'a> {
    selector: &'a dyn ColorSelector,
    optimizers: &'a [Box<dyn ColorOptimizer>],
    compare: fn(&Score, &Score) -> Ordering,
}

impl<'a> MultiOptimizerSlicer<'a> {
    pub fn new(
        selector: &'a dyn ColorSelector,
        optimizers: &'a [Box<dyn ColorOptimizer>],
        compare: fn(&Score, &Score) -> Ordering,
    ) -> Self {
        assert!(!optimizers.is_empty(), "no optimizers");
        Self {
            selector,
            optimizers,
            compare,
        }
    }

    /// Slice a grid as [`BasicSlicer::slice`] does, with the competing
    /// optimiser chains of each colour run in parallel.
    pub fn slice<S, F>(&self, grid: &dyn Grid, mut scribes: F) -> TraceResult<Vec<Layer<S>>>
    where
        S: Scribe<Point>,
        F: FnMut(u32) -> S,
    {
        let mut colors = collect_colors(grid);
        colors.remove(0);
        let mut layers = Vec::new();
        while let Some(color) = self.selector.select(grid, &colors) {
            colors.remove(color);

            // Every chain is self-contained: its own job, layout, tracer
            // and recording.
            let recordings: TraceResult<Vec<ReplayingScribe<Point>>> = self
                .optimizers
                .par_iter()
                .map(|optimizer| {
                    let mut job = optimizer.prepare(grid, color, &colors)?;
                    job.run();
                    let layout = RectLayout::new(job.optimized_grid());
                    let mut tracer = Tracer::new(layout, ReplayingScribe::new());
                    tracer.run();
                    Ok(tracer.into_scribe())
                })
                .collect();

            let mut best: Option<ReplayingScribe<Point>> = None;
            for recording in recordings? {
                let wins = match &best {
                    None => true,
                    Some(current) => {
                        (self.compare)(&recording.score(), &current.score()) == Ordering::Less
                    }
                };
                if wins {
                    best = Some(recording);
                }
            }
            let best = best.expect("at least one optimizer");
            debug!("colour {color} best trace scored {}", best.score());

            layers.push(Layer {
                color,
                work: LayerWork::Replay(best.into_replay(scribes(color))),
            });
        }
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ByteGrid;
    use crate::optimize::{CleverOptimizer, MappedOptimizer, MinimalOptimizer};
    use crate::process::run_all;
    use crate::scribe::{PathOp, ReplayingScribe};
    use crate::select::PerimeterSelector;

    fn byte_grid(rows: &[&[u8]]) -> ByteGrid {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.len()) as u32;
        ByteGrid::new(width, height, rows.concat())
    }

    fn recorded_layers(
        layers: Vec<Layer<ReplayingScribe<Point>>>,
    ) -> Vec<(u32, Vec<PathOp<Point>>)> {
        layers
            .into_iter()
            .map(|layer| {
                let color = layer.color();
                (color, layer.into_scribe().ops().to_vec())
            })
            .collect()
    }

    mod unit {
        use super::*;

        #[test]
        fn empty_grid_produces_no_layers() {
            let grid = ByteGrid::new(0, 0, Vec::new());
            let selector = PerimeterSelector::default();
            let slicer = BasicSlicer::new(&selector, &MinimalOptimizer);
            let layers = slicer.slice(&grid, |_| ReplayingScribe::new()).unwrap();
            assert!(layers.is_empty());
        }

        #[test]
        fn checkerboard_slices_both_colours_in_order() {
            let grid = byte_grid(&[&[1, 2], &[2, 1]]);
            let selector = PerimeterSelector::default();
            let slicer = BasicSlicer::new(&selector, &MinimalOptimizer);
            let mut layers = slicer.slice(&grid, |_| ReplayingScribe::new()).unwrap();
            run_all(&mut layers);

            let recorded = recorded_layers(layers);
            assert_eq!(recorded.len(), 2);
            // Ties break to the lowest colour, so 1 renders first.
            assert_eq!(recorded[0].0, 1);
            assert_eq!(recorded[1].0, 2);
            // Each colour is a diagonal pair of squares, traced as one
            // path crossing itself at the shared corner.
            for (_, ops) in &recorded {
                let moves = ops
                    .iter()
                    .filter(|op| matches!(op, PathOp::MoveTo(_)))
                    .count();
                let draws = ops
                    .iter()
                    .filter(|op| matches!(op, PathOp::LineTo(_)))
                    .count();
                assert_eq!(moves, 1);
                assert_eq!(draws, 6);
            }
        }

        #[test]
        fn slicing_is_deterministic() {
            let grid = byte_grid(&[&[1, 2, 1], &[2, 1, 2], &[3, 3, 3]]);
            let selector = PerimeterSelector::default();
            let optimizer = CleverOptimizer::best();
            let run = || {
                let slicer = BasicSlicer::new(&selector, &optimizer);
                let mut layers = slicer.slice(&grid, |_| ReplayingScribe::new()).unwrap();
                run_all(&mut layers);
                recorded_layers(layers)
            };
            assert_eq!(run(), run());
        }

        #[test]
        fn multi_optimizer_never_loses_to_its_contestants() {
            let grid = byte_grid(&[&[1, 2, 1], &[1, 0, 1], &[1, 1, 1]]);
            let selector = PerimeterSelector::default();
            let optimizers: Vec<Box<dyn ColorOptimizer>> = vec![
                Box::new(MinimalOptimizer),
                Box::new(MappedOptimizer),
                Box::new(CleverOptimizer::best()),
            ];
            let slicer = MultiOptimizerSlicer::new(&selector, &optimizers, Score::by_draws);
            let mut layers = slicer.slice(&grid, |_| ReplayingScribe::new()).unwrap();
            run_all(&mut layers);

            // Compare against each contestant run alone.
            for (index, contestant) in optimizers.iter().enumerate() {
                let basic = BasicSlicer::new(&selector, contestant.as_ref());
                let mut solo = basic.slice(&grid, |_| ReplayingScribe::new()).unwrap();
                run_all(&mut solo);
                for (winner, alone) in layers.iter().zip(&solo) {
                    assert!(
                        winner.scribe().score().draws <= alone.scribe().score().draws,
                        "optimizer {index} beat the tournament"
                    );
                }
            }
        }

        #[test]
        fn replayed_layers_match_their_recordings() {
            let grid = byte_grid(&[&[1, 2], &[2, 1]]);
            let selector = PerimeterSelector::default();
            let optimizers: Vec<Box<dyn ColorOptimizer>> = vec![Box::new(MinimalOptimizer)];
            let slicer = MultiOptimizerSlicer::new(&selector, &optimizers, Score::by_draws);
            let mut layers = slicer.slice(&grid, |_| ReplayingScribe::new()).unwrap();
            run_all(&mut layers);

            // With a single optimiser the tournament result equals the
            // basic slicer's.
            let basic = BasicSlicer::new(&selector, &MinimalOptimizer);
            let mut expected = basic.slice(&grid, |_| ReplayingScribe::new()).unwrap();
            run_all(&mut expected);
            assert_eq!(recorded_layers(layers), recorded_layers(expected));
        }

        #[test]
        #[should_panic(expected = "no optimizers")]
        fn tournament_requires_at_least_one_optimizer() {
            let selector = PerimeterSelector::default();
            let optimizers: Vec<Box<dyn ColorOptimizer>> = Vec::new();
            MultiOptimizerSlicer::new(&selector, &optimizers, Score::by_draws);
        }
    }
}
