use std::fs::File;
use std::io::{self, BufWriter, Write};

use edgetrace::{
    AccretingOptimizer, BasicSlicer, CleverOptimizer, ColorOptimizer, ErodingOptimizer, Layer,
    MappedOptimizer, MinimalOptimizer, MultiOptimizerSlicer, PaletteGrid, PathScribe,
    PerimeterSelector, Score, TraceResult, run_all, savings, svg,
};

use crate::cli::{Cli, OptimizerChoice};

/// Trace the input image and write the SVG document out.
pub fn run(cli: Cli) -> TraceResult<()> {
    let grid = PaletteGrid::load(&cli.input)?;
    let selector = PerimeterSelector::new(cli.orthogonal_weight, cli.diagonal_weight);

    // Publish the saving table before any worker threads look at it.
    savings::table();

    let mut layers = slice(&cli, &grid, &selector)?;
    run_all(&mut layers);

    match &cli.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            svg::write_document(&mut out, &grid, &layers)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            svg::write_document(&mut out, &grid, &layers)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn slice(
    cli: &Cli,
    grid: &PaletteGrid,
    selector: &PerimeterSelector,
) -> TraceResult<Vec<Layer<PathScribe>>> {
    let single: Option<Box<dyn ColorOptimizer>> = match cli.optimizer {
        OptimizerChoice::Minimal => Some(Box::new(MinimalOptimizer)),
        OptimizerChoice::Mapped => Some(Box::new(MappedOptimizer)),
        OptimizerChoice::Accrete => Some(Box::new(AccretingOptimizer::new(
            |s| s.moves_and_draws(),
            cli.eager,
        ))),
        OptimizerChoice::Erode => Some(Box::new(ErodingOptimizer::new(
            |s| s.moves_and_draws(),
            cli.eager,
        ))),
        OptimizerChoice::Clever => Some(Box::new(CleverOptimizer::with_scorers(
            |s| s.moves_and_draws(),
            |s| s.draws,
            cli.eager,
        ))),
        OptimizerChoice::Compete => None,
    };

    match single {
        Some(optimizer) => {
            BasicSlicer::new(selector, optimizer.as_ref()).slice(grid, |_| PathScribe::new())
        }
        None => {
            let contestants: Vec<Box<dyn ColorOptimizer>> = vec![
                Box::new(MinimalOptimizer),
                Box::new(MappedOptimizer),
                Box::new(AccretingOptimizer::new(|s| s.moves_and_draws(), true)),
                Box::new(ErodingOptimizer::new(|s| s.moves_and_draws(), true)),
                Box::new(CleverOptimizer::with_scorers(
                    |s| s.moves_and_draws(),
                    |s| s.draws,
                    true,
                )),
            ];
            MultiOptimizerSlicer::new(selector, &contestants, Score::by_draws)
                .slice(grid, |_| PathScribe::new())
        }
    }
}
