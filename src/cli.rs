use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};
use edgetrace::PerimeterSelector;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input image path
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output SVG path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Cell-map optimiser strategy
    #[arg(long, value_enum, default_value_t = OptimizerChoice::Compete)]
    pub optimizer: OptimizerChoice,

    /// Weight of an edge shared with a traced cell when picking the next
    /// colour
    #[arg(long = "orthogonal-weight", default_value_t = PerimeterSelector::DEFAULT_ORTHOGONAL)]
    pub orthogonal_weight: f64,

    /// Weight of a corner shared with a traced cell when picking the next
    /// colour
    #[arg(long = "diagonal-weight", default_value_t = PerimeterSelector::DEFAULT_DIAGONAL)]
    pub diagonal_weight: f64,

    /// Apply cell flips even when they leave the score unchanged
    #[arg(long)]
    pub eager: bool,
}

/// Which optimiser rewrites each colour's cell map before tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OptimizerChoice {
    /// Trace each colour's own cells only
    Minimal,
    /// Treat all untraced colours as solid
    Mapped,
    /// Borrow future cells where that simplifies the outline
    Accrete,
    /// Start from everything untraced and carve cells away
    Erode,
    /// Accrete, fill corners, then erode reluctantly
    Clever,
    /// Race all strategies per colour and keep the best trace
    Compete,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod clap_integration {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn input_is_required() {
                assert!(Cli::try_parse_from(["edgetrace"]).is_err());
            }

            #[test]
            fn defaults_apply() {
                let cli = Cli::try_parse_from(["edgetrace", "in.png"]).unwrap();
                assert_eq!(cli.input, PathBuf::from("in.png"));
                assert!(cli.output.is_none());
                assert_eq!(cli.optimizer, OptimizerChoice::Compete);
                assert_eq!(cli.orthogonal_weight, 1.0);
                assert_eq!(cli.diagonal_weight, 0.7);
                assert!(!cli.eager);
            }

            #[test]
            fn output_flag_is_parsed() {
                let cli =
                    Cli::try_parse_from(["edgetrace", "in.png", "-o", "out.svg"]).unwrap();
                assert_eq!(cli.output, Some(PathBuf::from("out.svg")));
            }

            #[test]
            fn optimizer_variants_parse() {
                for (name, expected) in [
                    ("minimal", OptimizerChoice::Minimal),
                    ("mapped", OptimizerChoice::Mapped),
                    ("accrete", OptimizerChoice::Accrete),
                    ("erode", OptimizerChoice::Erode),
                    ("clever", OptimizerChoice::Clever),
                    ("compete", OptimizerChoice::Compete),
                ] {
                    let cli =
                        Cli::try_parse_from(["edgetrace", "in.png", "--optimizer", name]).unwrap();
                    assert_eq!(cli.optimizer, expected, "failed for {name}");
                }
            }

            #[test]
            fn invalid_optimizer_rejected() {
                let result =
                    Cli::try_parse_from(["edgetrace", "in.png", "--optimizer", "psychic"]);
                assert!(result.is_err());
            }

            #[test]
            fn selector_weights_override() {
                let cli = Cli::try_parse_from([
                    "edgetrace",
                    "in.png",
                    "--orthogonal-weight",
                    "2.5",
                    "--diagonal-weight",
                    "0",
                ])
                .unwrap();
                assert_eq!(cli.orthogonal_weight, 2.5);
                assert_eq!(cli.diagonal_weight, 0.0);
            }
        }
    }
}
