mod cli;
mod commands;
mod report;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::process::ExitCode;

fn main() -> ExitCode {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .ok();
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> edgetrace::TraceResult<()> {
    let cli = cli::Cli::parse();
    commands::run(cli)
}
