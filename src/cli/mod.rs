//! Command-line interface layer.
//!
//! - `args`: clap argument definitions
//! - `report`: colored terminal output
//! - `watch`: watch mode and its run-coalescing latch

use anyhow::Result;

pub mod args;
mod exit_status;
mod report;
pub mod watch;

pub use args::Arguments;
pub use exit_status::ExitStatus;

use crate::core::compile;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    if args.watch {
        watch::watch(&args)?;
        return Ok(ExitStatus::Success);
    }

    if run_once(&args) {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

/// Compile once and report. Returns whether the run succeeded.
pub(crate) fn run_once(args: &Arguments) -> bool {
    if args.verbose {
        eprintln!(
            "compiling {} into {}",
            args.input_dir.display(),
            args.output_dir.display()
        );
    }

    match compile(&args.input_dir, &args.output_dir) {
        Ok(summary) => {
            report::print_warnings(&summary.warnings);
            report::print_success(&summary, &args.output_dir);
            true
        }
        Err(err) => {
            report::print_error(&err);
            false
        }
    }
}
