//! Terminal output formatting.
//!
//! Separate from core logic so parlance can be used as a library without
//! dragging terminal concerns along.

use std::path::Path;

use colored::Colorize;

use crate::core::{CompileError, CompileSummary, CompileWarning};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print_success(summary: &CompileSummary, output_dir: &Path) {
    let msg = format!(
        "Compiled {} {} ({} {}) into {}",
        summary.locales,
        if summary.locales == 1 { "locale" } else { "locales" },
        summary.keys,
        if summary.keys == 1 { "key" } else { "keys" },
        output_dir.display()
    );
    println!("{} {}", SUCCESS_MARK.green(), msg.green());
}

pub fn print_warnings(warnings: &[CompileWarning]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".bold().yellow(), warning);
    }
}

pub fn print_error(err: &CompileError) {
    eprintln!("{} {} {}", FAILURE_MARK.red(), "error:".bold().red(), err);
}
