//! CLI argument definitions using clap.
//!
//! The surface is intentionally small: an input directory, an output
//! directory, and a watch flag.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Directory containing meta.yml and one <locale>.yml per language
    pub input_dir: PathBuf,

    /// Directory the compiled modules are written to
    pub output_dir: PathBuf,

    /// Recompile whenever a file in the input directory changes
    #[arg(short, long)]
    pub watch: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
