//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Generate Emscripten export lists and a TypeScript mirror from qpdf-c.h
#[derive(Parser)]
#[command(name = "qpdf-exports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the generated files are written to
    #[arg(value_name = "OUTPUT_DIR", default_value = qpdf_exports::ops::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// qpdf include directory containing qpdf/qpdf-c.h
    #[arg(long = "qpdf-include", value_name = "DIR", env = "QPDF_INCLUDE")]
    pub qpdf_include: Option<PathBuf>,

    /// Configuration file overriding the built-in export tables
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail if the generated files are missing or out of date, without writing
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,

    /// Show what would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
