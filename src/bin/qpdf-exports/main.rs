//! qpdf-exports CLI - Emscripten export manifests for the qpdf C API

use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use qpdf_exports::ops::{generate, GenerateMode, GenerateOptions, GenerateResult};
use qpdf_exports::util::config::{ExportConfig, CONFIG_FILE_NAME};
use qpdf_exports::util::diagnostic::{self, Diagnostic};
use qpdf_exports::util::fs::display_path;
use qpdf_exports::util::hash::short_hash;
use qpdf_exports::util::ExportError;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("qpdf_exports=debug")
    } else {
        EnvFilter::new("qpdf_exports=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<ExportError>() {
            Some(export_err) => diagnostic::emit(&export_err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => ExportConfig::load(path)?,
        None => ExportConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?,
    };

    let mode = if cli.check {
        GenerateMode::Check
    } else if cli.dry_run {
        GenerateMode::DryRun
    } else {
        GenerateMode::Write
    };

    let opts = GenerateOptions::new(&cli.output_dir)
        .with_include_dir(cli.qpdf_include)
        .with_config(config)
        .with_mode(mode);

    let result = generate(&opts)?;
    for (name, count) in result.manifest.duplicates() {
        let warning = Diagnostic::warning(format!(
            "`{}` appears {} times in the export list",
            name, count
        ))
        .with_note("it is declared more than once or is also a manual entry");
        diagnostic::emit(&warning, color);
    }
    print_summary(&result, &opts);

    Ok(())
}

fn print_summary(result: &GenerateResult, opts: &GenerateOptions) {
    let manifest = &result.manifest;
    let output_dir = display_path(&opts.output_dir);

    println!(
        "Discovered {} functions in {} ({} excluded)",
        manifest.discovered_count,
        display_path(&result.header).display(),
        manifest.excluded_count
    );
    println!("Manual entries: {}", manifest.manual_count);
    println!("Total exports:  {}", manifest.exports.len());

    match opts.mode {
        GenerateMode::Write => {
            println!(
                "Wrote {} files to {}",
                result.written.len(),
                output_dir.display()
            );
        }
        GenerateMode::Check => {
            println!("Generated files in {} are up to date", output_dir.display());
        }
        GenerateMode::DryRun => {
            println!("[dry-run] Would write to {}:", output_dir.display());
            for artifact in result.artifacts.iter() {
                println!(
                    "  {:<32} {}",
                    artifact.file_name(),
                    short_hash(&artifact.digest())
                );
            }
        }
    }
}
