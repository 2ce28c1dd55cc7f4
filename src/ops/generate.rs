//! Export generation operation.
//!
//! Reads the qpdf C header, assembles the export manifest and renders every
//! artifact before anything is written.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::artifacts::{render_artifacts, ArtifactSet};
use crate::builder::bindings::HeaderParser;
use crate::core::manifest::ExportManifest;
use crate::util::config::ExportConfig;
use crate::util::errors::ExportError;

/// Default output directory for generated artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// What to do with the rendered artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateMode {
    /// Write every artifact
    #[default]
    Write,
    /// Compare with the files on disk, write nothing
    Check,
    /// Render only
    DryRun,
}

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory the artifacts are written to
    pub output_dir: PathBuf,

    /// Include directory overriding the configured one
    pub include_dir: Option<PathBuf>,

    /// Header and table configuration
    pub config: ExportConfig,

    /// Write, check or dry-run
    pub mode: GenerateMode,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            include_dir: None,
            config: ExportConfig::default(),
            mode: GenerateMode::Write,
        }
    }
}

impl GenerateOptions {
    /// Create options writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Override the header include directory.
    pub fn with_include_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.include_dir = dir;
        self
    }

    /// Use the given configuration.
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the run mode.
    pub fn with_mode(mut self, mode: GenerateMode) -> Self {
        self.mode = mode;
        self
    }

    /// The header file this run reads.
    pub fn header_path(&self) -> PathBuf {
        self.config.header.header_path(self.include_dir.as_deref())
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Header that was scanned
    pub header: PathBuf,

    /// The assembled manifest
    pub manifest: ExportManifest,

    /// The rendered artifacts
    pub artifacts: ArtifactSet,

    /// Files written (empty for check and dry-run)
    pub written: Vec<PathBuf>,
}

/// Run the full pipeline: scan, assemble, render, then write.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateResult> {
    let header_path = opts.header_path();
    tracing::info!("scanning {}", header_path.display());

    let parser = HeaderParser::new(&opts.config.header.marker, &opts.config.header.prefix);
    let header = parser.parse_file(&header_path)?;

    if header.is_empty() {
        tracing::warn!(
            "no `{}` declarations with prefix `{}` found in {}",
            parser.marker(),
            parser.prefix(),
            header_path.display()
        );
    }

    let manifest = ExportManifest::from_discovered(&header.symbols, &opts.config);
    tracing::debug!(
        "{} manual, {} discovered, {} excluded",
        manifest.manual_count,
        manifest.discovered_count,
        manifest.excluded_count
    );

    let artifacts = render_artifacts(&manifest)?;

    let written = match opts.mode {
        GenerateMode::Write => artifacts.write_all(&opts.output_dir)?,
        GenerateMode::Check => {
            check_up_to_date(&artifacts, &opts.output_dir)?;
            Vec::new()
        }
        GenerateMode::DryRun => Vec::new(),
    };

    Ok(GenerateResult {
        header: header_path,
        manifest,
        artifacts,
        written,
    })
}

fn check_up_to_date(artifacts: &ArtifactSet, output_dir: &Path) -> Result<()> {
    let stale = artifacts.stale_in(output_dir)?;
    if stale.is_empty() {
        tracing::info!("artifacts in {} are up to date", output_dir.display());
        return Ok(());
    }

    Err(ExportError::StaleArtifacts {
        output_dir: output_dir.to_path_buf(),
        stale,
    }
    .into())
}
