//! Export generation error types.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Fatal failure of a generation run.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ExportError {
    #[error("header not found: {}", .path.display())]
    #[diagnostic(
        code(qpdf_exports::header::not_found),
        help("Pass the qpdf include directory with `--qpdf-include <DIR>`")
    )]
    HeaderNotFound { path: PathBuf },

    #[error("failed to read header: {}", .path.display())]
    #[diagnostic(
        code(qpdf_exports::header::unreadable),
        help("Check that the header is a readable UTF-8 file")
    )]
    HeaderUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} artifact(s) out of date in {}", .stale.len(), .output_dir.display())]
    #[diagnostic(
        code(qpdf_exports::check::stale),
        help("Run `qpdf-exports` without `--check` to regenerate them")
    )]
    StaleArtifacts {
        output_dir: PathBuf,
        stale: Vec<String>,
    },
}

impl ExportError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = match self {
            ExportError::HeaderNotFound { path } => Diagnostic::error(format!(
                "could not find the qpdf C header at `{}`",
                path.display()
            ))
            .with_location(path)
            .with_note("no output files were written"),

            ExportError::HeaderUnreadable { path, source } => {
                Diagnostic::error(format!("could not read `{}`", path.display()))
                    .with_location(path)
                    .with_note(source.to_string())
                    .with_note("no output files were written")
            }

            ExportError::StaleArtifacts { output_dir, stale } => {
                let mut diag = Diagnostic::error(format!(
                    "generated exports in `{}` are out of date",
                    output_dir.display()
                ));
                for name in stale {
                    diag = diag.with_note(format!("{} does not match the header", name));
                }
                diag
            }
        };

        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_help(help.to_string());
        }

        diag
    }
}
