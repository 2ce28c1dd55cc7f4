//! Diagnostics printed to stderr.
//!
//! Rendered in the rustc layout: a severity line, the file it concerns, then
//! `= note:` and `= help:` lines.

use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
        }
    }
}

/// A message for the user about one failure or suspicious input.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// File the message is about.
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            location: None,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Set the help line. A later call replaces the earlier one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render for the terminal. Only the severity label is colored.
    pub fn render(&self, color: bool) -> String {
        let mut out = format!("{}: {}\n", self.severity.label(color), self.message);

        if let Some(path) = &self.location {
            out.push_str(&format!("  --> {}\n", path.display()));
        }
        for note in &self.notes {
            out.push_str(&format!("  = note: {}\n", note));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("  = help: {}\n", help));
        }

        out
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.render(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_layout() {
        let diag = Diagnostic::error("could not find the qpdf C header")
            .with_location("external/qpdf/include/qpdf/qpdf-c.h")
            .with_note("no output files were written")
            .with_help("Pass --qpdf-include");

        assert_eq!(
            diag.render(false),
            "error: could not find the qpdf C header\n\
             \x20 --> external/qpdf/include/qpdf/qpdf-c.h\n\
             \x20 = note: no output files were written\n\
             \x20 = help: Pass --qpdf-include\n"
        );
    }

    #[test]
    fn test_render_bare_warning() {
        let output = Diagnostic::warning("duplicate export `malloc`").render(false);
        assert_eq!(output, "warning: duplicate export `malloc`\n");
    }

    #[test]
    fn test_color_only_touches_label() {
        let output = Diagnostic::warning("w").with_help("h").render(true);
        assert!(output.starts_with("\x1b[1;33mwarning\x1b[0m: w\n"));
        assert!(output.ends_with("  = help: h\n"));
    }
}
