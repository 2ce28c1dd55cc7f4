//! C header scanner for export discovery.
//!
//! Finds public API functions by their export marker and name prefix. This is
//! a tolerant pattern match, not a C parser: macros and conditional
//! compilation are not evaluated.

use std::path::Path;

use anyhow::Result;
use regex::Regex;

use super::types::ParsedHeader;
use crate::util::config::{DEFAULT_EXPORT_MARKER, DEFAULT_SYMBOL_PREFIX};
use crate::util::errors::ExportError;

/// Remove C block and line comments from header text.
///
/// Block comments are replaced with a single space so the tokens around them
/// stay separate. Comment markers inside string literals are not recognized
/// and are stripped like real comments.
pub fn strip_comments(content: &str) -> String {
    let re_block = Regex::new(r"/\*[\s\S]*?\*/").unwrap();
    let content = re_block.replace_all(content, " ");

    let re_line = Regex::new(r"//[^\n]*").unwrap();
    re_line.replace_all(&content, "").into_owned()
}

/// Scanner for export-marked function declarations.
#[derive(Debug, Clone)]
pub struct HeaderParser {
    /// Token that marks a declaration as exported (e.g. `QPDF_DLL`)
    marker: String,
    /// Required prefix of exported function names
    prefix: String,
    pattern: Regex,
}

impl Default for HeaderParser {
    fn default() -> Self {
        HeaderParser::new(DEFAULT_EXPORT_MARKER, DEFAULT_SYMBOL_PREFIX)
    }
}

impl HeaderParser {
    /// Create a parser for the given export marker and name prefix.
    pub fn new(marker: impl Into<String>, prefix: impl Into<String>) -> Self {
        let marker = marker.into();
        let prefix = prefix.into();

        // marker, then a run of return-type words (which may carry `*` or
        // `[]`), then an identifier starting with the prefix with `(` directly
        // after it.
        let pattern = Regex::new(&format!(
            r"\b{}\s+(?:[\w*\[\]]+[\s*]+)+?\**({}\w*)\(",
            regex::escape(&marker),
            regex::escape(&prefix)
        ))
        .unwrap();

        HeaderParser {
            marker,
            prefix,
            pattern,
        }
    }

    /// The export marker this parser looks for.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The name prefix this parser looks for.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Read and scan a header file.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedHeader> {
        if !path.is_file() {
            return Err(ExportError::HeaderNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|source| ExportError::HeaderUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(self.parse_content(&content, path))
    }

    /// Scan header content that was already read from `path`.
    pub fn parse_content(&self, content: &str, path: &Path) -> ParsedHeader {
        let mut header = ParsedHeader::new(path);

        let cleaned = strip_comments(content);
        header.symbols = self.extract_symbols(&cleaned);

        header
    }

    /// Extract exported function names from comment-free text.
    ///
    /// Names come back in source order. A name declared twice is returned
    /// twice.
    pub fn extract_symbols(&self, cleaned: &str) -> Vec<String> {
        let mut symbols = Vec::new();

        for cap in self.pattern.captures_iter(cleaned) {
            let name = cap.get(1).map_or("", |m| m.as_str());
            if name.is_empty() {
                continue;
            }

            tracing::debug!("discovered {}", name);
            symbols.push(name.to_string());
        }

        symbols
    }
}
