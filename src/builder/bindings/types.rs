//! Types produced by header scanning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The exported symbols discovered in one C header file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedHeader {
    /// Source file path
    pub source: PathBuf,

    /// Discovered function names, in source order (duplicates kept)
    pub symbols: Vec<String>,
}

impl ParsedHeader {
    /// Create a new empty parsed header.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        ParsedHeader {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Number of discovered symbols, counting duplicates.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbols were discovered.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let header = ParsedHeader::new("qpdf-c.h");
        assert_eq!(header.source, PathBuf::from("qpdf-c.h"));
        assert!(header.is_empty());
        assert_eq!(header.len(), 0);
    }
}
