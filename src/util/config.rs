//! Configuration for export generation.
//!
//! The tables below encode decisions about the qpdf API surface that the
//! header scan cannot infer. They can be overridden with a TOML file:
//!
//! ```toml
//! [header]
//! marker = "QPDF_DLL"
//! prefix = "qpdf_"
//!
//! [exports]
//! manual = ["malloc", "free"]
//! exclude = ["qpdf_register_progress_reporter"]
//!
//! [runtime]
//! methods = ["ccall", "cwrap", "FS"]
//! ```
//!
//! Missing keys fall back to the built-in defaults.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Token marking a declaration as part of the public C API.
pub const DEFAULT_EXPORT_MARKER: &str = "QPDF_DLL";

/// Name prefix shared by every public C API function.
pub const DEFAULT_SYMBOL_PREFIX: &str = "qpdf_";

/// Header location relative to the include directory.
pub const DEFAULT_HEADER_FILE: &str = "qpdf/qpdf-c.h";

/// Include directory searched when none is given on the command line.
pub const DEFAULT_INCLUDE_DIR: &str = "external/qpdf/include";

/// Emscripten's C symbol linkage marker.
pub const DEFAULT_LINKAGE_PREFIX: &str = "_";

/// Name of the project config file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "qpdf-exports.toml";

/// Symbols the export scan cannot find: allocator entry points used to pass
/// buffers across the WASM boundary.
pub const MANUAL_INCLUDES: &[&str] = &["malloc", "free"];

/// Discovered symbols that must never be exported. Functions taking C
/// callbacks cannot be called through `ccall`/`cwrap`.
pub const EXCLUDED_SYMBOLS: &[&str] = &["qpdf_register_progress_reporter"];

/// Runtime helpers the generated module exposes to JavaScript.
pub const RUNTIME_METHODS: &[&str] = &[
    "ccall",
    "cwrap",
    "FS",
    "getValue",
    "setValue",
    "UTF8ToString",
    "stringToUTF8",
    "lengthBytesUTF8",
    "HEAPU8",
];

/// Module configuration keys the generated module accepts at instantiation.
pub const INCOMING_METHODS: &[&str] = &[
    "locateFile",
    "print",
    "printErr",
    "onRuntimeInitialized",
    "noInitialRun",
    "wasmBinary",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Export generation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Header scanning settings
    pub header: HeaderConfig,

    /// Export list settings
    pub exports: ExportsConfig,

    /// Runtime capability lists
    pub runtime: RuntimeConfig,
}

impl ExportConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config: {}", path.display()))?;

        Ok(())
    }
}

/// Where the header lives and how exported declarations look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Export marker token
    pub marker: String,

    /// Required function name prefix
    pub prefix: String,

    /// Header path relative to the include directory
    pub file: PathBuf,

    /// Include directory used when `--qpdf-include` is not given
    pub include_dir: PathBuf,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            marker: DEFAULT_EXPORT_MARKER.to_string(),
            prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
            file: PathBuf::from(DEFAULT_HEADER_FILE),
            include_dir: PathBuf::from(DEFAULT_INCLUDE_DIR),
        }
    }
}

impl HeaderConfig {
    /// Resolve the header path, preferring an explicit include directory.
    pub fn header_path(&self, include_override: Option<&Path>) -> PathBuf {
        include_override
            .unwrap_or(self.include_dir.as_path())
            .join(&self.file)
    }
}

/// Curated additions to and removals from the discovered exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportsConfig {
    /// Always exported, ahead of discovered symbols
    pub manual: Vec<String>,

    /// Never exported, even if discovered
    pub exclude: Vec<String>,

    /// Marker prepended to each name in the compiler export list
    pub linkage_prefix: String,
}

impl Default for ExportsConfig {
    fn default() -> Self {
        ExportsConfig {
            manual: to_strings(MANUAL_INCLUDES),
            exclude: to_strings(EXCLUDED_SYMBOLS),
            linkage_prefix: DEFAULT_LINKAGE_PREFIX.to_string(),
        }
    }
}

impl ExportsConfig {
    /// The exclusion list as a set for membership tests.
    pub fn exclude_set(&self) -> BTreeSet<String> {
        self.exclude.iter().cloned().collect()
    }
}

/// Fixed runtime capability lists, independent of the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime methods to export
    pub methods: Vec<String>,

    /// Incoming module configuration keys to allow
    pub incoming: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            methods: to_strings(RUNTIME_METHODS),
            incoming: to_strings(INCOMING_METHODS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_tables() {
        let config = ExportConfig::default();
        assert_eq!(config.header.marker, "QPDF_DLL");
        assert_eq!(config.header.prefix, "qpdf_");
        assert_eq!(config.exports.manual, vec!["malloc", "free"]);
        assert!(config
            .exports
            .exclude_set()
            .contains("qpdf_register_progress_reporter"));
        assert_eq!(config.runtime.methods.len(), RUNTIME_METHODS.len());
        assert_eq!(config.runtime.incoming.len(), INCOMING_METHODS.len());
    }

    #[test]
    fn test_header_path_resolution() {
        let header = HeaderConfig::default();
        assert_eq!(
            header.header_path(None),
            PathBuf::from("external/qpdf/include/qpdf/qpdf-c.h")
        );
        assert_eq!(
            header.header_path(Some(Path::new("/opt/qpdf/include"))),
            PathBuf::from("/opt/qpdf/include/qpdf/qpdf-c.h")
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("qpdf-exports.toml");
        std::fs::write(
            &path,
            "[exports]\nmanual = [\"alloc\"]\n\n[header]\nprefix = \"mylib_\"\n",
        )
        .unwrap();

        let config = ExportConfig::load(&path).unwrap();
        assert_eq!(config.exports.manual, vec!["alloc"]);
        assert_eq!(config.exports.linkage_prefix, "_");
        assert_eq!(config.header.prefix, "mylib_");
        assert_eq!(config.header.marker, "QPDF_DLL");
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = ExportConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_load_invalid_config_names_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[exports\nmanual = 3").unwrap();

        let err = ExportConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.toml"));
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = ExportConfig::default();
        config.exports.exclude.push("qpdf_other".to_string());
        config.save(&path).unwrap();

        let loaded = ExportConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
