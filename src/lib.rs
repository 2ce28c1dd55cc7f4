//! qpdf-exports - Emscripten export manifests for the qpdf C API
//!
//! This crate scans the qpdf C header for `QPDF_DLL` declarations, merges the
//! discovered symbols with curated include/exclude tables, and renders the
//! export lists the WASM build consumes along with a TypeScript mirror.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::artifacts::{render_artifacts, Artifact, ArtifactSet};
pub use builder::bindings::{strip_comments, HeaderParser, ParsedHeader};
pub use core::manifest::{assemble, ExportManifest};
pub use ops::{generate, GenerateOptions, GenerateResult};
pub use util::config::ExportConfig;
