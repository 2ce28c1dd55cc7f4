//! Core data model.

pub mod manifest;

pub use manifest::{assemble, ExportManifest};
