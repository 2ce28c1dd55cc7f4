//! High-level operations.

pub mod generate;

pub use generate::{generate, GenerateMode, GenerateOptions, GenerateResult, DEFAULT_OUTPUT_DIR};
