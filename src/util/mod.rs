//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod errors;
pub mod fs;
pub mod hash;

pub use config::ExportConfig;
pub use diagnostic::Diagnostic;
pub use errors::ExportError;
