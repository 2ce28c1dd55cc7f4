//! Export discovery for C headers.
//!
//! This module scans C header files for functions carrying the public
//! export marker.

pub mod parser;
pub mod types;

pub use parser::{strip_comments, HeaderParser};
pub use types::ParsedHeader;
