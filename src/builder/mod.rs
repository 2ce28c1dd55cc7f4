//! Header scanning and artifact rendering.

pub mod artifacts;
pub mod bindings;

pub use artifacts::{render_artifacts, Artifact, ArtifactKind, ArtifactSet};
pub use bindings::{HeaderParser, ParsedHeader};
