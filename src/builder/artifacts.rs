//! Rendering of the generated export artifacts.
//!
//! All artifacts are views over one [`ExportManifest`]. They are rendered in
//! memory as a set and written together, so the files on disk always come
//! from the same run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::ExportManifest;
use crate::util::fs as fsutil;
use crate::util::hash;

/// Compiler export list, for `-sEXPORTED_FUNCTIONS=@<file>`.
pub const EXPORTED_FUNCTIONS_FILE: &str = "exported-functions.json";

/// Runtime method list, for `-sEXPORTED_RUNTIME_METHODS=@<file>`.
pub const RUNTIME_METHODS_FILE: &str = "exported-runtime-methods.json";

/// Incoming module API list, for `-sINCOMING_MODULE_JS_API=@<file>`.
pub const INCOMING_METHODS_FILE: &str = "incoming-module-js-api.json";

/// TypeScript mirror of the export and runtime lists.
pub const TYPESCRIPT_FILE: &str = "exports.generated.ts";

/// Kind of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ExportedFunctions,
    RuntimeMethods,
    IncomingMethods,
    TypeScript,
}

impl ArtifactKind {
    /// All kinds, in the order they are rendered and written.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::ExportedFunctions,
        ArtifactKind::RuntimeMethods,
        ArtifactKind::IncomingMethods,
        ArtifactKind::TypeScript,
    ];

    /// File name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::ExportedFunctions => EXPORTED_FUNCTIONS_FILE,
            ArtifactKind::RuntimeMethods => RUNTIME_METHODS_FILE,
            ArtifactKind::IncomingMethods => INCOMING_METHODS_FILE,
            ArtifactKind::TypeScript => TYPESCRIPT_FILE,
        }
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub contents: String,
}

impl Artifact {
    /// File name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    /// SHA-256 of the rendered contents.
    pub fn digest(&self) -> String {
        hash::sha256_str(&self.contents)
    }
}

/// The complete set of rendered artifacts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    /// Iterate over the artifacts in write order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    /// Look up an artifact by kind.
    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Write every artifact into `output_dir`, creating it if needed.
    pub fn write_all(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = self
            .artifacts
            .iter()
            .map(|a| (a.file_name(), a.contents.as_str()));

        let written = fsutil::write_files_staged(output_dir, files)
            .with_context(|| format!("failed to write artifacts to {}", output_dir.display()))?;

        for artifact in &self.artifacts {
            tracing::debug!(
                "wrote {} ({})",
                artifact.file_name(),
                hash::short_hash(&artifact.digest())
            );
        }

        Ok(written)
    }

    /// Names of artifacts whose file in `output_dir` is missing or differs.
    pub fn stale_in(&self, output_dir: &Path) -> Result<Vec<String>> {
        let mut stale = Vec::new();
        for artifact in &self.artifacts {
            let path = output_dir.join(artifact.file_name());
            let on_disk = fsutil::read_if_exists(&path)?;
            if on_disk.as_deref() != Some(artifact.contents.as_str()) {
                stale.push(artifact.file_name().to_string());
            }
        }
        Ok(stale)
    }
}

/// Render every artifact for a manifest.
pub fn render_artifacts(manifest: &ExportManifest) -> Result<ArtifactSet> {
    let mut artifacts = Vec::with_capacity(ArtifactKind::ALL.len());

    for kind in ArtifactKind::ALL {
        let contents = match kind {
            ArtifactKind::ExportedFunctions => render_json_list(&manifest.linked_exports())?,
            ArtifactKind::RuntimeMethods => render_json_list(&manifest.runtime_methods)?,
            ArtifactKind::IncomingMethods => render_json_list(&manifest.incoming_methods)?,
            ArtifactKind::TypeScript => render_typescript(manifest),
        };
        artifacts.push(Artifact { kind, contents });
    }

    Ok(ArtifactSet { artifacts })
}

/// Render a flat JSON array of names.
pub fn render_json_list(names: &[String]) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(names).context("failed to serialize export list")?;
    json.push('\n');
    Ok(json)
}

/// Render the TypeScript mirror of the export and runtime lists.
pub fn render_typescript(manifest: &ExportManifest) -> String {
    let mut out = String::new();
    out.push_str("// This file is generated by qpdf-exports. Do not edit it by hand.\n");
    out.push_str("// Regenerate it by running the export generator against qpdf-c.h.\n");
    out.push('\n');

    write_ts_const(&mut out, "EXPORTED_FUNCTIONS", &manifest.exports);
    out.push('\n');
    write_ts_const(&mut out, "EXPORTED_RUNTIME_METHODS", &manifest.runtime_methods);

    out
}

fn write_ts_const(out: &mut String, name: &str, values: &[String]) {
    if values.is_empty() {
        out.push_str(&format!("export const {} = [] as const;\n", name));
        return;
    }

    out.push_str(&format!("export const {} = [\n", name));
    for value in values {
        // JSON string escaping is valid TypeScript string syntax.
        let literal = serde_json::Value::String(value.clone()).to_string();
        out.push_str(&format!("  {},\n", literal));
    }
    out.push_str("] as const;\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn manifest() -> ExportManifest {
        ExportManifest {
            exports: vec!["alloc".into(), "prefix_init".into()],
            runtime_methods: vec!["ccall".into(), "FS".into()],
            incoming_methods: vec!["print".into()],
            linkage_prefix: "_".into(),
            manual_count: 1,
            discovered_count: 1,
            excluded_count: 0,
        }
    }

    #[test]
    fn test_exported_functions_are_prefixed() {
        let set = render_artifacts(&manifest()).unwrap();
        let exports = set.get(ArtifactKind::ExportedFunctions).unwrap();
        assert_eq!(exports.contents, "[\n  \"_alloc\",\n  \"_prefix_init\"\n]\n");
    }

    #[test]
    fn test_runtime_lists_are_unprefixed() {
        let set = render_artifacts(&manifest()).unwrap();
        let runtime: Vec<String> =
            serde_json::from_str(&set.get(ArtifactKind::RuntimeMethods).unwrap().contents)
                .unwrap();
        assert_eq!(runtime, vec!["ccall", "FS"]);

        let incoming: Vec<String> =
            serde_json::from_str(&set.get(ArtifactKind::IncomingMethods).unwrap().contents)
                .unwrap();
        assert_eq!(incoming, vec!["print"]);
    }

    #[test]
    fn test_typescript_mirror() {
        let ts = render_typescript(&manifest());
        assert!(ts.starts_with("// This file is generated by qpdf-exports. Do not edit"));
        assert!(ts.contains(
            "export const EXPORTED_FUNCTIONS = [\n  \"alloc\",\n  \"prefix_init\",\n] as const;\n"
        ));
        assert!(ts.contains(
            "export const EXPORTED_RUNTIME_METHODS = [\n  \"ccall\",\n  \"FS\",\n] as const;\n"
        ));
    }

    #[test]
    fn test_typescript_empty_list() {
        let manifest = ExportManifest::default();
        let ts = render_typescript(&manifest);
        assert!(ts.contains("export const EXPORTED_FUNCTIONS = [] as const;\n"));
    }

    #[test]
    fn test_export_list_matches_typescript_mirror() {
        let manifest = manifest();
        let set = render_artifacts(&manifest).unwrap();

        let exported: Vec<String> =
            serde_json::from_str(&set.get(ArtifactKind::ExportedFunctions).unwrap().contents)
                .unwrap();
        let from_list: BTreeSet<String> = exported
            .iter()
            .map(|s| s.strip_prefix('_').unwrap().to_string())
            .collect();

        let ts = &set.get(ArtifactKind::TypeScript).unwrap().contents;
        let block = ts
            .split("export const EXPORTED_FUNCTIONS = [")
            .nth(1)
            .and_then(|rest| rest.split("] as const;").next())
            .unwrap();
        let from_ts: BTreeSet<String> = block
            .lines()
            .map(|l| l.trim().trim_end_matches(','))
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str::<String>(l).unwrap())
            .collect();

        assert_eq!(from_list, from_ts);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(
            render_artifacts(&manifest()).unwrap(),
            render_artifacts(&manifest()).unwrap()
        );
    }

    #[test]
    fn test_write_all_and_stale_detection() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("generated");
        let set = render_artifacts(&manifest()).unwrap();

        assert_eq!(set.stale_in(&out).unwrap().len(), 4);

        let written = set.write_all(&out).unwrap();
        assert_eq!(written.len(), 4);
        assert!(set.stale_in(&out).unwrap().is_empty());

        std::fs::write(out.join(TYPESCRIPT_FILE), "// edited\n").unwrap();
        assert_eq!(set.stale_in(&out).unwrap(), vec![TYPESCRIPT_FILE]);
    }
}
