//! Export manifest assembly.
//!
//! The manifest is the single in-memory model every generated artifact is
//! rendered from.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::util::config::ExportConfig;

/// Combine manual entries with discovered symbols.
///
/// Returns `manual` verbatim followed by every discovered name not in
/// `exclude`. Nothing is deduplicated: a name present in both lists, or
/// declared twice in the header, appears more than once.
pub fn assemble(discovered: &[String], manual: &[String], exclude: &BTreeSet<String>) -> Vec<String> {
    let mut exports = Vec::with_capacity(manual.len() + discovered.len());
    exports.extend(manual.iter().cloned());

    for name in discovered {
        if exclude.contains(name) {
            tracing::debug!("excluding {}", name);
            continue;
        }
        exports.push(name.clone());
    }

    exports
}

/// The final export set plus the fixed capability lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportManifest {
    /// Manual entries followed by filtered discovered symbols
    pub exports: Vec<String>,

    /// Runtime methods the module must expose
    pub runtime_methods: Vec<String>,

    /// Module configuration keys the runtime accepts
    pub incoming_methods: Vec<String>,

    /// Linkage marker prepended to each export in the compiler list
    pub linkage_prefix: String,

    /// Number of manual entries at the front of `exports`
    pub manual_count: usize,

    /// Number of symbols found in the header, before exclusion
    pub discovered_count: usize,

    /// Number of discovered symbols dropped by the exclusion set
    pub excluded_count: usize,
}

impl ExportManifest {
    /// Build the manifest from discovered symbols and the configured tables.
    pub fn from_discovered(discovered: &[String], config: &ExportConfig) -> Self {
        let exclude = config.exports.exclude_set();
        let exports = assemble(discovered, &config.exports.manual, &exclude);

        let manual_count = config.exports.manual.len();
        let kept = exports.len() - manual_count;

        ExportManifest {
            exports,
            runtime_methods: config.runtime.methods.clone(),
            incoming_methods: config.runtime.incoming.clone(),
            linkage_prefix: config.exports.linkage_prefix.clone(),
            manual_count,
            discovered_count: discovered.len(),
            excluded_count: discovered.len() - kept,
        }
    }

    /// The manual portion of the export set.
    pub fn manual(&self) -> &[String] {
        &self.exports[..self.manual_count]
    }

    /// The discovered portion of the export set, after exclusion.
    pub fn discovered(&self) -> &[String] {
        &self.exports[self.manual_count..]
    }

    /// Exports with the linkage marker applied, as the compiler expects them.
    pub fn linked_exports(&self) -> Vec<String> {
        self.exports
            .iter()
            .map(|name| format!("{}{}", self.linkage_prefix, name))
            .collect()
    }

    /// Names that occur more than once in the export set, with their counts.
    pub fn duplicates(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &self.exports {
            *counts.entry(name.as_str()).or_default() += 1;
        }
        counts.retain(|_, count| *count > 1);
        counts
    }
}
