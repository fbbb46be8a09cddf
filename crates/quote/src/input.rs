//! Loading visit snapshots exported from the data store.

use std::path::Path;

use anyhow::Context;

use xspace_core::visit::Visit;

/// Parse a visit from its camelCase JSON record.
pub fn parse_visit(json: &str) -> anyhow::Result<Visit> {
    serde_json::from_str(json).context("Malformed visit record")
}

/// Read and parse the visit snapshot at `path`.
pub fn load_visit(path: &Path) -> anyhow::Result<Visit> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read visit file {}", path.display()))?;
    let visit = parse_visit(&raw).with_context(|| format!("In {}", path.display()))?;
    tracing::debug!(visit_id = %visit.id, path = %path.display(), "Loaded visit snapshot");
    Ok(visit)
}
