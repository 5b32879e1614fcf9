mod schema;

pub use schema::{Category, Contestant, Criterion, Gender, Judge, Round, ScoreRecord, Snapshot};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a snapshot from a JSON or YAML file, chosen by extension.
///
/// # Errors
///
/// Returns an error if:
/// - The snapshot file does not exist
/// - The snapshot file cannot be read
/// - The JSON/YAML cannot be parsed
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        anyhow::bail!("Snapshot file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file at {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => from_yaml_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid YAML in {}", path.display())),
        _ => from_json_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid JSON in {}", path.display())),
    }
}

pub fn from_json_str(content: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(content)?)
}

pub fn from_yaml_str(content: &str) -> Result<Snapshot> {
    Ok(serde_saphyr::from_str(content)?)
}
