// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Snapshot files.
//!
//! Snapshots can be written as YAML or JSON; the format is chosen by file
//! extension. Reading is as forgiving as snapshot decoding itself.

use crate::models::snapshot::Snapshot;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Export a snapshot to YAML format.
pub fn export_yaml(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(snapshot)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export a snapshot to JSON format.
pub fn export_json(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import a snapshot from YAML format.
pub fn import_yaml(path: &Path) -> Result<Snapshot> {
    let yaml = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot = serde_yaml::from_str(&yaml)?;
    Ok(snapshot)
}

/// Import a snapshot from JSON format.
pub fn import_json(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot = serde_json::from_str(&json)?;
    Ok(snapshot)
}

/// Export by extension (`.yaml`/`.yml` or `.json`).
pub fn export_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(snapshot, path),
        Some("json") => export_json(snapshot, path),
        other => bail!("Unsupported snapshot extension: {:?}", other),
    }
}

/// Import by extension (`.yaml`/`.yml` or `.json`).
pub fn import_snapshot(path: &Path) -> Result<Snapshot> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported snapshot extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::CaptionSnapshot;

    fn sample() -> Snapshot {
        Snapshot {
            background_ref: Some("assets/plakat1.jpg".to_string()),
            canvas_width: 800,
            canvas_height: 533,
            captions: vec![CaptionSnapshot {
                id: Some(2),
                text: "WHEN THE BUILD IS GREEN".to_string(),
                x: 40.5,
                y: 12.0,
                font_size: 64.0,
                color: "#FFFF00".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_and_yaml_files_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["state.json", "state.yaml", "state.yml"] {
            let path = dir.path().join(name);
            export_snapshot(&sample(), &path).unwrap();
            assert_eq!(import_snapshot(&path).unwrap(), sample(), "{}", name);
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.txt");
        assert!(export_snapshot(&sample(), &path).is_err());
        assert!(import_snapshot(&path).is_err());
    }
}
