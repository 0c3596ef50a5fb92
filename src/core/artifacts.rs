//! Distribution artifact discovery.
//!
//! The upload step publishes `dist/*`; this module enumerates that glob,
//! classifies each artifact, and fingerprints it so the output records
//! exactly what was (or would be) uploaded.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Sdist,
    Wheel,
    Other,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub file_name: String,
    pub path: String,
    pub kind: ArtifactKind,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Classify an artifact by file name.
pub fn classify(file_name: &str) -> ArtifactKind {
    if file_name.ends_with(".whl") {
        ArtifactKind::Wheel
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".zip") {
        ArtifactKind::Sdist
    } else {
        ArtifactKind::Other
    }
}

/// Enumerate artifacts in the dist directory, sorted by file name.
///
/// A missing dist directory yields an empty list; whether that is an error
/// is the caller's call (upload refuses, status just reports).
pub fn scan_dist(dist: &Path) -> Result<Vec<Artifact>> {
    if !dist.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dist.to_string_lossy()));
    let paths = glob::glob(&pattern).map_err(|e| {
        Error::internal_unexpected(format!("Invalid dist pattern '{}': {}", pattern, e))
    })?;

    let mut artifacts = Vec::new();
    for entry in paths {
        let path = entry
            .map_err(|e| Error::internal_io(e.to_string(), Some("scan dist".to_string())))?;
        if !path.is_file() {
            continue;
        }
        artifacts.push(artifact_from(&path)?);
    }

    artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(artifacts)
}

fn artifact_from(path: &Path) -> Result<Artifact> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            Error::internal_unexpected(format!("Artifact has no file name: {}", path.display()))
        })?;

    let metadata = path
        .metadata()
        .map_err(|e| Error::internal_io(e.to_string(), Some("stat artifact".to_string())))?;

    Ok(Artifact {
        kind: classify(&file_name),
        file_name,
        path: path.display().to_string(),
        size_bytes: metadata.len(),
        sha256: sha256_file(path)?,
    })
}

fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some("hash artifact".to_string())))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| Error::internal_io(e.to_string(), Some("hash artifact".to_string())))?;
    Ok(format!("{:x}", hasher.finalize()))
}
