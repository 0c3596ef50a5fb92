//! Build-artifact cleanup.
//!
//! Each target is emptied in two passes mirroring how artifact caches are
//! cleared by hand: delete every file recursively, then remove the now-empty
//! subdirectories. The target directory itself is preserved so packaging can
//! write into it without recreating it.

use std::fs;
use std::path::{Component, Path};

use serde::Serialize;

use crate::config::CleanTarget;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanOutcome {
    pub label: String,
    pub path: String,
    pub existed: bool,
    pub files_removed: usize,
    pub dirs_removed: usize,
}

/// Empty a single cleanup target. A missing target is a no-op.
pub fn clean_target(target: &CleanTarget) -> Result<CleanOutcome> {
    guard_target(&target.path)?;

    let path_display = target.path.display().to_string();

    if !target.path.is_dir() {
        return Ok(CleanOutcome {
            label: target.label.clone(),
            path: path_display,
            existed: false,
            files_removed: 0,
            dirs_removed: 0,
        });
    }

    let files_removed = remove_files_under(&target.path)?;
    let dirs_removed = remove_subdirs(&target.path)?;

    log_status!(
        "clean",
        "{}: removed {} file(s), {} dir(s)",
        path_display,
        files_removed,
        dirs_removed
    );

    Ok(CleanOutcome {
        label: target.label.clone(),
        path: path_display,
        existed: true,
        files_removed,
        dirs_removed,
    })
}

/// Clean all targets in order, stopping at the first failure.
pub fn clean_all(targets: &[CleanTarget]) -> Result<Vec<CleanOutcome>> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        outcomes.push(clean_target(target)?);
    }
    Ok(outcomes)
}

/// Refuse to empty directories that can never be a build cache.
fn guard_target(path: &Path) -> Result<()> {
    let meaningful = path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();

    if meaningful == 0 {
        return Err(Error::clean_failed(
            path.display().to_string(),
            "refusing to clean a filesystem root",
        ));
    }

    Ok(())
}

fn remove_files_under(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    let entries = fs::read_dir(dir)
        .map_err(|e| Error::clean_failed(dir.display().to_string(), e.to_string()))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| Error::clean_failed(dir.display().to_string(), e.to_string()))?;
        let path = entry.path();
        // Symlinks are removed as entries, never followed.
        let file_type = entry
            .file_type()
            .map_err(|e| Error::clean_failed(path.display().to_string(), e.to_string()))?;

        if file_type.is_dir() {
            removed += remove_files_under(&path)?;
        } else {
            fs::remove_file(&path)
                .map_err(|e| Error::clean_failed(path.display().to_string(), e.to_string()))?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn remove_subdirs(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    let entries = fs::read_dir(dir)
        .map_err(|e| Error::clean_failed(dir.display().to_string(), e.to_string()))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| Error::clean_failed(dir.display().to_string(), e.to_string()))?;
        let path = entry.path();

        if path.is_dir() {
            removed += remove_subdirs(&path)?;
            fs::remove_dir(&path)
                .map_err(|e| Error::clean_failed(path.display().to_string(), e.to_string()))?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn target(dir: &Path, label: &str) -> CleanTarget {
        CleanTarget {
            label: label.to_string(),
            path: dir.to_path_buf(),
        }
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut f = File::create(path).unwrap();
        f.write_all(b"stale").unwrap();
    }

    #[test]
    fn missing_target_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let t = target(&dir.path().join("build"), "build");

        let outcome = clean_target(&t).unwrap();
        assert!(!outcome.existed);
        assert_eq!(outcome.files_removed, 0);
        assert_eq!(outcome.dirs_removed, 0);
    }

    #[test]
    fn removes_nested_files_and_dirs_but_keeps_target() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        touch(&build.join("lib/module.pyc"));
        touch(&build.join("lib/sub/data.bin"));
        touch(&build.join("top.txt"));
        fs::create_dir_all(build.join("empty")).unwrap();

        let outcome = clean_target(&target(&build, "build")).unwrap();

        assert!(outcome.existed);
        assert_eq!(outcome.files_removed, 3);
        assert_eq!(outcome.dirs_removed, 3); // lib, lib/sub, empty
        assert!(build.is_dir());
        assert_eq!(fs::read_dir(&build).unwrap().count(), 0);
    }

    #[test]
    fn second_run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        touch(&build.join("a.txt"));

        let t = target(&build, "build");
        clean_target(&t).unwrap();

        let second = clean_target(&t).unwrap();
        assert!(second.existed);
        assert_eq!(second.files_removed, 0);
        assert_eq!(second.dirs_removed, 0);
    }

    #[test]
    fn refuses_filesystem_root() {
        let t = target(Path::new("/"), "cache");
        let err = clean_target(&t).unwrap_err();
        assert_eq!(err.code.as_str(), "clean.failed");
    }

    #[test]
    fn clean_all_reports_each_target() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        let dist = dir.path().join("dist");
        touch(&build.join("x"));
        touch(&dist.join("pkg-0.1.0.tar.gz"));

        let outcomes = clean_all(&[target(&build, "build"), target(&dist, "dist")]).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.existed));
        assert_eq!(outcomes[1].files_removed, 1);
    }
}
