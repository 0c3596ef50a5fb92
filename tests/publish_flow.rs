//! End-to-end workflow tests against a scratch project directory.
//!
//! External tools are stood in for by shell one-liners via `buildCommand`
//! and by `true`/`false` as the interpreter, so these run on any POSIX host
//! without Python installed.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use pyship::config::ProjectConfig;
use pyship::pipeline::{RunStatus, StepStatus};
use pyship::publish::{self, PublishOptions};

fn write_project(dir: &Path, package: &str) {
    fs::write(
        dir.join("setup.py"),
        format!("from setuptools import setup\n\nsetup(name='{}', version='0.1.1')\n", package),
    )
    .unwrap();
}

fn seed_stale_artifacts(dir: &Path, package: &str) {
    for sub in ["build/lib", "dist", &format!("{}.egg-info", package)] {
        fs::create_dir_all(dir.join(sub)).unwrap();
    }
    fs::write(dir.join("build/lib/old.pyc"), "stale").unwrap();
    fs::write(dir.join("dist/old-0.0.9.tar.gz"), "stale").unwrap();
    fs::write(
        dir.join(format!("{}.egg-info/PKG-INFO", package)),
        "stale",
    )
    .unwrap();
}

#[test]
fn stale_artifacts_are_gone_and_dist_holds_only_fresh_output() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "fkbutils");
    seed_stale_artifacts(dir.path(), "fkbutils");

    let config = ProjectConfig {
        build_command: Some(
            "mkdir -p dist && printf sdist > dist/fkbutils-0.1.1.tar.gz \
             && printf wheel > dist/fkbutils-0.1.1-py3-none-any.whl"
                .to_string(),
        ),
        ..ProjectConfig::default()
    };

    let output = publish::run(
        dir.path(),
        config,
        PublishOptions {
            dry_run: false,
            skip_upload: true,
        },
    )
    .unwrap();

    let result = output.result.unwrap();
    assert_eq!(result.status, RunStatus::Success);

    // Stale files removed by the clean step before packaging ran.
    assert!(!dir.path().join("build/lib/old.pyc").exists());
    assert!(!dir.path().join("dist/old-0.0.9.tar.gz").exists());
    assert!(!dir.path().join("fkbutils.egg-info/PKG-INFO").exists());

    // Dist contains exactly the artifacts packaging produced.
    let names: Vec<String> = fs::read_dir(dir.path().join("dist"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"fkbutils-0.1.1.tar.gz".to_string()));
    assert!(names.contains(&"fkbutils-0.1.1-py3-none-any.whl".to_string()));
}

#[test]
fn rerun_on_clean_tree_is_a_noop_for_cleanup() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "fkbutils");

    let config = ProjectConfig {
        build_command: Some("mkdir -p dist && printf x > dist/fkbutils-0.1.1.tar.gz".to_string()),
        ..ProjectConfig::default()
    };

    let options = PublishOptions {
        dry_run: false,
        skip_upload: true,
    };

    publish::run(dir.path(), config.clone(), options.clone()).unwrap();
    let second = publish::run(dir.path(), config, options).unwrap();

    let result = second.result.unwrap();
    assert_eq!(result.status, RunStatus::Success);

    // The second clean removed exactly the artifact from the first run.
    let clean_step = &result.steps[0];
    let outcomes = clean_step.data.as_ref().unwrap().as_array().unwrap().clone();
    let total_files: u64 = outcomes
        .iter()
        .map(|o| o["filesRemoved"].as_u64().unwrap())
        .sum();
    assert_eq!(total_files, 1);
}

#[test]
fn failed_packaging_halts_before_upload() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "fkbutils");

    let config = ProjectConfig {
        // Probe via `true` succeeds; packaging fails.
        python: "true".to_string(),
        build_command: Some("echo 'error: invalid metadata' >&2 && exit 1".to_string()),
        ..ProjectConfig::default()
    };

    let output = publish::run(
        dir.path(),
        config,
        PublishOptions {
            dry_run: false,
            skip_upload: false,
        },
    )
    .unwrap();

    let result = output.result.clone().unwrap();
    assert_eq!(result.status, RunStatus::Failed);

    let failed = result.failed_step().unwrap();
    assert_eq!(failed.id, "package");
    assert_eq!(failed.error_code, Some("package.build_failed"));

    let upload = result.steps.iter().find(|s| s.id == "upload").unwrap();
    assert_eq!(upload.status, StepStatus::Skipped);

    assert_eq!(publish::exit_code(&output), 20);
}

#[test]
fn clean_preserves_target_dirs_for_packaging() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "fkbutils");
    seed_stale_artifacts(dir.path(), "fkbutils");

    let config = ProjectConfig::default();
    let targets = config.cleanup_targets(dir.path()).unwrap();
    pyship::clean::clean_all(&targets).unwrap();

    assert!(dir.path().join("build").is_dir());
    assert!(dir.path().join("dist").is_dir());
    assert!(dir.path().join("fkbutils.egg-info").is_dir());
    assert_eq!(fs::read_dir(dir.path().join("dist")).unwrap().count(), 0);
}
