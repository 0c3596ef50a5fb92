//! The full publish workflow: clean, ensure uploader, package, upload.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::clean;
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::package;
use crate::pipeline::{self, PlanStep, RunResult, RunStatus, StepExecutor, StepKind};
use crate::upload;

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub dry_run: bool,
    /// Stop after packaging; useful for rehearsing a release locally.
    pub skip_upload: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutput {
    pub project_dir: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<PlanStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

struct PublishStepExecutor {
    project_dir: PathBuf,
    config: ProjectConfig,
}

impl StepExecutor for PublishStepExecutor {
    fn execute(&self, step: StepKind) -> Result<Value> {
        match step {
            StepKind::Clean => {
                let targets = self.config.cleanup_targets(&self.project_dir)?;
                let outcomes = clean::clean_all(&targets)?;
                to_value(&outcomes, "clean output")
            }
            StepKind::EnsureUploader => {
                let output = upload::ensure_uploader(&self.project_dir, &self.config)?;
                to_value(&output, "ensure uploader output")
            }
            StepKind::Package => {
                let output = package::build(&self.project_dir, &self.config)?;
                to_value(&output, "package output")
            }
            StepKind::Upload => {
                let output = upload::upload(&self.project_dir, &self.config)?;
                to_value(&output, "upload output")
            }
        }
    }
}

fn to_value<T: Serialize>(data: &T, context: &str) -> Result<Value> {
    serde_json::to_value(data)
        .map_err(|e| Error::internal_json(e.to_string(), Some(context.to_string())))
}

fn steps_for(options: &PublishOptions) -> Vec<StepKind> {
    let mut steps = vec![StepKind::Clean];
    if !options.skip_upload {
        steps.push(StepKind::EnsureUploader);
    }
    steps.push(StepKind::Package);
    if !options.skip_upload {
        steps.push(StepKind::Upload);
    }
    steps
}

/// Run (or plan) the publish workflow for a project directory.
pub fn run(project_dir: &Path, config: ProjectConfig, options: PublishOptions) -> Result<PublishOutput> {
    let steps = steps_for(&options);

    let mut warnings = Vec::new();
    if config.package_name(project_dir).is_none() {
        warnings.push(
            "No package name found in pyship.json or setup.py; egg-info cleanup skipped"
                .to_string(),
        );
    }

    if options.dry_run {
        return Ok(PublishOutput {
            project_dir: project_dir.display().to_string(),
            dry_run: true,
            plan: Some(pipeline::plan(&steps)),
            result: None,
            warnings,
        });
    }

    let executor = PublishStepExecutor {
        project_dir: project_dir.to_path_buf(),
        config,
    };

    let result = pipeline::run(&steps, &executor);

    if let Some(failed) = result.failed_step() {
        log_status!(
            "publish",
            "Stopped at step '{}': {}",
            failed.id,
            failed.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(PublishOutput {
        project_dir: project_dir.display().to_string(),
        dry_run: false,
        plan: None,
        result: Some(result),
        warnings,
    })
}

/// Exit code for a completed publish run: failures surface as non-zero
/// even though the run result itself serializes successfully.
pub fn exit_code(output: &PublishOutput) -> i32 {
    match &output.result {
        Some(result) if result.status == RunStatus::Failed => 20,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dry_run_plans_all_four_steps_and_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let stale = dir.path().join("build/stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "stale").unwrap();

        let output = run(
            dir.path(),
            ProjectConfig::default(),
            PublishOptions {
                dry_run: true,
                skip_upload: false,
            },
        )
        .unwrap();

        let plan = output.plan.unwrap();
        let ids: Vec<&str> = plan.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["clean", "ensure_uploader", "package", "upload"]);
        assert!(output.result.is_none());
        assert!(stale.exists());
    }

    #[test]
    fn skip_upload_drops_uploader_steps() {
        let dir = TempDir::new().unwrap();
        let output = run(
            dir.path(),
            ProjectConfig::default(),
            PublishOptions {
                dry_run: true,
                skip_upload: true,
            },
        )
        .unwrap();

        let ids: Vec<&str> = output.plan.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["clean", "package"]);
    }

    #[test]
    fn missing_package_name_warns() {
        let dir = TempDir::new().unwrap();
        let output = run(
            dir.path(),
            ProjectConfig::default(),
            PublishOptions {
                dry_run: true,
                skip_upload: true,
            },
        )
        .unwrap();
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn failed_package_step_skips_upload() {
        let dir = TempDir::new().unwrap();
        // `true` accepts any arguments, so the uploader probe passes without
        // a real Python interpreter on the host.
        let config = ProjectConfig {
            python: "true".to_string(),
            build_command: Some("exit 7".to_string()),
            ..ProjectConfig::default()
        };

        let output = run(
            dir.path(),
            config,
            PublishOptions {
                dry_run: false,
                skip_upload: false,
            },
        )
        .unwrap();

        let result = output.result.as_ref().unwrap();
        assert_eq!(result.status, RunStatus::Failed);
        assert_eq!(result.failed_step().unwrap().id, "package");
        let last = result.steps.last().unwrap();
        assert_eq!(last.id, "upload");
        assert_eq!(last.status, crate::pipeline::StepStatus::Skipped);
        assert_eq!(exit_code(&output), 20);
    }
}
