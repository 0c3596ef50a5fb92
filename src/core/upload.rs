//! Uploader provisioning and artifact publishing via twine.
//!
//! Credentials are twine's problem (~/.pypirc or TWINE_* environment
//! variables); this module never touches them.

use std::path::Path;

use serde::Serialize;

use crate::artifacts::{self, Artifact};
use crate::config::ProjectConfig;
use crate::error::{CommandFailedDetails, Error, Hint, Result};
use crate::utils::command::{self, CapturedOutput};
use crate::utils::shell;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureUploaderOutput {
    pub tool: &'static str,
    pub already_installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Make sure twine is importable; install it if the probe fails.
pub fn ensure_uploader(project_dir: &Path, config: &ProjectConfig) -> Result<EnsureUploaderOutput> {
    let probe = command::capture_in(
        project_dir,
        &config.python,
        &["-m", "twine", "--version"],
        "twine probe",
    )?;

    if probe.success {
        return Ok(EnsureUploaderOutput {
            tool: "twine",
            already_installed: true,
            version: probe.output.stdout.lines().next().map(|l| l.to_string()),
        });
    }

    log_status!("upload", "twine not found, installing");

    let install = command::capture_in(
        project_dir,
        &config.python,
        &["-m", "pip", "install", "twine"],
        "twine install",
    )?;

    if !install.success {
        return Err(Error::tool_missing(
            "twine",
            install.output.error_text().to_string(),
            Some(vec![format!(
                "Install it manually: {} -m pip install twine",
                config.python
            )]),
        ));
    }

    Ok(EnsureUploaderOutput {
        tool: "twine",
        already_installed: false,
        version: None,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutput {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub skip_existing: bool,
    pub artifacts: Vec<Artifact>,
    pub success: bool,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

/// Publish every artifact in dist. Fails without invoking twine if dist
/// is empty -- there is nothing meaningful to publish.
pub fn upload(project_dir: &Path, config: &ProjectConfig) -> Result<UploadOutput> {
    let dist = config.dist_path(project_dir);
    let artifacts = artifacts::scan_dist(&dist)?;

    if artifacts.is_empty() {
        return Err(Error::dist_empty(dist.display().to_string()));
    }

    let mut args: Vec<String> = vec!["-m".into(), "twine".into(), "upload".into()];
    if let Some(repository) = &config.repository {
        args.push("--repository".into());
        args.push(repository.clone());
    }
    if config.skip_existing {
        args.push("--skip-existing".into());
    }
    for artifact in &artifacts {
        args.push(artifact.path.clone());
    }

    let display = format!("{} {}", config.python, shell::quote_args(&args));
    log_status!("upload", "Publishing {} artifact(s)", artifacts.len());

    let arg_refs: Vec<&str> = args.iter().map(|a| a.as_str()).collect();
    let outcome = command::capture_in(project_dir, &config.python, &arg_refs, "twine upload")?;

    if !outcome.success {
        let mut hints = Vec::new();
        if outcome.output.error_text().contains("already exists") {
            hints.push(Hint::new(
                "This version is already published. Bump the version in setup.py, \
                 or set \"skipExisting\": true in pyship.json.",
            ));
        }
        return Err(Error::upload_failed(
            CommandFailedDetails {
                command: display,
                exit_code: outcome.exit_code,
                stdout: outcome.output.stdout,
                stderr: outcome.output.stderr,
            },
            hints,
        ));
    }

    Ok(UploadOutput {
        command: display,
        repository: config.repository.clone(),
        skip_existing: config.skip_existing,
        artifacts,
        success: true,
        output: outcome.output,
    })
}
