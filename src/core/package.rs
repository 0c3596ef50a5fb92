//! Packaging: produce sdist and wheel distributions.

use std::path::Path;

use serde::Serialize;

use crate::artifacts::{self, Artifact};
use crate::config::ProjectConfig;
use crate::error::{CommandFailedDetails, Error, Result};
use crate::utils::command::{self, CapturedOutput};

/// How the packaging command was chosen.
#[derive(Debug, Clone)]
pub enum ResolvedPackageCommand {
    /// Default `python setup.py sdist bdist_wheel`.
    SetupPy { python: String },
    /// Explicit `buildCommand` from pyship.json, run via sh -c.
    ConfigDefined(String),
}

impl ResolvedPackageCommand {
    pub fn display(&self) -> String {
        match self {
            ResolvedPackageCommand::SetupPy { python } => {
                format!("{} setup.py sdist bdist_wheel", python)
            }
            ResolvedPackageCommand::ConfigDefined(cmd) => cmd.clone(),
        }
    }
}

/// Resolve the packaging command: an explicit `buildCommand` always wins,
/// otherwise the default setup.py invocation (which requires setup.py).
pub fn resolve_command(project_dir: &Path, config: &ProjectConfig) -> Result<ResolvedPackageCommand> {
    if let Some(cmd) = &config.build_command {
        return Ok(ResolvedPackageCommand::ConfigDefined(cmd.clone()));
    }

    let setup_py = project_dir.join("setup.py");
    if !setup_py.is_file() {
        return Err(Error::project_file_not_found(
            setup_py.display().to_string(),
            Some(vec![
                "Run pyship from the project root containing setup.py".to_string(),
                "Or configure a custom command: add \"buildCommand\" to pyship.json".to_string(),
            ]),
        ));
    }

    Ok(ResolvedPackageCommand::SetupPy {
        python: config.python.clone(),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOutput {
    pub command: String,
    pub success: bool,
    #[serde(flatten)]
    pub output: CapturedOutput,
    pub artifacts: Vec<Artifact>,
}

/// Run the packaging step and report the artifacts it produced.
pub fn build(project_dir: &Path, config: &ProjectConfig) -> Result<PackageOutput> {
    let resolved = resolve_command(project_dir, config)?;
    let display = resolved.display();

    log_status!("package", "Running: {}", display);

    let outcome = match &resolved {
        ResolvedPackageCommand::SetupPy { python } => command::capture_in(
            project_dir,
            python,
            &["setup.py", "sdist", "bdist_wheel"],
            "packaging",
        )?,
        ResolvedPackageCommand::ConfigDefined(cmd) => {
            command::capture_shell_in(project_dir, cmd, "packaging")?
        }
    };

    if !outcome.success {
        return Err(Error::package_build_failed(CommandFailedDetails {
            command: display,
            exit_code: outcome.exit_code,
            stdout: outcome.output.stdout,
            stderr: outcome.output.stderr,
        }));
    }

    let artifacts = artifacts::scan_dist(&config.dist_path(project_dir))?;
    log_status!("package", "Produced {} artifact(s)", artifacts.len());

    Ok(PackageOutput {
        command: display,
        success: true,
        output: outcome.output,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_command_requires_setup_py() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::default();

        let err = resolve_command(dir.path(), &config).unwrap_err();
        assert_eq!(err.code.as_str(), "project.file_not_found");
    }

    #[test]
    fn config_command_wins_even_without_setup_py() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig {
            build_command: Some("python -m build".to_string()),
            ..ProjectConfig::default()
        };

        let resolved = resolve_command(dir.path(), &config).unwrap();
        assert_eq!(resolved.display(), "python -m build");
    }

    #[test]
    fn default_command_uses_configured_interpreter() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("setup.py"), "setup(name='x')").unwrap();

        let config = ProjectConfig {
            python: "python3".to_string(),
            ..ProjectConfig::default()
        };

        let resolved = resolve_command(dir.path(), &config).unwrap();
        assert_eq!(resolved.display(), "python3 setup.py sdist bdist_wheel");
    }

    #[test]
    fn missing_interpreter_maps_to_tool_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("setup.py"), "setup(name='x')").unwrap();

        let config = ProjectConfig {
            python: "nonexistent_interpreter_xyz".to_string(),
            ..ProjectConfig::default()
        };

        let err = build(dir.path(), &config).unwrap_err();
        assert_eq!(err.code.as_str(), "tool.missing");
    }

    #[test]
    fn build_surfaces_tool_output_on_failure() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig {
            build_command: Some("echo broken metadata >&2 && exit 3".to_string()),
            ..ProjectConfig::default()
        };

        let err = build(dir.path(), &config).unwrap_err();
        assert_eq!(err.code.as_str(), "package.build_failed");
        let stderr = err.details.get("stderr").and_then(|v| v.as_str()).unwrap();
        assert!(stderr.contains("broken metadata"));
    }

    #[test]
    fn build_reports_artifacts_on_success() {
        let dir = TempDir::new().unwrap();
        // Stand-in packaging command that drops a file into dist.
        let config = ProjectConfig {
            build_command: Some(
                "mkdir -p dist && printf pkg > dist/fkbutils-0.1.1.tar.gz".to_string(),
            ),
            ..ProjectConfig::default()
        };

        let output = build(dir.path(), &config).unwrap();
        assert!(output.success);
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.artifacts[0].file_name, "fkbutils-0.1.1.tar.gz");
    }
}
