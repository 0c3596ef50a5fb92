use std::fs;

use clap::Args;
use serde::Serialize;

use pyship::artifacts::{self, Artifact};
use pyship::config::ProjectConfig;

use super::CmdResult;

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    pub label: String,
    pub path: String,
    pub exists: bool,
    pub entries: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub command: &'static str,
    pub project_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub targets: Vec<TargetStatus>,
    pub artifacts: Vec<Artifact>,
}

pub fn run(_args: StatusArgs, global: &super::GlobalArgs) -> CmdResult<StatusOutput> {
    let project_dir = global.project_dir()?;
    let config = ProjectConfig::load(&project_dir)?;

    let targets = config
        .cleanup_targets(&project_dir)?
        .into_iter()
        .map(|t| {
            let entries = fs::read_dir(&t.path).map(|d| d.count()).unwrap_or(0);
            TargetStatus {
                label: t.label,
                exists: t.path.is_dir(),
                path: t.path.display().to_string(),
                entries,
            }
        })
        .collect();

    let artifacts = artifacts::scan_dist(&config.dist_path(&project_dir))?;

    Ok((
        StatusOutput {
            command: "status",
            package: config.package_name(&project_dir),
            project_dir: project_dir.display().to_string(),
            targets,
            artifacts,
        },
        0,
    ))
}
