use clap::Args;
use serde::Serialize;

use pyship::clean::{self, CleanOutcome};
use pyship::config::ProjectConfig;

use super::CmdResult;

#[derive(Args)]
pub struct CleanArgs {
    /// Clean only targets with this label: build, cache, dist, egg-info
    #[arg(long)]
    pub only: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanOutput {
    pub command: &'static str,
    pub project_dir: String,
    pub targets: Vec<CleanOutcome>,
    pub total_files_removed: usize,
    pub total_dirs_removed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub fn run(args: CleanArgs, global: &super::GlobalArgs) -> CmdResult<CleanOutput> {
    let project_dir = global.project_dir()?;
    let config = ProjectConfig::load(&project_dir)?;

    let mut warnings = Vec::new();
    if config.package_name(&project_dir).is_none() {
        warnings.push(
            "No package name found in pyship.json or setup.py; egg-info cleanup skipped"
                .to_string(),
        );
    }

    let mut targets = config.cleanup_targets(&project_dir)?;

    if let Some(only) = &args.only {
        let known = ["build", "cache", "dist", "egg-info"];
        if !known.contains(&only.as_str()) {
            return Err(pyship::Error::validation_invalid_argument(
                "only",
                format!("Unknown target label '{}'", only),
                Some(vec![format!("Known labels: {}", known.join(", "))]),
            ));
        }
        targets.retain(|t| &t.label == only);
    }

    let outcomes = clean::clean_all(&targets)?;
    let total_files_removed = outcomes.iter().map(|o| o.files_removed).sum();
    let total_dirs_removed = outcomes.iter().map(|o| o.dirs_removed).sum();

    Ok((
        CleanOutput {
            command: "clean",
            project_dir: project_dir.display().to_string(),
            targets: outcomes,
            total_files_removed,
            total_dirs_removed,
            warnings,
        },
        0,
    ))
}
