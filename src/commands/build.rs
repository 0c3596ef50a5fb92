use clap::Args;
use serde::Serialize;

use pyship::config::ProjectConfig;
use pyship::package::{self, PackageOutput};

use super::CmdResult;

#[derive(Args)]
pub struct BuildArgs {
    /// Clean the dist directory first so it contains only fresh artifacts
    #[arg(long)]
    pub clean_dist: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub command: &'static str,
    pub project_dir: String,
    pub package: PackageOutput,
}

pub fn run(args: BuildArgs, global: &super::GlobalArgs) -> CmdResult<BuildOutput> {
    let project_dir = global.project_dir()?;
    let config = ProjectConfig::load(&project_dir)?;

    if args.clean_dist {
        let dist = pyship::config::CleanTarget {
            label: "dist".to_string(),
            path: config.dist_path(&project_dir),
        };
        pyship::clean::clean_target(&dist)?;
    }

    let package = package::build(&project_dir, &config)?;

    Ok((
        BuildOutput {
            command: "build",
            project_dir: project_dir.display().to_string(),
            package,
        },
        0,
    ))
}
