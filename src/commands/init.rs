use clap::Args;
use serde::Serialize;

use pyship::config::{self, ProjectConfig};

use super::CmdResult;

#[derive(Args)]
pub struct InitArgs {
    /// Package name (default: parsed from setup.py)
    #[arg(long)]
    pub package: Option<String>,

    /// Overwrite an existing pyship.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOutput {
    pub command: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

pub fn run(args: InitArgs, global: &super::GlobalArgs) -> CmdResult<InitOutput> {
    let project_dir = global.project_dir()?;
    let config_path = project_dir.join(config::CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(pyship::Error::validation_invalid_argument(
            "force",
            format!("{} already exists", config_path.display()),
            Some(vec!["Overwrite it with: pyship init --force".to_string()]),
        ));
    }

    let mut config = ProjectConfig {
        package: args.package,
        ..ProjectConfig::default()
    };
    if config.package.is_none() {
        config.package = config.package_name(&project_dir);
    }

    let mut hints = Vec::new();
    if config.package.is_none() {
        hints.push(
            "No package name detected; set \"package\" in pyship.json so egg-info cleanup works"
                .to_string(),
        );
    }

    let path = config.save(&project_dir)?;

    Ok((
        InitOutput {
            command: "init",
            path: path.display().to_string(),
            package: config.package,
            hints,
        },
        0,
    ))
}
