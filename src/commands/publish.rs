use clap::Args;
use serde::Serialize;

use pyship::config::ProjectConfig;
use pyship::publish::{self, PublishOptions, PublishOutput};

use super::CmdResult;

#[derive(Args)]
pub struct PublishArgs {
    /// Show the planned steps without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Clean and package only; do not touch the package index
    #[arg(long)]
    pub skip_upload: bool,

    /// Twine repository name (overrides pyship.json)
    #[arg(long)]
    pub repository: Option<String>,

    /// Tolerate already-published versions (overrides pyship.json)
    #[arg(long)]
    pub skip_existing: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishCmdOutput {
    pub command: &'static str,
    #[serde(flatten)]
    pub output: PublishOutput,
}

pub fn run(args: PublishArgs, global: &super::GlobalArgs) -> CmdResult<PublishCmdOutput> {
    let project_dir = global.project_dir()?;
    let mut config = ProjectConfig::load(&project_dir)?;

    if args.repository.is_some() {
        config.repository = args.repository;
    }
    if args.skip_existing {
        config.skip_existing = true;
    }

    let output = publish::run(
        &project_dir,
        config,
        PublishOptions {
            dry_run: args.dry_run,
            skip_upload: args.skip_upload,
        },
    )?;

    let exit_code = publish::exit_code(&output);

    Ok((
        PublishCmdOutput {
            command: "publish",
            output,
        },
        exit_code,
    ))
}
