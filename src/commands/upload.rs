use clap::Args;
use serde::Serialize;

use pyship::config::ProjectConfig;
use pyship::upload::{self, EnsureUploaderOutput, UploadOutput};

use super::CmdResult;

#[derive(Args)]
pub struct UploadArgs {
    /// Twine repository name (overrides pyship.json)
    #[arg(long)]
    pub repository: Option<String>,

    /// Tolerate already-published versions (overrides pyship.json)
    #[arg(long)]
    pub skip_existing: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCmdOutput {
    pub command: &'static str,
    pub project_dir: String,
    pub uploader: EnsureUploaderOutput,
    pub upload: UploadOutput,
}

pub fn run(args: UploadArgs, global: &super::GlobalArgs) -> CmdResult<UploadCmdOutput> {
    let project_dir = global.project_dir()?;
    let mut config = ProjectConfig::load(&project_dir)?;

    if args.repository.is_some() {
        config.repository = args.repository;
    }
    if args.skip_existing {
        config.skip_existing = true;
    }

    let uploader = upload::ensure_uploader(&project_dir, &config)?;
    let upload = upload::upload(&project_dir, &config)?;

    Ok((
        UploadCmdOutput {
            command: "upload",
            project_dir: project_dir.display().to_string(),
            uploader,
            upload,
        },
        0,
    ))
}
