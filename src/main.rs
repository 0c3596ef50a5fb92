use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{build, clean, init, publish, status, upload, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pyship")]
#[command(version = VERSION)]
#[command(about = "CLI for cleaning Python build artifacts and publishing packages")]
struct Cli {
    /// Project directory (defaults to the working directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove build, dist, cache and egg-info artifacts
    Clean(clean::CleanArgs),
    /// Build sdist and wheel distributions
    Build(build::BuildArgs),
    /// Upload dist artifacts to the package index
    Upload(upload::UploadArgs),
    /// Clean, build and upload in one ordered run
    Publish(publish::PublishArgs),
    /// Show cleanup targets and current dist artifacts
    Status(status::StatusArgs),
    /// Write a starter pyship.json
    Init(init::InitArgs),
}

fn exit_code_to_u8(code: i32) -> u8 {
    match code {
        0..=255 => code as u8,
        _ => 1,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { dir: cli.dir };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = pyship::output::print_json_result(json_result) {
        eprintln!("pyship: failed to write response: {}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}
