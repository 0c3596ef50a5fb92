use std::path::PathBuf;

pub type CmdResult<T> = pyship::Result<(T, i32)>;

pub mod build;
pub mod clean;
pub mod init;
pub mod publish;
pub mod status;
pub mod upload;

/// Arguments shared by every subcommand.
pub(crate) struct GlobalArgs {
    /// Project directory override (`-C/--dir`); defaults to the working dir.
    pub dir: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn project_dir(&self) -> pyship::Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| {
                pyship::Error::internal_io(e.to_string(), Some("resolve working dir".to_string()))
            })?,
        };

        if !dir.is_dir() {
            return Err(pyship::Error::validation_invalid_argument(
                "dir",
                format!("Not a directory: {}", dir.display()),
                None,
            ));
        }

        Ok(dir)
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        pyship::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (pyship::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Clean(args) => dispatch!(args, global, clean),
        crate::Commands::Build(args) => dispatch!(args, global, build),
        crate::Commands::Upload(args) => dispatch!(args, global, upload),
        crate::Commands::Publish(args) => dispatch!(args, global, publish),
        crate::Commands::Status(args) => dispatch!(args, global, status),
        crate::Commands::Init(args) => dispatch!(args, global, init),
    }
}
