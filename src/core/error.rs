use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,

    ProjectFileNotFound,
    DistEmpty,

    CleanFailed,
    ToolMissing,
    PackageBuildFailed,
    UploadFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ProjectFileNotFound => "project.file_not_found",
            ErrorCode::DistEmpty => "upload.dist_empty",

            ErrorCode::CleanFailed => "clean.failed",
            ErrorCode::ToolMissing => "tool.missing",
            ErrorCode::PackageBuildFailed => "package.build_failed",
            ErrorCode::UploadFailed => "upload.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

impl Hint {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn details_value<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or(Value::Null)
}

impl Error {
    pub fn config_invalid_json(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self {
            code: ErrorCode::ConfigInvalidJson,
            message: format!("Invalid JSON in {}: {}", path, error),
            details: details_value(ConfigInvalidJsonDetails { path, error }),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        Self {
            code: ErrorCode::ConfigInvalidValue,
            message: format!("Invalid config value for '{}': {}", key, problem),
            details: details_value(ConfigInvalidValueDetails {
                key,
                value,
                problem,
            }),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        hints: Option<Vec<String>>,
    ) -> Self {
        let field = field.into();
        let problem = problem.into();
        Self {
            code: ErrorCode::ValidationInvalidArgument,
            message: problem.clone(),
            details: details_value(InvalidArgumentDetails { field, problem }),
            hints: hints
                .unwrap_or_default()
                .into_iter()
                .map(Hint::new)
                .collect(),
            retryable: None,
        }
    }

    pub fn project_file_not_found(path: impl Into<String>, hints: Option<Vec<String>>) -> Self {
        let path = path.into();
        Self {
            code: ErrorCode::ProjectFileNotFound,
            message: format!("File not found: {}", path),
            details: serde_json::json!({ "path": path }),
            hints: hints
                .unwrap_or_default()
                .into_iter()
                .map(Hint::new)
                .collect(),
            retryable: None,
        }
    }

    pub fn dist_empty(dist_dir: impl Into<String>) -> Self {
        let dist_dir = dist_dir.into();
        Self {
            code: ErrorCode::DistEmpty,
            message: format!("No distribution artifacts found in {}", dist_dir),
            details: serde_json::json!({ "distDir": dist_dir }),
            hints: vec![Hint::new("Build artifacts first: pyship build")],
            retryable: None,
        }
    }

    pub fn clean_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self {
            code: ErrorCode::CleanFailed,
            message: format!("Failed to clean {}: {}", path, error),
            details: serde_json::json!({ "path": path, "error": error }),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn tool_missing(
        tool: impl Into<String>,
        problem: impl Into<String>,
        hints: Option<Vec<String>>,
    ) -> Self {
        let tool = tool.into();
        let problem = problem.into();
        Self {
            code: ErrorCode::ToolMissing,
            message: format!("Required tool '{}' unavailable: {}", tool, problem),
            details: serde_json::json!({ "tool": tool, "problem": problem }),
            hints: hints
                .unwrap_or_default()
                .into_iter()
                .map(Hint::new)
                .collect(),
            retryable: None,
        }
    }

    pub fn package_build_failed(details: CommandFailedDetails) -> Self {
        Self {
            code: ErrorCode::PackageBuildFailed,
            message: format!(
                "Packaging command failed with exit code {}",
                details.exit_code
            ),
            details: details_value(details),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn upload_failed(details: CommandFailedDetails, hints: Vec<Hint>) -> Self {
        Self {
            code: ErrorCode::UploadFailed,
            message: format!("Upload failed with exit code {}", details.exit_code),
            details: details_value(details),
            hints,
            retryable: Some(true),
        }
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        Self {
            code: ErrorCode::InternalIoError,
            message: error.clone(),
            details: details_value(InternalErrorDetails { error, context }),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        Self {
            code: ErrorCode::InternalJsonError,
            message: error.clone(),
            details: details_value(InternalErrorDetails { error, context }),
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            code: ErrorCode::InternalUnexpected,
            message: error.clone(),
            details: details_value(InternalErrorDetails {
                error,
                context: None,
            }),
            hints: Vec::new(),
            retryable: None,
        }
    }
}
