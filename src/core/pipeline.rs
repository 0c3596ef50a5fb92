//! Ordered step execution for the publish workflow.
//!
//! The runner is strictly sequential and stops at the first failed step;
//! everything after it is reported as skipped. Continuing past a failed
//! cleanup or build would risk publishing stale or partial artifacts.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Hint, Result};

/// The publish workflow steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Clean,
    EnsureUploader,
    Package,
    Upload,
}

impl StepKind {
    pub fn id(&self) -> &'static str {
        match self {
            StepKind::Clean => "clean",
            StepKind::EnsureUploader => "ensure_uploader",
            StepKind::Package => "package",
            StepKind::Upload => "upload",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Clean => "Clean build artifacts",
            StepKind::EnsureUploader => "Ensure upload tool",
            StepKind::Package => "Build sdist and wheel",
            StepKind::Upload => "Upload to package index",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_steps: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub status: RunStatus,
    pub steps: Vec<StepResult>,
    pub summary: RunSummary,
}

impl RunResult {
    /// The step that stopped the run, if any.
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub id: &'static str,
    pub label: &'static str,
}

/// Executes a single step, returning JSON data describing what it did.
pub trait StepExecutor {
    fn execute(&self, step: StepKind) -> Result<Value>;
}

/// Describe the steps without executing them.
pub fn plan(steps: &[StepKind]) -> Vec<PlanStep> {
    steps
        .iter()
        .map(|s| PlanStep {
            id: s.id(),
            label: s.label(),
        })
        .collect()
}

/// Run steps in order, halting at the first failure.
pub fn run(steps: &[StepKind], executor: &dyn StepExecutor) -> RunResult {
    let mut results = Vec::with_capacity(steps.len());
    let mut failed = false;

    for step in steps {
        if failed {
            results.push(StepResult {
                id: step.id(),
                label: step.label(),
                status: StepStatus::Skipped,
                data: None,
                error: None,
                error_code: None,
                hints: Vec::new(),
            });
            continue;
        }

        log_status!("publish", "{}", step.label());

        match executor.execute(*step) {
            Ok(data) => results.push(StepResult {
                id: step.id(),
                label: step.label(),
                status: StepStatus::Success,
                data: Some(data),
                error: None,
                error_code: None,
                hints: Vec::new(),
            }),
            Err(err) => {
                failed = true;
                results.push(StepResult {
                    id: step.id(),
                    label: step.label(),
                    status: StepStatus::Failed,
                    data: if err.details.is_null() {
                        None
                    } else {
                        Some(err.details.clone())
                    },
                    error: Some(err.message.clone()),
                    error_code: Some(err.code.as_str()),
                    hints: err.hints.clone(),
                });
            }
        }
    }

    let summary = RunSummary {
        total_steps: results.len(),
        succeeded: results
            .iter()
            .filter(|r| r.status == StepStatus::Success)
            .count(),
        failed: results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count(),
        skipped: results
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .count(),
    };

    RunResult {
        status: if failed {
            RunStatus::Failed
        } else {
            RunStatus::Success
        },
        steps: results,
        summary,
    }
}
