//! # Multi-Step Writes
//!
//! Cross-sheet rules (deploy, retrieve, cascading delete, plan sync) are a
//! sequence of independent backend writes with no rollback. A [`Saga`] runs them
//! in order and records the outcome of each step, so the aggregate result can
//! tell full success, partial failure and total failure apart.
//!
//! Steps do not stop the saga when they fail; whether to keep going is the
//! caller's decision (see [`Saga::step`]'s return value).

use crate::commands::{CmdMessage, CmdStatus};
use crate::error::Result;
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "lowercase")]
pub enum StepOutcome {
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub label: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaOutcome {
    /// Every step applied (also the outcome of an empty saga).
    Success,
    /// At least one step applied and at least one failed.
    PartialFailure {
        applied: Vec<String>,
        failed: Vec<String>,
    },
    /// Nothing was applied.
    Failure,
}

impl SagaOutcome {
    pub fn status(&self) -> CmdStatus {
        match self {
            SagaOutcome::Success => CmdStatus::Success,
            SagaOutcome::PartialFailure { .. } => CmdStatus::PartialSuccess,
            SagaOutcome::Failure => CmdStatus::Failure,
        }
    }
}

#[derive(Debug, Default)]
pub struct Saga {
    name: String,
    steps: Vec<StepRecord>,
}

impl Saga {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Run one write step and record its outcome. Returns whether it applied.
    pub fn step<T, F>(&mut self, label: impl Into<String>, write: F) -> bool
    where
        F: FnOnce() -> Result<T>,
    {
        let label = label.into();
        match write() {
            Ok(_) => {
                self.steps.push(StepRecord {
                    label,
                    outcome: StepOutcome::Applied,
                });
                true
            }
            Err(e) => {
                warn!("{}: step '{}' failed: {}", self.name, label, e);
                self.steps.push(StepRecord {
                    label,
                    outcome: StepOutcome::Failed(e.to_string()),
                });
                false
            }
        }
    }

    /// Record a step that was refused before any write was attempted.
    pub fn skip(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        let label = label.into();
        let reason = reason.into();
        warn!("{}: step '{}' skipped: {}", self.name, label, reason);
        self.steps.push(StepRecord {
            label,
            outcome: StepOutcome::Failed(reason),
        });
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn applied(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Applied)
    }

    pub fn failed(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| s.outcome != StepOutcome::Applied)
    }

    pub fn outcome(&self) -> SagaOutcome {
        let applied: Vec<String> = self.applied().map(|s| s.label.clone()).collect();
        let failed: Vec<String> = self.failed().map(|s| s.label.clone()).collect();
        match (applied.is_empty(), failed.is_empty()) {
            (_, true) => SagaOutcome::Success,
            (true, false) => SagaOutcome::Failure,
            (false, false) => SagaOutcome::PartialFailure { applied, failed },
        }
    }

    /// One error message per failed step, in step order.
    pub fn failure_messages(&self) -> Vec<CmdMessage> {
        self.steps
            .iter()
            .filter_map(|s| match &s.outcome {
                StepOutcome::Failed(reason) => {
                    Some(CmdMessage::error(format!("{}: {}", s.label, reason)))
                }
                StepOutcome::Applied => None,
            })
            .collect()
    }
}
