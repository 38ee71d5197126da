//! # Command Layer
//!
//! This module contains the **core business logic** of robolog. Each command lives
//! in its own submodule as plain functions over a [`Workbook`](crate::workbook::Workbook).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the cross-sheet rules live:
//! - Validate input before any write (missing fields, duplicates, state checks)
//! - Apply multi-step writes through a [`Saga`](crate::saga::Saga)
//! - Return a structured [`CmdResult`] with affected records, listings and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the workbook: no stdout, no prompts
//! - **Confirmation**: destructive commands take an explicit `confirmed` flag and
//!   expose a `preview` so the caller can ask first
//! - **Exit codes**: the caller maps [`CmdStatus`] to whatever it needs
//!
//! ## Errors vs. Results
//!
//! A command returns `Err` when it aborted before writing anything: validation,
//! not-found, invalid state, or a backend error on the guarding read. Once the
//! first write has been attempted the command returns `Ok`, and the
//! [`CmdResult::status`] tells success, partial success and failure apart.
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` fixtures and the backend's failure simulation
//! to exercise every branch, including the partial ones.
//!
//! ## Command Modules
//!
//! - [`robot_types`]: List and add allowed robot models
//! - [`create`]: Add a robot
//! - [`update`]: Edit a robot
//! - [`delete`]: Delete a robot, deactivating its deployments
//! - [`deploy`]: Deploy idle robots to a client
//! - [`retrieve`]: Bring a deployed robot back
//! - [`deployments`]: Edit or delete a client deployment row
//! - [`maintenance`]: Log a maintenance issue
//! - [`list`]: Filtered views of the three logs
//! - [`summary`]: Fleet dashboard numbers
//! - [`export`]: CSV export of a view
//! - [`page`]: Navigation page rendering
//! - [`helpers`]: Shared lookups and validation

use crate::record::{Record, Table};
use crate::saga::StepRecord;
use serde::Serialize;
use std::path::PathBuf;

pub mod create;
pub mod delete;
pub mod deploy;
pub mod deployments;
pub mod export;
pub mod helpers;
pub mod list;
pub mod maintenance;
pub mod page;
pub mod retrieve;
pub mod robot_types;
pub mod summary;
pub mod update;

pub use summary::FleetSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Aggregate outcome of a command that got as far as writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CmdStatus {
    #[default]
    Success,
    PartialSuccess,
    Failure,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub status: CmdStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<FleetSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub robot_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepRecord>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, table: Table) -> Self {
        self.listed = Some(table);
        self
    }

    pub fn with_status(mut self, status: CmdStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CmdStatus::Success
    }
}
