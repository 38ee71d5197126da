//! Filtered views of the three logs.
//!
//! Status and model filters are sets compared after normalization; an empty set
//! lets every row through. Searches are case-insensitive substring matches.
//! Filtered tables keep each record's sheet index, so a row picked from a view
//! can be acted on directly.

use crate::commands::helpers::contains_ci;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{columns, same_key, RobotStatus, Sheet, Vocabulary};
use crate::record::{Record, Table};
use crate::store::RecordStore;
use crate::workbook::Workbook;

#[derive(Debug, Clone, Default)]
pub struct RobotFilter {
    pub statuses: Vec<String>,
    pub models: Vec<String>,
    /// Substring of the serial number.
    pub search: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub statuses: Vec<String>,
    /// Substring of the client name.
    pub search: String,
}

#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub statuses: Vec<String>,
    /// Substring of the serial number or the client name.
    pub search: String,
}

fn in_set(set: &[String], value: &str) -> bool {
    set.is_empty() || set.iter().any(|wanted| same_key(wanted, value))
}

impl RobotFilter {
    pub fn matches(&self, robot: &Record) -> bool {
        in_set(&self.statuses, robot.get(columns::STATUS))
            && in_set(&self.models, robot.get(columns::ROBOT_MODEL))
            && contains_ci(robot.get(columns::SERIAL_NUMBER), &self.search)
    }
}

impl ClientFilter {
    pub fn matches(&self, deployment: &Record) -> bool {
        in_set(&self.statuses, deployment.get(columns::DEPLOYMENT_STATUS))
            && contains_ci(deployment.get(columns::CLIENT_NAME), &self.search)
    }
}

impl IssueFilter {
    pub fn matches(&self, issue: &Record) -> bool {
        in_set(&self.statuses, issue.get(columns::STATUS))
            && (contains_ci(issue.get(columns::SERIAL_NUMBER), &self.search)
                || contains_ci(issue.get(columns::CLIENT_NAME), &self.search))
    }
}

fn listing(table: Table, total: usize) -> CmdResult {
    let mut result = CmdResult::default();
    if table.is_empty() {
        if total == 0 {
            result.add_message(CmdMessage::info(format!("No records in {}", table.sheet())));
        } else {
            result.add_message(CmdMessage::info(format!(
                "No records match the filters ({} in {})",
                total,
                table.sheet()
            )));
        }
    }
    result.with_listed(table)
}

pub fn robots<S: RecordStore>(wb: &mut Workbook<S>, filter: &RobotFilter) -> Result<CmdResult> {
    let all = wb.fetch(Sheet::RobotLog)?;
    Ok(listing(all.filtered(|r| filter.matches(r)), all.len()))
}

pub fn clients<S: RecordStore>(wb: &mut Workbook<S>, filter: &ClientFilter) -> Result<CmdResult> {
    let all = wb.fetch(Sheet::ClientLog)?;
    Ok(listing(all.filtered(|r| filter.matches(r)), all.len()))
}

pub fn issues<S: RecordStore>(wb: &mut Workbook<S>, filter: &IssueFilter) -> Result<CmdResult> {
    let all = wb.fetch(Sheet::MaintenanceLog)?;
    Ok(listing(all.filtered(|r| filter.matches(r)), all.len()))
}

/// Robots currently in one status, e.g. the idle ones a deploy can pick from.
pub fn robots_in<S: RecordStore>(wb: &mut Workbook<S>, status: RobotStatus) -> Result<Table> {
    let filter = RobotFilter {
        statuses: vec![status.as_str().to_string()],
        ..Default::default()
    };
    Ok(wb.fetch(Sheet::RobotLog)?.filtered(|r| filter.matches(r)))
}
