//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all robolog operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (1-based row numbers shown to users become record indexes)
//! - **Collects cache warnings** raised while the command read the workbook and
//!   attaches them to the returned [`CmdResult`]
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: No stdout, stderr or prompts
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over RecordStore
//!
//! `RobologApi<S: RecordStore>` is generic over the storage backend:
//! - Production: `RobologApi<FileStore>`
//! - Testing: `RobologApi<InMemoryStore>`

use crate::commands::{self, CmdMessage, CmdResult};
use crate::commands::delete::DeletePreview;
use crate::commands::deploy::DeployRequest;
use crate::commands::deployments::DeploymentEdit;
use crate::commands::list::{ClientFilter, IssueFilter, RobotFilter};
use crate::commands::maintenance::NewIssue;
use crate::commands::create::NewRobot;
use crate::commands::update::RobotEdit;
use crate::error::{RobologError, Result};
use crate::model::Sheet;
use crate::nav::Page;
use crate::record::{Record, Table};
use crate::store::RecordStore;
use crate::workbook::Workbook;
use chrono::NaiveDate;
use log::warn;
use std::path::{Path, PathBuf};

/// A filtered view of one of the three logs, as listed or exported.
#[derive(Debug, Clone)]
pub enum View {
    Robots(RobotFilter),
    Clients(ClientFilter),
    Issues(IssueFilter),
}

impl View {
    pub fn sheet(&self) -> Sheet {
        match self {
            View::Robots(_) => Sheet::RobotLog,
            View::Clients(_) => Sheet::ClientLog,
            View::Issues(_) => Sheet::MaintenanceLog,
        }
    }
}

/// Today's date in local time, used for deployment, issue and export dates.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Converts a 1-based row number as displayed into a record index.
pub fn row_to_index(row: usize) -> Result<usize> {
    row.checked_sub(1)
        .ok_or_else(|| RobologError::Validation("Row numbers start at 1".to_string()))
}

/// The main API facade for robolog operations.
pub struct RobologApi<S: RecordStore> {
    workbook: Workbook<S>,
}

impl<S: RecordStore> RobologApi<S> {
    pub fn new(workbook: Workbook<S>) -> Self {
        Self { workbook }
    }

    pub fn workbook(&self) -> &Workbook<S> {
        &self.workbook
    }

    pub fn robot_types(&mut self) -> Result<CmdResult> {
        let result = commands::robot_types::list(&mut self.workbook);
        self.finish(result)
    }

    pub fn add_robot_type(&mut self, name: &str) -> Result<CmdResult> {
        let result = commands::robot_types::add(&mut self.workbook, name);
        self.finish(result)
    }

    pub fn add_robot(&mut self, robot: NewRobot) -> Result<CmdResult> {
        let result = commands::create::run(&mut self.workbook, robot);
        self.finish(result)
    }

    pub fn edit_robot(&mut self, serial: &str, edit: RobotEdit) -> Result<CmdResult> {
        let result = commands::update::run(&mut self.workbook, serial, edit);
        self.finish(result)
    }

    pub fn preview_delete_robot(&mut self, serial: &str) -> Result<DeletePreview> {
        let preview = commands::delete::preview(&mut self.workbook, serial);
        self.log_warnings();
        preview
    }

    pub fn delete_robot(&mut self, serial: &str, confirmed: bool) -> Result<CmdResult> {
        let result = commands::delete::run(&mut self.workbook, serial, confirmed);
        self.finish(result)
    }

    pub fn deploy(&mut self, request: DeployRequest) -> Result<CmdResult> {
        let result = commands::deploy::run(&mut self.workbook, request);
        self.finish(result)
    }

    /// Retrieve the robot deployed on Client Log row `row` (1-based).
    pub fn retrieve(&mut self, row: usize) -> Result<CmdResult> {
        let index = row_to_index(row)?;
        let result = commands::retrieve::run(&mut self.workbook, index);
        self.finish(result)
    }

    pub fn deployment(&mut self, row: usize) -> Result<Record> {
        let index = row_to_index(row)?;
        let record = commands::deployments::get(&mut self.workbook, index);
        self.log_warnings();
        record
    }

    pub fn edit_deployment(&mut self, row: usize, changes: DeploymentEdit) -> Result<CmdResult> {
        let index = row_to_index(row)?;
        let result = commands::deployments::edit(&mut self.workbook, index, changes);
        self.finish(result)
    }

    pub fn delete_deployment(&mut self, row: usize, confirmed: bool) -> Result<CmdResult> {
        let index = row_to_index(row)?;
        let result = commands::deployments::delete(&mut self.workbook, index, confirmed);
        self.finish(result)
    }

    pub fn add_maintenance(&mut self, issue: NewIssue) -> Result<CmdResult> {
        let result = commands::maintenance::add(&mut self.workbook, issue);
        self.finish(result)
    }

    pub fn list(&mut self, view: &View) -> Result<CmdResult> {
        let result = match view {
            View::Robots(filter) => commands::list::robots(&mut self.workbook, filter),
            View::Clients(filter) => commands::list::clients(&mut self.workbook, filter),
            View::Issues(filter) => commands::list::issues(&mut self.workbook, filter),
        };
        self.finish(result)
    }

    /// Export a view as CSV. Without a path the dated default file name is used,
    /// relative to the current directory.
    pub fn export(&mut self, view: &View, path: Option<&Path>) -> Result<CmdResult> {
        let listed = self.list(view)?;
        let table = listed
            .listed
            .unwrap_or_else(|| Table::empty(view.sheet().name()));
        let target = path.map(PathBuf::from).unwrap_or_else(|| {
            PathBuf::from(commands::export::default_filename(view.sheet(), today()))
        });
        let mut result = commands::export::run(&table, &target)?;
        result.messages.extend(
            listed
                .messages
                .into_iter()
                .filter(|m| m.level != commands::MessageLevel::Info),
        );
        Ok(result)
    }

    pub fn summary(&mut self) -> Result<CmdResult> {
        let result = commands::summary::run(&mut self.workbook);
        self.finish(result)
    }

    pub fn page(&mut self, page: Page) -> Result<CmdResult> {
        let result = commands::page::run(&mut self.workbook, page);
        self.finish(result)
    }

    /// Manual refresh: the next read of every sheet goes to the backend.
    pub fn refresh(&mut self) -> CmdResult {
        self.workbook.invalidate();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success("Data refreshed"));
        result
    }

    /// Create any missing worksheet with its default header.
    pub fn ensure_sheets(&mut self) -> Result<CmdResult> {
        let created = self.workbook.ensure_sheets()?;
        let mut result = CmdResult::default();
        if created.is_empty() {
            result.add_message(CmdMessage::info("All worksheets already exist"));
        }
        for sheet in created {
            result.add_message(CmdMessage::success(format!("Created worksheet '{}'", sheet)));
        }
        Ok(result)
    }

    fn finish(&mut self, result: Result<CmdResult>) -> Result<CmdResult> {
        match result {
            Ok(mut result) => {
                for warning in self.workbook.drain_warnings() {
                    result.add_message(CmdMessage::warning(warning));
                }
                Ok(result)
            }
            Err(e) => {
                self.log_warnings();
                Err(e)
            }
        }
    }

    fn log_warnings(&mut self) {
        for warning in self.workbook.drain_warnings() {
            warn!("{}", warning);
        }
    }
}

pub use crate::commands::{CmdStatus, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ReadCache, RetryPolicy};
    use crate::model::columns;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use std::time::Duration;

    fn api(store: InMemoryStore) -> RobologApi<InMemoryStore> {
        let cache = ReadCache::new(
            Duration::from_secs(300),
            RetryPolicy {
                max_attempts: 2,
                base_delay: Duration::ZERO,
            },
        );
        RobologApi::new(Workbook::new(store, cache))
    }

    #[test]
    fn row_numbers_are_one_based() {
        assert_eq!(row_to_index(1).unwrap(), 0);
        assert!(matches!(row_to_index(0), Err(RobologError::Validation(_))));
    }

    #[test]
    fn retrieve_addresses_rows_from_one() {
        let fixture = StoreFixture::new().with_deployed_robot("SN1", "AA:01", "Bella", "Acme");
        let mut api = api(fixture.store);
        let result = api.retrieve(1).unwrap();
        assert!(result.is_success());
        let robot = &api.list(&View::Robots(RobotFilter::default())).unwrap().listed.unwrap();
        assert_eq!(robot.records()[0].get(columns::STATUS), "Idle");
    }

    #[test]
    fn rate_limit_warnings_reach_the_result() {
        let store = InMemoryStore::new();
        store.backend().set_rate_limited_reads(2);
        let mut api = api(store);
        let result = api.list(&View::Robots(RobotFilter::default())).unwrap();
        assert!(result.listed.unwrap().is_empty());
        let warnings: Vec<&str> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .map(|m| m.content.as_str())
            .collect();
        assert!(warnings.contains(&"Rate limit reached. Waiting 0 seconds... (Attempt 1/2)"));
        assert!(warnings.contains(&"Rate limit exceeded. Please wait a minute and refresh."));
    }

    #[test]
    fn refresh_reports_success() {
        let mut api = api(InMemoryStore::new());
        let result = api.refresh();
        assert_eq!(result.messages[0].content, "Data refreshed");
    }

    #[test]
    fn ensure_sheets_on_blank_workbook() {
        let mut api = api(InMemoryStore::blank());
        let result = api.ensure_sheets().unwrap();
        assert_eq!(result.messages.len(), 4);
        let again = api.ensure_sheets().unwrap();
        assert_eq!(again.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn view_maps_to_its_sheet() {
        assert_eq!(View::Clients(ClientFilter::default()).sheet(), Sheet::ClientLog);
        assert_eq!(View::Issues(IssueFilter::default()).sheet(), Sheet::MaintenanceLog);
    }
}
