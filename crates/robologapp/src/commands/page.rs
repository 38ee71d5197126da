use crate::commands::list::{self, ClientFilter, IssueFilter, RobotFilter};
use crate::commands::{robot_types, summary};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RobotStatus;
use crate::nav::Page;
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Everything a page needs before the user acts on it.
pub fn run<S: RecordStore>(wb: &mut Workbook<S>, page: Page) -> Result<CmdResult> {
    match page {
        Page::Home => summary::run(wb),
        Page::AddRobot => {
            let mut result = robot_types::list(wb)?;
            if result.robot_types.is_empty() {
                result.messages.clear();
                result.add_message(CmdMessage::warning(
                    "No robot types available. Add a robot type first",
                ));
            }
            Ok(result)
        }
        Page::DeployRobot => {
            let idle = list::robots_in(wb, RobotStatus::Idle)?;
            let mut result = CmdResult::default();
            if idle.is_empty() {
                result.add_message(CmdMessage::warning(
                    "No idle robots available for deployment",
                ));
            }
            Ok(result.with_listed(idle))
        }
        Page::AddMaintenance => {
            let active = list::robots_in(wb, RobotStatus::Active)?;
            let mut result = CmdResult::default();
            if active.is_empty() {
                result.add_message(CmdMessage::warning(
                    "No active robots available for maintenance",
                ));
            }
            Ok(result.with_listed(active))
        }
        Page::ViewRobotLog => list::robots(wb, &RobotFilter::default()),
        Page::ViewClientLog => list::clients(wb, &ClientFilter::default()),
        Page::ViewMaintenanceLog => list::issues(wb, &IssueFilter::default()),
    }
}
