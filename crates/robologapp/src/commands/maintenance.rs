use crate::commands::helpers::{required, robot_by_serial, robot_status};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, IssueStatus, RobotStatus, Sheet, Vocabulary, DATE_FORMAT};
use crate::record::Cells;
use crate::store::RecordStore;
use crate::workbook::Workbook;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub serial: String,
    pub problem: String,
    pub solution: String,
    pub remarks: String,
    pub date: NaiveDate,
}

/// Logs a maintenance issue against an active robot. The client, model and MAC
/// are copied from the robot row as they are now.
pub fn add<S: RecordStore>(wb: &mut Workbook<S>, issue: NewIssue) -> Result<CmdResult> {
    let serial = required("Serial Number", &issue.serial)?;
    let problem = required("Problem details", &issue.problem)?;
    let solution = required("Solution", &issue.solution)?;

    let robot = robot_by_serial(wb, &serial)?;
    if robot_status(&robot) != Some(RobotStatus::Active) {
        return Err(RobologError::InvalidState(format!(
            "Robot {} is not Active (Current: {})",
            serial,
            robot.get(columns::STATUS)
        )));
    }

    let cells = Cells::new()
        .with(columns::DATE_OF_ISSUE, issue.date.format(DATE_FORMAT).to_string())
        .with(columns::CLIENT_NAME, robot.get(columns::OUTLET))
        .with(columns::ROBOT_LOCATION, "")
        .with(columns::ROBOT_MODEL, robot.get(columns::ROBOT_MODEL))
        .with(columns::SERIAL_NUMBER, robot.get(columns::SERIAL_NUMBER))
        .with(columns::MAC_ADDRESS, robot.get(columns::MAC_ADDRESS))
        .with(columns::PROBLEM, problem)
        .with(columns::SOLUTION, solution)
        .with(columns::REMARKS, issue.remarks.trim())
        .with(columns::STATUS, IssueStatus::Open.as_str());
    wb.append(Sheet::MaintenanceLog, &cells)?;

    let mut result = CmdResult::default();
    let issues = wb.fetch(Sheet::MaintenanceLog)?;
    if let Some(logged) = issues.records().last() {
        result.affected.push(logged.clone());
    }
    result.add_message(CmdMessage::success(format!(
        "Maintenance record added for {}",
        robot.get(columns::SERIAL_NUMBER)
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadCache;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn workbook(fixture: StoreFixture) -> Workbook<InMemoryStore> {
        Workbook::new(fixture.store, ReadCache::default())
    }

    fn issue(serial: &str) -> NewIssue {
        NewIssue {
            serial: serial.to_string(),
            problem: "Lidar dirty".to_string(),
            solution: "Wiped sensor".to_string(),
            remarks: "".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        }
    }

    #[test]
    fn copies_robot_details_and_opens_issue() {
        let mut wb = workbook(StoreFixture::new().with_deployed_robot("SN001", "AA:01", "Bella", "Acme"));
        let result = add(&mut wb, issue("sn001")).unwrap();

        let row = &result.affected[0];
        assert_eq!(row.get(columns::DATE_OF_ISSUE), "2025-04-02");
        assert_eq!(row.get(columns::CLIENT_NAME), "Acme");
        assert_eq!(row.get(columns::ROBOT_MODEL), "Bella");
        assert_eq!(row.get(columns::SERIAL_NUMBER), "SN001");
        assert_eq!(row.get(columns::MAC_ADDRESS), "AA:01");
        assert_eq!(row.get(columns::ROBOT_LOCATION), "");
        assert_eq!(row.get(columns::STATUS), "Open");
    }

    #[test]
    fn only_active_robots_take_issues() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Idle"));
        let err = add(&mut wb, issue("SN001")).unwrap_err();
        assert!(matches!(err, RobologError::InvalidState(_)));
        assert_eq!(wb.store().count(Sheet::MaintenanceLog), 0);
    }

    #[test]
    fn requires_problem_and_solution() {
        let mut wb = workbook(StoreFixture::new().with_deployed_robot("SN001", "AA:01", "Bella", "Acme"));
        let mut missing = issue("SN001");
        missing.solution = "  ".into();
        assert_eq!(
            add(&mut wb, missing).unwrap_err().to_string(),
            "Solution is required"
        );
        assert!(add(&mut wb, issue("SN404")).unwrap_err().is_not_found());
    }
}
