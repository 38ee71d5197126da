use crate::commands::helpers::{linked_deployments, robot_by_serial, robot_found};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, DeploymentStatus, Sheet, Vocabulary};
use crate::record::Record;
use crate::saga::{Saga, SagaOutcome};
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// What deleting a robot would touch.
/// Used by the CLI to show a confirmation before calling [`run`].
#[derive(Debug)]
pub struct DeletePreview {
    pub robot: Record,
    /// Client Log rows that will be forced to Inactive.
    pub linked: Vec<Record>,
}

pub fn preview<S: RecordStore>(wb: &mut Workbook<S>, serial: &str) -> Result<DeletePreview> {
    let robot = robot_by_serial(wb, serial)?;
    let linked = linked_deployments(wb, serial.trim())?;
    Ok(DeletePreview { robot, linked })
}

/// Deletes a robot row, first forcing every linked deployment to Inactive.
///
/// Deployment rows are never deleted here. If deactivating them fails the robot
/// row is left in place.
///
/// **Important**: This function does NOT prompt. Call [`preview`] first, confirm
/// with the user, then pass `confirmed = true`.
pub fn run<S: RecordStore>(wb: &mut Workbook<S>, serial: &str, confirmed: bool) -> Result<CmdResult> {
    if !confirmed {
        return Err(RobologError::Validation(
            "Deleting a robot must be confirmed".to_string(),
        ));
    }
    let DeletePreview { robot, linked } = preview(wb, serial)?;
    let serial = serial.trim().to_string();

    let mut saga = Saga::new(format!("delete robot {}", serial));
    let deactivated = if linked.is_empty() {
        true
    } else {
        saga.step(
            format!("deactivate {} deployment(s)", linked.len()),
            || {
                wb.set_where(
                    Sheet::ClientLog,
                    columns::SERIAL_NUMBER,
                    &serial,
                    columns::DEPLOYMENT_STATUS,
                    DeploymentStatus::Inactive.as_str(),
                )
            },
        )
    };
    if deactivated {
        saga.step("delete robot row", || {
            let deleted = wb.delete_by_key(Sheet::RobotLog, columns::SERIAL_NUMBER, &serial)?;
            robot_found(&serial, deleted)
        });
    } else {
        saga.skip("delete robot row", "linked deployments could not be deactivated");
    }

    let outcome = saga.outcome();
    let mut result = CmdResult::default().with_status(outcome.status());
    result.messages.extend(saga.failure_messages());
    match outcome {
        SagaOutcome::Success => {
            result.affected.push(robot);
            if linked.is_empty() {
                result.add_message(CmdMessage::success(format!("Robot {} deleted", serial)));
            } else {
                result.add_message(CmdMessage::success(format!(
                    "Robot {} deleted. {} client deployment(s) set to Inactive",
                    serial,
                    linked.len()
                )));
            }
        }
        SagaOutcome::PartialFailure { .. } => {
            result.add_message(CmdMessage::warning(format!(
                "Deployments of {} were set to Inactive but the robot was not deleted",
                serial
            )));
        }
        SagaOutcome::Failure => {
            result.add_message(CmdMessage::error(format!(
                "Failed to delete robot {}",
                serial
            )));
        }
    }
    result.steps = saga.steps().to_vec();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadCache;
    use crate::commands::CmdStatus;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn workbook(fixture: StoreFixture) -> Workbook<InMemoryStore> {
        Workbook::new(fixture.store, ReadCache::default())
    }

    fn deployment_statuses(wb: &mut Workbook<InMemoryStore>) -> Vec<String> {
        wb.fetch(Sheet::ClientLog)
            .unwrap()
            .iter()
            .map(|r| r.get(columns::DEPLOYMENT_STATUS).to_string())
            .collect()
    }

    #[test]
    fn preview_counts_linked_deployments() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_deployed_robot("SN001", "AA:01", "Bella", "Acme")
                .with_deployment("Old Co", "SN001", "AA:01", "Bella", "Inactive")
                .with_deployment("Beta", "SN002", "AA:02", "Bella", "Active"),
        );
        let preview = preview(&mut wb, "sn001").unwrap();
        assert_eq!(preview.robot.get(columns::SERIAL_NUMBER), "SN001");
        assert_eq!(preview.linked.len(), 2);
    }

    #[test]
    fn requires_confirmation() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Idle"));
        assert!(run(&mut wb, "SN001", false).is_err());
        assert_eq!(wb.store().count(Sheet::RobotLog), 1);
    }

    #[test]
    fn cascades_to_inactive_without_deleting_deployments() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_deployed_robot("SN001", "AA:01", "Bella", "Acme")
                .with_robot("SN002", "AA:02", "Bella", "Idle")
                .with_deployment("Beta", "SN002", "AA:02", "Bella", "Completed")
                .with_deployment("Old Co", "sn001", "AA:01", "Bella", "Completed"),
        );
        let result = run(&mut wb, "SN001", true).unwrap();

        assert_eq!(result.status, CmdStatus::Success);
        assert_eq!(result.steps.len(), 2);
        assert!(result.messages[0].content.contains("2 client deployment(s)"));

        let robots = wb.fetch(Sheet::RobotLog).unwrap();
        assert_eq!(robots.len(), 1);
        assert_eq!(robots.records()[0].get(columns::SERIAL_NUMBER), "SN002");
        assert_eq!(
            deployment_statuses(&mut wb),
            vec!["Inactive", "Completed", "Inactive"]
        );
    }

    #[test]
    fn unlinked_robot_is_deleted_directly() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot("SN001", "AA:01", "Bella", "Idle")
                .with_deployment("Beta", "SN002", "AA:02", "Bella", "Active"),
        );
        let result = run(&mut wb, "SN001", true).unwrap();
        assert_eq!(result.status, CmdStatus::Success);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(wb.store().count(Sheet::RobotLog), 0);
        assert_eq!(deployment_statuses(&mut wb), vec!["Active"]);
    }

    #[test]
    fn failed_deactivation_keeps_the_robot() {
        let fixture = StoreFixture::new().with_deployed_robot("SN001", "AA:01", "Bella", "Acme");
        fixture
            .store
            .backend()
            .set_failing_sheet(Some(Sheet::ClientLog.name()));
        let mut wb = workbook(fixture);

        let result = run(&mut wb, "SN001", true).unwrap();
        assert_eq!(result.status, CmdStatus::Failure);
        assert_eq!(wb.store().count(Sheet::RobotLog), 1);
    }

    #[test]
    fn failed_row_delete_after_deactivation_is_partial() {
        let fixture = StoreFixture::new().with_deployed_robot("SN001", "AA:01", "Bella", "Acme");
        fixture
            .store
            .backend()
            .set_failing_sheet(Some(Sheet::RobotLog.name()));
        let mut wb = workbook(fixture);

        let result = run(&mut wb, "SN001", true).unwrap();
        assert_eq!(result.status, CmdStatus::PartialSuccess);
        assert_eq!(deployment_statuses(&mut wb), vec!["Inactive"]);
        assert_eq!(wb.store().count(Sheet::RobotLog), 1);
    }

    #[test]
    fn loose_serial_header_cascades_to_the_right_deployment() {
        let fixture = StoreFixture::new()
            .with_deployment("Legacy", "", "AA:00", "Bella", "Active")
            .with_deployment("Acme", "SN001", "AA:01", "Bella", "Active");
        fixture.store.backend().seed(
            Sheet::RobotLog.name(),
            vec![
                vec!["Robot Model".into(), "serial number".into(), "Status".into()],
                vec!["Bella".into(), "SN001".into(), "Active".into()],
            ],
        );
        let mut wb = workbook(fixture);

        let result = run(&mut wb, " SN001 ", true).unwrap();

        assert_eq!(result.status, CmdStatus::Success);
        assert!(result.messages[0].content.starts_with("Robot SN001 deleted"));
        assert_eq!(deployment_statuses(&mut wb), vec!["Active", "Inactive"]);
        assert_eq!(wb.store().count(Sheet::RobotLog), 0);
    }

    #[test]
    fn unknown_serial_is_not_found() {
        let mut wb = workbook(StoreFixture::new());
        assert!(run(&mut wb, "SN404", true).unwrap_err().is_not_found());
    }
}
