use crate::commands::helpers::{deployment_at, robot_found};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, DeploymentStatus, RobotStatus, Sheet, Vocabulary};
use crate::record::Cells;
use crate::saga::{Saga, SagaOutcome};
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Brings the robot of an active deployment back: the deployment goes Inactive
/// and the robot goes Idle with its outlet cleared.
///
/// Both writes are always attempted. Retrieving a deployment that is no longer
/// Active is refused without writing.
pub fn run<S: RecordStore>(wb: &mut Workbook<S>, index: usize) -> Result<CmdResult> {
    let deployment = deployment_at(wb, index)?;
    let status = DeploymentStatus::parse(deployment.get(columns::DEPLOYMENT_STATUS));
    if status != Some(DeploymentStatus::Active) {
        return Err(RobologError::InvalidState(format!(
            "Deployment at Row {} is not Active (Current: {})",
            deployment.row_number(),
            deployment.get(columns::DEPLOYMENT_STATUS)
        )));
    }
    let serial = deployment.get(columns::SERIAL_NUMBER).trim().to_string();

    let mut saga = Saga::new(format!("retrieve row {}", deployment.row_number()));
    saga.step("deactivate deployment", || {
        wb.update_row(
            Sheet::ClientLog,
            index,
            &Cells::new().with(
                columns::DEPLOYMENT_STATUS,
                DeploymentStatus::Inactive.as_str(),
            ),
        )
    });
    if serial.is_empty() {
        saga.skip("release robot", "deployment has no serial number");
    } else {
        saga.step("release robot", || {
            let found = wb.update_by_key(
                Sheet::RobotLog,
                columns::SERIAL_NUMBER,
                &serial,
                &Cells::new()
                    .with(columns::STATUS, RobotStatus::Idle.as_str())
                    .with(columns::OUTLET, ""),
            )?;
            robot_found(&serial, found)
        });
    }

    let outcome = saga.outcome();
    let mut result = CmdResult::default().with_status(outcome.status());
    result.messages.extend(saga.failure_messages());
    match outcome {
        SagaOutcome::Success => {
            result.add_message(CmdMessage::success(format!(
                "Robot {} retrieved. Deployment set to Inactive, robot set to Idle",
                serial
            )));
        }
        SagaOutcome::PartialFailure { .. } => {
            result.add_message(CmdMessage::warning(format!(
                "Retrieval of {} only partially completed; the workbook is inconsistent",
                serial
            )));
        }
        SagaOutcome::Failure => {
            result.add_message(CmdMessage::error(format!(
                "Failed to retrieve robot {}",
                serial
            )));
        }
    }
    if let Ok(updated) = deployment_at(wb, index) {
        result.affected.push(updated);
    }
    result.steps = saga.steps().to_vec();
    Ok(result)
}
