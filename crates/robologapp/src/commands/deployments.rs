use crate::commands::helpers::{deployment_at, parse_vocab, robot_found};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, DeploymentStatus, MaintenancePackage, Sheet, Vocabulary};
use crate::record::{Cells, Record};
use crate::saga::{Saga, SagaOutcome};
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Fields to change on a Client Log row. `None` leaves the cell as is.
#[derive(Debug, Clone, Default)]
pub struct DeploymentEdit {
    pub client_name: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub package: Option<String>,
    pub deployment_type: Option<String>,
    pub cloud_store_group: Option<String>,
}

impl DeploymentEdit {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.package.is_none()
            && self.deployment_type.is_none()
            && self.cloud_store_group.is_none()
    }
}

/// The Client Log row at a 0-based index, for showing before edit or delete.
pub fn get<S: RecordStore>(wb: &mut Workbook<S>, index: usize) -> Result<Record> {
    deployment_at(wb, index)
}

/// Updates a deployment row. A package change is copied to the linked robot's
/// `Maintenance Plan`; if only that copy fails the result is a partial success.
pub fn edit<S: RecordStore>(wb: &mut Workbook<S>, index: usize, changes: DeploymentEdit) -> Result<CmdResult> {
    if changes.is_empty() {
        return Err(RobologError::Validation("Nothing to update".to_string()));
    }
    let deployment = deployment_at(wb, index)?;

    let mut cells = Cells::new();
    if let Some(name) = &changes.client_name {
        cells.set(columns::CLIENT_NAME, name.trim());
    }
    if let Some(location) = &changes.location {
        cells.set(columns::LOCATION, location.trim());
    }
    if let Some(status) = &changes.status {
        let status: DeploymentStatus = parse_vocab("deployment status", status)?;
        cells.set(columns::DEPLOYMENT_STATUS, status.as_str());
    }
    let package = match &changes.package {
        Some(package) => {
            let package: MaintenancePackage = parse_vocab("maintenance package", package)?;
            cells.set(columns::MAINTENANCE_PACKAGE, package.as_str());
            Some(package)
        }
        None => None,
    };
    if let Some(kind) = &changes.deployment_type {
        cells.set(columns::DEPLOYMENT_TYPE, kind.trim());
    }
    if let Some(group) = &changes.cloud_store_group {
        cells.set(columns::CLOUD_STORE_GROUP, group.trim());
    }

    let serial = deployment.get(columns::SERIAL_NUMBER).trim().to_string();
    let mut saga = Saga::new(format!("edit deployment row {}", deployment.row_number()));
    let updated = saga.step("update deployment", || {
        wb.update_row(Sheet::ClientLog, index, &cells)
    });
    let synced = match package {
        Some(package) if updated && !serial.is_empty() => saga.step("sync maintenance plan", || {
            let found = wb.update_by_key(
                Sheet::RobotLog,
                columns::SERIAL_NUMBER,
                &serial,
                &Cells::new().with(columns::MAINTENANCE_PLAN, package.as_str()),
            )?;
            robot_found(&serial, found)
        }),
        _ => false,
    };

    let outcome = saga.outcome();
    let mut result = CmdResult::default().with_status(outcome.status());
    result.messages.extend(saga.failure_messages());
    match outcome {
        SagaOutcome::Success if synced => {
            result.add_message(CmdMessage::success(
                "Client deployment updated. Maintenance Plan synced to Robot Log",
            ));
        }
        SagaOutcome::Success => {
            result.add_message(CmdMessage::success("Client deployment updated"));
        }
        SagaOutcome::PartialFailure { .. } => {
            result.add_message(CmdMessage::warning(
                "Client deployment updated but failed to sync Maintenance Plan to Robot Log",
            ));
        }
        SagaOutcome::Failure => {
            result.add_message(CmdMessage::error("Failed to update client deployment"));
        }
    }
    if let Ok(record) = deployment_at(wb, index) {
        result.affected.push(record);
    }
    result.steps = saga.steps().to_vec();
    Ok(result)
}

/// Removes one Client Log row. Robots are not touched.
pub fn delete<S: RecordStore>(wb: &mut Workbook<S>, index: usize, confirmed: bool) -> Result<CmdResult> {
    if !confirmed {
        return Err(RobologError::Validation(
            "Deleting a client deployment must be confirmed".to_string(),
        ));
    }
    let deployment = deployment_at(wb, index)?;
    wb.delete_row(Sheet::ClientLog, index)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client deployment Row {} ({} - {}) deleted",
        deployment.row_number(),
        deployment.get(columns::CLIENT_NAME),
        deployment.get(columns::SERIAL_NUMBER)
    )));
    result.affected.push(deployment);
    Ok(result)
}
