//! Deploying idle robots to a client.
//!
//! Each robot is applied on its own: status check, robot row update, then one
//! Client Log row. A robot that is missing or not idle is skipped and the batch
//! carries on, so earlier robots stay deployed when a later one fails.

use crate::commands::helpers::{parse_vocab, required, robot_by_serial, robot_found, robot_status};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{
    columns, normalize, DeploymentStatus, MaintenancePackage, RobotStatus, Sheet, Vocabulary,
    DATE_FORMAT, DEPLOYMENT_KIND,
};
use crate::record::Cells;
use crate::saga::{Saga, SagaOutcome};
use crate::store::RecordStore;
use crate::workbook::Workbook;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub client_name: String,
    pub location: String,
    pub cloud_store_group: String,
    pub package: String,
    pub serials: Vec<String>,
    pub date: NaiveDate,
}

pub fn run<S: RecordStore>(wb: &mut Workbook<S>, request: DeployRequest) -> Result<CmdResult> {
    let client = required("Client Name", &request.client_name)?;
    let location = required("Location", &request.location)?;
    let group = required("Cloud Store Group", &request.cloud_store_group)?;
    let package: MaintenancePackage = parse_vocab("maintenance package", &request.package)?;

    let mut serials: Vec<String> = Vec::new();
    for serial in &request.serials {
        let serial = serial.trim();
        if !serial.is_empty() && !serials.iter().any(|s| normalize(s) == normalize(serial)) {
            serials.push(serial.to_string());
        }
    }
    if serials.is_empty() {
        return Err(RobologError::Validation(
            "Select at least one robot to deploy".to_string(),
        ));
    }

    let date = request.date.format(DATE_FORMAT).to_string();
    let mut saga = Saga::new(format!("deploy to {}", client));
    let mut deployed = Vec::new();
    let mut activated = Vec::new();

    for serial in &serials {
        let robot = match robot_by_serial(wb, serial) {
            Ok(robot) => robot,
            Err(e) => {
                saga.skip(serial.as_str(), e.to_string());
                continue;
            }
        };
        if robot_status(&robot) != Some(RobotStatus::Idle) {
            saga.skip(
                serial.as_str(),
                format!(
                    "Robot {} is not idle (Current: {})",
                    serial,
                    robot.get(columns::STATUS)
                ),
            );
            continue;
        }

        let robot_cells = Cells::new()
            .with(columns::STATUS, RobotStatus::Active.as_str())
            .with(columns::OUTLET, client.as_str())
            .with(columns::MAINTENANCE_PLAN, package.as_str())
            .with(columns::CLOUD_STORE_GROUP, group.as_str());
        let updated = saga.step(format!("{}: activate robot", serial), || {
            let found = wb.update_by_key(Sheet::RobotLog, columns::SERIAL_NUMBER, serial, &robot_cells)?;
            robot_found(serial, found)
        });
        if !updated {
            continue;
        }
        activated.push(serial.clone());

        let model = robot.get(columns::ROBOT_MODEL).to_string();
        let deployment = Cells::new()
            .with(columns::CLIENT_NAME, client.as_str())
            .with(columns::LOCATION, location.as_str())
            .with(columns::DEPLOYMENT_DATE, date.as_str())
            .with(columns::DEPLOYMENT_TYPE, DEPLOYMENT_KIND)
            .with(columns::DEPLOYMENT_STATUS, DeploymentStatus::Active.as_str())
            .with(columns::MAINTENANCE_PACKAGE, package.as_str())
            .with(columns::CLOUD_STORE_GROUP, group.as_str())
            .with(columns::ROBOT_DEPLOYED, model.as_str())
            .with(columns::SERIAL_NUMBER, serial.as_str())
            .with(columns::MAC_ADDRESS, robot.get(columns::MAC_ADDRESS));
        if saga.step(format!("{}: log deployment", serial), || {
            wb.append(Sheet::ClientLog, &deployment)
        }) {
            deployed.push(format!("{} ({})", serial, model));
        }
    }

    let outcome = saga.outcome();
    let mut result = CmdResult::default().with_status(outcome.status());
    result.messages.extend(saga.failure_messages());
    match outcome {
        SagaOutcome::Success => {
            result.add_message(CmdMessage::success(format!(
                "Deployed {} robot(s) to {}: {}",
                deployed.len(),
                client,
                deployed.join(", ")
            )));
        }
        SagaOutcome::PartialFailure { .. } => {
            result.add_message(CmdMessage::warning(format!(
                "Deployed {} robot(s) to {} but some failed",
                deployed.len(),
                client
            )));
        }
        SagaOutcome::Failure => {
            result.add_message(CmdMessage::error(format!(
                "No robots were deployed to {}",
                client
            )));
        }
    }

    for serial in &activated {
        if let Some(robot) = wb.find(Sheet::RobotLog, columns::SERIAL_NUMBER, serial)? {
            result.affected.push(robot);
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

    fn request(serials: &[&str]) -> DeployRequest {
        DeployRequest {
            client_name: "Acme".to_string(),
            location: "KL".to_string(),
            cloud_store_group: "G7".to_string(),
            package: "Leasing".to_string(),
            serials: serials.iter().map(|s| s.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        }
    }

    #[test]
    fn deploys_two_idle_robots_to_acme() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot("SN001", "AA:01", "Bella", "Idle")
                .with_robot("SN002", "AA:02", "KettyBot", "Idle"),
        );
        let result = run(&mut wb, request(&["SN001", "SN002"])).unwrap();

        assert_eq!(result.status, CmdStatus::Success);
        assert_eq!(result.affected.len(), 2);
        for robot in &result.affected {
            assert_eq!(robot.get(columns::STATUS), "Active");
            assert_eq!(robot.get(columns::OUTLET), "Acme");
            assert_eq!(robot.get(columns::MAINTENANCE_PLAN), "Leasing");
            assert_eq!(robot.get(columns::CLOUD_STORE_GROUP), "G7");
        }

        let clients = wb.fetch(Sheet::ClientLog).unwrap();
        assert_eq!(clients.len(), 2);
        for row in &clients {
            assert_eq!(row.get(columns::DEPLOYMENT_TYPE), "Deployment");
            assert_eq!(row.get(columns::DEPLOYMENT_STATUS), "Active");
            assert_eq!(row.get(columns::MAINTENANCE_PACKAGE), "Leasing");
            assert_eq!(row.get(columns::CLIENT_NAME), "Acme");
            assert_eq!(row.get(columns::LOCATION), "KL");
            assert_eq!(row.get(columns::DEPLOYMENT_DATE), "2025-03-01");
        }
        assert_eq!(clients.records()[1].get(columns::ROBOT_DEPLOYED), "KettyBot");
        assert_eq!(clients.records()[1].get(columns::MAC_ADDRESS), "AA:02");
    }

    #[test]
    fn non_idle_robot_does_not_undo_earlier_ones() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot("SN001", "AA:01", "Bella", "Idle")
                .with_robot("SN002", "AA:02", "Bella", "Maintenance")
                .with_robot("SN003", "AA:03", "Bella", "Idle"),
        );
        let result = run(&mut wb, request(&["SN001", "SN002", "SN003"])).unwrap();

        assert_eq!(result.status, CmdStatus::PartialSuccess);
        assert_eq!(result.affected.len(), 2);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("SN002 is not idle (Current: Maintenance)")));
        assert_eq!(wb.store().count(Sheet::ClientLog), 2);

        let untouched = robot_by_serial(&wb, "SN002").unwrap();
        assert_eq!(untouched.get(columns::STATUS), "Maintenance");
        assert_eq!(untouched.get(columns::OUTLET), "");
    }

    #[test]
    fn robot_already_at_the_client_is_not_reported_as_deployed() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot("SN001", "AA:01", "Bella", "Idle")
                .with_deployed_robot("SN002", "AA:02", "Bella", "Acme"),
        );
        let result = run(&mut wb, request(&["SN001", "SN002"])).unwrap();

        assert_eq!(result.status, CmdStatus::PartialSuccess);
        let affected: Vec<&str> = result
            .affected
            .iter()
            .map(|r| r.get(columns::SERIAL_NUMBER))
            .collect();
        assert_eq!(affected, vec!["SN001"]);
        assert_eq!(wb.store().count(Sheet::ClientLog), 2);
    }

    #[test]
    fn missing_robot_is_reported_per_serial() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Idle"));
        let result = run(&mut wb, request(&["SN404", "SN001"])).unwrap();
        assert_eq!(result.status, CmdStatus::PartialSuccess);
        assert!(result.messages[0].content.contains("Robot SN404 not found"));
    }

    #[test]
    fn nothing_deployable_is_failure() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Active"));
        let result = run(&mut wb, request(&["SN001"])).unwrap();
        assert_eq!(result.status, CmdStatus::Failure);
        assert!(result.affected.is_empty());
        assert_eq!(wb.store().count(Sheet::ClientLog), 0);
    }

    #[test]
    fn status_check_is_normalized_and_serials_deduplicated() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", " idle "));
        let result = run(&mut wb, request(&["SN001", "sn001 "])).unwrap();
        assert_eq!(result.status, CmdStatus::Success);
        assert_eq!(wb.store().count(Sheet::ClientLog), 1);
    }

    #[test]
    fn failed_log_append_is_partial() {
        let fixture = StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Idle");
        fixture
            .store
            .backend()
            .set_failing_sheet(Some(Sheet::ClientLog.name()));
        let mut wb = workbook(fixture);

        let result = run(&mut wb, request(&["SN001"])).unwrap();
        assert_eq!(result.status, CmdStatus::PartialSuccess);
        assert_eq!(robot_by_serial(&wb, "SN001").unwrap().get(columns::STATUS), "Active");
    }

    #[test]
    fn validates_before_writing() {
        let mut wb = workbook(StoreFixture::new().with_robot("SN001", "AA:01", "Bella", "Idle"));

        let mut bad = request(&["SN001"]);
        bad.location = " ".into();
        assert!(run(&mut wb, bad).is_err());

        let mut bad = request(&["SN001"]);
        bad.package = "Rental".into();
        assert!(run(&mut wb, bad).is_err());

        assert!(run(&mut wb, request(&[])).is_err());
        assert_eq!(robot_by_serial(&wb, "SN001").unwrap().get(columns::STATUS), "Idle");
    }
}
