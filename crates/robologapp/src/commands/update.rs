use crate::commands::helpers::{mac_in_use, parse_vocab, robot_by_serial, robot_found};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, same_key, RobotStatus, Sheet, Vocabulary};
use crate::record::Cells;
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Fields to change on a robot. `None` leaves the cell as is.
#[derive(Debug, Clone, Default)]
pub struct RobotEdit {
    pub model: Option<String>,
    pub mac: Option<String>,
    pub cloud_store_group: Option<String>,
    pub status: Option<String>,
    pub outlet: Option<String>,
    pub maintenance_plan: Option<String>,
}

impl RobotEdit {
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.mac.is_none()
            && self.cloud_store_group.is_none()
            && self.status.is_none()
            && self.outlet.is_none()
            && self.maintenance_plan.is_none()
    }
}

pub fn run<S: RecordStore>(wb: &mut Workbook<S>, serial: &str, edit: RobotEdit) -> Result<CmdResult> {
    if edit.is_empty() {
        return Err(RobologError::Validation("Nothing to update".to_string()));
    }
    let robot = robot_by_serial(wb, serial)?;
    let serial = serial.trim().to_string();

    let mut cells = Cells::new();
    if let Some(model) = &edit.model {
        cells.set(columns::ROBOT_MODEL, model.trim());
    }
    if let Some(mac) = &edit.mac {
        let mac = mac.trim();
        if mac.is_empty() {
            return Err(RobologError::Validation(
                "MAC Address is required".to_string(),
            ));
        }
        if !same_key(mac, robot.get(columns::MAC_ADDRESS)) && mac_in_use(wb, mac, Some(&serial))? {
            return Err(RobologError::DuplicateMac(mac.to_string()));
        }
        cells.set(columns::MAC_ADDRESS, mac);
    }
    if let Some(group) = &edit.cloud_store_group {
        cells.set(columns::CLOUD_STORE_GROUP, group.trim());
    }
    if let Some(status) = &edit.status {
        let status: RobotStatus = parse_vocab("robot status", status)?;
        cells.set(columns::STATUS, status.as_str());
    }
    if let Some(outlet) = &edit.outlet {
        cells.set(columns::OUTLET, outlet.trim());
    }
    if let Some(plan) = &edit.maintenance_plan {
        cells.set(columns::MAINTENANCE_PLAN, plan.trim());
    }

    let updated = wb.update_by_key(Sheet::RobotLog, columns::SERIAL_NUMBER, &serial, &cells)?;
    robot_found(&serial, updated)?;

    let mut result = CmdResult::default();
    result.affected.push(robot_by_serial(wb, &serial)?);
    result.add_message(CmdMessage::success(format!("Robot {} updated", serial)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadCache;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn workbook() -> Workbook<InMemoryStore> {
        let fixture = StoreFixture::new()
            .with_robot("SN001", "AA:01", "Bella", "Idle")
            .with_robot("SN002", "AA:02", "Bella", "Idle");
        Workbook::new(fixture.store, ReadCache::default())
    }

    #[test]
    fn edits_only_given_fields() {
        let mut wb = workbook();
        let result = run(
            &mut wb,
            "sn001",
            RobotEdit {
                status: Some("maintenance".into()),
                outlet: Some(" Workshop ".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let robot = &result.affected[0];
        assert_eq!(robot.get(columns::STATUS), "Maintenance");
        assert_eq!(robot.get(columns::OUTLET), "Workshop");
        assert_eq!(robot.get(columns::MAC_ADDRESS), "AA:01");
        assert_eq!(robot.get(columns::ROBOT_MODEL), "Bella");
    }

    #[test]
    fn keeping_own_mac_is_allowed() {
        let mut wb = workbook();
        let result = run(
            &mut wb,
            "SN001",
            RobotEdit {
                mac: Some("aa:01".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.affected[0].get(columns::MAC_ADDRESS), "aa:01");
    }

    #[test]
    fn taking_another_robots_mac_is_rejected() {
        let mut wb = workbook();
        let err = run(
            &mut wb,
            "SN001",
            RobotEdit {
                mac: Some(" AA:02 ".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, RobologError::DuplicateMac(_)));

        let robot = robot_by_serial(&wb, "SN001").unwrap();
        assert_eq!(robot.get(columns::MAC_ADDRESS), "AA:01");
    }

    #[test]
    fn rejects_unknown_status_and_empty_edit() {
        let mut wb = workbook();
        let err = run(
            &mut wb,
            "SN001",
            RobotEdit {
                status: Some("Deployed".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid robot status"));
        assert!(run(&mut wb, "SN001", RobotEdit::default()).is_err());
    }

    #[test]
    fn loose_serial_header_updates_the_matching_robot() {
        let fixture = StoreFixture::new();
        fixture.store.backend().seed(
            Sheet::RobotLog.name(),
            vec![
                vec!["serial number".into(), "Status".into()],
                vec!["".into(), "Idle".into()],
                vec!["SN001".into(), "Idle".into()],
            ],
        );
        let mut wb = Workbook::new(fixture.store, ReadCache::default());

        let result = run(
            &mut wb,
            "SN001",
            RobotEdit {
                status: Some("Retired".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(result.affected[0].get(columns::SERIAL_NUMBER), "SN001");
        let robots = wb.fetch(Sheet::RobotLog).unwrap();
        assert_eq!(robots.records()[0].get(columns::STATUS), "Idle");
        assert_eq!(robots.records()[1].get(columns::STATUS), "Retired");
    }

    #[test]
    fn unknown_robot_is_not_found() {
        let mut wb = workbook();
        let err = run(
            &mut wb,
            "SN404",
            RobotEdit {
                outlet: Some("x".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
