use crate::commands::helpers::{mac_in_use, required};
use crate::commands::robot_types;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, same_key, RobotStatus, Sheet, Vocabulary, DATE_FORMAT};
use crate::record::Cells;
use crate::store::RecordStore;
use crate::workbook::Workbook;
use chrono::{Duration, NaiveDate};

/// Days counted per month of cloud activation when computing the expiry date.
pub const DAYS_PER_CLOUD_MONTH: i64 = 30;

#[derive(Debug, Clone)]
pub struct NewRobot {
    pub model: String,
    pub serial: String,
    pub mac: String,
    pub cloud_period_months: u32,
    pub cloud_activation_date: NaiveDate,
    pub cloud_store_group: String,
}

pub fn cloud_expiry(activation: NaiveDate, months: u32) -> Option<NaiveDate> {
    activation.checked_add_signed(Duration::days(i64::from(months) * DAYS_PER_CLOUD_MONTH))
}

pub fn run<S: RecordStore>(wb: &mut Workbook<S>, robot: NewRobot) -> Result<CmdResult> {
    let model = required("Robot Model", &robot.model)?;
    let serial = required("Serial Number", &robot.serial)?;
    let mac = required("MAC Address", &robot.mac)?;
    if robot.cloud_period_months < 1 {
        return Err(RobologError::Validation(
            "Cloud Activation Period must be at least 1 month".to_string(),
        ));
    }

    let types = robot_types::names(wb)?;
    if types.is_empty() {
        return Err(RobologError::Validation(
            "No robot types available. Add a robot type first".to_string(),
        ));
    }
    let model = types
        .into_iter()
        .find(|t| same_key(t, &model))
        .ok_or_else(|| RobologError::Validation(format!("Unknown robot model '{}'", model)))?;

    if wb
        .find(Sheet::RobotLog, columns::SERIAL_NUMBER, &serial)?
        .is_some()
    {
        return Err(RobologError::DuplicateSerial(serial));
    }
    if mac_in_use(wb, &mac, None)? {
        return Err(RobologError::DuplicateMac(mac));
    }

    let expiry = cloud_expiry(robot.cloud_activation_date, robot.cloud_period_months)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    let cells = Cells::new()
        .with(columns::ROBOT_MODEL, model.as_str())
        .with(columns::SERIAL_NUMBER, serial.as_str())
        .with(columns::MAC_ADDRESS, mac.as_str())
        .with(columns::CLOUD_PERIOD, robot.cloud_period_months.to_string())
        .with(
            columns::CLOUD_DATE,
            robot.cloud_activation_date.format(DATE_FORMAT).to_string(),
        )
        .with(columns::CLOUD_EXPIRY, expiry)
        .with(columns::CLOUD_STORE_GROUP, robot.cloud_store_group.trim())
        .with(columns::MAINTENANCE_PLAN, "")
        .with(columns::OUTLET, "")
        .with(columns::STATUS, RobotStatus::Idle.as_str());
    wb.append(Sheet::RobotLog, &cells)?;

    let mut result = CmdResult::default();
    if let Some(created) = wb.find(Sheet::RobotLog, columns::SERIAL_NUMBER, &serial)? {
        result.affected.push(created);
    }
    result.add_message(CmdMessage::success(format!(
        "Robot '{}' ({}) added",
        model, serial
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

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn new_robot(serial: &str, mac: &str) -> NewRobot {
        NewRobot {
            model: "bella".to_string(),
            serial: serial.to_string(),
            mac: mac.to_string(),
            cloud_period_months: 12,
            cloud_activation_date: date("2025-01-01"),
            cloud_store_group: " Group A ".to_string(),
        }
    }

    #[test]
    fn expiry_counts_thirty_day_months() {
        assert_eq!(cloud_expiry(date("2025-01-01"), 12), Some(date("2025-12-27")));
        assert_eq!(cloud_expiry(date("2025-01-31"), 1), Some(date("2025-03-02")));
    }

    #[test]
    fn creates_idle_robot_with_canonical_model() {
        let mut wb = workbook(StoreFixture::new().with_robot_type("Bella"));
        let result = run(&mut wb, new_robot(" SN001 ", "00:1B:44:11:3A:B7")).unwrap();

        assert_eq!(result.affected.len(), 1);
        let robot = &result.affected[0];
        assert_eq!(robot.get(columns::ROBOT_MODEL), "Bella");
        assert_eq!(robot.get(columns::SERIAL_NUMBER), "SN001");
        assert_eq!(robot.get(columns::CLOUD_PERIOD), "12");
        assert_eq!(robot.get(columns::CLOUD_DATE), "2025-01-01");
        assert_eq!(robot.get(columns::CLOUD_EXPIRY), "2025-12-27");
        assert_eq!(robot.get(columns::CLOUD_STORE_GROUP), "Group A");
        assert_eq!(robot.get(columns::OUTLET), "");
        assert_eq!(
            RobotStatus::parse(robot.get(columns::STATUS)),
            Some(RobotStatus::Idle)
        );
    }

    #[test]
    fn rejects_duplicate_serial() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot_type("Bella")
                .with_robot("SN001", "AA:01", "Bella", "Idle"),
        );
        let err = run(&mut wb, new_robot("sn001 ", "AA:99")).unwrap_err();
        assert!(matches!(err, RobologError::DuplicateSerial(_)));
        assert_eq!(wb.store().count(Sheet::RobotLog), 1);
    }

    #[test]
    fn rejects_duplicate_mac() {
        let mut wb = workbook(
            StoreFixture::new()
                .with_robot_type("Bella")
                .with_robot("SN001", "AA:01", "Bella", "Idle"),
        );
        let err = run(&mut wb, new_robot("SN002", " aa:01")).unwrap_err();
        assert!(matches!(err, RobologError::DuplicateMac(_)));
        assert_eq!(wb.store().count(Sheet::RobotLog), 1);
    }

    #[test]
    fn serials_and_macs_stay_unique_across_creates() {
        let mut wb = workbook(StoreFixture::new().with_robot_type("Bella"));
        let attempts = [
            ("SN1", "M1"),
            ("sn1", "M2"),
            ("SN2", "m1"),
            ("SN2", "M2"),
            (" SN2", "M3"),
        ];
        for (serial, mac) in attempts {
            let _ = run(&mut wb, new_robot(serial, mac));
        }
        let robots = wb.fetch(Sheet::RobotLog).unwrap();
        assert_eq!(robots.len(), 2);
        let serials: Vec<String> = robots
            .iter()
            .map(|r| crate::model::normalize(r.get(columns::SERIAL_NUMBER)))
            .collect();
        assert_eq!(serials, vec!["sn1", "sn2"]);
    }

    #[test]
    fn requires_known_model_and_fields() {
        let mut wb = workbook(StoreFixture::new());
        let err = run(&mut wb, new_robot("SN1", "M1")).unwrap_err();
        assert!(err.to_string().contains("No robot types"));

        let mut wb = workbook(StoreFixture::new().with_robot_type("KettyBot"));
        let err = run(&mut wb, new_robot("SN1", "M1")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown robot model 'bella'");

        let err = run(&mut wb, new_robot("SN1", "")).unwrap_err();
        assert_eq!(err.to_string(), "MAC Address is required");

        let mut zero = new_robot("SN1", "M1");
        zero.cloud_period_months = 0;
        assert!(run(&mut wb, zero).is_err());
        assert_eq!(wb.store().count(Sheet::RobotLog), 0);
    }
}
