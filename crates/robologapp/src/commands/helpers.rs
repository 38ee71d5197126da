use crate::error::{RobologError, Result};
use crate::model::{columns, normalize, same_key, RobotStatus, Sheet, Vocabulary};
use crate::record::Record;
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Trimmed value of a required field, or a validation error naming it.
pub fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(RobologError::Validation(format!("{} is required", field)))
    } else {
        Ok(value.to_string())
    }
}

/// Parse a vocabulary value, naming the field and the accepted values on failure.
pub fn parse_vocab<V: Vocabulary>(field: &str, value: &str) -> Result<V> {
    V::parse(value).ok_or_else(|| {
        RobologError::Validation(format!(
            "Invalid {} '{}' (expected one of: {})",
            field,
            value.trim(),
            V::expected()
        ))
    })
}

/// Current robot row by serial, straight from the store.
pub fn robot_by_serial<S: RecordStore>(wb: &Workbook<S>, serial: &str) -> Result<Record> {
    wb.find(Sheet::RobotLog, columns::SERIAL_NUMBER, serial)?
        .ok_or_else(|| RobologError::RobotNotFound(serial.trim().to_string()))
}

/// Parsed status of a robot row. Unknown spellings read as `None`.
pub fn robot_status(robot: &Record) -> Option<RobotStatus> {
    RobotStatus::parse(robot.get(columns::STATUS))
}

/// Whether another robot already uses this MAC address (cached scan).
///
/// The robot with serial `exclude_serial`, if given, is ignored so a robot can
/// keep its own MAC on edit.
pub fn mac_in_use<S: RecordStore>(
    wb: &mut Workbook<S>,
    mac: &str,
    exclude_serial: Option<&str>,
) -> Result<bool> {
    let wanted = normalize(mac);
    let robots = wb.fetch(Sheet::RobotLog)?;
    Ok(robots.iter().any(|robot| {
        normalize(robot.get(columns::MAC_ADDRESS)) == wanted
            && !exclude_serial
                .map(|serial| same_key(robot.get(columns::SERIAL_NUMBER), serial))
                .unwrap_or(false)
    }))
}

/// Client Log record at a 0-based index, from a fresh read.
pub fn deployment_at<S: RecordStore>(wb: &mut Workbook<S>, index: usize) -> Result<Record> {
    let clients = wb.fetch(Sheet::ClientLog)?;
    clients
        .get(index)
        .cloned()
        .ok_or_else(|| RobologError::RowNotFound {
            sheet: Sheet::ClientLog.name().to_string(),
            row: index + 1,
        })
}

/// Deployment rows linked to a robot by serial.
pub fn linked_deployments<S: RecordStore>(wb: &mut Workbook<S>, serial: &str) -> Result<Vec<Record>> {
    let clients = wb.fetch(Sheet::ClientLog)?;
    Ok(clients
        .iter()
        .filter(|c| same_key(c.get(columns::SERIAL_NUMBER), serial))
        .cloned()
        .collect())
}

/// Turn an update's "no row matched" into a not-found error for saga steps.
pub fn robot_found(serial: &str, updated: bool) -> Result<()> {
    if updated {
        Ok(())
    } else {
        Err(RobologError::RobotNotFound(serial.trim().to_string()))
    }
}

/// Case-insensitive substring match; an empty needle matches everything.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
