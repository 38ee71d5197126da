use crate::commands::helpers::required;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::{columns, same_key, Sheet};
use crate::record::Cells;
use crate::store::RecordStore;
use crate::workbook::Workbook;

/// Non-empty robot type names in sheet order.
pub fn names<S: RecordStore>(wb: &mut Workbook<S>) -> Result<Vec<String>> {
    let table = wb.fetch(Sheet::RobotModel)?;
    Ok(table
        .iter()
        .map(|r| r.get(columns::ROBOT_TYPE).trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

pub fn list<S: RecordStore>(wb: &mut Workbook<S>) -> Result<CmdResult> {
    let mut result = CmdResult {
        robot_types: names(wb)?,
        ..Default::default()
    };
    if result.robot_types.is_empty() {
        result.add_message(CmdMessage::info("No robot types defined yet"));
    }
    Ok(result)
}

pub fn add<S: RecordStore>(wb: &mut Workbook<S>, name: &str) -> Result<CmdResult> {
    let name = required("Robot type", name)?;
    if names(wb)?.iter().any(|existing| same_key(existing, &name)) {
        return Err(RobologError::Validation(format!(
            "Robot type '{}' already exists",
            name
        )));
    }

    wb.append(
        Sheet::RobotModel,
        &Cells::new().with(columns::ROBOT_TYPE, name.as_str()),
    )?;

    let mut result = CmdResult {
        robot_types: names(wb)?,
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Robot type '{}' added",
        name
    )));
    Ok(result)
}
