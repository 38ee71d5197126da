use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RobologError, Result};
use crate::model::Sheet;
use crate::record::Table;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `robot_log_20250101.csv` and friends.
pub fn default_filename(sheet: Sheet, date: NaiveDate) -> String {
    format!("{}_{}.csv", sheet.export_prefix(), date.format("%Y%m%d"))
}

/// Write a table as CSV: the fetched header first, then every record in order.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.schema().columns())?;
    for record in table {
        csv.write_record(record.values())?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RobologError::Api(format!("Export is not UTF-8: {}", e)))
}

/// Export a (possibly filtered) view to `path`.
pub fn run(table: &Table, path: &Path) -> Result<CmdResult> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(table, file)?;

    let mut result = CmdResult {
        export_path: Some(PathBuf::from(path)),
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Exported {} record(s) to {}",
        table.len(),
        path.display()
    )));
    Ok(result)
}
