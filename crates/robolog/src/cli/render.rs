//! # Rendering
//!
//! Turns [`CmdResult`] values into terminal text. Layout math (column widths,
//! truncation) is Unicode-aware; colors come from `console` and switch off by
//! themselves when stdout is not a terminal.
//!
//! JSON output serializes the `CmdResult` unchanged, so scripts see the same
//! structure the library returns.

use console::{style, StyledObject};
use robologapp::commands::delete::DeletePreview;
use robologapp::commands::summary::FleetSummary;
use robologapp::commands::{CmdMessage, CmdResult, MessageLevel};
use robologapp::init::InitReport;
use robologapp::model::columns;
use robologapp::record::{Record, Table};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a single cell is allowed to render before it is truncated.
pub const MAX_CELL_WIDTH: usize = 32;
const ELLIPSIS: &str = "…";

fn level_marker(level: &MessageLevel) -> StyledObject<&'static str> {
    match level {
        MessageLevel::Info => style("•").cyan(),
        MessageLevel::Success => style("✓").green(),
        MessageLevel::Warning => style("!").yellow(),
        MessageLevel::Error => style("✗").red(),
    }
}

pub fn render_message(message: &CmdMessage) -> String {
    format!("{} {}", level_marker(&message.level), message.content)
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out
}

/// Cut a cell to `width` display columns, marking the cut with an ellipsis.
pub fn truncate_to_width(value: &str, width: usize) -> String {
    let value = value.replace('\n', " ");
    if value.width() <= width {
        return value;
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut out = String::new();
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.width());
    format!("{}{}", value, " ".repeat(fill))
}

/// A sheet as an aligned table. The first column is the 1-based row label used
/// to address deployments.
pub fn render_table(table: &Table) -> String {
    let mut headers = vec!["Row".to_string()];
    headers.extend(table.schema().columns().iter().cloned());

    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|record| {
            let mut row = vec![record.row_number().to_string()];
            row.extend(
                record
                    .values()
                    .iter()
                    .map(|v| truncate_to_width(v, MAX_CELL_WIDTH)),
            );
            row
        })
        .collect();

    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| truncate_to_width(h, MAX_CELL_WIDTH).width())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(&truncate_to_width(h, MAX_CELL_WIDTH), *w))
        .collect();
    out.push_str(&style(header_line.join("  ").trim_end().to_string()).bold().to_string());
    out.push('\n');

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

pub fn render_summary(summary: &FleetSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Fleet Overview").bold()));
    out.push_str(&format!("  Total robots:   {}\n", summary.total_robots));
    out.push_str(&format!("  Active robots:  {}\n", summary.active_robots));
    out.push_str(&format!("  Unique clients: {}\n", summary.unique_clients));

    if !summary.models.is_empty() {
        out.push('\n');
        let name_width = summary
            .models
            .keys()
            .map(|m| m.width())
            .max()
            .unwrap_or(0)
            .max("Model".len());
        out.push_str(
            &style(format!(
                "{}  Total  Deployed  Idle  Maintenance  Retired",
                pad("Model", name_width)
            ))
            .bold()
            .to_string(),
        );
        out.push('\n');
        for (model, stats) in &summary.models {
            out.push_str(&format!(
                "{}  {:>5}  {:>8}  {:>4}  {:>11}  {:>7}\n",
                pad(model, name_width),
                stats.total,
                stats.deployed,
                stats.idle,
                stats.maintenance,
                stats.retired
            ));
        }
    }

    if !summary.robot_types.is_empty() {
        out.push_str(&format!(
            "\nRobot types: {}\n",
            summary.robot_types.join(", ")
        ));
    }
    out
}

fn render_record(record: &Record) -> String {
    let width = record
        .schema()
        .columns()
        .iter()
        .map(|c| c.width())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (column, value) in record.schema().columns().iter().zip(record.values()) {
        out.push_str(&format!("  {}  {}\n", style(pad(column, width)).dim(), value));
    }
    out
}

/// Full text rendering: listing, summary, affected rows, then messages.
pub fn render_result(result: &CmdResult) -> String {
    let mut out = String::new();

    if let Some(summary) = &result.summary {
        out.push_str(&render_summary(summary));
    }
    if !result.robot_types.is_empty() && result.summary.is_none() {
        for name in &result.robot_types {
            out.push_str(&format!("{}\n", name));
        }
    }
    if let Some(table) = &result.listed {
        if !table.is_empty() {
            out.push_str(&render_table(table));
        }
    }
    for record in &result.affected {
        out.push_str(&render_record(record));
    }
    out.push_str(&render_messages(&result.messages));
    out
}

pub fn render_json(result: &CmdResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// What the user is asked to confirm before a robot is deleted.
pub fn render_delete_preview(preview: &DeletePreview) -> String {
    let mut out = format!(
        "{} {} ({})\n",
        style("Delete robot").red().bold(),
        preview.robot.get(columns::SERIAL_NUMBER),
        preview.robot.get(columns::ROBOT_MODEL)
    );
    out.push_str(&render_record(&preview.robot));
    if !preview.linked.is_empty() {
        out.push_str(&format!(
            "{} client deployment(s) will be set to Inactive:\n",
            preview.linked.len()
        ));
        for deployment in &preview.linked {
            out.push_str(&format!(
                "  Row {}  {} ({})\n",
                deployment.row_number(),
                deployment.get(columns::CLIENT_NAME),
                deployment.get(columns::DEPLOYMENT_STATUS)
            ));
        }
    }
    out
}

pub fn render_init(report: &InitReport) -> String {
    let mut messages = Vec::new();
    if report.created_dir {
        messages.push(CmdMessage::success(format!(
            "Created workbook directory {}",
            report.workbook_dir.display()
        )));
    }
    if report.created_identity {
        messages.push(CmdMessage::success("Wrote service identity"));
    }
    for sheet in &report.created_sheets {
        messages.push(CmdMessage::success(format!("Created worksheet '{}'", sheet)));
    }
    if messages.is_empty() {
        messages.push(CmdMessage::info(format!(
            "Workbook {} is already initialized",
            report.workbook_dir.display()
        )));
    }
    render_messages(&messages)
}
