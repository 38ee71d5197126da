//! # CLI Layer
//!
//! This module is **one possible UI client** for robolog; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, the confirmation prompt)
//! - Decides exit codes
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Exit Codes
//!
//! - `0`: success
//! - `1`: error, or a command whose writes all failed
//! - `2`: partial success (some saga steps applied, some failed)

use super::render::{render_delete_preview, render_init, render_json, render_result};
use super::setup::{
    ClientCommands, Cli, Commands, DeployArgs, MaintenanceCommands, OutputFormat, RobotCommands,
    TypesCommands,
};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use robologapp::api::{today, RobologApi, View};
use robologapp::commands::create::NewRobot;
use robologapp::commands::deploy::DeployRequest;
use robologapp::commands::deployments::DeploymentEdit;
use robologapp::commands::list::{ClientFilter, IssueFilter, RobotFilter};
use robologapp::commands::maintenance::NewIssue;
use robologapp::commands::update::RobotEdit;
use robologapp::commands::{CmdMessage, CmdResult, CmdStatus};
use robologapp::init::{initialize, initialize_workbook};
use robologapp::model::{columns, DATE_FORMAT};
use robologapp::nav::Page;
use robologapp::store::fs::FileStore;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Word the user must type to confirm a deletion.
pub const CONFIRM_WORD: &str = "DELETE";

type Api = RobologApi<FileStore>;

pub fn exit_code(status: CmdStatus) -> i32 {
    match status {
        CmdStatus::Success => 0,
        CmdStatus::PartialSuccess => 2,
        CmdStatus::Failure => 1,
    }
}

fn emit(result: &CmdResult, output: OutputFormat) -> Result<i32> {
    match output {
        OutputFormat::Text => print!("{}", render_result(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
    }
    Ok(exit_code(result.status))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", value))
}

/// Ask for the confirmation word on stderr and read one line from stdin.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{}\nType {} to confirm: ", prompt.trim_end(), CONFIRM_WORD);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim() == CONFIRM_WORD)
}

fn cancelled(output: OutputFormat) -> Result<i32> {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info("Deletion cancelled"));
    emit(&result, output)
}

fn export_or_list(
    api: &mut Api,
    view: View,
    export: Option<Option<PathBuf>>,
    output: OutputFormat,
) -> Result<i32> {
    let result = match export {
        Some(path) => api.export(&view, path.as_deref())?,
        None => api.list(&view)?,
    };
    emit(&result, output)
}

pub fn run() -> Result<i32> {
    let cli = <Cli as clap::Parser>::parse();
    super::logger::init(cli.verbose);
    let output = cli.output;

    let command = match cli.command {
        Some(Commands::Init { identity }) => {
            let report = initialize_workbook(cli.data, &identity)?;
            match output {
                OutputFormat::Text => print!("{}", render_init(&report)),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "workbook_dir": report.workbook_dir,
                        "created_dir": report.created_dir,
                        "created_identity": report.created_identity,
                        "created_sheets": report
                            .created_sheets
                            .iter()
                            .map(|s| s.name())
                            .collect::<Vec<_>>(),
                    })
                ),
            }
            return Ok(0);
        }
        other => other,
    };

    let mut ctx = initialize(cli.data)?;
    let api = &mut ctx.api;

    match command {
        None => emit(&api.page(Page::Home)?, output),
        Some(Commands::Init { .. }) => Ok(0),
        Some(Commands::Show { page }) => {
            let page = Page::from_param(page.as_deref());
            if output == OutputFormat::Text {
                println!("{}", console::style(page.name()).bold().underlined());
            }
            emit(&api.page(page)?, output)
        }
        Some(Commands::Refresh) => emit(&api.refresh(), output),
        Some(Commands::Types { action }) => match action {
            TypesCommands::List => emit(&api.robot_types()?, output),
            TypesCommands::Add { name } => emit(&api.add_robot_type(&name)?, output),
        },
        Some(Commands::Robot { action }) => run_robot(api, action, output),
        Some(Commands::Deploy(args)) => run_deploy(api, args, output),
        Some(Commands::Client { action }) => run_client(api, action, output),
        Some(Commands::Maintenance { action }) => run_maintenance(api, action, output),
    }
}

fn run_robot(api: &mut Api, action: RobotCommands, output: OutputFormat) -> Result<i32> {
    match action {
        RobotCommands::Add {
            model,
            serial,
            mac,
            period,
            activation_date,
            store_group,
        } => {
            let cloud_activation_date = match activation_date {
                Some(date) => parse_date(&date)?,
                None => today(),
            };
            let result = api.add_robot(NewRobot {
                model,
                serial,
                mac,
                cloud_period_months: period,
                cloud_activation_date,
                cloud_store_group: store_group,
            })?;
            emit(&result, output)
        }
        RobotCommands::List {
            status,
            model,
            search,
            export,
        } => {
            let view = View::Robots(RobotFilter {
                statuses: status,
                models: model,
                search: search.unwrap_or_default(),
            });
            export_or_list(api, view, export.export, output)
        }
        RobotCommands::Edit {
            serial,
            model,
            mac,
            store_group,
            status,
            outlet,
            plan,
        } => {
            let edit = RobotEdit {
                model,
                mac,
                cloud_store_group: store_group,
                status,
                outlet,
                maintenance_plan: plan,
            };
            if edit.is_empty() {
                bail!("Nothing to change. Pass at least one field option");
            }
            emit(&api.edit_robot(&serial, edit)?, output)
        }
        RobotCommands::Delete { serial, yes } => {
            if !yes {
                let preview = api.preview_delete_robot(&serial)?;
                if !confirm(&render_delete_preview(&preview))? {
                    return cancelled(output);
                }
            }
            emit(&api.delete_robot(&serial, true)?, output)
        }
    }
}

fn run_deploy(api: &mut Api, args: DeployArgs, output: OutputFormat) -> Result<i32> {
    let result = api.deploy(DeployRequest {
        client_name: args.client,
        location: args.location,
        cloud_store_group: args.store_group,
        package: args.package,
        serials: args.serials,
        date: today(),
    })?;
    emit(&result, output)
}

fn run_client(api: &mut Api, action: ClientCommands, output: OutputFormat) -> Result<i32> {
    match action {
        ClientCommands::List {
            status,
            search,
            export,
        } => {
            let view = View::Clients(ClientFilter {
                statuses: status,
                search: search.unwrap_or_default(),
            });
            export_or_list(api, view, export.export, output)
        }
        ClientCommands::Retrieve { row } => emit(&api.retrieve(row)?, output),
        ClientCommands::Edit {
            row,
            client,
            location,
            status,
            package,
            deployment_type,
            store_group,
        } => {
            let changes = DeploymentEdit {
                client_name: client,
                location,
                status,
                package,
                deployment_type,
                cloud_store_group: store_group,
            };
            if changes.is_empty() {
                bail!("Nothing to change. Pass at least one field option");
            }
            emit(&api.edit_deployment(row, changes)?, output)
        }
        ClientCommands::Delete { row, yes } => {
            if !yes {
                let deployment = api.deployment(row)?;
                let prompt = format!(
                    "{} Row {}: {} - {}",
                    console::style("Delete deployment").red().bold(),
                    row,
                    deployment.get(columns::CLIENT_NAME),
                    deployment.get(columns::SERIAL_NUMBER)
                );
                if !confirm(&prompt)? {
                    return cancelled(output);
                }
            }
            emit(&api.delete_deployment(row, true)?, output)
        }
    }
}

fn run_maintenance(api: &mut Api, action: MaintenanceCommands, output: OutputFormat) -> Result<i32> {
    match action {
        MaintenanceCommands::Add {
            serial,
            problem,
            solution,
            remarks,
        } => {
            let result = api.add_maintenance(NewIssue {
                serial,
                problem,
                solution,
                remarks,
                date: today(),
            })?;
            emit(&result, output)
        }
        MaintenanceCommands::List {
            status,
            search,
            export,
        } => {
            let view = View::Issues(IssueFilter {
                statuses: status,
                search: search.unwrap_or_default(),
            });
            export_or_list(api, view, export.export, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_status() {
        assert_eq!(exit_code(CmdStatus::Success), 0);
        assert_eq!(exit_code(CmdStatus::PartialSuccess), 2);
        assert_eq!(exit_code(CmdStatus::Failure), 1);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2025").is_err());
    }
}
