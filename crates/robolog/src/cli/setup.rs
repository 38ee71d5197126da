use clap::{Args, Parser, Subcommand, ValueEnum};
use robologapp::init::DEFAULT_IDENTITY;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "robolog",
    bin_name = "robolog",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Track robot deployments, retrievals and maintenance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workbook directory (defaults to $ROBOLOG_DATA, then the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the workbook, its worksheets and the service identity
    #[command(display_order = 1)]
    Init {
        /// Service identity to record
        #[arg(long, default_value = DEFAULT_IDENTITY)]
        identity: String,
    },

    /// Show a page: Home, Add Robot, Deploy Robot, Add Maintenance, View ... Log
    #[command(display_order = 2)]
    Show {
        #[arg(long)]
        page: Option<String>,
    },

    /// Drop cached sheets so the next read hits the workbook
    #[command(display_order = 3)]
    Refresh,

    /// Allowed robot models
    #[command(display_order = 10)]
    Types {
        #[command(subcommand)]
        action: TypesCommands,
    },

    /// Robot Log
    #[command(display_order = 11)]
    Robot {
        #[command(subcommand)]
        action: RobotCommands,
    },

    /// Deploy idle robots to a client
    #[command(display_order = 12)]
    Deploy(DeployArgs),

    /// Client Log (deployments)
    #[command(display_order = 13)]
    Client {
        #[command(subcommand)]
        action: ClientCommands,
    },

    /// Maintenance and troubleshooting log
    #[command(display_order = 14)]
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum TypesCommands {
    /// List robot types
    List,
    /// Add a robot type
    Add { name: String },
}

/// `--export` with no value writes the dated default file name.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArg {
    /// Export the listed rows as CSV
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,
}

#[derive(Subcommand, Debug)]
pub enum RobotCommands {
    /// Add a robot (status Idle)
    Add {
        #[arg(long)]
        model: String,
        #[arg(long)]
        serial: String,
        #[arg(long)]
        mac: String,
        /// Cloud activation period in months
        #[arg(long, default_value_t = 12)]
        period: u32,
        /// Cloud activation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        activation_date: Option<String>,
        #[arg(long, default_value = "")]
        store_group: String,
    },

    /// List robots
    #[command(alias = "ls")]
    List {
        /// Only these statuses (repeatable)
        #[arg(long)]
        status: Vec<String>,
        /// Only these models (repeatable)
        #[arg(long)]
        model: Vec<String>,
        /// Serial number contains
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        export: ExportArg,
    },

    /// Edit a robot
    Edit {
        serial: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        mac: Option<String>,
        #[arg(long)]
        store_group: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        outlet: Option<String>,
        #[arg(long)]
        plan: Option<String>,
    },

    /// Delete a robot and deactivate its deployments
    Delete {
        serial: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub store_group: String,
    /// Maintenance package: Purchased or Leasing
    #[arg(long)]
    pub package: String,
    /// Serial numbers of idle robots
    #[arg(required = true, num_args = 1..)]
    pub serials: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// List deployments
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        status: Vec<String>,
        /// Client name contains
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        export: ExportArg,
    },

    /// Retrieve the robot deployed on a row
    Retrieve { row: usize },

    /// Edit a deployment row
    Edit {
        row: usize,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        package: Option<String>,
        #[arg(long = "type")]
        deployment_type: Option<String>,
        #[arg(long)]
        store_group: Option<String>,
    },

    /// Delete a deployment row
    Delete {
        row: usize,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MaintenanceCommands {
    /// Log an issue against an active robot
    Add {
        serial: String,
        #[arg(long)]
        problem: String,
        #[arg(long)]
        solution: String,
        #[arg(long, default_value = "")]
        remarks: String,
    },

    /// List issues
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        status: Vec<String>,
        /// Serial number or client name contains
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        export: ExportArg,
    },
}
