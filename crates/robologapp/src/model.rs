//! # Domain Model: Sheets, Columns and Status Vocabularies
//!
//! The workbook holds four sheets. Their schema is data, not code: the header row
//! of each sheet defines column order, and every cell is a string. This module
//! only pins down the *names* that the consistency rules depend on.
//!
//! ## Sheets
//!
//! | Sheet | Purpose | Natural key |
//! |-------|---------|-------------|
//! | `Robot Log` | one row per robot unit | `Serial Number` |
//! | `Client Log` | one row per (client, robot) deployment event | none (row index) |
//! | `Maintenance and troubleshooting log` | one row per reported issue | none |
//! | `Robot Model` | allowed model names | `Robot Type` |
//!
//! Header names are part of the contract, including the historical misspellings
//! `Deplyoment Type` and `Maintance Package` in the client log.
//!
//! ## Normalization
//!
//! All key comparisons go through [`normalize`]: surrounding whitespace trimmed,
//! case folded to lowercase. Serial numbers and MAC addresses are compared this way,
//! and so are status values read back from the sheets, since humans edit them.

use std::fmt;

/// Trim and lowercase a cell value for key matching.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Case/whitespace-insensitive equality.
pub fn same_key(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    RobotLog,
    ClientLog,
    MaintenanceLog,
    RobotModel,
}

impl Sheet {
    pub const ALL: [Sheet; 4] = [
        Sheet::RobotLog,
        Sheet::ClientLog,
        Sheet::MaintenanceLog,
        Sheet::RobotModel,
    ];

    /// Worksheet title in the workbook.
    pub fn name(&self) -> &'static str {
        match self {
            Sheet::RobotLog => "Robot Log",
            Sheet::ClientLog => "Client Log",
            Sheet::MaintenanceLog => "Maintenance and troubleshooting log",
            Sheet::RobotModel => "Robot Model",
        }
    }

    /// Header row written when a sheet is created by `init`.
    pub fn default_headers(&self) -> &'static [&'static str] {
        use columns::*;
        match self {
            Sheet::RobotLog => &[
                ROBOT_MODEL,
                SERIAL_NUMBER,
                MAC_ADDRESS,
                CLOUD_PERIOD,
                CLOUD_DATE,
                CLOUD_EXPIRY,
                CLOUD_STORE_GROUP,
                MAINTENANCE_PLAN,
                OUTLET,
                STATUS,
            ],
            Sheet::ClientLog => &[
                CLIENT_NAME,
                LOCATION,
                DEPLOYMENT_DATE,
                DEPLOYMENT_TYPE,
                DEPLOYMENT_STATUS,
                MAINTENANCE_PACKAGE,
                CLOUD_STORE_GROUP,
                ROBOT_DEPLOYED,
                SERIAL_NUMBER,
                MAC_ADDRESS,
            ],
            Sheet::MaintenanceLog => &[
                DATE_OF_ISSUE,
                CLIENT_NAME,
                ROBOT_LOCATION,
                ROBOT_MODEL,
                SERIAL_NUMBER,
                MAC_ADDRESS,
                PROBLEM,
                SOLUTION,
                REMARKS,
                STATUS,
            ],
            Sheet::RobotModel => &[ROBOT_TYPE],
        }
    }

    /// Prefix used for export file names (`robot_log_20250101.csv`).
    pub fn export_prefix(&self) -> &'static str {
        match self {
            Sheet::RobotLog => "robot_log",
            Sheet::ClientLog => "client_log",
            Sheet::MaintenanceLog => "maintenance_log",
            Sheet::RobotModel => "robot_model",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header labels used by the consistency rules.
pub mod columns {
    pub const SERIAL_NUMBER: &str = "Serial Number";
    pub const MAC_ADDRESS: &str = "MAC Address";
    pub const ROBOT_MODEL: &str = "Robot Model";
    pub const STATUS: &str = "Status";

    pub const CLOUD_PERIOD: &str = "Cloud Activation Period (Months)";
    pub const CLOUD_DATE: &str = "Cloud Activation Date";
    pub const CLOUD_EXPIRY: &str = "Cloud Expiry";
    pub const CLOUD_STORE_GROUP: &str = "Cloud Store Group";
    pub const MAINTENANCE_PLAN: &str = "Maintenance Plan";
    pub const OUTLET: &str = "Outlet using";

    pub const CLIENT_NAME: &str = "Client Name";
    pub const LOCATION: &str = "Location";
    pub const DEPLOYMENT_DATE: &str = "Date of deployment";
    pub const DEPLOYMENT_TYPE: &str = "Deplyoment Type";
    pub const DEPLOYMENT_STATUS: &str = "Deployment Status";
    pub const MAINTENANCE_PACKAGE: &str = "Maintance Package";
    pub const ROBOT_DEPLOYED: &str = "Robot Deployed";

    pub const DATE_OF_ISSUE: &str = "Date of Issue";
    pub const ROBOT_LOCATION: &str = "Location of Robot";
    pub const PROBLEM: &str = "Problem details";
    pub const SOLUTION: &str = "Solution";
    pub const REMARKS: &str = "Remarks";

    pub const ROBOT_TYPE: &str = "Robot Type";
}

/// Value written to `Deplyoment Type` by the deploy action.
pub const DEPLOYMENT_KIND: &str = "Deployment";

/// Date format for every date cell.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A closed set of values stored as text in a status-like column.
///
/// Parsing is normalized, so `" active "` reads back as `Active`.
pub trait Vocabulary: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        Self::ALL
            .iter()
            .copied()
            .find(|v| normalize(v.as_str()) == wanted)
    }

    /// Comma separated list of the accepted spellings, for error messages.
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RobotStatus {
    Idle,
    Active,
    Maintenance,
    Retired,
}

impl Vocabulary for RobotStatus {
    const ALL: &'static [Self] = &[
        RobotStatus::Idle,
        RobotStatus::Active,
        RobotStatus::Maintenance,
        RobotStatus::Retired,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Idle => "Idle",
            RobotStatus::Active => "Active",
            RobotStatus::Maintenance => "Maintenance",
            RobotStatus::Retired => "Retired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentStatus {
    Active,
    Inactive,
    Completed,
    Cancelled,
}

impl Vocabulary for DeploymentStatus {
    const ALL: &'static [Self] = &[
        DeploymentStatus::Active,
        DeploymentStatus::Inactive,
        DeploymentStatus::Completed,
        DeploymentStatus::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Active => "Active",
            DeploymentStatus::Inactive => "Inactive",
            DeploymentStatus::Completed => "Completed",
            DeploymentStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenancePackage {
    Purchased,
    Leasing,
}

impl Vocabulary for MaintenancePackage {
    const ALL: &'static [Self] = &[MaintenancePackage::Purchased, MaintenancePackage::Leasing];

    fn as_str(&self) -> &'static str {
        match self {
            MaintenancePackage::Purchased => "Purchased",
            MaintenancePackage::Leasing => "Leasing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueStatus {
    Open,
    Closed,
}

impl Vocabulary for IssueStatus {
    const ALL: &'static [Self] = &[IssueStatus::Open, IssueStatus::Closed];

    fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MaintenancePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  SN001 "), "sn001");
        assert_eq!(normalize("00:1B:44:11:3A:B7"), "00:1b:44:11:3a:b7");
        assert_eq!(normalize(""), "");
        assert!(same_key("Sn001", " sn001"));
    }

    #[test]
    fn vocabulary_parse_is_normalized() {
        assert_eq!(RobotStatus::parse(" active "), Some(RobotStatus::Active));
        assert_eq!(RobotStatus::parse("RETIRED"), Some(RobotStatus::Retired));
        assert_eq!(RobotStatus::parse("deployed"), None);
        assert_eq!(
            DeploymentStatus::parse("inactive"),
            Some(DeploymentStatus::Inactive)
        );
        assert_eq!(
            MaintenancePackage::parse("leasing"),
            Some(MaintenancePackage::Leasing)
        );
        assert_eq!(IssueStatus::parse("Closed"), Some(IssueStatus::Closed));
    }

    #[test]
    fn expected_lists_every_spelling() {
        assert_eq!(RobotStatus::expected(), "Idle, Active, Maintenance, Retired");
        assert_eq!(MaintenancePackage::expected(), "Purchased, Leasing");
    }

    #[test]
    fn client_log_keeps_historical_header_spelling() {
        let headers = Sheet::ClientLog.default_headers();
        assert!(headers.contains(&"Deplyoment Type"));
        assert!(headers.contains(&"Maintance Package"));
        assert_eq!(headers.len(), 10);
    }

    #[test]
    fn every_data_sheet_carries_a_serial_column() {
        for sheet in [Sheet::RobotLog, Sheet::ClientLog, Sheet::MaintenanceLog] {
            assert!(sheet.default_headers().contains(&columns::SERIAL_NUMBER));
        }
        assert!(!Sheet::RobotModel
            .default_headers()
            .contains(&columns::SERIAL_NUMBER));
    }
}
