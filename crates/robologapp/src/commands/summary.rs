use crate::commands::robot_types;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{columns, normalize, RobotStatus, Sheet, Vocabulary};
use crate::store::RecordStore;
use crate::workbook::Workbook;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Label used for robots whose model cell is empty.
pub const UNKNOWN_MODEL: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub total: usize,
    pub deployed: usize,
    pub idle: usize,
    pub maintenance: usize,
    pub retired: usize,
}

/// Home page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total_robots: usize,
    pub active_robots: usize,
    /// Distinct non-empty client names across the Client Log, compared normalized.
    pub unique_clients: usize,
    /// Per-model counts, ordered by model name.
    pub models: BTreeMap<String, ModelStats>,
    pub robot_types: Vec<String>,
}

pub fn run<S: RecordStore>(wb: &mut Workbook<S>) -> Result<CmdResult> {
    let robots = wb.fetch(Sheet::RobotLog)?;
    let clients = wb.fetch(Sheet::ClientLog)?;

    let mut summary = FleetSummary {
        total_robots: robots.len(),
        robot_types: robot_types::names(wb)?,
        ..Default::default()
    };

    let unique: HashSet<String> = clients
        .iter()
        .map(|c| normalize(c.get(columns::CLIENT_NAME)))
        .filter(|name| !name.is_empty())
        .collect();
    summary.unique_clients = unique.len();

    for robot in &robots {
        let model = robot.get(columns::ROBOT_MODEL).trim();
        let model = if model.is_empty() { UNKNOWN_MODEL } else { model };
        let stats = summary.models.entry(model.to_string()).or_default();
        stats.total += 1;
        match RobotStatus::parse(robot.get(columns::STATUS)) {
            Some(RobotStatus::Active) => {
                stats.deployed += 1;
                summary.active_robots += 1;
            }
            Some(RobotStatus::Idle) => stats.idle += 1,
            Some(RobotStatus::Maintenance) => stats.maintenance += 1,
            Some(RobotStatus::Retired) => stats.retired += 1,
            None => {}
        }
    }

    Ok(CmdResult {
        summary: Some(summary),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadCache;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn counts_robots_clients_and_models() {
        let fixture = StoreFixture::new()
            .with_robot_type("Bella")
            .with_robot_type("KettyBot")
            .with_deployed_robot("SN1", "AA:01", "KettyBot", "Acme")
            .with_deployed_robot("SN2", "AA:02", "Bella", " acme ")
            .with_robot("SN3", "AA:03", "Bella", "Idle")
            .with_robot("SN4", "AA:04", "Bella", "retired")
            .with_robot("SN5", "AA:05", "", "Maintenance")
            .with_robot("SN6", "AA:06", "Bella", "Lost")
            .with_deployment("Beta", "SN3", "AA:03", "Bella", "Inactive")
            .with_deployment("  ", "SN4", "AA:04", "Bella", "Inactive");
        let mut wb = Workbook::new(fixture.store, ReadCache::default());

        let summary = run(&mut wb).unwrap().summary.unwrap();
        assert_eq!(summary.total_robots, 6);
        assert_eq!(summary.active_robots, 2);
        assert_eq!(summary.unique_clients, 2);
        assert_eq!(summary.robot_types, vec!["Bella", "KettyBot"]);

        let names: Vec<&String> = summary.models.keys().collect();
        assert_eq!(names, vec!["Bella", "KettyBot", "Unknown"]);
        assert_eq!(
            summary.models["Bella"],
            ModelStats {
                total: 4,
                deployed: 1,
                idle: 1,
                maintenance: 0,
                retired: 1,
            }
        );
        assert_eq!(summary.models["Unknown"].maintenance, 1);
    }

    #[test]
    fn empty_workbook_summarizes_to_zero() {
        let mut wb = Workbook::new(StoreFixture::new().store, ReadCache::default());
        let summary = run(&mut wb).unwrap().summary.unwrap();
        assert_eq!(summary, FleetSummary::default());
    }
}
