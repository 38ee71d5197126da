use serde::Serialize;
use std::fmt;

/// The seven views an external caller can preselect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Page {
    #[default]
    Home,
    AddRobot,
    DeployRobot,
    AddMaintenance,
    ViewRobotLog,
    ViewClientLog,
    ViewMaintenanceLog,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::AddRobot,
        Page::DeployRobot,
        Page::AddMaintenance,
        Page::ViewRobotLog,
        Page::ViewClientLog,
        Page::ViewMaintenanceLog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::AddRobot => "Add Robot",
            Page::DeployRobot => "Deploy Robot",
            Page::AddMaintenance => "Add Maintenance",
            Page::ViewRobotLog => "View Robot Log",
            Page::ViewClientLog => "View Client Log",
            Page::ViewMaintenanceLog => "View Maintenance Log",
        }
    }

    /// Resolve the navigation parameter. Absent or unrecognized values land on Home.
    pub fn from_param(param: Option<&str>) -> Page {
        param
            .and_then(|p| {
                let wanted = crate::model::normalize(p);
                Page::ALL
                    .into_iter()
                    .find(|page| crate::model::normalize(page.name()) == wanted)
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
