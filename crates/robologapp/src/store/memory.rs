use super::mem_backend::MemBackend;
use super::sheet_store::SheetStore;
use super::RecordStore;
use crate::model::Sheet;

pub type InMemoryStore = SheetStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// An in-memory workbook holding the four sheets with their default headers.
    pub fn new() -> Self {
        let backend = MemBackend::new();
        for sheet in Sheet::ALL {
            let header: Vec<String> = sheet
                .default_headers()
                .iter()
                .map(|h| h.to_string())
                .collect();
            backend.seed(sheet.name(), vec![header]);
        }
        SheetStore::with_backend(backend)
    }

    /// A workbook with no sheets at all.
    pub fn blank() -> Self {
        SheetStore::with_backend(MemBackend::new())
    }

    /// Rows of a sheet, header included.
    pub fn rows(&self, sheet: Sheet) -> Vec<Vec<String>> {
        self.backend.rows(sheet.name())
    }

    /// Number of data rows in a sheet.
    pub fn count(&self, sheet: Sheet) -> usize {
        self.fetch_all(sheet.name()).map(|t| t.len()).unwrap_or(0)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{columns, DEPLOYMENT_KIND};
    use crate::record::Cells;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_robot_type(mut self, name: &str) -> Self {
            self.store
                .append(
                    Sheet::RobotModel.name(),
                    &Cells::new().with(columns::ROBOT_TYPE, name),
                )
                .unwrap();
            self
        }

        pub fn with_robot(mut self, serial: &str, mac: &str, model: &str, status: &str) -> Self {
            self.store
                .append(
                    Sheet::RobotLog.name(),
                    &Cells::new()
                        .with(columns::ROBOT_MODEL, model)
                        .with(columns::SERIAL_NUMBER, serial)
                        .with(columns::MAC_ADDRESS, mac)
                        .with(columns::CLOUD_PERIOD, "12")
                        .with(columns::CLOUD_DATE, "2025-01-01")
                        .with(columns::CLOUD_EXPIRY, "2025-12-27")
                        .with(columns::STATUS, status),
                )
                .unwrap();
            self
        }

        /// An active robot already linked to a client, with its matching deployment row.
        pub fn with_deployed_robot(self, serial: &str, mac: &str, model: &str, client: &str) -> Self {
            let mut fixture = self.with_robot(serial, mac, model, "Active");
            fixture
                .store
                .update_by_key(
                    Sheet::RobotLog.name(),
                    columns::SERIAL_NUMBER,
                    serial,
                    &Cells::new()
                        .with(columns::OUTLET, client)
                        .with(columns::MAINTENANCE_PLAN, "Purchased"),
                )
                .unwrap();
            fixture.with_deployment(client, serial, mac, model, "Active")
        }

        pub fn with_deployment(
            mut self,
            client: &str,
            serial: &str,
            mac: &str,
            model: &str,
            status: &str,
        ) -> Self {
            self.store
                .append(
                    Sheet::ClientLog.name(),
                    &Cells::new()
                        .with(columns::CLIENT_NAME, client)
                        .with(columns::LOCATION, "Kuala Lumpur")
                        .with(columns::DEPLOYMENT_DATE, "2025-01-15")
                        .with(columns::DEPLOYMENT_TYPE, DEPLOYMENT_KIND)
                        .with(columns::DEPLOYMENT_STATUS, status)
                        .with(columns::MAINTENANCE_PACKAGE, "Purchased")
                        .with(columns::CLOUD_STORE_GROUP, "G1")
                        .with(columns::ROBOT_DEPLOYED, model)
                        .with(columns::SERIAL_NUMBER, serial)
                        .with(columns::MAC_ADDRESS, mac),
                )
                .unwrap();
            self
        }

        pub fn with_issue(mut self, serial: &str, client: &str, status: &str) -> Self {
            self.store
                .append(
                    Sheet::MaintenanceLog.name(),
                    &Cells::new()
                        .with(columns::DATE_OF_ISSUE, "2025-02-01")
                        .with(columns::CLIENT_NAME, client)
                        .with(columns::SERIAL_NUMBER, serial)
                        .with(columns::PROBLEM, "Wheel stuck")
                        .with(columns::SOLUTION, "Cleaned wheel")
                        .with(columns::STATUS, status),
                )
                .unwrap();
            self
        }
    }
}
