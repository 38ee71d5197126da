//! # Startup
//!
//! Everything the application needs before the first command runs: where the
//! workbook lives, which configuration applies, and whether the service identity
//! authenticates. Failure at any of these steps is fatal and surfaces as an error
//! from [`initialize`].
//!
//! ## Workbook Resolution
//!
//! 1. `data_override` (the CLI `--data` flag), used as is.
//! 2. `ROBOLOG_DATA` environment variable.
//! 3. The OS data directory (via the `directories` crate).
//!
//! ## Configuration
//!
//! `robolog.toml` is looked up in the global config directory and in the workbook
//! directory, merged so the workbook's file wins. See [`crate::config`].
//!
//! ## Authentication
//!
//! The service identity file (`credentials_file`, relative to the workbook) must
//! exist and name an identity on its first non-blank line. [`initialize_workbook`]
//! writes one for a fresh installation.

use crate::api::RobologApi;
use crate::config::RobologConfig;
use crate::error::{RobologError, Result};
use crate::model::Sheet;
use crate::store::fs::FileStore;
use crate::workbook::Workbook;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "ROBOLOG_DATA";

/// Identity written by `robolog init` when none is given.
pub const DEFAULT_IDENTITY: &str = "robolog-service";

pub struct RobologContext {
    pub api: RobologApi<FileStore>,
    pub config: RobologConfig,
    pub workbook_dir: PathBuf,
    /// Authenticated service identity.
    pub identity: String,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "robolog", "robolog")
        .ok_or_else(|| RobologError::Config("Could not determine the home directory".to_string()))
}

/// Resolve the workbook directory: explicit override, then `ROBOLOG_DATA`, then
/// the OS data directory.
pub fn resolve_workbook_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Layered configuration for a workbook. Unreadable files fall back to defaults.
pub fn load_config(workbook_dir: &Path) -> RobologConfig {
    let mut search_paths = Vec::new();
    if let Ok(dirs) = project_dirs() {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(workbook_dir.to_path_buf()));

    Clapfig::builder()
        .app_name("robolog")
        .file_name("robolog.toml")
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Read the service identity. The first non-blank line names it.
pub fn authenticate(workbook_dir: &Path, config: &RobologConfig) -> Result<String> {
    let path = config.credentials_path(workbook_dir);
    let content = fs::read_to_string(&path).map_err(|e| {
        RobologError::Auth(format!(
            "cannot read service identity {}: {}. Run `robolog init` first",
            path.display(),
            e
        ))
    })?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            RobologError::Auth(format!("service identity {} is empty", path.display()))
        })
}

/// Resolve, configure and authenticate. Nothing is created on disk here.
pub fn initialize(data_override: Option<PathBuf>) -> Result<RobologContext> {
    let workbook_dir = resolve_workbook_dir(data_override)?;
    if !workbook_dir.is_dir() {
        return Err(RobologError::Auth(format!(
            "workbook {} does not exist. Run `robolog init` first",
            workbook_dir.display()
        )));
    }

    let config = load_config(&workbook_dir);
    let identity = authenticate(&workbook_dir, &config)?;
    debug!(
        "authenticated as '{}' against {}",
        identity,
        workbook_dir.display()
    );

    let store = FileStore::new(workbook_dir.clone());
    let missing = store.missing_sheets()?;
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|s| s.name()).collect();
        warn!(
            "worksheets missing from {}: {}. Run `robolog init` to create them",
            workbook_dir.display(),
            names.join(", ")
        );
    }
    let workbook = Workbook::new(store, config.read_cache());

    Ok(RobologContext {
        api: RobologApi::new(workbook),
        config,
        workbook_dir,
        identity,
    })
}

/// What [`initialize_workbook`] had to create.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub workbook_dir: PathBuf,
    pub created_dir: bool,
    pub created_identity: bool,
    pub created_sheets: Vec<Sheet>,
}

/// Prepare a workbook for first use: the directory, the service identity and
/// any missing worksheet with its default header. Existing data is left alone.
pub fn initialize_workbook(data_override: Option<PathBuf>, identity: &str) -> Result<InitReport> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(RobologError::Validation("Identity is required".to_string()));
    }

    let workbook_dir = resolve_workbook_dir(data_override)?;
    let mut report = InitReport {
        workbook_dir: workbook_dir.clone(),
        ..Default::default()
    };

    if !workbook_dir.exists() {
        fs::create_dir_all(&workbook_dir)?;
        report.created_dir = true;
    }

    let config = load_config(&workbook_dir);
    let credentials = config.credentials_path(&workbook_dir);
    if !credentials.exists() {
        if let Some(parent) = credentials.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&credentials, format!("{}\n", identity))?;
        report.created_identity = true;
    }

    let mut workbook = Workbook::new(FileStore::new(workbook_dir.clone()), config.read_cache());
    report.created_sheets = workbook.ensure_sheets()?;

    info!(
        "initialized workbook {} ({} sheet(s) created)",
        workbook_dir.display(),
        report.created_sheets.len()
    );
    Ok(report)
}
