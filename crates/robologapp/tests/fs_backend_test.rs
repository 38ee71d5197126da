use robologapp::error::RobologError;
use robologapp::store::backend::SheetBackend;
use robologapp::store::fs_backend::FsBackend;
use std::fs;
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_sheet_lifecycle() {
    let (_dir, backend) = setup();
    assert!(backend.worksheet_names().unwrap().is_empty());

    backend
        .add_worksheet("Robot Log", &strings(&["Serial Number", "Status"]))
        .unwrap();
    assert_eq!(backend.worksheet_names().unwrap(), vec!["Robot Log"]);
    assert!(backend.has_worksheet("Robot Log").unwrap());

    backend
        .append_row("Robot Log", &strings(&["SN1", "Idle"]))
        .unwrap();
    backend
        .append_row("Robot Log", &strings(&["SN2", "Active"]))
        .unwrap();
    assert_eq!(backend.row_values("Robot Log", 3).unwrap(), strings(&["SN2", "Active"]));
    assert!(backend.row_values("Robot Log", 9).unwrap().is_empty());

    backend.update_cell("Robot Log", 2, 2, "Retired").unwrap();
    backend.delete_row("Robot Log", 3).unwrap();
    assert_eq!(
        backend.all_values("Robot Log").unwrap(),
        vec![strings(&["Serial Number", "Status"]), strings(&["SN1", "Retired"])]
    );
}

#[test]
fn test_fs_backend_missing_sheet() {
    let (_dir, backend) = setup();
    let err = backend.all_values("Client Log").unwrap_err();
    assert!(matches!(err, RobologError::WorksheetNotFound(name) if name == "Client Log"));
}

#[test]
fn test_fs_backend_duplicate_sheet_rejected() {
    let (_dir, backend) = setup();
    backend.add_worksheet("Robot Model", &strings(&["Robot Type"])).unwrap();
    assert!(backend
        .add_worksheet("Robot Model", &strings(&["Robot Type"]))
        .is_err());
}

#[test]
fn test_fs_backend_quoting_survives() {
    let (dir, backend) = setup();
    backend
        .add_worksheet("Client Log", &strings(&["Client Name", "Location"]))
        .unwrap();
    backend
        .append_row("Client Log", &strings(&["Acme, Inc.", "Line 1\nLine 2"]))
        .unwrap();

    let rows = backend.all_values("Client Log").unwrap();
    assert_eq!(rows[1], strings(&["Acme, Inc.", "Line 1\nLine 2"]));
    assert!(dir.path().join("Client Log.csv").is_file());
}

#[test]
fn test_fs_backend_no_tmp_artifacts() {
    let (dir, backend) = setup();
    backend.add_worksheet("Robot Log", &strings(&["Serial Number"])).unwrap();
    backend.append_row("Robot Log", &strings(&["SN1"])).unwrap();

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_ignores_foreign_files() {
    let (dir, backend) = setup();
    fs::write(dir.path().join("credentials.json"), "svc\n").unwrap();
    fs::write(dir.path().join("robolog.toml"), "").unwrap();
    backend.add_worksheet("Robot Log", &strings(&["Serial Number"])).unwrap();
    assert_eq!(backend.worksheet_names().unwrap(), vec!["Robot Log"]);
}
