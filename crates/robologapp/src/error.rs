use thiserror::Error;

#[derive(Error, Debug)]
pub enum RobologError {
    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),

    #[error("Column '{column}' not found in worksheet '{sheet}'")]
    ColumnNotFound { sheet: String, column: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("{0}")]
    Validation(String),

    #[error("Serial Number '{0}' already exists")]
    DuplicateSerial(String),

    #[error("MAC Address '{0}' already exists")]
    DuplicateMac(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Robot {0} not found")]
    RobotNotFound(String),

    #[error("Row {row} not found in '{sheet}'")]
    RowNotFound { sheet: String, row: usize },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

impl RobologError {
    /// Transient backend throttling. These are the only errors the read cache retries.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RobologError::RateLimited(_))
    }

    /// Errors caused by a selection that no longer matches the workbook.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RobologError::RobotNotFound(_) | RobologError::RowNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RobologError>;
