use thiserror::Error;

/// Errors raised by structural and cell operations on a [`Grid`](crate::grid::Grid).
///
/// Every variant means the operation was rejected and the grid is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid already holds the maximum number of rows
    #[error("Row limit of {max_rows} reached")]
    CapacityExceeded { max_rows: usize },

    /// The grid already holds the maximum number of columns
    #[error("Column limit of {max_columns} reached")]
    ColumnLimitExceeded { max_columns: usize },

    /// Deleting would leave fewer columns than the floor
    #[error("A table needs at least {min_columns} columns")]
    MinColumnsViolation { min_columns: usize },

    /// Another column already carries this title
    #[error("Column name already exists: {0}")]
    DuplicateColumnName(String),

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (rows: {1})")]
    RowOutOfBounds(usize, usize),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (columns: {1})")]
    ColumnOutOfBounds(usize, usize),
}

/// Errors from calls to the remote dimension endpoints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP {0}: {1}")]
    Http(u16, String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Http(status.as_u16(), err.to_string())
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

/// Errors while rendering the table as delimited text.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Exported text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors while loading [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}
