use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::api::Endpoints;
use crate::error::ConfigError;
use crate::grid::{DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS};

/// Placeholder replaced with the configured row limit in [`Messages::row_limit`]
pub const MAX_ROWS_PLACEHOLDER: &str = "{max_rows}";
/// Placeholder replaced with the configured column cap in [`Messages::column_limit`]
pub const MAX_COLUMNS_PLACEHOLDER: &str = "{max_columns}";
/// Placeholder replaced with the column floor in [`Messages::min_columns`]
pub const MIN_COLUMNS_PLACEHOLDER: &str = "{min_columns}";
/// Placeholder replaced with the rejected title in [`Messages::duplicate_column`]
pub const NAME_PLACEHOLDER: &str = "{name}";

/// User-facing message templates shown by the table editor.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    pub row_limit: String,
    pub column_limit: String,
    pub min_columns: String,
    pub duplicate_column: String,
    pub empty_column: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            row_limit: "You can add a maximum of {max_rows} rows".to_string(),
            column_limit: "You can add a maximum of {max_columns} columns".to_string(),
            min_columns: "A table must have at least {min_columns} columns".to_string(),
            duplicate_column: "Column name \"{name}\" already exists".to_string(),
            empty_column: "Column name is required".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL prepended to every endpoint path
    pub api_base_url: String,
    /// Bearer token sent with every request, if set
    pub auth_token: Option<String>,
    /// Entity name used in list responses (`<entity>_table_info`)
    pub entity: String,
    /// Page size for the dimension list
    pub page_limit: usize,
    /// Row cap of the table editor
    pub max_rows: usize,
    /// Column cap of the table editor
    pub max_columns: usize,
    pub request_timeout_secs: u64,
    /// Address the web server binds to
    pub bind_addr: String,
    pub endpoints: Endpoints,
    pub messages: Messages,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            auth_token: None,
            entity: "dimension".to_string(),
            page_limit: 20,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
            request_timeout_secs: 30,
            bind_addr: "127.0.0.1:3000".to_string(),
            endpoints: Endpoints::default(),
            messages: Messages::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults for missing keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Defaults, then the optional file, then `DIMGRID_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_overrides(std::env::vars())?;
        Ok(config)
    }

    /// Apply `DIMGRID_*` overrides from an iterator of key/value pairs.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "DIMGRID_API_BASE_URL" => self.api_base_url = value,
                "DIMGRID_AUTH_TOKEN" => self.auth_token = Some(value),
                "DIMGRID_ENTITY" => self.entity = value,
                "DIMGRID_BIND_ADDR" => self.bind_addr = value,
                "DIMGRID_PAGE_LIMIT" => self.page_limit = parse_env(&key, &value)?,
                "DIMGRID_MAX_ROWS" => self.max_rows = parse_env(&key, &value)?,
                "DIMGRID_MAX_COLUMNS" => self.max_columns = parse_env(&key, &value)?,
                "DIMGRID_REQUEST_TIMEOUT_SECS" => {
                    self.request_timeout_secs = parse_env(&key, &value)?
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Substitute `placeholder` in a message template.
pub fn render_template(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, value)
}
