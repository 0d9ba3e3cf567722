//! Console configuration: page size, indentation, and row numbering mode.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use super::tree_view::RowNumbering;

pub const ENV_PAGE_SIZE: &str = "ORG_CONSOLE_PAGE_SIZE";
pub const ENV_INDENT_ROWS: &str = "ORG_CONSOLE_INDENT_ROWS";
pub const ENV_ROW_NUMBERING: &str = "ORG_CONSOLE_ROW_NUMBERING";

pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Display-side knobs the engine computes with: how many rows per page,
/// whether the tree table indents by depth, and which ordinal style rows
/// carry. All fields are optional in every source and fall back to the
/// compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub page_size: usize,
    pub indent_rows: bool,
    pub numbering: RowNumbering,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            indent_rows: true,
            numbering: RowNumbering::Sequential,
        }
    }
}

impl ConsoleConfig {
    /// `config.toml` in the working directory if present, else environment.
    pub fn from_default_sources() -> Result<Self, ConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::from_config_file(config_path);
        }
        Self::from_env()
    }

    /// TOML file values take precedence; missing keys fall back to the
    /// environment, then to defaults.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::ReadConfigFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let value: toml::Value =
            toml::from_str(&content).map_err(|err| ConfigError::ParseConfigFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let table = value
            .as_table()
            .ok_or_else(|| ConfigError::ParseConfigFile {
                path: path.display().to_string(),
                message: "root is not a TOML table".to_string(),
            })?;

        Self::from_env_with(|key| {
            table
                .get(key)
                .and_then(toml_value_to_string)
                .or_else(|| std::env::var(key).ok())
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with<F>(mut getter: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let page_size = match getter(ENV_PAGE_SIZE) {
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidPageSize { value })?,
            None => DEFAULT_PAGE_SIZE,
        };
        let indent_rows = match getter(ENV_INDENT_ROWS) {
            Some(value) => parse_flag(ENV_INDENT_ROWS, &value)?,
            None => true,
        };
        let numbering = match getter(ENV_ROW_NUMBERING) {
            Some(value) => RowNumbering::from_key(&value)
                .ok_or(ConfigError::InvalidRowNumbering { value })?,
            None => RowNumbering::Sequential,
        };

        Ok(Self {
            page_size,
            indent_rows,
            numbering,
        }
        .sanitized())
    }

    /// A zero page size would make every page empty; floor it at 1.
    pub fn sanitized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}

fn toml_value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(value) => Some(value.clone()),
        toml::Value::Integer(value) => Some(value.to_string()),
        toml::Value::Float(value) => Some(value.to_string()),
        toml::Value::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ReadConfigFile { path: String, message: String },
    ParseConfigFile { path: String, message: String },
    InvalidPageSize { value: String },
    InvalidFlag { key: &'static str, value: String },
    InvalidRowNumbering { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadConfigFile { path, message } => {
                write!(f, "read config file failed ({path}): {message}")
            }
            ConfigError::ParseConfigFile { path, message } => {
                write!(f, "parse config file failed ({path}): {message}")
            }
            ConfigError::InvalidPageSize { value } => {
                write!(f, "invalid page size value: {value}")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "invalid boolean value for {key}: {value}")
            }
            ConfigError::InvalidRowNumbering { value } => {
                write!(f, "invalid row numbering value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}
