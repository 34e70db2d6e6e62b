//! Options and schema file handling.
//!
//! Compile options may be kept in a `.erdsql.json` file next to the schema
//! snapshots; any field left out takes its default:
//!
//! ```json
//! { "dialect": "mysql", "includeDropStatements": true }
//! ```

use crate::compile::CompileOptions;
use crate::model::Schema;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OPTIONS_FILE: &str = ".erdsql.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_schema(path: &Path) -> Result<Schema, ConfigError> {
    read_json(path)
}

pub fn load_options(path: &Path) -> Result<CompileOptions, ConfigError> {
    read_json(path)
}

/// Options from `dir/.erdsql.json`, or the defaults when there is no such file.
pub fn discover_options(dir: &Path) -> Result<CompileOptions, ConfigError> {
    let path = dir.join(DEFAULT_OPTIONS_FILE);
    if path.is_file() {
        load_options(&path)
    } else {
        Ok(CompileOptions::default())
    }
}
