//! The TOML job file.

use crate::{env::EnvManager, error::ConfigError};
use model::{
    core::identifiers::TableRef,
    execution::{
        connection::ConnectionConfig,
        job::{BatchErrorPolicy, InsertMode, TransferJob},
    },
};
use serde::{Deserialize, Deserializer};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_LOG_FILE: &str = "migrator.log";

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub source: ConnectionConfig,
    pub target: ConnectionConfig,
    pub job: JobSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    #[serde(default = "default_schema")]
    pub source_schema: String,
    pub source_table: String,
    #[serde(default = "default_schema")]
    pub target_schema: String,
    pub target_table: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub on_batch_error: BatchErrorPolicy,
    #[serde(default)]
    pub insert_mode: InsertMode,
    #[serde(default)]
    pub order_by: Vec<String>,
    #[serde(default)]
    pub verify_target_columns: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log file path. An empty string logs to stdout only.
    #[serde(default = "default_log_file", deserialize_with = "empty_as_none")]
    pub file: Option<PathBuf>,
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_level(),
        }
    }
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_LOG_FILE))
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = String::deserialize(deserializer)?;
    Ok((!path.trim().is_empty()).then(|| PathBuf::from(path)))
}

fn default_level() -> String {
    "info".to_string()
}

impl JobFile {
    pub fn read(path: &Path, env: &EnvManager) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, env)
    }

    /// Parses the document, then resolves placeholders inside string values
    /// only, so substituted text can never change the document's structure.
    pub fn parse(content: &str, env: &EnvManager) -> Result<Self, ConfigError> {
        let mut doc: toml::Value = toml::from_str(content)?;
        interpolate_strings(&mut doc, env)?;
        Ok(doc.try_into()?)
    }

    pub fn into_job(self) -> TransferJob {
        let JobFile {
            source,
            target,
            job,
            ..
        } = self;

        TransferJob::new(
            source,
            target,
            TableRef::new(job.source_schema, job.source_table),
            TableRef::new(job.target_schema, job.target_table),
            job.batch_size,
        )
        .with_policy(job.on_batch_error)
        .with_insert_mode(job.insert_mode)
        .with_order_by(job.order_by)
        .with_target_verification(job.verify_target_columns)
    }
}

fn interpolate_strings(value: &mut toml::Value, env: &EnvManager) -> Result<(), ConfigError> {
    match value {
        toml::Value::String(s) => *s = env.interpolate(s)?,
        toml::Value::Array(items) => {
            for item in items {
                interpolate_strings(item, env)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                interpolate_strings(item, env)?;
            }
        }
        _ => {}
    }
    Ok(())
}
