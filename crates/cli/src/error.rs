use crate::exit::ExitCode;
use engine_config::error::ConfigError;
use engine_runtime::error::{TransferAborted, TransferError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Transfer(#[from] TransferAborted),

    #[error("{0}")]
    Inspector(#[from] TransferError),

    #[error("Failed to set up logging: {0}")]
    Logging(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) => ExitCode::InvalidConfig,
            CliError::Transfer(aborted) => ExitCode::from_state(aborted.report.state),
            _ => ExitCode::Failure,
        }
    }
}
