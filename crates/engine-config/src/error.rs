use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid env file {}: {message} at line {line}", path.display())]
    EnvFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("undefined variable `{0}` referenced in configuration")]
    UndefinedVariable(String),

    #[error("unterminated `${{` placeholder in `{0}`")]
    UnterminatedPlaceholder(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
