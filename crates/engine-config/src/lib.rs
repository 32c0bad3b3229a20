pub mod env;
pub mod error;
pub mod file;
pub mod validation;

use crate::{
    env::EnvManager,
    error::ConfigError,
    file::{JobFile, LoggingConfig},
};
use model::execution::job::TransferJob;
use std::path::Path;
use tracing::debug;

/// A validated job plus the logging settings that came with it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub job: TransferJob,
    pub logging: LoggingConfig,
}

/// Values given on the command line that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub batch_size: Option<usize>,
}

/// Reads `path`, resolves `${VAR}` placeholders against the process
/// environment overlaid with `env_file`, applies `overrides` and validates
/// the result.
pub fn load(
    path: &Path,
    env_file: Option<&Path>,
    overrides: &Overrides,
) -> Result<LoadedConfig, ConfigError> {
    let mut env = EnvManager::new();
    if let Some(env_file) = env_file {
        env.load_from_file(env_file)?;
    }

    let mut file = JobFile::read(path, &env)?;
    if let Some(batch_size) = overrides.batch_size {
        debug!(batch_size, "Batch size overridden from command line");
        file.job.batch_size = batch_size;
    }

    validation::validate(&file)?;

    Ok(LoadedConfig {
        logging: file.logging.clone(),
        job: file.into_job(),
    })
}
