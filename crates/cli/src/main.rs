use crate::{
    commands::{Commands, SideArg},
    error::CliError,
    exit::ExitCode,
};
use clap::Parser;
use engine_config::{LoadedConfig, Overrides};
use engine_core::{
    events::Side,
    sink::{EventSink, TracingEventSink},
};
use engine_runtime::execution::{executor, inspect::Inspector};
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info};

mod commands;
mod error;
mod exit;
mod logging;
mod output;

#[derive(Parser)]
#[command(
    name = "tablecopy",
    version,
    about = "Copy a table between PostgreSQL databases in batches"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    };

    std::process::exit(code.as_i32());
}

/// Everything that needs the log writer alive. Returning drops the guard,
/// which flushes the log file before the process exits.
async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Transfer {
            config,
            env_file,
            batch_size,
            report,
        } => {
            let loaded = load(config, env_file, batch_size)?;
            let _guard = logging::init(&loaded.logging)?;
            transfer(loaded, report).await
        }
        Commands::Columns {
            config,
            env_file,
            side,
        } => {
            let loaded = load(config, env_file, None)?;
            let _guard = logging::init(&loaded.logging)?;
            columns(&loaded, side).await
        }
        Commands::TestConn {
            config,
            env_file,
            side,
        } => {
            let loaded = load(config, env_file, None)?;
            let _guard = logging::init(&loaded.logging)?;
            test_conn(&loaded, side).await
        }
    }
}

fn load(
    config: PathBuf,
    env_file: Option<PathBuf>,
    batch_size: Option<usize>,
) -> Result<LoadedConfig, CliError> {
    Ok(engine_config::load(
        &config,
        env_file.as_deref(),
        &Overrides { batch_size },
    )?)
}

async fn transfer(loaded: LoadedConfig, report_path: Option<PathBuf>) -> Result<ExitCode, CliError> {
    let sink: Arc<dyn EventSink> = Arc::new(TracingEventSink);

    match executor::run(&loaded.job, sink).await {
        Ok(report) => {
            if let Some(path) = &report_path {
                output::write_report(&report, path).await?;
                info!(path = %path.display(), "Report written");
            }
            Ok(ExitCode::from_state(report.state))
        }
        Err(aborted) => {
            if let Some(path) = &report_path
                && let Err(err) = output::write_report(&aborted.report, path).await
            {
                error!(%err, "Failed to write report");
            }
            Err(aborted.into())
        }
    }
}

fn sides(side: SideArg) -> Vec<Side> {
    match side {
        SideArg::Source => vec![Side::Source],
        SideArg::Target => vec![Side::Target],
        SideArg::Both => vec![Side::Source, Side::Target],
    }
}

async fn columns(loaded: &LoadedConfig, side: SideArg) -> Result<ExitCode, CliError> {
    let inspector = Inspector::default();
    let job = &loaded.job;

    for side in sides(side) {
        let (config, table) = match side {
            Side::Source => (&job.source, &job.source_table),
            Side::Target => (&job.target, &job.target_table),
        };
        let columns = inspector.column_list(side, config, table).await?;
        output::print_columns(side, table, &columns)?;
    }

    Ok(ExitCode::Success)
}

async fn test_conn(loaded: &LoadedConfig, side: SideArg) -> Result<ExitCode, CliError> {
    let inspector = Inspector::default();
    let job = &loaded.job;

    for side in sides(side) {
        let config = match side {
            Side::Source => &job.source,
            Side::Target => &job.target,
        };
        let endpoint = inspector.test_connection(side, config).await?;
        println!("{side}: OK ({endpoint})");
    }

    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::{Cli, sides};
    use crate::{
        commands::{Commands, SideArg},
        exit::ExitCode,
    };
    use clap::Parser;
    use engine_core::{events::Side, state::TransferState};

    #[test]
    fn test_parse_transfer() {
        let cli = Cli::try_parse_from([
            "tablecopy",
            "transfer",
            "--config",
            "job.toml",
            "--batch-size",
            "1000",
        ])
        .unwrap();

        let Commands::Transfer {
            config,
            batch_size,
            env_file,
            report,
        } = cli.command
        else {
            panic!("expected transfer command");
        };
        assert_eq!(config.to_str(), Some("job.toml"));
        assert_eq!(batch_size, Some(1000));
        assert!(env_file.is_none());
        assert!(report.is_none());
    }

    #[test]
    fn test_side_defaults() {
        let cli = Cli::try_parse_from(["tablecopy", "test-conn", "--config", "job.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::TestConn {
                side: SideArg::Both,
                ..
            }
        ));
        assert_eq!(sides(SideArg::Both), vec![Side::Source, Side::Target]);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::from_state(TransferState::Completed).as_i32(), 0);
        assert_eq!(ExitCode::from_state(TransferState::CompletedWithErrors).as_i32(), 0);
        assert_eq!(ExitCode::from_state(TransferState::AbortedOnSetup).as_i32(), 1);
        assert_eq!(ExitCode::from_state(TransferState::AbortedOnRead).as_i32(), 1);
        assert_eq!(ExitCode::from_state(TransferState::AbortedOnWrite).as_i32(), 3);
        assert_eq!(ExitCode::InvalidConfig.as_i32(), 2);
    }
}
