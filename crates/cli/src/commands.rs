use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the source table into the target table in batches
    Transfer {
        #[arg(long, help = "Job file path (TOML)")]
        config: PathBuf,

        #[arg(long, help = "Optional .env file used to resolve ${VAR} placeholders")]
        env_file: Option<PathBuf>,

        #[arg(long, help = "Overrides job.batch_size from the job file")]
        batch_size: Option<usize>,

        #[arg(long, help = "If specified, writes the JSON transfer report to this file")]
        report: Option<PathBuf>,
    },
    /// Print the column list the transfer would use
    Columns {
        #[arg(long, help = "Job file path (TOML)")]
        config: PathBuf,

        #[arg(long)]
        env_file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = SideArg::Source)]
        side: SideArg,
    },
    /// Check that the configured databases are reachable
    TestConn {
        #[arg(long, help = "Job file path (TOML)")]
        config: PathBuf,

        #[arg(long)]
        env_file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = SideArg::Both)]
        side: SideArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Source,
    Target,
    Both,
}
