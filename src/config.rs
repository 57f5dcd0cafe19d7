//! Runtime configuration, parsed from the command line.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ramdb", about = "An in-memory single-user relational database engine")]
pub struct Config {
    /// Run statements from a file instead of starting an interactive session.
    #[arg(long, value_name = "PATH")]
    pub script: Option<std::path::PathBuf>,

    /// Logging verbosity, passed through to `tracing_subscriber::EnvFilter`.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

impl Config {
    pub fn parse_args() -> Self {
        Config::parse()
    }
}
