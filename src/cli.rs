//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Most flags have an environment variable equivalent for container
//! deployments. `--api-key` deliberately does not: the environment is
//! reserved for the per-request key lookup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::{DEFAULT_API_KEY_ENV, DEFAULT_UPSTREAM_URL};

#[derive(Parser)]
#[command(
    name = "tickerproxy",
    version,
    about = "CORS-enabled relay for Alpha Vantage overview and quote lookups",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        ALPHA_VANTAGE_API_KEY=... tickerproxy run    Key read from the environment per request\n  \
        tickerproxy run --api-key-file /run/secrets/av  Key read from a file per request\n  \
        tickerproxy health                          Check a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        tickerproxy run                                  Key from $ALPHA_VANTAGE_API_KEY\n  \
        tickerproxy run --api-key-env AV_KEY -p 8080     Key from $AV_KEY, port 8080\n  \
        tickerproxy run --api-key demo --pretty          Fixed key, local dev mode")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Upstream --
    /// Upstream API base URL
    #[arg(
        long,
        env = "UPSTREAM_URL",
        default_value = DEFAULT_UPSTREAM_URL,
        help_heading = "Upstream"
    )]
    pub upstream_url: String,

    /// Upstream timeout in milliseconds (0 disables the timeout)
    #[arg(
        long,
        env = "UPSTREAM_TIMEOUT_MS",
        default_value_t = 0,
        help_heading = "Upstream"
    )]
    pub timeout: u64,

    // -- API Key --
    /// Fixed API key (takes precedence over the other key sources)
    #[arg(long, conflicts_with = "api_key_file", help_heading = "API Key")]
    pub api_key: Option<String>,

    /// File holding the API key, read on every request
    #[arg(long, env = "API_KEY_FILE", help_heading = "API Key")]
    pub api_key_file: Option<PathBuf>,

    /// Environment variable holding the API key, read on every request
    #[arg(long, default_value = DEFAULT_API_KEY_ENV, help_heading = "API Key")]
    pub api_key_env: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 65_536,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
