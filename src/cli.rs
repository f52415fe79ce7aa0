use std::{path::PathBuf, sync::OnceLock};

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifierKind {
    /// Run the apprise CLI.
    Command,
    /// POST to an Apprise API endpoint.
    Http,
    /// Only log.
    None,
}

/// Restarts Docker containers that report as unhealthy.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Container restart timeout in seconds.
    #[arg(long, env = "WATCHDOG_TIMEOUT", default_value_t = 10)]
    pub timeout: u32,

    /// Pause between restarts per container in seconds.
    #[arg(long, env = "WATCHDOG_COOLDOWN", default_value_t = 30)]
    pub cooldown: u64,

    /// Also append log lines to this file.
    #[arg(long, env = "WATCHDOG_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// How notifications are delivered.
    #[arg(long, env = "WATCHDOG_NOTIFIER", value_enum, default_value_t = NotifierKind::Command)]
    pub notifier: NotifierKind,

    /// Path to the apprise binary.
    #[arg(long, env = "WATCHDOG_APPRISE_BIN", default_value = "apprise")]
    pub apprise_bin: PathBuf,

    /// Apprise API notify endpoint, required with `--notifier http`.
    #[arg(long, env = "WATCHDOG_NOTIFY_URL")]
    pub notify_url: Option<String>,

    /// Title used for every notification.
    #[arg(long, env = "WATCHDOG_NOTIFY_TITLE", default_value = "Docker Watchdog")]
    pub notify_title: String,

    /// Seconds to wait before the first reconnect attempt.
    #[arg(long, env = "WATCHDOG_RECONNECT_DELAY", default_value_t = 5)]
    pub reconnect_delay: u64,

    /// Upper bound in seconds for the reconnect backoff.
    #[arg(long, env = "WATCHDOG_RECONNECT_MAX_DELAY", default_value_t = 60)]
    pub reconnect_max_delay: u64,

    /// Reconnect attempts before giving up. The default exits on the first
    /// failed attempt.
    #[arg(
        long,
        env = "WATCHDOG_RECONNECT_ATTEMPTS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub reconnect_attempts: u32,
}

static ARGS: OnceLock<Args> = OnceLock::new();

pub fn get_cli_args() -> &'static Args {
    ARGS.get_or_init(Args::parse)
}
