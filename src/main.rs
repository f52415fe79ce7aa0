use std::process::ExitCode;

use config::WatchdogConfig;
use runtime::docker::DockerRuntime;
use watch::Watchdog;

mod cli;
mod config;
mod cooldown;
mod logging;
mod notify;
mod reconnect;
mod runtime;
mod signals;
mod watch;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match WatchdogConfig::try_from_args(cli::get_cli_args()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize the logger
    logging::init(config.log_file.as_deref());

    if let Err(e) = signals::handle_shutdown() {
        log::error!("Unable to install signal handlers: {e}");
        return ExitCode::FAILURE;
    }

    log::info!(
        "Watching Docker health events (restart timeout {:?}, cooldown {:?})",
        config.restart_timeout,
        config.cooldown
    );

    let mut watchdog = Watchdog::new(
        DockerRuntime::new(),
        config.notifier.build(),
        config.watch_settings(),
    );

    let result = match watchdog.connect().await {
        Ok(subscription) => {
            signals::notify_ready();
            watchdog.watch(subscription).await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(never) => match never {},
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
