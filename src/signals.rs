use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};

/// What should we do when the user stops
/// this program?
///
/// Cooldown state is not persisted, so there is nothing to flush. Report to
/// systemd that we are stopping and exit.
pub fn handle_shutdown() -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            log::warn!("Received signal {signal}, shutting down");
            let _ = sd_notify::notify(true, &[sd_notify::NotifyState::Stopping]);
            std::process::exit(0);
        }
    });

    Ok(())
}

/// Tell systemd the watchdog is connected and watching.
pub fn notify_ready() {
    if let Err(e) = sd_notify::notify(true, &[sd_notify::NotifyState::Ready]) {
        log::debug!("Unable to notify systemd: {e}");
    }
}
