use std::{path::PathBuf, time::Duration};

use crate::cli::{Args, NotifierKind};
use crate::notify::NotifierConfig;
use crate::reconnect::ReconnectPolicy;
use crate::watch::WatchSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Restart timeout of {0}s exceeds what the Docker API accepts")]
    TimeoutTooLarge(u32),
    #[error("--notify-url is required when using the http notifier")]
    MissingNotifyUrl,
    #[error("Reconnect delay ({initial}s) is larger than the maximum delay ({max}s)")]
    ReconnectDelay { initial: u64, max: u64 },
}

/// Everything the daemon needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    pub restart_timeout: Duration,
    pub cooldown: Duration,
    pub log_file: Option<PathBuf>,
    pub notifier: NotifierConfig,
    pub notify_title: String,
    pub reconnect: ReconnectPolicy,
}

impl WatchdogConfig {
    pub fn try_from_args(args: &Args) -> Result<Self, ConfigError> {
        if i32::try_from(args.timeout).is_err() {
            return Err(ConfigError::TimeoutTooLarge(args.timeout));
        }

        if args.reconnect_delay > args.reconnect_max_delay {
            return Err(ConfigError::ReconnectDelay {
                initial: args.reconnect_delay,
                max: args.reconnect_max_delay,
            });
        }

        let notifier = match args.notifier {
            NotifierKind::Command => NotifierConfig::Command {
                program: args.apprise_bin.clone(),
            },
            NotifierKind::Http => NotifierConfig::Http {
                url: args.notify_url.clone().ok_or(ConfigError::MissingNotifyUrl)?,
            },
            NotifierKind::None => NotifierConfig::Disabled,
        };

        Ok(Self {
            restart_timeout: Duration::from_secs(u64::from(args.timeout)),
            cooldown: Duration::from_secs(args.cooldown),
            log_file: args.log_file.clone(),
            notifier,
            notify_title: args.notify_title.clone(),
            reconnect: ReconnectPolicy {
                initial_delay: Duration::from_secs(args.reconnect_delay),
                max_delay: Duration::from_secs(args.reconnect_max_delay),
                max_attempts: args.reconnect_attempts,
                ..Default::default()
            },
        })
    }

    pub fn watch_settings(&self) -> WatchSettings {
        WatchSettings {
            cooldown: self.cooldown,
            restart_timeout: self.restart_timeout,
            notify_title: self.notify_title.clone(),
            reconnect: self.reconnect,
        }
    }
}
