//! Best-effort alerting.
//!
//! The watch loop hands every state-changing message to a [`Notifier`]. How the
//! message leaves the process (the `apprise` CLI, an Apprise API endpoint, or
//! nowhere) is decided at startup by [`NotifierConfig::build`].

mod command;
mod http;

use std::path::PathBuf;

use async_trait::async_trait;

pub use command::AppriseCommand;
pub use http::HttpNotifier;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Notification command exited with {status}: {output}")]
    Command {
        status: std::process::ExitStatus,
        output: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Drops every notification. Used when alerting is disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        log::debug!("Notifications disabled, dropping [{title}] {body}");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Command { program: PathBuf },
    Http { url: String },
    Disabled,
}

impl NotifierConfig {
    pub fn build(&self) -> Box<dyn Notifier> {
        match self {
            NotifierConfig::Command { program } => Box::new(AppriseCommand::new(program.clone())),
            NotifierConfig::Http { url } => Box::new(HttpNotifier::new(url.clone())),
            NotifierConfig::Disabled => Box::new(NullNotifier),
        }
    }
}
