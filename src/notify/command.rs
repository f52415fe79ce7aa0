use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::{Notifier, NotifyError};

/// Sends notifications by running `apprise -t <title> -b <body>`.
///
/// Apprise picks its targets up from its own configuration file.
pub struct AppriseCommand {
    program: PathBuf,
}

impl AppriseCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Notifier for AppriseCommand {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let output = Command::new(&self.program)
            .args(["-t", title, "-b", body])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(NotifyError::Command {
            status: output.status,
            output: combined.trim().to_string(),
        })
    }
}
