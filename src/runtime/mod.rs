//! Container runtime abstraction.
//!
//! The watch loop only talks to the runtime through [`RuntimeClient`]: it asks
//! for a [`Subscription`] to health events and for restarts of single
//! containers. The Docker implementation lives in [`docker`].

pub mod docker;

use std::{collections::HashMap, fmt, time::Duration};

use async_trait::async_trait;
use tokio::sync::mpsc::Receiver;

/// Action string Docker emits when a health check turns a container unhealthy.
pub const UNHEALTHY_ACTION: &str = "health_status: unhealthy";

const SHORT_ID_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Docker API error: {0}")]
    DockerApi(#[from] bollard::errors::Error),
    #[error("Not connected to the Docker daemon")]
    NotConnected,
    #[error("Docker event stream closed")]
    StreamClosed,
}

/// A health-status notification for a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthEvent {
    pub action: String,
    /// Full container id. This is the only value used as a cooldown key.
    pub id: String,
    pub attributes: HashMap<String, String>,
}

impl HealthEvent {
    pub fn is_unhealthy(&self) -> bool {
        self.action == UNHEALTHY_ACTION
    }

    /// Container name without the leading slash Docker puts in front of it.
    pub fn name(&self) -> &str {
        let name = self.attributes.get("name").map(String::as_str).unwrap_or("");
        name.strip_prefix('/').unwrap_or(name)
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

impl fmt::Display for HealthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.short_id())
    }
}

/// A live event subscription: health events plus the paired error channel.
///
/// Dropping a subscription abandons it. Whatever feeds the channels is
/// expected to stop once its sends fail.
pub struct Subscription {
    pub events: Receiver<HealthEvent>,
    pub errors: Receiver<RuntimeError>,
}

impl Subscription {
    pub fn new(events: Receiver<HealthEvent>, errors: Receiver<RuntimeError>) -> Self {
        Self { events, errors }
    }
}

#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Subscribe to container `health_status` events. Calling it again
    /// establishes a new subscription with the same filters.
    async fn subscribe(&mut self) -> Result<Subscription, RuntimeError>;

    /// Restart a container, giving it `timeout` to stop before it is killed.
    async fn restart(&self, id: &str, timeout: Duration) -> Result<(), RuntimeError>;
}
