//! The watch loop.
//!
//! A [`Watchdog`] holds one event subscription at a time and reacts to health
//! events one by one: unhealthy containers that are out of their cooldown get
//! restarted, everything else is dropped. When the subscription fails the loop
//! reconnects following its [`ReconnectPolicy`] and gives up with
//! [`WatchError::Reconnect`] once the policy is exhausted.

use std::convert::Infallible;
use std::time::Duration;

use tokio::time::Instant;

use crate::cooldown::CooldownTracker;
use crate::notify::Notifier;
use crate::reconnect::ReconnectPolicy;
use crate::runtime::{HealthEvent, RuntimeClient, RuntimeError, Subscription};

/// Upper bound for a single notification so a hanging notifier cannot stall
/// the loop.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to connect to the Docker daemon: {0}")]
    Connect(#[source] RuntimeError),
    #[error("Failed to re-establish connection to the Docker daemon after {attempts} attempt(s): {source}")]
    Reconnect {
        attempts: u32,
        #[source]
        source: RuntimeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    pub cooldown: Duration,
    pub restart_timeout: Duration,
    pub notify_title: String,
    pub reconnect: ReconnectPolicy,
}

pub struct Watchdog<R> {
    runtime: R,
    notifier: Box<dyn Notifier>,
    cooldown: CooldownTracker,
    settings: WatchSettings,
}

impl<R: RuntimeClient> Watchdog<R> {
    pub fn new(runtime: R, notifier: Box<dyn Notifier>, settings: WatchSettings) -> Self {
        Self {
            runtime,
            notifier,
            cooldown: CooldownTracker::new(),
            settings,
        }
    }

    /// Open the initial subscription and announce it.
    pub async fn connect(&mut self) -> Result<Subscription, WatchError> {
        match self.runtime.subscribe().await {
            Ok(subscription) => {
                let message = "Successfully connected to Docker daemon.";
                log::info!("{message}");
                self.alert(message).await;
                Ok(subscription)
            }
            Err(e) => {
                let err = WatchError::Connect(e);
                log::error!("{err}");
                self.alert(&err.to_string()).await;
                Err(err)
            }
        }
    }

    /// Consume `subscription` forever, swapping it for a fresh one whenever it
    /// fails.
    pub async fn watch(mut self, mut subscription: Subscription) -> Result<Infallible, WatchError> {
        loop {
            // Events already buffered are handled before an error queued behind them
            let err = tokio::select! {
                biased;
                Some(event) = subscription.events.recv() => {
                    self.handle_event(event).await;
                    continue;
                }
                Some(err) = subscription.errors.recv() => err,
                else => RuntimeError::StreamClosed,
            };

            log::error!("Error from Docker event stream: {err}");
            subscription = self.reconnect().await?;
        }
    }

    async fn handle_event(&mut self, event: HealthEvent) {
        if !event.is_unhealthy() {
            return;
        }

        if !self
            .cooldown
            .permit(&event.id, Instant::now(), self.settings.cooldown)
        {
            log::debug!("Container {event} is in cooldown, ignoring");
            return;
        }

        let message = format!("Unhealthy container detected: {event}");
        log::warn!("{message}");
        self.alert(&message).await;

        if let Err(e) = self
            .runtime
            .restart(&event.id, self.settings.restart_timeout)
            .await
        {
            let message = format!("Failed to restart container {}: {e}", event.name());
            log::error!("{message}");
            self.alert(&message).await;
        }

        let message = format!("Restarted: {event}");
        log::info!("{message}");
        self.alert(&message).await;

        log::debug!(
            "Tracking cooldown for {} container(s)",
            self.cooldown.tracked()
        );
    }

    async fn reconnect(&mut self) -> Result<Subscription, WatchError> {
        log::info!("Attempting to re-establish connection...");
        let policy = self.settings.reconnect;
        let mut attempt = 1;

        loop {
            tokio::time::sleep(policy.delay_for(attempt)).await;

            match self.runtime.subscribe().await {
                Ok(subscription) => {
                    log::info!("Successfully re-established connection to Docker daemon.");
                    return Ok(subscription);
                }
                Err(e) if attempt < policy.max_attempts => {
                    log::warn!(
                        "Reconnect attempt {attempt}/{} failed: {e}",
                        policy.max_attempts
                    );
                    attempt += 1;
                }
                Err(e) => {
                    let err = WatchError::Reconnect {
                        attempts: attempt,
                        source: e,
                    };
                    log::error!("{err}");
                    self.alert(&err.to_string()).await;
                    return Err(err);
                }
            }
        }
    }

    /// Deliver a notification, logging instead of failing.
    async fn alert(&self, body: &str) {
        let title = &self.settings.notify_title;
        match tokio::time::timeout(NOTIFY_TIMEOUT, self.notifier.notify(title, body)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Failed to send notification: {e}"),
            Err(_) => log::error!("Sending notification timed out after {NOTIFY_TIMEOUT:?}"),
        }
    }
}
