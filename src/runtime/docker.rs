//! Docker runtime client using bollard.
//!
//! Every subscription creates a fresh Docker client and pings the daemon
//! before opening the event stream, so a daemon that went away shows up as a
//! failed subscription instead of a stream that never yields.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use bollard::Docker;
use bollard::models::EventMessage;
use bollard::query_parameters::{
    EventsOptions, EventsOptionsBuilder, RestartContainerOptions, RestartContainerOptionsBuilder,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;

use super::{HealthEvent, RuntimeClient, RuntimeError, Subscription};

const EVENT_BUFFER: usize = 64;

#[derive(Default)]
pub struct DockerRuntime {
    docker: Option<Docker>,
}

impl DockerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn docker(&self) -> Result<&Docker, RuntimeError> {
        self.docker.as_ref().ok_or(RuntimeError::NotConnected)
    }
}

fn health_event_filters() -> EventsOptions {
    let mut filters = HashMap::new();
    filters.insert("type", vec!["container"]);
    filters.insert("event", vec!["health_status"]);
    EventsOptionsBuilder::new().filters(&filters).build()
}

impl From<EventMessage> for HealthEvent {
    fn from(message: EventMessage) -> Self {
        let (id, attributes) = match message.actor {
            Some(actor) => (
                actor.id.unwrap_or_default(),
                actor.attributes.unwrap_or_default(),
            ),
            None => (String::new(), HashMap::new()),
        };
        HealthEvent {
            action: message.action.unwrap_or_default(),
            id,
            attributes,
        }
    }
}

/// Pump a bollard event stream into the subscription channels until the
/// stream fails or the receiving side is dropped.
async fn forward_events<S>(
    stream: S,
    events: mpsc::Sender<HealthEvent>,
    errors: mpsc::Sender<RuntimeError>,
) where
    S: Stream<Item = Result<EventMessage, bollard::errors::Error>>,
{
    let mut stream = std::pin::pin!(stream);

    while let Some(item) = stream.next().await {
        match item {
            Ok(message) => {
                let event = HealthEvent::from(message);
                if event.id.is_empty() {
                    log::debug!("Ignoring {:?} event without a container id", event.action);
                    continue;
                }
                if events.send(event).await.is_err() {
                    log::debug!("Event subscription dropped, stopping forwarder");
                    return;
                }
            }
            Err(e) => {
                let _ = errors.send(RuntimeError::DockerApi(e)).await;
                return;
            }
        }
    }

    let _ = errors.send(RuntimeError::StreamClosed).await;
}

#[async_trait]
impl RuntimeClient for DockerRuntime {
    async fn subscribe(&mut self) -> Result<Subscription, RuntimeError> {
        let docker = Docker::connect_with_local_defaults()?;
        docker.ping().await?;

        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (errors_tx, errors_rx) = mpsc::channel(1);
        let pump = docker.clone();
        tokio::spawn(async move {
            let stream = pump.events(Some(health_event_filters()));
            forward_events(stream, events_tx, errors_tx).await;
        });

        self.docker = Some(docker);
        Ok(Subscription::new(events_rx, errors_rx))
    }

    async fn restart(&self, id: &str, timeout: Duration) -> Result<(), RuntimeError> {
        let docker = self.docker()?;
        let secs = i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX);
        let options: RestartContainerOptions = RestartContainerOptionsBuilder::new().t(secs).build();

        docker
            .restart_container(id, Some(options))
            .await
            .inspect_err(|e| log::debug!("Restart request for {id} failed: {e}"))?;
        Ok(())
    }
}
