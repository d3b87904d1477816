//! Async driver for a [`TrackingSession`].
//!
//! The [`SessionRunner`] owns the session and is the only task that touches
//! it. Remote deliveries, local acquisition events and control commands are
//! all received in one `select!` loop and each is handled to completion
//! before the next one is polled. After every handled event the runner
//! broadcasts a [`SessionUpdate`].
//!
//! # Teardown
//!
//! Cancelling the token (or dropping every [`SessionHandle`]) ends the loop.
//! The feed subscription is dropped and acquisition stopped before the task
//! returns, so no late callback can reach the session.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::controller::{ProximitySnapshot, SessionConfig, TrackingSession};
use crate::acquisition::{
    AcquisitionConfig, AcquisitionError, AcquisitionEvent, LocationProvider, PositionAcquisition,
};
use crate::telemetry::{FeedError, FeedSubscription, TelemetryFeed, TelemetryRecord};
use crate::tracking::{EntityId, PositionSample};

/// Buffered commands per session.
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Buffered acquisition events per session.
const ACQUISITION_CHANNEL_CAPACITY: usize = 16;

/// Buffered updates per subscriber before it starts lagging.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Control commands accepted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Track a new entity (resets history).
    Track(EntityId),
    StopTracking,
    /// Start acquiring the observer's own position.
    StartLocation,
    /// Stop acquiring and forget the observer's position.
    StopLocation,
    /// The user moved the view manually.
    UserInteraction,
}

/// What a running session broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Snapshot(ProximitySnapshot),
    /// Subscribing to the feed for the tracked entity failed.
    FeedFailed(FeedError),
    /// Local acquisition stopped with an error.
    AcquisitionFailed(AcquisitionError),
}

/// Errors returned by [`SessionHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Tracking session has shut down")]
    Closed,
}

/// Client side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    updates: broadcast::Sender<SessionUpdate>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn track(&self, entity: impl Into<EntityId>) -> Result<(), SessionError> {
        self.send(SessionCommand::Track(entity.into())).await
    }

    pub async fn stop_tracking(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::StopTracking).await
    }

    pub async fn start_location(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::StartLocation).await
    }

    pub async fn stop_location(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::StopLocation).await
    }

    pub async fn user_interaction(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::UserInteraction).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates.subscribe()
    }

    /// Ask the session to tear down. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Active local acquisition and its event stream.
struct LocalAcquisition<P: LocationProvider> {
    adapter: PositionAcquisition<P>,
    events: mpsc::Receiver<AcquisitionEvent>,
}

/// Serialized event loop around one [`TrackingSession`].
pub struct SessionRunner<F: TelemetryFeed, P: LocationProvider> {
    session: TrackingSession,
    feed: Arc<F>,
    provider: Arc<P>,
    acquisition_config: AcquisitionConfig,
    commands: mpsc::Receiver<SessionCommand>,
    updates: broadcast::Sender<SessionUpdate>,
    cancel: CancellationToken,
    subscription: Option<FeedSubscription>,
    local: Option<LocalAcquisition<P>>,
}

impl<F: TelemetryFeed, P: LocationProvider> SessionRunner<F, P> {
    /// Create a runner and the handle that controls it.
    pub fn new(
        feed: Arc<F>,
        provider: Arc<P>,
        session_config: SessionConfig,
        acquisition_config: AcquisitionConfig,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let handle = SessionHandle {
            commands: command_tx,
            updates: updates.clone(),
            cancel: cancel.clone(),
        };

        let runner = Self {
            session: TrackingSession::new(session_config),
            feed,
            provider,
            acquisition_config,
            commands: command_rx,
            updates,
            cancel,
            subscription: None,
            local: None,
        };

        (runner, handle)
    }

    /// Start the runner as an async task.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(mut self) {
        tracing::info!("Tracking session started");

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    tracing::debug!("Tracking session cancelled");
                    break;
                }

                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        tracing::debug!("All session handles dropped, stopping");
                        break;
                    }
                },

                delivery = recv_delivery(&mut self.subscription) => {
                    self.handle_delivery(delivery);
                }

                event = recv_acquisition(&mut self.local) => {
                    self.handle_acquisition(event);
                }
            }
        }

        self.teardown();
        tracing::info!("Tracking session stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        tracing::debug!(command = ?command, "Session command");

        match command {
            SessionCommand::Track(entity) => {
                // Unsubscribe before the history reset so nothing from the
                // old entity can arrive afterwards.
                self.subscription = None;
                self.session.track(entity.clone());
                match self.feed.subscribe(&entity) {
                    Ok(subscription) => self.subscription = Some(subscription),
                    Err(e) => {
                        tracing::warn!(entity = %entity, error = %e, "Telemetry subscription failed");
                        self.publish(SessionUpdate::FeedFailed(e));
                    }
                }
            }
            SessionCommand::StopTracking => {
                self.subscription = None;
                self.session.stop_tracking();
            }
            SessionCommand::StartLocation => self.start_location(),
            SessionCommand::StopLocation => {
                if let Some(mut local) = self.local.take() {
                    local.adapter.stop();
                    self.session.set_acquisition_status(local.adapter.status());
                }
                self.session.clear_reference();
            }
            SessionCommand::UserInteraction => self.session.mark_user_interaction(),
        }

        self.publish_snapshot();
    }

    fn start_location(&mut self) {
        let local = self.local.get_or_insert_with(|| {
            let (tx, rx) = mpsc::channel(ACQUISITION_CHANNEL_CAPACITY);
            LocalAcquisition {
                adapter: PositionAcquisition::new(
                    Arc::clone(&self.provider),
                    self.acquisition_config.clone(),
                    tx,
                ),
                events: rx,
            }
        });

        let result = local.adapter.start();
        self.session.set_acquisition_status(local.adapter.status());
        if let Err(e) = result {
            self.publish(SessionUpdate::AcquisitionFailed(e));
        }
    }

    fn handle_delivery(&mut self, delivery: Option<Vec<TelemetryRecord>>) {
        let Some(subscription) = self.subscription.as_ref() else {
            return;
        };
        let entity = subscription.entity().clone();

        let Some(records) = delivery else {
            tracing::warn!(entity = %entity, "Telemetry feed closed");
            self.subscription = None;
            return;
        };

        let samples: Vec<PositionSample> = records.iter().map(TelemetryRecord::to_sample).collect();
        if let Some(snapshot) = self.session.ingest_remote(&entity, &samples) {
            self.publish(SessionUpdate::Snapshot(snapshot));
        }
    }

    fn handle_acquisition(&mut self, event: Option<AcquisitionEvent>) {
        let Some(local) = self.local.as_ref() else {
            return;
        };
        self.session.set_acquisition_status(local.adapter.status());

        match event {
            Some(AcquisitionEvent::Position(sample)) => {
                let snapshot = self.session.ingest_local(sample);
                self.publish(SessionUpdate::Snapshot(snapshot));
            }
            Some(AcquisitionEvent::Failed(error)) => {
                // The adapter has released itself; the next StartLocation
                // builds a new one with a new channel.
                self.local = None;
                self.publish(SessionUpdate::AcquisitionFailed(error));
                self.publish_snapshot();
            }
            None => {
                self.local = None;
            }
        }
    }

    fn publish_snapshot(&self) {
        self.publish(SessionUpdate::Snapshot(self.session.snapshot()));
    }

    fn publish(&self, update: SessionUpdate) {
        // No subscribers is fine
        let _ = self.updates.send(update);
    }

    fn teardown(&mut self) {
        self.subscription = None;
        if let Some(mut local) = self.local.take() {
            local.adapter.stop();
        }
        self.commands.close();
    }
}

/// Next feed delivery, pending forever without a subscription.
async fn recv_delivery(subscription: &mut Option<FeedSubscription>) -> Option<Vec<TelemetryRecord>> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

/// Next acquisition event, pending forever while location is off.
async fn recv_acquisition<P: LocationProvider>(
    local: &mut Option<LocalAcquisition<P>>,
) -> Option<AcquisitionEvent> {
    match local {
        Some(local) => local.events.recv().await,
        None => std::future::pending().await,
    }
}
