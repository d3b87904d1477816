//! Share the device's own position as telemetry.
//!
//! A [`LocationSharer`] runs a [`PositionAcquisition`] and publishes every
//! fix it delivers to a [`PublishSink`] under one entity, tagged with
//! `extra = {"source": "driver"}`. This is how a vehicle reports itself.
//!
//! The first failure on either side ends the run. It is returned unchanged
//! and never retried: acquisition is stopped before `run` returns.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::PublishError;
use super::feed::PublishSink;
use super::record::PositionReport;
use crate::acquisition::{
    AcquisitionConfig, AcquisitionError, AcquisitionEvent, LocationProvider, PositionAcquisition,
};
use crate::tracking::{EntityId, PositionSample};

/// Key in `extra` naming who produced a record.
pub const SOURCE_KEY: &str = "source";

/// `SOURCE_KEY` value for positions shared from the vehicle's own device.
pub const DRIVER_SOURCE: &str = "driver";

/// Buffered fixes while a publish is in flight.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Why sharing stopped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShareError {
    #[error("Location sharing stopped: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Location sharing stopped: {0}")]
    Publish(#[from] PublishError),
}

impl ShareError {
    /// Message suitable for showing to the person sharing.
    pub fn user_message(&self) -> String {
        match self {
            Self::Acquisition(e) => e.kind.user_message().to_string(),
            Self::Publish(PublishError::PermissionDenied(entity)) => format!(
                "Not allowed to share the position of '{}'. Sign in with an account that may.",
                entity
            ),
            Self::Publish(e) => format!("Could not send the position: {}", e),
        }
    }
}

/// Publishes the device's position for one entity until stopped.
pub struct LocationSharer<P: LocationProvider, S: PublishSink> {
    acquisition: PositionAcquisition<P>,
    events: mpsc::Receiver<AcquisitionEvent>,
    sink: Arc<S>,
    entity: EntityId,
    max_reports: Option<u32>,
    cancel: CancellationToken,
}

impl<P: LocationProvider, S: PublishSink> LocationSharer<P, S> {
    pub fn new(
        provider: Arc<P>,
        config: AcquisitionConfig,
        sink: Arc<S>,
        entity: EntityId,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            acquisition: PositionAcquisition::new(provider, config, tx),
            events,
            sink,
            entity,
            max_reports: None,
            cancel,
        }
    }

    /// Stop after `max_reports` successful publishes.
    pub fn with_max_reports(mut self, max_reports: u32) -> Self {
        self.max_reports = Some(max_reports);
        self
    }

    /// Start sharing as an async task.
    pub fn start(self) -> JoinHandle<Result<u32, ShareError>> {
        tokio::spawn(self.run())
    }

    /// Share until cancellation, `max_reports`, or the first failure.
    /// Returns the number of positions published.
    pub async fn run(mut self) -> Result<u32, ShareError> {
        let result = self.share().await;
        self.acquisition.stop();

        match &result {
            Ok(published) => {
                tracing::info!(entity = %self.entity, published, "Location sharing finished");
            }
            Err(e) => {
                tracing::warn!(entity = %self.entity, error = %e, "Location sharing failed");
            }
        }
        result
    }

    async fn share(&mut self) -> Result<u32, ShareError> {
        if self.entity.is_blank() {
            return Err(PublishError::MissingEntity.into());
        }

        self.acquisition.start()?;
        tracing::info!(entity = %self.entity, "Location sharing started");

        let mut published = 0u32;
        while self.max_reports.map_or(true, |max| published < max) {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(entity = %self.entity, "Location sharing cancelled");
                    break;
                }
                event = self.events.recv() => event,
            };

            match event {
                Some(AcquisitionEvent::Position(sample)) => {
                    let record = self.sink.publish(&self.entity, report(&sample)).await?;
                    published += 1;
                    tracing::debug!(
                        entity = %self.entity,
                        position = %record.coordinate(),
                        observed_at = %record.observed_at,
                        "Shared position published"
                    );
                }
                Some(AcquisitionEvent::Failed(error)) => return Err(error.into()),
                None => break,
            }
        }

        Ok(published)
    }
}

fn report(sample: &PositionSample) -> PositionReport {
    PositionReport::new(sample.coordinate())
        .with_speed(sample.speed())
        .with_heading(sample.heading())
        .with_extra(SOURCE_KEY, DRIVER_SOURCE)
}
