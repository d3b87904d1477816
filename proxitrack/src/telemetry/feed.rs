//! Telemetry feed and publish sink traits.

use std::future::Future;

use tokio::sync::mpsc;

use super::error::{FeedError, PublishError};
use super::record::{PositionReport, TelemetryRecord};
use crate::tracking::EntityId;

/// Live, read-only source of telemetry for one entity at a time.
///
/// Every delivery is the most recent records (at most five), newest first.
pub trait TelemetryFeed: Send + Sync + 'static {
    fn subscribe(&self, entity: &EntityId) -> Result<FeedSubscription, FeedError>;
}

/// Write side of the telemetry store. The sink assigns the timestamp.
pub trait PublishSink: Send + Sync + 'static {
    fn publish(
        &self,
        entity: &EntityId,
        report: PositionReport,
    ) -> impl Future<Output = Result<TelemetryRecord, PublishError>> + Send;
}

/// An open feed subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct FeedSubscription {
    entity: EntityId,
    deliveries: mpsc::Receiver<Vec<TelemetryRecord>>,
}

impl FeedSubscription {
    pub fn new(entity: EntityId, deliveries: mpsc::Receiver<Vec<TelemetryRecord>>) -> Self {
        Self { entity, deliveries }
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    /// Next delivery, or `None` once the feed has closed.
    pub async fn recv(&mut self) -> Option<Vec<TelemetryRecord>> {
        self.deliveries.recv().await
    }

    /// Next delivery if one is already queued.
    pub fn try_recv(&mut self) -> Option<Vec<TelemetryRecord>> {
        self.deliveries.try_recv().ok()
    }
}
