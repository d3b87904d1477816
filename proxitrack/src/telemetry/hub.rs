//! In-memory telemetry store implementing both feed and sink.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::error::{FeedError, PublishError};
use super::feed::{FeedSubscription, PublishSink, TelemetryFeed};
use super::record::{PositionReport, TelemetryRecord};
use crate::tracking::EntityId;

/// Records kept per entity and included in each delivery.
pub const DEFAULT_RETAINED_RECORDS: usize = 5;

/// Per-subscriber delivery buffer.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 16;

/// Telemetry store held in memory.
///
/// Keeps the latest records per entity and pushes the full window, newest
/// first, to every subscriber on each publish. New subscribers get the
/// current window right away.
#[derive(Debug)]
pub struct InMemoryTelemetryHub {
    retained: usize,
    deny_publish: AtomicBool,
    inner: Mutex<HubInner>,
}

#[derive(Debug, Default)]
struct HubInner {
    records: HashMap<EntityId, VecDeque<TelemetryRecord>>,
    subscribers: HashMap<EntityId, Vec<mpsc::Sender<Vec<TelemetryRecord>>>>,
}

impl InMemoryTelemetryHub {
    pub fn new() -> Self {
        Self::with_retained(DEFAULT_RETAINED_RECORDS)
    }

    /// Hub keeping `retained` records per entity (at least one).
    pub fn with_retained(retained: usize) -> Self {
        Self {
            retained: retained.max(1),
            deny_publish: AtomicBool::new(false),
            inner: Mutex::new(HubInner::default()),
        }
    }

    /// Make every subsequent publish fail with `PermissionDenied`.
    pub fn set_publish_denied(&self, denied: bool) {
        self.deny_publish.store(denied, Ordering::Relaxed);
    }

    /// Current window for an entity, newest first.
    pub fn latest(&self, entity: &EntityId) -> Vec<TelemetryRecord> {
        self.lock()
            .records
            .get(entity)
            .map(|records| records.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Live subscribers for an entity.
    pub fn subscriber_count(&self, entity: &EntityId) -> usize {
        let mut inner = self.lock();
        match inner.subscribers.get_mut(entity) {
            Some(subscribers) => {
                subscribers.retain(|tx| !tx.is_closed());
                subscribers.len()
            }
            None => 0,
        }
    }

    /// Store a record and notify subscribers.
    pub fn insert(&self, entity: &EntityId, record: TelemetryRecord) {
        let mut inner = self.lock();

        let records = inner.records.entry(entity.clone()).or_default();
        records.push_front(record);
        records.truncate(self.retained);
        let delivery: Vec<TelemetryRecord> = records.iter().cloned().collect();

        if let Some(subscribers) = inner.subscribers.get_mut(entity) {
            subscribers.retain(|tx| match tx.try_send(delivery.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(entity = %entity, "Subscriber lagging, skipping delivery");
                    true
                }
                Err(TrySendError::Closed(_)) => false,
            });
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryTelemetryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryFeed for InMemoryTelemetryHub {
    fn subscribe(&self, entity: &EntityId) -> Result<FeedSubscription, FeedError> {
        if entity.is_blank() {
            return Err(FeedError::Unavailable("empty entity id".to_string()));
        }

        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let mut inner = self.lock();

        if let Some(records) = inner.records.get(entity) {
            if !records.is_empty() {
                let _ = tx.try_send(records.iter().cloned().collect());
            }
        }
        inner
            .subscribers
            .entry(entity.clone())
            .or_default()
            .push(tx);

        tracing::debug!(entity = %entity, "Telemetry subscription opened");
        Ok(FeedSubscription::new(entity.clone(), rx))
    }
}

impl PublishSink for InMemoryTelemetryHub {
    async fn publish(
        &self,
        entity: &EntityId,
        report: PositionReport,
    ) -> Result<TelemetryRecord, PublishError> {
        if entity.is_blank() {
            return Err(PublishError::MissingEntity);
        }
        if self.deny_publish.load(Ordering::Relaxed) {
            return Err(PublishError::PermissionDenied(entity.clone()));
        }

        let record = report.into_record(Utc::now());
        self.insert(entity, record.clone());
        tracing::trace!(
            entity = %entity,
            lat = record.latitude,
            lon = record.longitude,
            "Position published"
        );
        Ok(record)
    }
}
