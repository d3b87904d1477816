//! Device location provider abstraction.
//!
//! The [`LocationProvider`] trait hides the host platform's location API.
//! It exposes two capability tiers: a continuous watch that pushes fixes
//! through a channel, and a single-shot read used for polling.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::config::AcquisitionOptions;
use super::error::{AcquisitionError, AcquisitionErrorKind};
use crate::geodesy::Coordinate;
use crate::tracking::{PositionSample, SampleSource};

/// Capacity of the channel behind a [`StaticLocationProvider`] watch.
const WATCH_CHANNEL_CAPACITY: usize = 8;

/// Handle identifying one active watch on a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// A raw fix from the device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters/second, when the platform reports it.
    pub speed: Option<f64>,
    /// Degrees true, when the platform reports it.
    pub heading: Option<f64>,
    /// Platform timestamp of the fix, if any.
    pub timestamp: Option<DateTime<Utc>>,
}

impl DeviceFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            speed: None,
            heading: None,
            timestamp: None,
        }
    }

    /// Convert to a sample, stamping it with `received_at` when the platform
    /// gave no timestamp.
    pub fn into_sample(self, received_at: DateTime<Utc>) -> PositionSample {
        PositionSample::new(
            Coordinate::new(self.latitude, self.longitude),
            self.timestamp.unwrap_or(received_at),
            SampleSource::LocalDevice,
        )
        .with_speed(self.speed)
        .with_heading(self.heading)
    }
}

/// An active continuous watch.
///
/// Each item on `updates` is one success or failure callback from the
/// platform. The provider keeps the sending half until
/// [`LocationProvider::clear_watch`] is called with `id`.
#[derive(Debug)]
pub struct Watch {
    pub id: WatchId,
    pub updates: mpsc::Receiver<Result<DeviceFix, AcquisitionError>>,
}

/// Host platform location API.
///
/// Capabilities are checked once per start. `watch` is invoked synchronously
/// and may fail immediately; `current_position` is a single asynchronous
/// read whose timeout is enforced by the implementation.
pub trait LocationProvider: Send + Sync + 'static {
    /// Whether continuous updates are available.
    fn supports_watch(&self) -> bool;

    /// Whether single-shot reads are available.
    fn supports_single_read(&self) -> bool;

    /// Begin continuous updates.
    fn watch(&self, options: &AcquisitionOptions) -> Result<Watch, AcquisitionError>;

    /// End a watch started with [`watch`](Self::watch).
    fn clear_watch(&self, id: WatchId);

    /// Read the current position once.
    fn current_position(
        &self,
        options: &AcquisitionOptions,
    ) -> impl Future<Output = Result<DeviceFix, AcquisitionError>> + Send;
}

/// Provider that always reports the same fix.
///
/// Used by demos and tests. Watches emit the fix once on creation and stay
/// open until cleared; single reads return it every time.
#[derive(Debug)]
pub struct StaticLocationProvider {
    fix: DeviceFix,
    watch_supported: bool,
    single_read_supported: bool,
    next_watch_id: AtomicU64,
    watches: Mutex<HashMap<WatchId, mpsc::Sender<Result<DeviceFix, AcquisitionError>>>>,
}

impl StaticLocationProvider {
    /// Provider supporting both capabilities.
    pub fn new(fix: DeviceFix) -> Self {
        Self::with_capabilities(fix, true, true)
    }

    pub fn with_capabilities(fix: DeviceFix, watch: bool, single_read: bool) -> Self {
        Self {
            fix,
            watch_supported: watch,
            single_read_supported: single_read,
            next_watch_id: AtomicU64::new(1),
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Provider at a coordinate, supporting both capabilities.
    pub fn at(coordinate: Coordinate) -> Self {
        Self::new(DeviceFix::new(coordinate.latitude(), coordinate.longitude()))
    }

    /// Number of watches not yet cleared.
    pub fn active_watches(&self) -> usize {
        self.watches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl LocationProvider for StaticLocationProvider {
    fn supports_watch(&self) -> bool {
        self.watch_supported
    }

    fn supports_single_read(&self) -> bool {
        self.single_read_supported
    }

    fn watch(&self, _options: &AcquisitionOptions) -> Result<Watch, AcquisitionError> {
        if !self.watch_supported {
            return Err(AcquisitionError::new(
                AcquisitionErrorKind::CapabilityMismatch,
                "continuous updates not supported",
            ));
        }

        let id = WatchId(self.next_watch_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let _ = tx.try_send(Ok(self.fix.clone()));
        self.watches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);

        Ok(Watch { id, updates: rx })
    }

    fn clear_watch(&self, id: WatchId) {
        self.watches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    async fn current_position(
        &self,
        _options: &AcquisitionOptions,
    ) -> Result<DeviceFix, AcquisitionError> {
        if self.single_read_supported {
            Ok(self.fix.clone())
        } else {
            Err(AcquisitionError::new(
                AcquisitionErrorKind::Unsupported,
                "single reads not supported",
            ))
        }
    }
}
