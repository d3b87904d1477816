//! Position acquisition adapter - watch or poll the device location.
//!
//! # Design
//!
//! Follows the adapter pattern used elsewhere in the crate:
//! - `new()` + `start()` spawns a background task
//! - the task forwards fixes as [`AcquisitionEvent`]s over an mpsc channel
//! - status is published through a `watch` channel
//!
//! Whichever mechanism is active (a provider watch or a poll loop) lives
//! behind one [`Subscription`]. Releasing it is the single cancellation
//! point: it clears the watch handle, cancels the poll loop and aborts the
//! task, exactly once. Background tasks only mutate status or emit events
//! while holding the subscription lock and only if it has not been released,
//! so nothing leaks out after `stop()`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::config::AcquisitionConfig;
use super::error::{AcquisitionError, AcquisitionErrorKind};
use super::provider::{DeviceFix, LocationProvider, Watch, WatchId};
use crate::tracking::PositionSample;

/// Shortest accepted polling interval. Shorter configured values are raised
/// to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionStatus {
    #[default]
    Idle,
    /// Started, waiting for the first fix (and any permission prompt).
    RequestingPermission,
    /// At least one fix received.
    Active,
    /// Stopped by a failure. Call `start()` again to retry.
    Error(AcquisitionErrorKind),
}

impl std::fmt::Display for AcquisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::RequestingPermission => write!(f, "requesting permission"),
            Self::Active => write!(f, "active"),
            Self::Error(kind) => write!(f, "error ({})", kind),
        }
    }
}

/// Which mechanism delivers fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Continuous provider watch.
    Watch,
    /// Periodic single reads.
    Polling,
}

/// Event delivered to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    Position(PositionSample),
    /// Acquisition has stopped because of this failure.
    Failed(AcquisitionError),
}

/// Acquires the observer's own position from a [`LocationProvider`].
///
/// Must be started from within a Tokio runtime. Dropping the adapter stops it.
pub struct PositionAcquisition<P: LocationProvider> {
    provider: Arc<P>,
    config: AcquisitionConfig,
    events: mpsc::Sender<AcquisitionEvent>,
    status: Arc<watch::Sender<AcquisitionStatus>>,
    mode: Option<AcquisitionMode>,
    subscription: Option<Arc<Subscription<P>>>,
}

impl<P: LocationProvider> PositionAcquisition<P> {
    /// A `poll_interval` below [`MIN_POLL_INTERVAL`] (zero included) is
    /// raised to it.
    pub fn new(
        provider: Arc<P>,
        mut config: AcquisitionConfig,
        events: mpsc::Sender<AcquisitionEvent>,
    ) -> Self {
        if config.poll_interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                poll_interval_ms = config.poll_interval.as_millis() as u64,
                min_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "Poll interval too short, using minimum"
            );
            config.poll_interval = MIN_POLL_INTERVAL;
        }

        let (status, _) = watch::channel(AcquisitionStatus::Idle);
        Self {
            provider,
            config,
            events,
            status: Arc::new(status),
            mode: None,
            subscription: None,
        }
    }

    /// Start acquiring.
    ///
    /// Prefers a continuous watch; falls back to polling when the watch
    /// cannot be established. A no-op while already requesting or active.
    ///
    /// # Errors
    ///
    /// `Unsupported` when the provider has neither capability and
    /// `CapabilityMismatch` when the watch fails with no single-read
    /// fallback. The status moves to `Error(kind)` in both cases.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        if matches!(
            self.status(),
            AcquisitionStatus::RequestingPermission | AcquisitionStatus::Active
        ) {
            tracing::trace!("Location acquisition already started");
            return Ok(());
        }

        // Leftovers from a failed run are already released; drop the handle.
        self.subscription = None;
        self.mode = None;

        let watch_supported = self.provider.supports_watch();
        let single_read_supported = self.provider.supports_single_read();

        if !watch_supported && !single_read_supported {
            return Err(self.fail_start(AcquisitionError::from_kind(
                AcquisitionErrorKind::Unsupported,
            )));
        }

        self.status
            .send_replace(AcquisitionStatus::RequestingPermission);

        if watch_supported {
            match self.provider.watch(&self.config.options) {
                Ok(watch) => {
                    self.start_watch(watch);
                    return Ok(());
                }
                Err(e) if single_read_supported => {
                    tracing::warn!(
                        error = %e,
                        "Continuous location watch failed, falling back to polling"
                    );
                }
                Err(e) => {
                    return Err(self.fail_start(AcquisitionError::new(
                        AcquisitionErrorKind::CapabilityMismatch,
                        e.message,
                    )));
                }
            }
        }

        self.start_polling();
        Ok(())
    }

    /// Stop acquiring and release the watch or poll loop.
    ///
    /// Safe from any state and idempotent. From `Idle` nothing changes.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
        self.mode = None;

        if self.status() != AcquisitionStatus::Idle {
            self.status.send_replace(AcquisitionStatus::Idle);
            tracing::info!("Location acquisition stopped");
        }
    }

    pub fn status(&self) -> AcquisitionStatus {
        *self.status.borrow()
    }

    /// Mechanism in use since the last successful `start()`.
    pub fn mode(&self) -> Option<AcquisitionMode> {
        self.mode
    }

    /// Receiver notified on every status change.
    pub fn subscribe_status(&self) -> watch::Receiver<AcquisitionStatus> {
        self.status.subscribe()
    }

    fn fail_start(&mut self, error: AcquisitionError) -> AcquisitionError {
        tracing::warn!(kind = %error.kind, message = %error.message, "Location acquisition unavailable");
        self.status.send_replace(AcquisitionStatus::Error(error.kind));
        error
    }

    fn start_watch(&mut self, watch: Watch) {
        tracing::info!(watch_id = watch.id.0, "Location acquisition started (watch)");

        let subscription = Subscription::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.status),
            Some(watch.id),
        );
        let task = tokio::spawn(forward_watch(
            Arc::clone(&subscription),
            watch.updates,
            self.events.clone(),
        ));
        subscription.attach_task(task);

        self.mode = Some(AcquisitionMode::Watch);
        self.subscription = Some(subscription);
    }

    fn start_polling(&mut self) {
        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs_f64(),
            "Location acquisition started (polling)"
        );

        let subscription =
            Subscription::new(Arc::clone(&self.provider), Arc::clone(&self.status), None);
        let task = tokio::spawn(poll(
            Arc::clone(&subscription),
            self.config.clone(),
            self.events.clone(),
        ));
        subscription.attach_task(task);

        self.mode = Some(AcquisitionMode::Polling);
        self.subscription = Some(subscription);
    }
}

impl<P: LocationProvider> Drop for PositionAcquisition<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The currently active acquisition mechanism.
struct Subscription<P: LocationProvider> {
    provider: Arc<P>,
    status: Arc<watch::Sender<AcquisitionStatus>>,
    cancel: CancellationToken,
    inner: Mutex<SubscriptionInner>,
}

struct SubscriptionInner {
    released: bool,
    watch_id: Option<WatchId>,
    task: Option<JoinHandle<()>>,
}

impl<P: LocationProvider> Subscription<P> {
    fn new(
        provider: Arc<P>,
        status: Arc<watch::Sender<AcquisitionStatus>>,
        watch_id: Option<WatchId>,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            status,
            cancel: CancellationToken::new(),
            inner: Mutex::new(SubscriptionInner {
                released: false,
                watch_id,
                task: None,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SubscriptionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach_task(&self, task: JoinHandle<()>) {
        let mut inner = self.lock();
        if !inner.released {
            inner.task = Some(task);
        }
    }

    /// Release everything. Returns false if already released.
    fn release(&self) -> bool {
        let mut inner = self.lock();
        let released = Self::release_locked(&self.provider, &self.cancel, &mut inner);
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        released
    }

    fn release_locked(
        provider: &P,
        cancel: &CancellationToken,
        inner: &mut SubscriptionInner,
    ) -> bool {
        if inner.released {
            return false;
        }
        inner.released = true;
        cancel.cancel();
        if let Some(id) = inner.watch_id.take() {
            provider.clear_watch(id);
        }
        true
    }

    /// Deliver an event from the background task.
    ///
    /// Returns false when the task should exit: the subscription was
    /// released, the consumer went away, or the event was a failure.
    async fn emit(&self, event: AcquisitionEvent, events: &mpsc::Sender<AcquisitionEvent>) -> bool {
        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return false,
            permit = events.reserve() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!("Acquisition event channel closed, stopping");
                    return false;
                }
            },
        };

        let mut inner = self.lock();
        if inner.released {
            return false;
        }

        let keep_running = match &event {
            AcquisitionEvent::Position(_) => {
                self.status.send_if_modified(|status| {
                    if *status == AcquisitionStatus::Active {
                        false
                    } else {
                        tracing::info!("Location acquisition active");
                        *status = AcquisitionStatus::Active;
                        true
                    }
                });
                true
            }
            AcquisitionEvent::Failed(error) => {
                tracing::warn!(
                    kind = %error.kind,
                    message = %error.message,
                    "Location acquisition failed"
                );
                self.status
                    .send_replace(AcquisitionStatus::Error(error.kind));
                Self::release_locked(&self.provider, &self.cancel, &mut inner);
                // Running inside this task, so let it finish rather than abort.
                inner.task = None;
                false
            }
        };

        permit.send(event);
        keep_running
    }
}

fn position_event(fix: DeviceFix) -> AcquisitionEvent {
    AcquisitionEvent::Position(fix.into_sample(Utc::now()))
}

/// Forward watch callbacks until released or failed.
async fn forward_watch<P: LocationProvider>(
    subscription: Arc<Subscription<P>>,
    mut updates: mpsc::Receiver<Result<DeviceFix, AcquisitionError>>,
    events: mpsc::Sender<AcquisitionEvent>,
) {
    loop {
        let update = tokio::select! {
            biased;
            _ = subscription.cancel.cancelled() => break,
            update = updates.recv() => update,
        };

        let event = match update {
            Some(Ok(fix)) => position_event(fix),
            Some(Err(error)) => AcquisitionEvent::Failed(error),
            None => AcquisitionEvent::Failed(AcquisitionError::new(
                AcquisitionErrorKind::PositionUnavailable,
                "location watch ended unexpectedly",
            )),
        };

        if !subscription.emit(event, &events).await {
            break;
        }
    }

    tracing::debug!("Location watch forwarder exited");
}

/// Poll single reads: one immediately, then every `poll_interval`.
async fn poll<P: LocationProvider>(
    subscription: Arc<Subscription<P>>,
    config: AcquisitionConfig,
    events: mpsc::Sender<AcquisitionEvent>,
) {
    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = subscription.cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = subscription.cancel.cancelled() => break,
            result = subscription.provider.current_position(&config.options) => result,
        };

        let event = match result {
            Ok(fix) => position_event(fix),
            Err(error) => AcquisitionEvent::Failed(error),
        };

        if !subscription.emit(event, &events).await {
            break;
        }
    }

    tracing::debug!("Location poll loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquisitionOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Update = Result<DeviceFix, AcquisitionError>;

    /// Scriptable provider that counts calls.
    struct MockProvider {
        watch_supported: bool,
        single_read_supported: bool,
        watch_error: Option<AcquisitionError>,
        read_error: Mutex<Option<AcquisitionError>>,
        watch_tx: Mutex<Option<mpsc::Sender<Update>>>,
        watch_calls: AtomicUsize,
        clear_calls: AtomicUsize,
        read_calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(watch_supported: bool, single_read_supported: bool) -> Self {
            Self {
                watch_supported,
                single_read_supported,
                watch_error: None,
                read_error: Mutex::new(None),
                watch_tx: Mutex::new(None),
                watch_calls: AtomicUsize::new(0),
                clear_calls: AtomicUsize::new(0),
                read_calls: AtomicUsize::new(0),
            }
        }

        fn with_failing_watch(mut self) -> Self {
            self.watch_error = Some(AcquisitionError::new(
                AcquisitionErrorKind::CapabilityMismatch,
                "watch threw",
            ));
            self
        }

        fn with_read_error(self, kind: AcquisitionErrorKind) -> Self {
            *self.read_error.lock().unwrap() = Some(AcquisitionError::from_kind(kind));
            self
        }

        async fn push(&self, update: Update) {
            let tx = self.watch_tx.lock().unwrap().clone().unwrap();
            tx.send(update).await.unwrap();
        }

        fn clears(&self) -> usize {
            self.clear_calls.load(Ordering::SeqCst)
        }
    }

    impl LocationProvider for MockProvider {
        fn supports_watch(&self) -> bool {
            self.watch_supported
        }

        fn supports_single_read(&self) -> bool {
            self.single_read_supported
        }

        fn watch(&self, _options: &AcquisitionOptions) -> Result<Watch, AcquisitionError> {
            self.watch_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = &self.watch_error {
                return Err(e.clone());
            }
            let (tx, rx) = mpsc::channel(8);
            *self.watch_tx.lock().unwrap() = Some(tx);
            Ok(Watch {
                id: WatchId(42),
                updates: rx,
            })
        }

        fn clear_watch(&self, id: WatchId) {
            assert_eq!(id, WatchId(42));
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
        }

        async fn current_position(&self, _options: &AcquisitionOptions) -> Update {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            match self.read_error.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(DeviceFix::new(14.952, -89.531)),
            }
        }
    }

    fn adapter(
        provider: MockProvider,
    ) -> (
        Arc<MockProvider>,
        PositionAcquisition<MockProvider>,
        mpsc::Receiver<AcquisitionEvent>,
    ) {
        let provider = Arc::new(provider);
        let (tx, rx) = mpsc::channel(16);
        let config = AcquisitionConfig {
            poll_interval: Duration::from_secs(5),
            ..Default::default()
        };
        let acquisition = PositionAcquisition::new(Arc::clone(&provider), config, tx);
        (provider, acquisition, rx)
    }

    async fn next_event(rx: &mut mpsc::Receiver<AcquisitionEvent>) -> AcquisitionEvent {
        tokio::time::timeout(Duration::from_secs(30), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    // =========================================================================
    // Start / stop lifecycle
    // =========================================================================

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let (provider, mut acquisition, _rx) = adapter(MockProvider::new(true, true));
        acquisition.stop();
        assert_eq!(acquisition.status(), AcquisitionStatus::Idle);
        assert_eq!(provider.clears(), 0);
        assert_eq!(acquisition.mode(), None);
    }

    #[tokio::test]
    async fn test_watch_mode_delivers_positions() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(true, true));

        acquisition.start().unwrap();
        assert_eq!(acquisition.status(), AcquisitionStatus::RequestingPermission);
        assert_eq!(acquisition.mode(), Some(AcquisitionMode::Watch));

        provider
            .push(Ok(DeviceFix {
                speed: Some(1.5),
                ..DeviceFix::new(14.952, -89.531)
            }))
            .await;

        match next_event(&mut rx).await {
            AcquisitionEvent::Position(sample) => {
                assert_eq!(sample.coordinate().latitude(), 14.952);
                assert_eq!(sample.speed(), Some(1.5));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(acquisition.status(), AcquisitionStatus::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_poll_interval_is_raised_to_minimum() {
        let provider = Arc::new(MockProvider::new(false, true));
        let (tx, mut rx) = mpsc::channel(16);
        let config = AcquisitionConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        let mut acquisition = PositionAcquisition::new(Arc::clone(&provider), config, tx);

        acquisition.start().unwrap();
        assert_eq!(acquisition.mode(), Some(AcquisitionMode::Polling));

        let started = tokio::time::Instant::now();
        for _ in 0..2 {
            assert!(matches!(
                next_event(&mut rx).await,
                AcquisitionEvent::Position(_)
            ));
        }
        assert!(started.elapsed() >= MIN_POLL_INTERVAL);
        assert_eq!(acquisition.status(), AcquisitionStatus::Active);
        assert!(provider.read_calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_double_stop_releases_once() {
        let (provider, mut acquisition, _rx) = adapter(MockProvider::new(true, true));

        acquisition.start().unwrap();
        acquisition.stop();
        acquisition.stop();

        assert_eq!(provider.clears(), 1);
        assert_eq!(acquisition.status(), AcquisitionStatus::Idle);
        assert_eq!(acquisition.mode(), None);
    }

    #[tokio::test]
    async fn test_start_twice_is_noop() {
        let (provider, mut acquisition, _rx) = adapter(MockProvider::new(true, true));

        acquisition.start().unwrap();
        acquisition.start().unwrap();

        assert_eq!(provider.watch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_stops_acquisition() {
        let (provider, mut acquisition, _rx) = adapter(MockProvider::new(true, true));
        acquisition.start().unwrap();
        drop(acquisition);
        assert_eq!(provider.clears(), 1);
    }

    #[tokio::test]
    async fn test_no_events_after_stop() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(true, true));
        acquisition.start().unwrap();
        let tx = provider.watch_tx.lock().unwrap().clone().unwrap();

        acquisition.stop();
        let _ = tx.send(Ok(DeviceFix::new(1.0, 1.0))).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(acquisition.status(), AcquisitionStatus::Idle);
    }

    // =========================================================================
    // Capability probing and fallback
    // =========================================================================

    #[tokio::test]
    async fn test_unsupported_provider() {
        let (_provider, mut acquisition, _rx) = adapter(MockProvider::new(false, false));

        let err = acquisition.start().unwrap_err();
        assert_eq!(err.kind, AcquisitionErrorKind::Unsupported);
        assert_eq!(
            acquisition.status(),
            AcquisitionStatus::Error(AcquisitionErrorKind::Unsupported)
        );
    }

    #[tokio::test]
    async fn test_failing_watch_without_single_read() {
        let (_provider, mut acquisition, _rx) =
            adapter(MockProvider::new(true, false).with_failing_watch());

        let err = acquisition.start().unwrap_err();
        assert_eq!(err.kind, AcquisitionErrorKind::CapabilityMismatch);
        assert_eq!(
            acquisition.status(),
            AcquisitionStatus::Error(AcquisitionErrorKind::CapabilityMismatch)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_watch_falls_back_to_polling() {
        let (provider, mut acquisition, mut rx) =
            adapter(MockProvider::new(true, true).with_failing_watch());

        acquisition.start().unwrap();
        assert_eq!(acquisition.mode(), Some(AcquisitionMode::Polling));

        // First read is immediate, the next one after the poll interval
        assert!(matches!(next_event(&mut rx).await, AcquisitionEvent::Position(_)));
        assert!(matches!(next_event(&mut rx).await, AcquisitionEvent::Position(_)));
        assert!(provider.read_calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(acquisition.status(), AcquisitionStatus::Active);

        acquisition.stop();
        assert_eq!(provider.clears(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_without_watch_capability() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(false, true));

        acquisition.start().unwrap();
        assert_eq!(acquisition.mode(), Some(AcquisitionMode::Polling));
        assert!(matches!(next_event(&mut rx).await, AcquisitionEvent::Position(_)));
        assert_eq!(provider.watch_calls.load(Ordering::SeqCst), 0);
    }

    // =========================================================================
    // Provider failures
    // =========================================================================

    #[tokio::test]
    async fn test_watch_failure_stops_acquisition() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(true, true));
        acquisition.start().unwrap();

        provider
            .push(Err(AcquisitionError::from_kind(
                AcquisitionErrorKind::PermissionDenied,
            )))
            .await;

        match next_event(&mut rx).await {
            AcquisitionEvent::Failed(e) => assert_eq!(e.kind, AcquisitionErrorKind::PermissionDenied),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(
            acquisition.status(),
            AcquisitionStatus::Error(AcquisitionErrorKind::PermissionDenied)
        );
        assert_eq!(provider.clears(), 1);

        acquisition.stop();
        assert_eq!(provider.clears(), 1);
        assert_eq!(acquisition.status(), AcquisitionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failure_is_not_retried() {
        let (provider, mut acquisition, mut rx) =
            adapter(MockProvider::new(false, true).with_read_error(AcquisitionErrorKind::Timeout));
        acquisition.start().unwrap();

        match next_event(&mut rx).await {
            AcquisitionEvent::Failed(e) => assert_eq!(e.kind, AcquisitionErrorKind::Timeout),
            other => panic!("unexpected event {:?}", other),
        }

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(provider.read_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            acquisition.status(),
            AcquisitionStatus::Error(AcquisitionErrorKind::Timeout)
        );
    }

    #[tokio::test]
    async fn test_restart_after_failure() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(true, true));
        acquisition.start().unwrap();
        provider
            .push(Err(AcquisitionError::from_kind(
                AcquisitionErrorKind::PositionUnavailable,
            )))
            .await;
        let _ = next_event(&mut rx).await;

        acquisition.start().unwrap();
        assert_eq!(acquisition.status(), AcquisitionStatus::RequestingPermission);
        assert_eq!(provider.watch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_status_subscription_sees_transitions() {
        let (provider, mut acquisition, mut rx) = adapter(MockProvider::new(true, true));
        let mut status = acquisition.subscribe_status();

        acquisition.start().unwrap();
        provider.push(Ok(DeviceFix::new(0.0, 0.0))).await;
        let _ = next_event(&mut rx).await;

        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), AcquisitionStatus::Active);
    }
}
