//! Synchronous reconciliation of remote and local positions.

use crate::acquisition::AcquisitionStatus;
use crate::geodesy;
use crate::tracking::{
    self, EntityId, HistoryBuffer, PositionSample, ProximityClassifier, SpeedSource, TrackingState,
    VelocityEstimate, DEFAULT_DISTANCE_CAPACITY, DEFAULT_POSITION_CAPACITY,
    DEFAULT_STATIONARY_THRESHOLD_M,
};

/// Tuning for a [`TrackingSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Remote samples kept for the tracked entity.
    pub history_capacity: usize,
    /// Distances kept for trend classification.
    pub distance_history_capacity: usize,
    /// Noise band for the stationary state, in meters.
    pub stationary_threshold_m: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_POSITION_CAPACITY,
            distance_history_capacity: DEFAULT_DISTANCE_CAPACITY,
            stationary_threshold_m: DEFAULT_STATIONARY_THRESHOLD_M,
        }
    }
}

/// Reconciled view emitted after every recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySnapshot {
    pub entity: Option<EntityId>,
    /// Meters between the entity and the observer.
    pub distance_m: Option<f64>,
    /// Bearing from the observer to the entity, degrees true.
    pub bearing_deg: Option<f64>,
    pub eta_s: Option<f64>,
    pub velocity_mps: Option<f64>,
    pub speed_source: Option<SpeedSource>,
    pub state: TrackingState,
    pub latest_remote: Option<PositionSample>,
    pub latest_local: Option<PositionSample>,
    /// Whether a consumer may auto-center on the entity.
    pub follow_recommended: bool,
    pub acquisition: AcquisitionStatus,
}

#[derive(Debug, Clone, Default)]
struct Derived {
    distance_m: Option<f64>,
    bearing_deg: Option<f64>,
    eta_s: Option<f64>,
    velocity: Option<VelocityEstimate>,
}

/// Owns one tracked entity's history and the observer's reference position.
///
/// Every ingest runs to completion before returning: callers that merge
/// several feeds serialize their events through one owner (see
/// [`SessionRunner`](super::SessionRunner)).
#[derive(Debug)]
pub struct TrackingSession {
    config: SessionConfig,
    entity: Option<EntityId>,
    history: HistoryBuffer<PositionSample>,
    distances: HistoryBuffer<f64>,
    classifier: ProximityClassifier,
    reference: Option<PositionSample>,
    user_interacted: bool,
    acquisition: AcquisitionStatus,
    derived: Derived,
}

impl TrackingSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            history: HistoryBuffer::new(config.history_capacity),
            distances: HistoryBuffer::new(config.distance_history_capacity),
            classifier: ProximityClassifier::new(config.stationary_threshold_m),
            config,
            entity: None,
            reference: None,
            user_interacted: false,
            acquisition: AcquisitionStatus::Idle,
            derived: Derived::default(),
        }
    }

    /// Begin tracking `entity`, discarding all history from before.
    ///
    /// Also resets when re-tracking the current entity.
    pub fn track(&mut self, entity: EntityId) {
        tracing::info!(
            entity = %entity,
            previous = ?self.entity.as_ref().map(EntityId::as_str),
            "Tracking entity"
        );
        self.reset_history();
        self.entity = Some(entity);
    }

    /// Forget the tracked entity and its history.
    pub fn stop_tracking(&mut self) {
        if let Some(entity) = self.entity.take() {
            tracing::info!(entity = %entity, "Stopped tracking entity");
        }
        self.reset_history();
    }

    pub fn tracked(&self) -> Option<&EntityId> {
        self.entity.as_ref()
    }

    /// Apply one feed delivery (newest first).
    ///
    /// Deliveries for any other entity are ignored. Samples already held are
    /// skipped and the rest are appended oldest first. Returns `None` when the
    /// delivery was ignored or carried nothing new.
    pub fn ingest_remote(
        &mut self,
        entity: &EntityId,
        samples: &[PositionSample],
    ) -> Option<ProximitySnapshot> {
        if self.entity.as_ref() != Some(entity) {
            tracing::trace!(entity = %entity, "Ignoring delivery for untracked entity");
            return None;
        }

        // Everything newer than our latest sample, or everything we do not
        // hold if the latest has already dropped out of the feed window.
        let fresh: Vec<&PositionSample> = match self
            .history
            .latest()
            .and_then(|latest| samples.iter().position(|s| s == latest))
        {
            Some(index) => samples[..index].iter().collect(),
            None => samples
                .iter()
                .filter(|s| !self.history.contains(s))
                .collect(),
        };

        if fresh.is_empty() {
            tracing::trace!(entity = %entity, "Delivery carried no new samples");
            return None;
        }

        let count = fresh.len();
        for sample in fresh.into_iter().rev() {
            self.history.push(sample.clone());
        }

        self.recompute();
        tracing::debug!(
            entity = %entity,
            new_samples = count,
            distance_m = ?self.derived.distance_m,
            eta_s = ?self.derived.eta_s,
            state = %self.classifier.state(),
            "Remote position update"
        );
        Some(self.snapshot())
    }

    /// Update the observer's reference position.
    pub fn ingest_local(&mut self, sample: PositionSample) -> ProximitySnapshot {
        self.reference = Some(sample);
        self.recompute();
        tracing::debug!(
            distance_m = ?self.derived.distance_m,
            state = %self.classifier.state(),
            "Local position update"
        );
        self.snapshot()
    }

    /// Forget the reference position and the distance trend.
    pub fn clear_reference(&mut self) {
        self.reference = None;
        self.distances.clear();
        self.classifier.reset();
        self.derived.distance_m = None;
        self.derived.bearing_deg = None;
        self.derived.eta_s = None;
    }

    /// Latch that the user moved the view manually. Never cleared.
    pub fn mark_user_interaction(&mut self) {
        if !self.user_interacted {
            tracing::debug!("User interaction latched, no longer recommending follow");
            self.user_interacted = true;
        }
    }

    pub fn user_interacted(&self) -> bool {
        self.user_interacted
    }

    pub fn set_acquisition_status(&mut self, status: AcquisitionStatus) {
        self.acquisition = status;
    }

    /// Distance trend, oldest first.
    pub fn distances(&self) -> &HistoryBuffer<f64> {
        &self.distances
    }

    pub fn history(&self) -> &HistoryBuffer<PositionSample> {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ProximitySnapshot {
        let latest_remote = self.history.latest().cloned();
        ProximitySnapshot {
            entity: self.entity.clone(),
            distance_m: self.derived.distance_m,
            bearing_deg: self.derived.bearing_deg,
            eta_s: self.derived.eta_s,
            velocity_mps: self.derived.velocity.map(|v| v.meters_per_second),
            speed_source: self.derived.velocity.map(|v| v.source),
            state: self.classifier.state(),
            follow_recommended: !self.user_interacted && latest_remote.is_some(),
            latest_remote,
            latest_local: self.reference.clone(),
            acquisition: self.acquisition,
        }
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.distances.clear();
        self.classifier.reset();
        self.derived = Derived::default();
    }

    fn recompute(&mut self) {
        self.derived.velocity = tracking::estimate_with_source(&self.history);

        let (Some(remote), Some(local)) = (self.history.latest(), self.reference.as_ref()) else {
            self.derived.distance_m = None;
            self.derived.bearing_deg = None;
            self.derived.eta_s = None;
            return;
        };

        let distance = geodesy::distance(remote.coordinate(), local.coordinate());
        self.derived.distance_m = Some(distance);
        self.derived.bearing_deg = Some(geodesy::bearing(local.coordinate(), remote.coordinate()));
        self.distances.push(distance);
        self.classifier.update(&self.distances);
        self.derived.eta_s = tracking::eta(
            distance,
            self.derived.velocity.map(|v| v.meters_per_second),
        );
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
