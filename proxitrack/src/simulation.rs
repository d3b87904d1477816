//! Demo producer that drives an entity toward a target.
//!
//! [`Simulator`] is the pure stepping logic: each step moves at most
//! `step_m` toward the target by linear interpolation of latitude and
//! longitude, measures the speed covered over the step, and smooths it.
//! [`SimulationProducer`] runs a simulator on a timer and publishes each
//! position to a [`PublishSink`], flagged as simulated.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::geodesy::{self, Coordinate};
use crate::smoother::MovingAverage;
use crate::telemetry::{PositionReport, PublishError, PublishSink, SIMULATED_KEY};
use crate::tracking::{self, EntityId, HistoryBuffer, ProximityClassifier, TrackingState};

/// Default distance moved per tick.
pub const DEFAULT_STEP_M: f64 = 20.0;

/// Default tick interval.
pub const DEFAULT_TICK_MS: u64 = 1_500;

/// Default speed smoothing window.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 2;

/// Default noise band for simulated data.
pub const DEFAULT_SIMULATION_THRESHOLD_M: f64 = 0.5;

/// Remaining distance at which the entity counts as arrived.
pub const ARRIVAL_THRESHOLD_M: f64 = 0.5;

/// Distances kept for the simulator's own classification.
const DISTANCE_HISTORY: usize = 10;

/// Errors from running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Simulation step interval must be positive (got {0}s)")]
    NonPositiveInterval(f64),

    #[error("Failed to publish simulated position: {0}")]
    Publish(#[from] PublishError),
}

/// Simulation tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub step_m: f64,
    pub tick: Duration,
    pub smoothing_window: usize,
    pub stationary_threshold_m: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_m: DEFAULT_STEP_M,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            stationary_threshold_m: DEFAULT_SIMULATION_THRESHOLD_M,
        }
    }
}

/// Result of one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStep {
    pub position: Coordinate,
    pub remaining_m: f64,
    /// Speed over this step alone.
    pub raw_speed_mps: f64,
    /// Moving average of raw speeds, rounded to centimeters per second.
    pub speed_mps: f64,
    pub state: TrackingState,
    pub eta_s: Option<f64>,
    pub arrived: bool,
}

/// Moves a position toward a fixed target in bounded steps.
#[derive(Debug, Clone)]
pub struct Simulator {
    position: Coordinate,
    target: Coordinate,
    step_m: f64,
    speed: MovingAverage,
    distances: HistoryBuffer<f64>,
    classifier: ProximityClassifier,
}

impl Simulator {
    pub fn new(start: Coordinate, target: Coordinate, config: &SimulationConfig) -> Self {
        Self {
            position: start,
            target,
            step_m: config.step_m,
            speed: MovingAverage::new(config.smoothing_window),
            distances: HistoryBuffer::new(DISTANCE_HISTORY),
            classifier: ProximityClassifier::new(config.stationary_threshold_m),
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn target(&self) -> Coordinate {
        self.target
    }

    pub fn remaining_m(&self) -> f64 {
        geodesy::distance(self.position, self.target)
    }

    pub fn has_arrived(&self) -> bool {
        self.remaining_m() < ARRIVAL_THRESHOLD_M
    }

    /// Advance by one step covering `dt_secs` seconds.
    pub fn step(&mut self, dt_secs: f64) -> Result<SimulationStep, SimulationError> {
        if !dt_secs.is_finite() || dt_secs <= 0.0 {
            return Err(SimulationError::NonPositiveInterval(dt_secs));
        }

        let current = self.remaining_m();
        let step = self.step_m.min(current);

        let factor = step / current.max(1.0);
        let next = Coordinate::new(
            self.position.latitude() + (self.target.latitude() - self.position.latitude()) * factor,
            self.position.longitude()
                + (self.target.longitude() - self.position.longitude()) * factor,
        );
        let remaining = geodesy::distance(next, self.target);

        // The final step lands on the target, so count the whole step
        let raw_speed = if step == current {
            step / dt_secs
        } else {
            (current - remaining) / dt_secs
        };
        let speed = (self.speed.push(raw_speed) * 100.0).round() / 100.0;

        self.position = next;
        self.distances.push(remaining);
        let state = self.classifier.update(&self.distances);

        Ok(SimulationStep {
            position: next,
            remaining_m: remaining,
            raw_speed_mps: raw_speed,
            speed_mps: speed,
            state,
            eta_s: tracking::eta(remaining, Some(speed)),
            arrived: remaining < ARRIVAL_THRESHOLD_M,
        })
    }
}

/// Publishes simulator steps to a sink on a fixed tick.
pub struct SimulationProducer<S: PublishSink> {
    sink: Arc<S>,
    entity: EntityId,
    simulator: Simulator,
    tick: Duration,
    max_steps: Option<u32>,
    cancel: CancellationToken,
}

impl<S: PublishSink> SimulationProducer<S> {
    pub fn new(
        sink: Arc<S>,
        entity: EntityId,
        simulator: Simulator,
        tick: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sink,
            entity,
            simulator,
            tick,
            max_steps: None,
            cancel,
        }
    }

    /// Stop after `max_steps` even if the target has not been reached.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Start the producer as an async task.
    pub fn start(self) -> JoinHandle<Result<u32, SimulationError>> {
        tokio::spawn(self.run())
    }

    /// Run until arrival, cancellation or `max_steps`. Returns the number of
    /// positions published.
    ///
    /// A publish failure ends the run and is returned unchanged. A zero tick
    /// is rejected before anything is published.
    pub async fn run(mut self) -> Result<u32, SimulationError> {
        if self.tick.is_zero() {
            return Err(SimulationError::NonPositiveInterval(0.0));
        }

        tracing::info!(
            entity = %self.entity,
            from = %self.simulator.position(),
            to = %self.simulator.target(),
            remaining_m = format!("{:.1}", self.simulator.remaining_m()),
            "Simulation started"
        );

        let mut last = Instant::now();
        let mut interval = tokio::time::interval_at(last + self.tick, self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut published = 0u32;

        while !self.simulator.has_arrived() && self.max_steps.map_or(true, |max| published < max) {
            let now = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(entity = %self.entity, "Simulation cancelled");
                    break;
                }
                now = interval.tick() => now,
            };

            let dt = now.duration_since(last).as_secs_f64();
            last = now;
            let step = self.simulator.step(dt)?;

            let report = PositionReport::new(step.position)
                .with_speed(Some(step.speed_mps))
                .with_extra(SIMULATED_KEY, true);
            self.sink.publish(&self.entity, report).await?;
            published += 1;

            tracing::debug!(
                entity = %self.entity,
                remaining_m = format!("{:.1}", step.remaining_m),
                speed_mps = step.speed_mps,
                state = %step.state,
                "Simulated position published"
            );
        }

        tracing::info!(entity = %self.entity, published, "Simulation finished");
        Ok(published)
    }
}
