//! Simulate command - drive a simulated vehicle toward a fixed observer.
//!
//! Wires the demo producer into an in-memory hub, tracks the entity with a
//! live [`SessionRunner`] whose observer sits at the target, and prints every
//! snapshot the session broadcasts.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use proxitrack::acquisition::StaticLocationProvider;
use proxitrack::geodesy::Coordinate;
use proxitrack::session::{ProximitySnapshot, SessionRunner, SessionUpdate};
use proxitrack::simulation::{SimulationError, SimulationProducer, Simulator};
use proxitrack::telemetry::InMemoryTelemetryHub;
use proxitrack::tracking::EntityId;

use crate::error::CliError;
use crate::format::{format_distance, format_eta, format_speed};
use crate::runner::CliRunner;

/// How long to keep printing after the producer finishes.
const DRAIN_IDLE: Duration = Duration::from_millis(250);

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub entity: String,
    pub from: Coordinate,
    pub to: Coordinate,
    /// Stop after this many published positions
    pub ticks: Option<u32>,
    /// Overrides `[simulation] tick_ms`
    pub tick_ms: Option<u64>,
    /// Overrides `[simulation] step_m`
    pub step_m: Option<f64>,
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("simulate");

    let entity = EntityId::new(args.entity.trim());
    if entity.is_blank() {
        return Err(CliError::Config("--entity must not be empty".to_string()));
    }
    if let Some(step_m) = args.step_m {
        if !step_m.is_finite() || step_m <= 0.0 {
            return Err(CliError::Config(format!(
                "--step-m must be a positive number of meters (got {})",
                step_m
            )));
        }
    }
    if args.tick_ms == Some(0) {
        return Err(CliError::Config("--tick-ms must be positive".to_string()));
    }

    let config = runner.config();
    let mut simulation_config = config.to_simulation_config();
    if let Some(step_m) = args.step_m {
        simulation_config.step_m = step_m;
    }
    if let Some(tick_ms) = args.tick_ms {
        simulation_config.tick = Duration::from_millis(tick_ms);
    }
    let session_config = config.to_session_config();
    let acquisition_config = config.to_acquisition_config();

    println!(
        "Simulating '{}' from {} to {} ({} per {} ms)",
        entity,
        args.from,
        args.to,
        format_distance(Some(simulation_config.step_m)),
        simulation_config.tick.as_millis()
    );
    println!();

    let runtime = runner.runtime()?;
    runtime.block_on(async move {
        let hub = Arc::new(InMemoryTelemetryHub::new());
        let observer = Arc::new(StaticLocationProvider::at(args.to));

        let (session, handle) =
            SessionRunner::new(hub.clone(), observer, session_config, acquisition_config);
        let session_task = session.start();
        let mut updates = handle.subscribe();

        handle.track(entity.clone()).await?;
        handle.start_location().await?;

        let cancel = CancellationToken::new();
        let simulator = Simulator::new(args.from, args.to, &simulation_config);
        let mut producer =
            SimulationProducer::new(hub, entity, simulator, simulation_config.tick, cancel.clone());
        if let Some(ticks) = args.ticks {
            producer = producer.with_max_steps(ticks);
        }
        let mut producer_task = producer.start();

        let mut produced: Option<Result<u32, SimulationError>> = None;
        let mut printed = 0u32;

        loop {
            let update = if produced.is_some() {
                match tokio::time::timeout(DRAIN_IDLE, updates.recv()).await {
                    Ok(update) => update,
                    Err(_) => break,
                }
            } else {
                tokio::select! {
                    joined = &mut producer_task => {
                        produced = Some(joined.map_err(|e| CliError::Task(e.to_string()))?);
                        continue;
                    }
                    update = updates.recv() => update,
                }
            };

            match update {
                Ok(SessionUpdate::Snapshot(snapshot)) => {
                    if snapshot.latest_remote.is_some() {
                        printed += 1;
                        println!("{}", snapshot_line(printed, &snapshot));
                    }
                }
                Ok(SessionUpdate::FeedFailed(e)) => {
                    eprintln!("Feed error: {}", e);
                    cancel.cancel();
                }
                Ok(SessionUpdate::AcquisitionFailed(e)) => {
                    eprintln!("Location error: {}", e.kind.user_message());
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Snapshot printer lagging behind session");
                }
                Err(RecvError::Closed) => break,
            }
        }

        handle.shutdown();
        if let Err(e) = session_task.await {
            warn!(error = %e, "Tracking session task failed");
        }

        let published = match produced {
            Some(result) => result?,
            None => 0,
        };
        info!(published, printed, "Simulation command finished");
        println!();
        println!("Published {} positions", published);

        Ok::<(), CliError>(())
    })
}

/// One output line per snapshot.
fn snapshot_line(index: u32, snapshot: &ProximitySnapshot) -> String {
    format!(
        "#{:<3} {:<12} distance {:<24} ETA {:<22} speed {}",
        index,
        snapshot.state.to_string(),
        format_distance(snapshot.distance_m),
        format_eta(snapshot.eta_s),
        format_speed(snapshot.velocity_mps)
    )
}
