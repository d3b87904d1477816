//! proxitrack - real-time proximity tracking and ETA for moving vehicles
//!
//! The library follows one tracked remote entity (a bus, say) and the
//! observer's own device position, and keeps a reconciled view of the
//! distance between them, the trend (approaching, receding, stationary) and
//! the estimated time to arrival.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use proxitrack::acquisition::{AcquisitionConfig, StaticLocationProvider};
//! use proxitrack::geodesy::Coordinate;
//! use proxitrack::session::{SessionConfig, SessionRunner, SessionUpdate};
//! use proxitrack::telemetry::InMemoryTelemetryHub;
//!
//! let hub = Arc::new(InMemoryTelemetryHub::new());
//! let device = Arc::new(StaticLocationProvider::at(Coordinate::new(14.952, -89.531)));
//! let (runner, handle) =
//!     SessionRunner::new(hub, device, SessionConfig::default(), AcquisitionConfig::default());
//! let task = runner.start();
//!
//! let mut updates = handle.subscribe();
//! handle.track("bus-7").await?;
//! handle.start_location().await?;
//! while let Ok(SessionUpdate::Snapshot(snapshot)) = updates.recv().await {
//!     println!("{:?} m, eta {:?} s", snapshot.distance_m, snapshot.eta_s);
//! }
//! ```
//!
//! # Modules
//!
//! - [`geodesy`] - great-circle distance, bearing and projection
//! - [`smoother`] - moving averages
//! - [`tracking`] - history, velocity, classification and ETA
//! - [`acquisition`] - device position via watch or polling
//! - [`telemetry`] - remote feed and publish sink
//! - [`session`] - the reconciling controller and its async runner
//! - [`simulation`] - demo producer
//! - [`config`] - INI configuration
//! - [`logging`] - tracing setup

pub mod acquisition;
pub mod config;
pub mod geodesy;
pub mod logging;
pub mod session;
pub mod simulation;
pub mod smoother;
pub mod telemetry;
pub mod tracking;

/// Version of the proxitrack library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
