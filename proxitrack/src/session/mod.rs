//! Tracking session: one tracked entity, one observer, one derived view.
//!
//! - [`TrackingSession`] - synchronous core; every ingest recomputes
//!   distance, bearing, ETA and state before returning
//! - [`SessionRunner`] - async task that serializes the telemetry feed,
//!   local acquisition and control commands into the core
//! - [`SessionHandle`] - cloneable control and subscription handle

mod controller;
mod runner;

pub use controller::{ProximitySnapshot, SessionConfig, TrackingSession};
pub use runner::{SessionCommand, SessionError, SessionHandle, SessionRunner, SessionUpdate};
