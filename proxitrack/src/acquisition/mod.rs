//! Acquisition of the observer's own device position.
//!
//! # Architecture
//!
//! ```text
//! PositionAcquisition (adapter)
//!     │
//!     ├── LocationProvider trait → watch() or current_position()
//!     │
//!     └── mpsc::Sender<AcquisitionEvent>
//!             │
//!             └── SessionRunner → TrackingSession::ingest_local()
//! ```
//!
//! A continuous watch is preferred. If the watch cannot be set up the adapter
//! polls single reads at a fixed interval instead. Either way the consumer
//! sees the same event stream and the same `stop()` contract.

mod adapter;
mod config;
mod error;
mod provider;

pub use adapter::{
    AcquisitionEvent, AcquisitionMode, AcquisitionStatus, PositionAcquisition, MIN_POLL_INTERVAL,
};
pub use config::{
    AcquisitionConfig, AcquisitionOptions, DEFAULT_MAX_CACHED_AGE_MS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_TIMEOUT_MS,
};
pub use error::{AcquisitionError, AcquisitionErrorKind};
pub use provider::{DeviceFix, LocationProvider, StaticLocationProvider, Watch, WatchId};
