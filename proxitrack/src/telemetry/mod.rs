//! Remote telemetry: the feed the session consumes and the sink producers
//! publish into.
//!
//! The backing store is external; [`TelemetryFeed`] and [`PublishSink`] are
//! the seams. [`InMemoryTelemetryHub`] implements both for demos and tests.
//! [`LocationSharer`] publishes the device's own fixes into a sink.

mod error;
mod feed;
mod hub;
mod record;
mod share;

pub use error::{FeedError, PublishError};
pub use feed::{FeedSubscription, PublishSink, TelemetryFeed};
pub use hub::{InMemoryTelemetryHub, DEFAULT_RETAINED_RECORDS};
pub use record::{PositionReport, TelemetryRecord, SIMULATED_KEY};
pub use share::{LocationSharer, ShareError, DRIVER_SOURCE, SOURCE_KEY};
