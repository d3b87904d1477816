//! Error types for the telemetry feed and publish sink.

use thiserror::Error;

use crate::tracking::EntityId;

/// Errors when subscribing to a telemetry feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Not allowed to read telemetry for '{0}'")]
    PermissionDenied(EntityId),

    #[error("Telemetry feed unavailable: {0}")]
    Unavailable(String),
}

/// Errors when publishing a position report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The backing store refused the write. The user can fix this (sign in,
    /// grant access) so it is reported separately from transport failures.
    #[error("Permission denied publishing position for '{0}'")]
    PermissionDenied(EntityId),

    /// The caller supplied no entity to publish for.
    #[error("No entity id given for position report")]
    MissingEntity,

    #[error("Telemetry store unavailable: {0}")]
    Unavailable(String),
}

impl PublishError {
    /// Whether the end user can act on this error.
    pub fn is_user_actionable(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
