//! Error types for device position acquisition.

use std::fmt;

use thiserror::Error;

/// Category of an acquisition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionErrorKind {
    /// The user or platform refused location access.
    PermissionDenied,
    /// The platform could not determine a position.
    PositionUnavailable,
    /// No fix within the configured timeout.
    Timeout,
    /// The platform has no location capability at all.
    Unsupported,
    /// Continuous mode failed and no single-read fallback exists.
    CapabilityMismatch,
}

impl AcquisitionErrorKind {
    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location permission denied. Allow location access to share your position."
            }
            Self::PositionUnavailable => "Your position is currently unavailable.",
            Self::Timeout => "Timed out waiting for your position.",
            Self::Unsupported => "This device does not support location services.",
            Self::CapabilityMismatch => {
                "Continuous location updates failed and this device cannot poll its position."
            }
        }
    }
}

impl fmt::Display for AcquisitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::PositionUnavailable => write!(f, "position unavailable"),
            Self::Timeout => write!(f, "timeout"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::CapabilityMismatch => write!(f, "capability mismatch"),
        }
    }
}

/// An acquisition failure: its kind plus the provider's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AcquisitionError {
    pub kind: AcquisitionErrorKind,
    pub message: String,
}

impl AcquisitionError {
    pub fn new(kind: AcquisitionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build an error carrying the kind's user-facing message.
    pub fn from_kind(kind: AcquisitionErrorKind) -> Self {
        Self::new(kind, kind.user_message())
    }
}
