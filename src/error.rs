//! Unified error types for the CrashGuard monitor.
//!
//! Every capability failure maps onto one of a small set of kinds.  None of
//! them are fatal: the service logs them and keeps running on whatever
//! capabilities remain.  All variants are `Copy` so they can be carried in
//! events and alert reports without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the monitor funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor stream could not be acquired.
    Capture { sensor: Sensor, error: CaptureError },
    /// Geolocation failed after the request was issued.
    Location(LocationError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

/// Coarse classification used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Capability absent on this platform.
    SensorUnavailable,
    /// The user declined access.
    PermissionDenied,
    /// Geolocation failed after permission was granted.
    LocationUnresolvable,
    /// Configuration rejected.
    InvalidConfig,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Capture { error, .. } => error.kind(),
            Self::Location(e) => e.kind(),
            Self::Config(_) => ErrorKind::InvalidConfig,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture { sensor, error } => write!(f, "{sensor}: {error}"),
            Self::Location(e) => write!(f, "geolocation: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Which capture stream an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Motion,
    Microphone,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion => write!(f, "motion sensor"),
            Self::Microphone => write!(f, "microphone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The platform has no such capability.
    Unsupported,
    /// The user declined the permission prompt.
    PermissionDenied,
}

impl CaptureError {
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::Unsupported => ErrorKind::SensorUnavailable,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported on this platform"),
            Self::PermissionDenied => write!(f, "permission denied"),
        }
    }
}

// ---------------------------------------------------------------------------
// Geolocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The user declined the location prompt.
    PermissionDenied,
    /// Position could not be determined (signal loss, timeout).
    Unresolvable,
}

impl LocationError {
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Unresolvable => ErrorKind::LocationUnresolvable,
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Unresolvable => write!(f, "position unavailable"),
        }
    }
}

impl From<LocationError> for Error {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
