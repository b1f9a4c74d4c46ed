//! Port traits: the hexagonal boundary between domain logic and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (motion sensor, microphone analyser, geolocation, speech,
//! presentation layer) implement these traits.  The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the domain core never touches a platform API directly.
//!
//! ## Failure contract
//!
//! - Acquisition calls return typed errors; the service logs them and keeps
//!   running with whatever capability remains.
//! - Release calls (`stop`, `close`) are infallible and idempotent.
//! - Optional capabilities expose a presence check (`is_supported`,
//!   `is_available`) which the service consults before use.

use crate::config::MonitorConfig;
use crate::error::{CaptureError, LocationError};
use crate::sensors::motion::MotionSample;

// ───────────────────────────────────────────────────────────────
// Motion port (driven adapter: accelerometer → domain)
// ───────────────────────────────────────────────────────────────

/// Accelerometer stream.
pub trait MotionPort {
    /// Start delivering readings at (up to) `frequency_hz`.
    fn start(&mut self, frequency_hz: u16) -> Result<(), CaptureError>;

    /// Stop delivery.  Pending readings are discarded.
    fn stop(&mut self);

    /// Next buffered reading, oldest first.  `None` when drained.
    fn next_reading(&mut self) -> Option<MotionSample>;
}

// ───────────────────────────────────────────────────────────────
// Audio port (driven adapter: microphone + analyser → domain)
// ───────────────────────────────────────────────────────────────

/// Microphone capture feeding a frequency analyser.
pub trait AudioPort {
    /// Acquire the microphone and configure an analyser with `fft_size`.
    fn open(&mut self, fft_size: usize) -> Result<(), CaptureError>;

    /// Disconnect the microphone and shut the analyser down.
    fn close(&mut self);

    /// Fill `bins` with the current byte frequency data (0–255 per bin).
    fn frequency_data(&mut self, bins: &mut [u8]);
}

// ───────────────────────────────────────────────────────────────
// Location port (driven adapter: geolocation → domain)
// ───────────────────────────────────────────────────────────────

/// A resolved position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One-shot geolocation.
pub trait LocationPort {
    /// Whether the platform offers geolocation at all.
    fn is_supported(&self) -> bool;

    /// Resolve the current position.  Completes when the platform answers;
    /// no timeout is imposed here.
    async fn current_position(&mut self) -> Result<Coordinates, LocationError>;
}

// ───────────────────────────────────────────────────────────────
// Speech port (driven adapter: domain → text-to-speech)
// ───────────────────────────────────────────────────────────────

/// Text-to-speech output.  Speaking is fire-and-forget.
pub trait SpeechPort {
    fn is_available(&self) -> bool;

    fn speak(&mut self, utterance: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → presentation / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide what to render or log.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads monitor configuration.
///
/// Implementations MUST validate what they load; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`MonitorConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing store.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}
