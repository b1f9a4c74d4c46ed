//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  They double as
//! the presentation layer's render hooks: status indicator, countdown
//! number, and the alert-sent panel with its coordinate fields.

use super::dispatch::{CoordinateText, LocationFix};
use super::service::MonitoringState;
use crate::error::{CaptureError, Sensor};
use crate::fsm::StateId;
use crate::sensors::TriggerSource;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial alert state).
    Started(StateId),

    /// Monitoring was toggled.
    MonitoringChanged(MonitoringState),

    /// A watcher could not acquire its sensor and stays off.
    WatcherFailed { sensor: Sensor, error: CaptureError },

    /// A watcher crossed its threshold.
    Triggered { source: TriggerSource, level: f64 },

    /// The alert FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Countdown panel shown with this many seconds.
    CountdownStarted { seconds: u16 },

    /// Countdown number changed.
    CountdownTick { remaining: u16 },

    /// Countdown panel hidden without dispatching.
    CountdownCancelled(CancelReason),

    /// Countdown reached zero; location request issued.
    Locating,

    /// Alert-sent panel shown.
    AlertSent(AlertReport),

    /// Alert-sent panel hidden; the monitor is re-armed.
    AlertDismissed,
}

/// Why a countdown ended without an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The user pressed cancel.
    User,
    /// Monitoring was switched off mid-countdown.
    Deactivated,
}

/// What the alert-sent panel displays.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertReport {
    pub fix: LocationFix,
    /// Latitude field text (rounded, or an "Unavailable"/"Unsupported" marker).
    pub latitude: CoordinateText,
    /// Longitude field text.
    pub longitude: CoordinateText,
    /// Whether a spoken announcement was issued.
    pub announced: bool,
}
