//! Inbound commands to the application service.
//!
//! These represent user actions from the presentation layer that the
//! [`MonitorService`](super::service::MonitorService) interprets and acts
//! upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Flip monitoring on/off (the protection toggle control).
    ToggleMonitoring,

    /// Abort a running countdown (the cancel control).
    CancelAlert,

    /// Hide the alert-sent panel and re-arm the monitor.
    DismissAlert,

    /// Release the sensors and end the session loop.
    Shutdown,
}
