//! Shared mutable context threaded through every FSM handler.
//!
//! `AlertContext` is the single struct that state handlers read from and
//! write to: the inputs the service latched before a step, the countdown
//! value, the resolved location, and the output flags the service applies
//! afterwards.

use crate::app::dispatch::LocationFix;

// ---------------------------------------------------------------------------
// Inputs (written by the service; cleared after every step)
// ---------------------------------------------------------------------------

/// One-step input latches.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertInputs {
    /// A watcher crossed its threshold.
    pub trigger: bool,
    /// One countdown tick elapsed.
    pub second_elapsed: bool,
    /// The cancel control was pressed (or monitoring was switched off).
    pub cancel: bool,
    /// The alert panel was dismissed.
    pub dismiss: bool,
}

// ---------------------------------------------------------------------------
// Outputs (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct AlertOutputs {
    /// Countdown panel visible *and* tick timer armed.  One flag so the two
    /// cannot diverge.
    pub countdown_armed: bool,
    /// A location request should be issued.  Taken (reset) by the service.
    pub request_location: bool,
}

// ---------------------------------------------------------------------------
// AlertContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct AlertContext {
    // -- Countdown --
    /// Length of a fresh countdown (seconds).
    pub countdown_secs: u16,
    /// Seconds left while counting down.
    pub remaining_secs: u16,

    // -- Dispatch --
    /// Outcome of the location step, once known.
    pub fix: Option<LocationFix>,

    pub inputs: AlertInputs,
    pub outputs: AlertOutputs,
}

impl AlertContext {
    pub fn new(countdown_secs: u16) -> Self {
        Self {
            countdown_secs,
            remaining_secs: 0,
            fix: None,
            inputs: AlertInputs::default(),
            outputs: AlertOutputs::default(),
        }
    }

    /// Drop all latched inputs.
    pub fn clear_inputs(&mut self) {
        self.inputs = AlertInputs::default();
    }
}
