//! Monitor configuration parameters
//!
//! All tunable parameters for the CrashGuard monitor.
//! Values can be overridden from a JSON file via a [`ConfigPort`] adapter.
//!
//! [`ConfigPort`]: crate::app::ports::ConfigPort

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Motion ---
    /// Acceleration magnitude above which a crash is assumed
    pub motion_threshold: f64,
    /// Sampling frequency requested from the motion sensor (Hz)
    pub motion_frequency_hz: u16,

    // --- Sound ---
    /// Mean frequency-bin intensity (0-255) above which a sound is "loud"
    pub sound_threshold: f64,
    /// FFT size used by the audio analyser; yields `fft_size / 2` bins
    pub fft_size: usize,
    /// Delay between sound polls (milliseconds)
    pub sound_poll_interval_ms: u32,

    // --- Alert ---
    /// Countdown length before the alert is dispatched (seconds)
    pub countdown_secs: u16,
    /// Countdown tick period (milliseconds)
    pub countdown_tick_ms: u32,
    /// Decimal places shown for latitude/longitude
    pub coordinate_decimals: u8,
    /// Whether switching monitoring off cancels a live countdown
    pub cancel_countdown_on_deactivate: bool,

    // --- Timing ---
    /// Session clock resolution (milliseconds)
    pub clock_resolution_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Motion
            motion_threshold: 15.0,
            motion_frequency_hz: 1000,

            // Sound
            sound_threshold: 80.0,
            fft_size: 256,
            sound_poll_interval_ms: 2000,

            // Alert
            countdown_secs: 10,
            countdown_tick_ms: 1000,
            coordinate_decimals: 6,
            cancel_countdown_on_deactivate: true,

            // Timing
            clock_resolution_ms: 10,
        }
    }
}

impl MonitorConfig {
    /// Number of frequency bins produced per sound poll.
    pub fn frequency_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.motion_threshold.is_finite() && self.motion_threshold > 0.0) {
            return Err(ConfigError::ValidationFailed("motion_threshold must be > 0"));
        }
        if self.motion_frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("motion_frequency_hz must be > 0"));
        }
        if !(self.sound_threshold.is_finite() && self.sound_threshold > 0.0) {
            return Err(ConfigError::ValidationFailed("sound_threshold must be > 0"));
        }
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(ConfigError::ValidationFailed(
                "fft_size must be a power of two in 32..=32768",
            ));
        }
        if self.sound_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("sound_poll_interval_ms must be > 0"));
        }
        if self.countdown_secs == 0 {
            return Err(ConfigError::ValidationFailed("countdown_secs must be > 0"));
        }
        if self.countdown_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("countdown_tick_ms must be > 0"));
        }
        if self.coordinate_decimals > 10 {
            return Err(ConfigError::ValidationFailed("coordinate_decimals must be <= 10"));
        }
        if self.clock_resolution_ms == 0 {
            return Err(ConfigError::ValidationFailed("clock_resolution_ms must be > 0"));
        }
        Ok(())
    }
}
