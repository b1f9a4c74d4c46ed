//! Accelerometer crash watcher.
//!
//! Computes the Euclidean magnitude of each reading and flags it when it
//! exceeds the configured threshold.  No smoothing or debouncing: repeat
//! spikes are absorbed by the trigger's own idempotence.

use log::{info, warn};

use crate::app::ports::MotionPort;
use crate::error::CaptureError;

/// One accelerometer reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MotionSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// `sqrt(x² + y² + z²)`
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

pub struct MotionWatcher {
    threshold: f64,
    frequency_hz: u16,
    attached: bool,
}

impl MotionWatcher {
    pub fn new(threshold: f64, frequency_hz: u16) -> Self {
        Self {
            threshold,
            frequency_hz,
            attached: false,
        }
    }

    /// Start the sensor stream.  On failure the watcher stays detached.
    pub fn attach(&mut self, port: &mut impl MotionPort) -> Result<(), CaptureError> {
        if self.attached {
            return Ok(());
        }
        match port.start(self.frequency_hz) {
            Ok(()) => {
                self.attached = true;
                info!("Motion watcher attached at {} Hz", self.frequency_hz);
                Ok(())
            }
            Err(e) => {
                warn!("Accelerometer error: {}", e);
                Err(e)
            }
        }
    }

    /// Stop the sensor stream.  No-op when never attached.
    pub fn detach(&mut self, port: &mut impl MotionPort) {
        if self.attached {
            port.stop();
            self.attached = false;
            info!("Motion watcher detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// `Some(magnitude)` if the sample exceeds the threshold.
    pub fn evaluate(&self, sample: &MotionSample) -> Option<f64> {
        let force = sample.magnitude();
        (force > self.threshold).then_some(force)
    }
}
