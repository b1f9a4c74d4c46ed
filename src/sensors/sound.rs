//! Loud-sound watcher.
//!
//! Each poll pulls one byte frequency snapshot from the analyser and
//! compares the mean bin intensity against the threshold.  Polling is
//! driven from outside (the service re-arms a one-shot timer after every
//! evaluation); the watcher only guards each cycle with its
//! [`CancelToken`].

use log::{debug, info, warn};

use crate::app::ports::AudioPort;
use crate::error::CaptureError;
use crate::scheduler::CancelToken;

/// Mean intensity across all bins.  An empty snapshot reads as silence.
pub fn mean_intensity(bins: &[u8]) -> f64 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u64 = bins.iter().map(|&b| u64::from(b)).sum();
    sum as f64 / bins.len() as f64
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundPoll {
    /// Token cancelled or capture closed: nothing evaluated, do not re-arm.
    Stopped,
    /// Evaluated below threshold.
    Quiet(f64),
    /// Evaluated above threshold.
    Loud(f64),
}

pub struct SoundWatcher {
    threshold: f64,
    fft_size: usize,
    /// Reused snapshot buffer, `fft_size / 2` bins.
    bins: Vec<u8>,
    token: Option<CancelToken>,
}

impl SoundWatcher {
    pub fn new(threshold: f64, fft_size: usize) -> Self {
        Self {
            threshold,
            fft_size,
            bins: vec![0; fft_size / 2],
            token: None,
        }
    }

    /// Open capture and hand out a fresh cancellation token for the poll
    /// cycle.  On failure the watcher never starts.
    pub fn attach(&mut self, port: &mut impl AudioPort) -> Result<CancelToken, CaptureError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        match port.open(self.fft_size) {
            Ok(()) => {
                let token = CancelToken::new();
                self.token = Some(token.clone());
                info!("Sound watcher attached ({} bins)", self.bins.len());
                Ok(token)
            }
            Err(e) => {
                warn!("Microphone error: {}", e);
                Err(e)
            }
        }
    }

    /// Cancel the poll cycle and release the microphone.
    pub fn detach(&mut self, port: &mut impl AudioPort) {
        if let Some(token) = self.token.take() {
            token.cancel();
            port.close();
            info!("Sound watcher detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.token.is_some()
    }

    /// One poll cycle.  `token` is the clone the pending poll was armed
    /// with; it is checked before anything else.
    pub fn poll(&mut self, token: &CancelToken, port: &mut impl AudioPort) -> SoundPoll {
        if token.is_cancelled() || self.token.is_none() {
            debug!("Sound poll skipped: cancelled");
            return SoundPoll::Stopped;
        }

        port.frequency_data(&mut self.bins);
        let level = mean_intensity(&self.bins);
        debug!("Sound level {:.1}", level);

        if level > self.threshold {
            SoundPoll::Loud(level)
        } else {
            SoundPoll::Quiet(level)
        }
    }
}
