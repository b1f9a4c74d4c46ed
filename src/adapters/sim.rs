//! Simulated platform adapters for the host binary.
//!
//! - [`SimulatedSensors`] replays a motion script against wall time and
//!   reports a constant sound level.
//! - [`SimulatedLocation`] answers with a fixed position after a latency.
//! - [`LogSpeech`] writes announcements to the log.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::app::ports::{AudioPort, Coordinates, LocationPort, MotionPort, SpeechPort};
use crate::error::{CaptureError, LocationError};
use crate::sensors::motion::MotionSample;

// ── Sensors ──────────────────────────────────────────────────

pub struct SimulatedSensors {
    /// `(offset from start, reading)`, oldest first.
    script: VecDeque<(Duration, MotionSample)>,
    motion_started: Option<Instant>,
    motion: Result<(), CaptureError>,
    microphone: Result<(), CaptureError>,
    sound_level: u8,
    audio_open: bool,
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensors {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            motion_started: None,
            motion: Ok(()),
            microphone: Ok(()),
            sound_level: 0,
            audio_open: false,
        }
    }

    /// Deliver `sample` once `offset` has passed since the stream started.
    pub fn with_reading(mut self, offset: Duration, sample: MotionSample) -> Self {
        self.script.push_back((offset, sample));
        self
    }

    /// Flat intensity reported in every bin.
    pub fn with_sound_level(mut self, level: u8) -> Self {
        self.sound_level = level;
        self
    }

    pub fn without_motion(mut self, error: CaptureError) -> Self {
        self.motion = Err(error);
        self
    }

    pub fn without_microphone(mut self, error: CaptureError) -> Self {
        self.microphone = Err(error);
        self
    }
}

impl MotionPort for SimulatedSensors {
    fn start(&mut self, frequency_hz: u16) -> Result<(), CaptureError> {
        self.motion?;
        debug!("SimSensors: motion stream at {} Hz", frequency_hz);
        self.motion_started = Some(Instant::now());
        Ok(())
    }

    fn stop(&mut self) {
        self.motion_started = None;
    }

    fn next_reading(&mut self) -> Option<MotionSample> {
        let started = self.motion_started?;
        let &(offset, sample) = self.script.front()?;
        if started.elapsed() < offset {
            return None;
        }
        self.script.pop_front();
        Some(sample)
    }
}

impl AudioPort for SimulatedSensors {
    fn open(&mut self, fft_size: usize) -> Result<(), CaptureError> {
        self.microphone?;
        debug!("SimSensors: analyser open, fft_size={}", fft_size);
        self.audio_open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.audio_open = false;
    }

    fn frequency_data(&mut self, bins: &mut [u8]) {
        let level = if self.audio_open { self.sound_level } else { 0 };
        bins.fill(level);
    }
}

// ── Location ─────────────────────────────────────────────────

pub struct SimulatedLocation {
    /// `None` models a platform without geolocation.
    answer: Option<Result<Coordinates, LocationError>>,
    latency: Duration,
}

impl SimulatedLocation {
    pub fn fixed(position: Coordinates, latency: Duration) -> Self {
        Self {
            answer: Some(Ok(position)),
            latency,
        }
    }

    pub fn failing(error: LocationError, latency: Duration) -> Self {
        Self {
            answer: Some(Err(error)),
            latency,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            answer: None,
            latency: Duration::ZERO,
        }
    }
}

impl LocationPort for SimulatedLocation {
    fn is_supported(&self) -> bool {
        self.answer.is_some()
    }

    async fn current_position(&mut self) -> Result<Coordinates, LocationError> {
        async_io_mini::Timer::after(self.latency).await;
        self.answer.unwrap_or(Err(LocationError::Unresolvable))
    }
}

// ── Speech ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LogSpeech {
    muted: bool,
    spoken: Vec<String>,
}

impl LogSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn muted() -> Self {
        Self {
            muted: true,
            spoken: Vec::new(),
        }
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl SpeechPort for LogSpeech {
    fn is_available(&self) -> bool {
        !self.muted
    }

    fn speak(&mut self, utterance: &str) {
        info!("SPEECH | \"{}\"", utterance);
        self.spoken.push(utterance.to_owned());
    }
}
