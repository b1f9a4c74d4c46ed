//! Mock platform adapters for integration tests.
//!
//! Records every port call so tests can assert on the full history
//! without a real accelerometer, microphone, geolocation or speech engine.

use std::collections::VecDeque;

use crashguard::app::events::{AlertReport, AppEvent, CancelReason};
use crashguard::app::ports::{
    AudioPort, Coordinates, EventSink, LocationPort, MotionPort, SpeechPort,
};
use crashguard::app::service::{DispatchRequest, MonitorService};
use crashguard::config::MonitorConfig;
use crashguard::error::{CaptureError, LocationError};
use crashguard::sensors::motion::MotionSample;

pub const SF: Coordinates = Coordinates {
    latitude: 37.7749,
    longitude: -122.4194,
};

// ── MockSensors ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorCall {
    MotionStart(u16),
    MotionStop,
    AudioOpen(usize),
    AudioClose,
    Snapshot,
}

pub struct MockSensors {
    pub calls: Vec<SensorCall>,
    pub readings: VecDeque<MotionSample>,
    pub sound_level: u8,
    pub motion_error: Option<CaptureError>,
    pub audio_error: Option<CaptureError>,
    pub motion_running: bool,
    pub audio_open: bool,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            readings: VecDeque::new(),
            sound_level: 0,
            motion_error: None,
            audio_error: None,
            motion_running: false,
            audio_open: false,
        }
    }

    pub fn push_reading(&mut self, x: f64, y: f64, z: f64) {
        self.readings.push_back(MotionSample::new(x, y, z));
    }

    pub fn snapshots(&self) -> usize {
        self.calls.iter().filter(|c| **c == SensorCall::Snapshot).count()
    }
}

impl Default for MockSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPort for MockSensors {
    fn start(&mut self, frequency_hz: u16) -> Result<(), CaptureError> {
        if let Some(e) = self.motion_error {
            return Err(e);
        }
        self.calls.push(SensorCall::MotionStart(frequency_hz));
        self.motion_running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.push(SensorCall::MotionStop);
        self.motion_running = false;
    }

    fn next_reading(&mut self) -> Option<MotionSample> {
        if !self.motion_running {
            return None;
        }
        self.readings.pop_front()
    }
}

impl AudioPort for MockSensors {
    fn open(&mut self, fft_size: usize) -> Result<(), CaptureError> {
        if let Some(e) = self.audio_error {
            return Err(e);
        }
        self.calls.push(SensorCall::AudioOpen(fft_size));
        self.audio_open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.calls.push(SensorCall::AudioClose);
        self.audio_open = false;
    }

    fn frequency_data(&mut self, bins: &mut [u8]) {
        self.calls.push(SensorCall::Snapshot);
        bins.fill(self.sound_level);
    }
}

// ── MockLocation ──────────────────────────────────────────────

pub struct MockLocation {
    /// `None` models a platform without geolocation.
    pub answer: Option<Result<Coordinates, LocationError>>,
    pub requests: u32,
}

#[allow(dead_code)]
impl MockLocation {
    pub fn at(c: Coordinates) -> Self {
        Self {
            answer: Some(Ok(c)),
            requests: 0,
        }
    }

    pub fn denied() -> Self {
        Self {
            answer: Some(Err(LocationError::PermissionDenied)),
            requests: 0,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            answer: None,
            requests: 0,
        }
    }
}

impl LocationPort for MockLocation {
    fn is_supported(&self) -> bool {
        self.answer.is_some()
    }

    async fn current_position(&mut self) -> Result<Coordinates, LocationError> {
        self.requests += 1;
        self.answer.unwrap_or(Err(LocationError::Unresolvable))
    }
}

// ── MockSpeech ────────────────────────────────────────────────

pub struct MockSpeech {
    pub available: bool,
    pub spoken: Vec<String>,
}

#[allow(dead_code)]
impl MockSpeech {
    pub fn new() -> Self {
        Self {
            available: true,
            spoken: Vec::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            spoken: Vec::new(),
        }
    }
}

impl SpeechPort for MockSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: &str) {
        self.spoken.push(utterance.to_owned());
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event for inspection.
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn countdown_ticks(&self) -> Vec<u16> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CountdownTick { remaining } => Some(*remaining),
                _ => None,
            })
            .collect()
    }

    pub fn countdowns_started(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CountdownStarted { .. }))
            .count()
    }

    pub fn cancellations(&self) -> Vec<CancelReason> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::CountdownCancelled(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<AlertReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::AlertSent(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// A started service with its mock sensors and sink.
pub struct Bench {
    pub app: MonitorService,
    pub sensors: MockSensors,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Bench {
    pub fn new() -> Self {
        Self::with_config(MonitorConfig::default())
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        let mut app = MonitorService::new(config);
        let mut sink = RecordingSink::new();
        app.start(&mut sink);
        Self {
            app,
            sensors: MockSensors::new(),
            sink,
        }
    }

    pub fn toggle(&mut self) {
        self.app.toggle(&mut self.sensors, &mut self.sink);
    }

    /// Advance virtual time in `step_ms` increments, returning the first
    /// dispatch request raised.
    pub fn run_for(&mut self, total_ms: u64, step_ms: u64) -> Option<DispatchRequest> {
        let mut request = None;
        let mut t = 0;
        while t < total_ms {
            let step = step_ms.min(total_ms - t);
            if let Some(r) = self.app.advance(step, &mut self.sensors, &mut self.sink) {
                request.get_or_insert(r);
            }
            t += step;
        }
        request
    }
}
