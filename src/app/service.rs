//! Application service, the hexagonal core.
//!
//! [`MonitorService`] owns the monitoring switch, both watchers, the timer
//! table and the alert FSM.  It exposes a clean, platform-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  MotionPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!  AudioPort  ──▶ │       MonitorService        │
//!                 │ Watchers · Timers · FSM     │ ──▶ SpeechPort
//!                 └─────────────┬──────────────┘
//!                               ▼ DispatchRequest
//!                      dispatch::locate(LocationPort)
//!                               ▼ LocationFix
//!                      complete_dispatch()
//! ```
//!
//! Time is supplied from outside through [`MonitorService::advance`], so the
//! same code runs under the async session loop and under virtual time in
//! tests.

use log::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::Sensor;
use crate::fsm::context::AlertContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::scheduler::{CancelToken, Scheduler, Timer, TimerDelegate, TimerId, TimerKind};
use crate::sensors::TriggerSource;
use crate::sensors::motion::MotionWatcher;
use crate::sensors::sound::{SoundPoll, SoundWatcher};

use super::commands::AppCommand;
use super::dispatch::{LocationFix, announcement};
use super::events::{AlertReport, AppEvent, CancelReason};
use super::ports::{AudioPort, EventSink, MotionPort, SpeechPort};

// ───────────────────────────────────────────────────────────────
// Public state types
// ───────────────────────────────────────────────────────────────

/// Whether the sensor streams are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitoringState {
    Active,
    Inactive,
}

impl MonitoringState {
    /// Status indicator text.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Active => "Protection Active",
            Self::Inactive => "Protection Inactive",
        }
    }
}

/// Alert pipeline state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertState {
    Idle,
    CountingDown(u16),
    Locating,
    Sent(LocationFix),
}

/// Handed to the dispatch task when the countdown reaches zero.  The id
/// ties the resolved fix back to the alert that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRequest {
    pub alert_id: u32,
}

/// Collects timer firings so they are handled after the scheduler pass.
#[derive(Default)]
struct FiredTimers(Vec<TimerId>);

impl TimerDelegate for FiredTimers {
    fn on_timer_fired(&mut self, id: TimerId) {
        self.0.push(id);
    }
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// The monitor session.  One instance per run; no globals.
pub struct MonitorService {
    config: MonitorConfig,
    monitoring: MonitoringState,
    fsm: Fsm,
    ctx: AlertContext,
    timers: Scheduler,
    motion: MotionWatcher,
    sound: SoundWatcher,
    /// Token the pending sound poll was armed with.
    sound_token: Option<CancelToken>,
    alert_seq: u32,
    pending: Option<DispatchRequest>,
    last_alert: Option<AlertReport>,
    alerts_sent: u32,
}

impl MonitorService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: MonitorConfig) -> Self {
        let ctx = AlertContext::new(config.countdown_secs);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);
        let motion = MotionWatcher::new(config.motion_threshold, config.motion_frequency_hz);
        let sound = SoundWatcher::new(config.sound_threshold, config.fft_size);

        Self {
            config,
            monitoring: MonitoringState::Inactive,
            fsm,
            ctx,
            timers: Scheduler::new(),
            motion,
            sound,
            sound_token: None,
            alert_seq: 0,
            pending: None,
            last_alert: None,
            alerts_sent: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        sink.emit(&AppEvent::MonitoringChanged(self.monitoring));
        info!("MonitorService started in {:?}", self.fsm.current_state());
    }

    /// Release both sensors and stop polling.  A dispatch already in
    /// flight is left to complete, and so is a countdown unless
    /// `cancel_countdown_on_deactivate` is set.
    pub fn shutdown(
        &mut self,
        sensors: &mut (impl MotionPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        if self.monitoring == MonitoringState::Active {
            self.deactivate(sensors, sink);
        }
        self.timers.cancel(TimerId::SoundPoll);
        self.sound_token = None;
        info!("MonitorService shut down ({} alerts sent)", self.alerts_sent);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a user action from the presentation layer.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        sensors: &mut (impl MotionPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ToggleMonitoring => self.toggle(sensors, sink),
            AppCommand::CancelAlert => {
                self.cancel(CancelReason::User, sink);
            }
            AppCommand::DismissAlert => {
                self.dismiss(sink);
            }
            AppCommand::Shutdown => self.shutdown(sensors, sink),
        }
    }

    /// Flip the monitoring switch.
    pub fn toggle(
        &mut self,
        sensors: &mut (impl MotionPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        match self.monitoring {
            MonitoringState::Inactive => self.activate(sensors, sink),
            MonitoringState::Active => self.deactivate(sensors, sink),
        }
    }

    fn activate(&mut self, sensors: &mut (impl MotionPort + AudioPort), sink: &mut impl EventSink) {
        self.monitoring = MonitoringState::Active;
        info!("Monitoring activated");
        sink.emit(&AppEvent::MonitoringChanged(self.monitoring));

        if let Err(error) = self.motion.attach(sensors) {
            sink.emit(&AppEvent::WatcherFailed {
                sensor: Sensor::Motion,
                error,
            });
        }

        match self.sound.attach(sensors) {
            Ok(token) => {
                self.sound_token = Some(token);
                // First evaluation runs immediately.
                self.poll_sound(sensors, sink);
            }
            Err(error) => sink.emit(&AppEvent::WatcherFailed {
                sensor: Sensor::Microphone,
                error,
            }),
        }
    }

    fn deactivate(
        &mut self,
        sensors: &mut (impl MotionPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        self.monitoring = MonitoringState::Inactive;
        info!("Monitoring deactivated");

        self.motion.detach(sensors);
        // The armed poll stays in the table and stops on the cancelled token.
        self.sound.detach(sensors);

        if self.config.cancel_countdown_on_deactivate {
            self.cancel(CancelReason::Deactivated, sink);
        }
        sink.emit(&AppEvent::MonitoringChanged(self.monitoring));
    }

    // ── Time ──────────────────────────────────────────────────

    /// Advance timers by `elapsed_ms`, then drain pending motion readings.
    ///
    /// Timers run first so a countdown started by a reading in this call
    /// begins at full length.
    ///
    /// Returns a [`DispatchRequest`] when the countdown reached zero during
    /// this call; the caller resolves a location for it and hands the
    /// result to [`complete_dispatch`](Self::complete_dispatch).
    #[must_use]
    pub fn advance(
        &mut self,
        elapsed_ms: u64,
        sensors: &mut (impl MotionPort + AudioPort),
        sink: &mut impl EventSink,
    ) -> Option<DispatchRequest> {
        let mut fired = FiredTimers::default();
        self.timers.tick(elapsed_ms, &mut fired);
        for id in fired.0 {
            match id {
                TimerId::SoundPoll => self.poll_sound(sensors, sink),
                TimerId::CountdownTick => self.countdown_tick(sink),
            }
        }

        if self.motion.is_attached() {
            while let Some(sample) = sensors.next_reading() {
                if let Some(force) = self.motion.evaluate(&sample) {
                    self.trigger(TriggerSource::Motion, force, sink);
                }
            }
        }

        self.take_dispatch_request()
    }

    fn poll_sound(&mut self, sensors: &mut impl AudioPort, sink: &mut impl EventSink) {
        let Some(token) = self.sound_token.clone() else {
            return;
        };

        match self.sound.poll(&token, sensors) {
            SoundPoll::Stopped => {
                self.sound_token = None;
                return;
            }
            SoundPoll::Quiet(_) => {}
            SoundPoll::Loud(level) => {
                self.trigger(TriggerSource::Sound, level, sink);
            }
        }

        if self.monitoring == MonitoringState::Active {
            self.timers.arm(Timer {
                id: TimerId::SoundPoll,
                kind: TimerKind::OneShot {
                    delay_ms: self.config.sound_poll_interval_ms,
                },
            });
        }
    }

    fn countdown_tick(&mut self, sink: &mut impl EventSink) {
        // A catch-up burst can outlive the countdown within one advance.
        if self.fsm.current_state() != StateId::CountingDown {
            debug!("Stale countdown tick ignored");
            return;
        }

        self.ctx.inputs.second_elapsed = true;
        self.step(sink);

        sink.emit(&AppEvent::CountdownTick {
            remaining: self.ctx.remaining_secs,
        });
        if self.fsm.current_state() == StateId::Locating {
            sink.emit(&AppEvent::Locating);
        }
    }

    fn take_dispatch_request(&mut self) -> Option<DispatchRequest> {
        if !self.ctx.outputs.request_location {
            return None;
        }
        self.ctx.outputs.request_location = false;
        self.alert_seq = self.alert_seq.wrapping_add(1);
        let request = DispatchRequest {
            alert_id: self.alert_seq,
        };
        self.pending = Some(request);
        info!("Dispatch requested (alert #{})", request.alert_id);
        Some(request)
    }

    // ── Alert pipeline ────────────────────────────────────────

    /// Start the countdown.  Ignored unless the alert pipeline is idle.
    /// Returns `true` if a countdown was started.
    pub fn trigger(&mut self, source: TriggerSource, level: f64, sink: &mut impl EventSink) -> bool {
        if self.fsm.current_state() != StateId::Idle {
            debug!(
                "Trigger from {:?} ({:.2}) ignored in {:?}",
                source,
                level,
                self.fsm.current_state()
            );
            return false;
        }

        warn!("Emergency trigger from {:?} (level {:.2})", source, level);
        sink.emit(&AppEvent::Triggered { source, level });
        self.ctx.inputs.trigger = true;
        self.step(sink);
        true
    }

    /// Abort a live countdown.  Returns `true` if one was running.
    pub fn cancel(&mut self, reason: CancelReason, sink: &mut impl EventSink) -> bool {
        if self.fsm.current_state() != StateId::CountingDown {
            return false;
        }
        self.ctx.inputs.cancel = true;
        self.step(sink);
        info!("Countdown cancelled ({:?})", reason);
        sink.emit(&AppEvent::CountdownCancelled(reason));
        true
    }

    /// Finish the alert with the outcome of the location step.
    ///
    /// Returns `false` for a request that is not the one outstanding.
    pub fn complete_dispatch(
        &mut self,
        request: DispatchRequest,
        fix: LocationFix,
        speech: &mut impl SpeechPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if self.pending != Some(request) || self.fsm.current_state() != StateId::Locating {
            warn!("Dispatch #{} completed out of turn; dropped", request.alert_id);
            return false;
        }
        self.pending = None;
        self.ctx.fix = Some(fix);
        self.step(sink);

        let (latitude, longitude) = fix.display_fields(self.config.coordinate_decimals);
        let announced = match fix.coordinates() {
            Some(c) if speech.is_available() => {
                speech.speak(&announcement(c));
                true
            }
            Some(_) => {
                warn!("Speech synthesis unavailable; alert not announced");
                false
            }
            None => false,
        };

        let report = AlertReport {
            fix,
            latitude,
            longitude,
            announced,
        };
        self.alerts_sent += 1;
        self.last_alert = Some(report.clone());
        sink.emit(&AppEvent::AlertSent(report));
        true
    }

    /// Hide the alert-sent panel and re-arm.  Returns `true` if an alert
    /// was showing.
    pub fn dismiss(&mut self, sink: &mut impl EventSink) -> bool {
        if self.fsm.current_state() != StateId::Sent {
            return false;
        }
        self.ctx.inputs.dismiss = true;
        self.step(sink);
        sink.emit(&AppEvent::AlertDismissed);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn monitoring_state(&self) -> MonitoringState {
        self.monitoring
    }

    pub fn alert_state(&self) -> AlertState {
        match self.fsm.current_state() {
            StateId::Idle => AlertState::Idle,
            StateId::CountingDown => AlertState::CountingDown(self.ctx.remaining_secs),
            StateId::Locating => AlertState::Locating,
            StateId::Sent => self.ctx.fix.map_or(AlertState::Locating, AlertState::Sent),
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Whether the countdown tick timer is armed.
    pub fn is_countdown_live(&self) -> bool {
        self.timers.is_armed(TimerId::CountdownTick)
    }

    /// Whether a sound poll is scheduled.
    pub fn is_sound_poll_armed(&self) -> bool {
        self.timers.is_armed(TimerId::SoundPoll)
    }

    pub fn alerts_sent(&self) -> u32 {
        self.alerts_sent
    }

    /// Panel contents of the most recent alert.
    pub fn last_alert(&self) -> Option<&AlertReport> {
        self.last_alert.as_ref()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Run one FSM step over the latched inputs and apply its outputs.
    fn step(&mut self, sink: &mut impl EventSink) {
        let prev = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        self.ctx.clear_inputs();
        self.sync_countdown_timer();

        let next = self.fsm.current_state();
        if next != prev {
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: next,
            });
            if next == StateId::CountingDown {
                sink.emit(&AppEvent::CountdownStarted {
                    seconds: self.ctx.remaining_secs,
                });
            }
        }
    }

    /// Keep the tick timer armed exactly while the FSM asks for it.
    fn sync_countdown_timer(&mut self) {
        let armed = self.timers.is_armed(TimerId::CountdownTick);
        if self.ctx.outputs.countdown_armed && !armed {
            self.timers.arm(Timer {
                id: TimerId::CountdownTick,
                kind: TimerKind::Periodic {
                    interval_ms: self.config.countdown_tick_ms,
                },
            });
        } else if !self.ctx.outputs.countdown_armed && armed {
            self.timers.cancel(TimerId::CountdownTick);
        }
    }
}
