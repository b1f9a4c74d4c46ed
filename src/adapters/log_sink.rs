//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event as a
//! single structured log line.  This is the stand-in presentation layer
//! for the host binary; a graphical front end would implement the same
//! trait and render panels instead.

use log::{info, warn};

use crate::app::events::{AppEvent, CancelReason};
use crate::app::ports::EventSink;
use crate::error::Error;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::MonitoringChanged(state) => {
                info!("STATUS | {}", state.status_text());
            }
            AppEvent::WatcherFailed { sensor, error } => {
                let err = Error::Capture {
                    sensor: *sensor,
                    error: *error,
                };
                warn!("WATCHER | {} ({:?})", err, err.kind());
            }
            AppEvent::Triggered { source, level } => {
                warn!("TRIGGER | source={:?} level={:.2}", source, level);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CountdownStarted { seconds } => {
                warn!("COUNTDOWN | shown, {}s to alert", seconds);
            }
            AppEvent::CountdownTick { remaining } => {
                info!("COUNTDOWN | {}", remaining);
            }
            AppEvent::CountdownCancelled(reason) => {
                let why = match reason {
                    CancelReason::User => "by user",
                    CancelReason::Deactivated => "monitoring off",
                };
                info!("COUNTDOWN | hidden, cancelled {}", why);
            }
            AppEvent::Locating => {
                info!("DISPATCH | locating");
            }
            AppEvent::AlertSent(report) => {
                warn!(
                    "ALERT SENT | lat={} lon={} | announced={}",
                    report.latitude, report.longitude, report.announced
                );
            }
            AppEvent::AlertDismissed => {
                info!("ALERT SENT | dismissed");
            }
        }
    }
}
