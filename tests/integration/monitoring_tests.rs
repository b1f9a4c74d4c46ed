//! Integration tests for the monitoring switch and both watchers.

use crashguard::app::events::AppEvent;
use crashguard::app::service::{AlertState, MonitoringState};
use crashguard::error::{CaptureError, Sensor};

use crate::mock_platform::{Bench, SensorCall};

#[test]
fn activation_attaches_both_watchers() {
    let mut b = Bench::new();
    b.toggle();

    assert_eq!(b.app.monitoring_state(), MonitoringState::Active);
    assert_eq!(
        &b.sensors.calls[..3],
        &[
            SensorCall::MotionStart(1000),
            SensorCall::AudioOpen(256),
            SensorCall::Snapshot
        ]
    );
    assert!(b.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::MonitoringChanged(MonitoringState::Active)
    )));
}

#[test]
fn deactivation_releases_both_watchers() {
    let mut b = Bench::new();
    b.toggle();
    b.toggle();

    assert_eq!(b.app.monitoring_state(), MonitoringState::Inactive);
    assert!(b.sensors.calls.contains(&SensorCall::MotionStop));
    assert!(b.sensors.calls.contains(&SensorCall::AudioClose));
    assert!(!b.sensors.motion_running);
    assert!(!b.sensors.audio_open);
    assert!(matches!(
        b.sink.events.last(),
        Some(AppEvent::MonitoringChanged(MonitoringState::Inactive))
    ));
}

#[test]
fn unsupported_motion_still_monitors_sound() {
    let mut b = Bench::new();
    b.sensors.motion_error = Some(CaptureError::Unsupported);
    b.sensors.sound_level = 90;
    b.toggle();

    assert_eq!(b.app.monitoring_state(), MonitoringState::Active);
    assert!(b.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::WatcherFailed {
            sensor: Sensor::Motion,
            error: CaptureError::Unsupported
        }
    )));
    // The immediate poll already heard the noise.
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(10));
}

#[test]
fn denied_microphone_never_polls() {
    let mut b = Bench::new();
    b.sensors.audio_error = Some(CaptureError::PermissionDenied);
    b.toggle();
    let _ = b.run_for(10_000, 100);

    assert_eq!(b.sensors.snapshots(), 0);
    assert!(!b.app.is_sound_poll_armed());
    assert!(b.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::WatcherFailed {
            sensor: Sensor::Microphone,
            error: CaptureError::PermissionDenied
        }
    )));
}

#[test]
fn sound_polls_every_two_seconds_while_active() {
    let mut b = Bench::new();
    b.toggle();
    assert_eq!(b.sensors.snapshots(), 1);

    let _ = b.run_for(1_990, 10);
    assert_eq!(b.sensors.snapshots(), 1);

    let _ = b.run_for(4_010, 10);
    assert_eq!(b.sensors.snapshots(), 4);
}

#[test]
fn pending_poll_after_deactivation_stops_silently() {
    let mut b = Bench::new();
    b.sensors.sound_level = 200;
    b.toggle();
    b.app.cancel(
        crashguard::app::events::CancelReason::User,
        &mut b.sink,
    );
    b.toggle();

    // The poll armed before deactivation is still pending.
    assert!(b.app.is_sound_poll_armed());
    let snapshots = b.sensors.snapshots();

    let _ = b.run_for(2_000, 10);
    assert_eq!(b.sensors.snapshots(), snapshots, "cancelled poll must not evaluate");
    assert!(!b.app.is_sound_poll_armed(), "cancelled poll must not re-arm");
    assert_eq!(b.app.alert_state(), AlertState::Idle);
}

#[test]
fn reactivation_starts_a_fresh_poll_cycle() {
    let mut b = Bench::new();
    b.toggle();
    let _ = b.run_for(1_000, 10);
    b.toggle();
    b.toggle();

    // Immediate poll on each activation.
    assert_eq!(b.sensors.snapshots(), 2);

    // The replacement timer counts from the re-activation.
    let _ = b.run_for(1_990, 10);
    assert_eq!(b.sensors.snapshots(), 2);
    let _ = b.run_for(10, 10);
    assert_eq!(b.sensors.snapshots(), 3);
}

#[test]
fn loud_sound_triggers_quiet_does_not() {
    let mut quiet = Bench::new();
    quiet.sensors.sound_level = 70;
    quiet.toggle();
    let _ = quiet.run_for(4_000, 100);
    assert_eq!(quiet.app.alert_state(), AlertState::Idle);

    let mut loud = Bench::new();
    loud.sensors.sound_level = 90;
    loud.toggle();
    assert_eq!(loud.app.alert_state(), AlertState::CountingDown(10));
}

#[test]
fn crash_spike_triggers_normal_motion_does_not() {
    let mut b = Bench::new();
    b.toggle();
    b.sensors.push_reading(5.0, 5.0, 5.0);
    let _ = b.run_for(10, 10);
    assert_eq!(b.app.alert_state(), AlertState::Idle);

    b.sensors.push_reading(10.0, 10.0, 10.0);
    let _ = b.run_for(10, 10);
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(10));
}
