//! Integration tests for the trigger → countdown → dispatch pipeline.

use futures_lite::future::block_on;

use crashguard::app::commands::AppCommand;
use crashguard::app::dispatch;
use crashguard::app::events::CancelReason;
use crashguard::app::service::AlertState;
use crashguard::config::MonitorConfig;
use crashguard::fsm::StateId;
use crashguard::sensors::TriggerSource;

use crate::mock_platform::{Bench, MockLocation, MockSpeech, SF};

#[test]
fn retrigger_neither_resets_nor_stacks() {
    let mut b = Bench::new();
    b.toggle();

    assert!(b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink));
    assert!(b.run_for(1_000, 10).is_none());
    assert!(!b.app.trigger(TriggerSource::Sound, 95.0, &mut b.sink));
    assert_eq!(b.sink.countdowns_started(), 1);

    assert!(b.run_for(8_990, 10).is_none());
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(1));

    // Zero is reached at t = 10 s, measured from the first trigger.
    assert!(b.run_for(10, 10).is_some());
    assert_eq!(b.sink.countdown_ticks(), (0..10).rev().collect::<Vec<u16>>());
}

#[test]
fn cancel_hides_countdown_and_later_trigger_starts_fresh() {
    let mut b = Bench::new();
    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    let _ = b.run_for(4_000, 10);
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(6));

    b.app
        .handle_command(AppCommand::CancelAlert, &mut b.sensors, &mut b.sink);
    assert_eq!(b.app.alert_state(), AlertState::Idle);
    assert!(!b.app.is_countdown_live());
    assert_eq!(b.sink.cancellations(), vec![CancelReason::User]);
    assert!(b.run_for(20_000, 100).is_none());

    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(10));
    assert!(b.run_for(9_990, 10).is_none());
    assert!(b.run_for(10, 10).is_some());
}

#[test]
fn cancel_outside_countdown_is_ignored() {
    let mut b = Bench::new();
    assert!(!b.app.cancel(CancelReason::User, &mut b.sink));
    assert!(b.sink.cancellations().is_empty());
}

#[test]
fn deactivation_cancels_live_countdown() {
    let mut b = Bench::new();
    b.toggle();
    b.app.trigger(TriggerSource::Sound, 95.0, &mut b.sink);
    let _ = b.run_for(3_000, 10);

    b.toggle();
    assert_eq!(b.app.alert_state(), AlertState::Idle);
    assert!(!b.app.is_countdown_live());
    assert_eq!(b.sink.cancellations(), vec![CancelReason::Deactivated]);

    assert!(b.run_for(30_000, 100).is_none(), "no alert after deactivation");
    assert!(b.sink.alerts().is_empty());
}

#[test]
fn countdown_survives_deactivation_when_configured() {
    let config = MonitorConfig {
        cancel_countdown_on_deactivate: false,
        ..MonitorConfig::default()
    };
    let mut b = Bench::with_config(config);
    b.toggle();
    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    let _ = b.run_for(3_000, 10);

    b.toggle();
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(7));
    assert!(b.run_for(7_000, 10).is_some());
}

#[test]
fn dispatch_in_flight_completes_after_deactivation() {
    let mut b = Bench::new();
    b.toggle();
    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    let request = b.run_for(10_000, 10).expect("countdown expired");

    b.toggle();
    assert_eq!(b.app.alert_state(), AlertState::Locating);

    let fix = block_on(dispatch::locate(&mut MockLocation::at(SF)));
    let mut speech = MockSpeech::new();
    assert!(b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink));
    assert!(matches!(b.app.alert_state(), AlertState::Sent(_)));
}

#[test]
fn sent_ignores_triggers_until_dismissed() {
    let mut b = Bench::new();
    b.toggle();
    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    let request = b.run_for(10_000, 10).expect("countdown expired");

    // Locating: triggers are ignored.
    b.sensors.push_reading(10.0, 10.0, 10.0);
    let _ = b.run_for(10, 10);
    assert_eq!(b.app.state(), StateId::Locating);

    let fix = block_on(dispatch::locate(&mut MockLocation::at(SF)));
    b.app
        .complete_dispatch(request, fix, &mut MockSpeech::new(), &mut b.sink);

    // Sent: still ignored, no auto re-arm.
    b.sensors.push_reading(10.0, 10.0, 10.0);
    assert!(b.run_for(20_000, 100).is_none());
    assert_eq!(b.app.state(), StateId::Sent);
    assert_eq!(b.sink.countdowns_started(), 1);

    b.app
        .handle_command(AppCommand::DismissAlert, &mut b.sensors, &mut b.sink);
    assert_eq!(b.app.alert_state(), AlertState::Idle);

    b.sensors.push_reading(10.0, 10.0, 10.0);
    let _ = b.run_for(10, 10);
    assert_eq!(b.app.alert_state(), AlertState::CountingDown(10));
    assert_eq!(b.sink.countdowns_started(), 2);
}

#[test]
fn countdown_timer_live_iff_counting_down() {
    let mut b = Bench::new();
    b.toggle();
    assert!(!b.app.is_countdown_live());

    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    for _ in 0..200 {
        let _ = b.app.advance(50, &mut b.sensors, &mut b.sink);
        assert_eq!(
            b.app.is_countdown_live(),
            b.app.state() == StateId::CountingDown
        );
    }
    assert_eq!(b.app.state(), StateId::Locating);
}

#[test]
fn alert_ids_increase_per_alert() {
    let mut b = Bench::new();
    let mut speech = MockSpeech::new();

    for expected in 1..=2 {
        b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
        let request = b.run_for(10_000, 100).expect("countdown expired");
        assert_eq!(request.alert_id, expected);

        let fix = block_on(dispatch::locate(&mut MockLocation::unsupported()));
        b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink);
        b.app.dismiss(&mut b.sink);
    }
    assert_eq!(b.app.alerts_sent(), 2);
}
