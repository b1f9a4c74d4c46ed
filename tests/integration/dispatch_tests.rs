//! Integration tests for the alert-sent panel and the spoken announcement.

use futures_lite::future::block_on;

use crashguard::app::dispatch::{self, LocationFix};
use crashguard::app::service::{AlertState, DispatchRequest};
use crashguard::error::LocationError;
use crashguard::sensors::TriggerSource;

use crate::mock_platform::{Bench, MockLocation, MockSpeech, SF};

fn expire_countdown(b: &mut Bench) -> DispatchRequest {
    b.app.trigger(TriggerSource::Motion, 20.0, &mut b.sink);
    b.run_for(10_000, 10).expect("countdown expired")
}

#[test]
fn resolved_location_is_shown_and_announced() {
    let mut b = Bench::new();
    let request = expire_countdown(&mut b);

    let mut location = MockLocation::at(SF);
    let mut speech = MockSpeech::new();
    let fix = block_on(dispatch::locate(&mut location));
    assert!(b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink));

    let alerts = b.sink.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].latitude.as_str(), "37.774900");
    assert_eq!(alerts[0].longitude.as_str(), "-122.419400");
    assert!(alerts[0].announced);

    assert_eq!(speech.spoken.len(), 1);
    assert!(speech.spoken[0].contains("37.7749, -122.4194"));
    assert!(speech.spoken[0].starts_with("Emergency alert!"));
    assert_eq!(b.app.alert_state(), AlertState::Sent(LocationFix::Resolved(SF)));
}

#[test]
fn denied_location_shows_unavailable_without_speech() {
    let mut b = Bench::new();
    let request = expire_countdown(&mut b);

    let mut location = MockLocation::denied();
    let mut speech = MockSpeech::new();
    let fix = block_on(dispatch::locate(&mut location));
    b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink);

    let alert = &b.sink.alerts()[0];
    assert_eq!(alert.latitude.as_str(), "Unavailable");
    assert_eq!(alert.longitude.as_str(), "Unavailable");
    assert!(!alert.announced);
    assert!(speech.spoken.is_empty());
    assert_eq!(location.requests, 1);
    assert_eq!(
        b.app.alert_state(),
        AlertState::Sent(LocationFix::Unavailable(LocationError::PermissionDenied))
    );
}

#[test]
fn missing_geolocation_shows_unsupported_without_request() {
    let mut b = Bench::new();
    let request = expire_countdown(&mut b);

    let mut location = MockLocation::unsupported();
    let mut speech = MockSpeech::new();
    let fix = block_on(dispatch::locate(&mut location));
    b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink);

    let alert = &b.sink.alerts()[0];
    assert_eq!(alert.latitude.as_str(), "Unsupported");
    assert_eq!(alert.longitude.as_str(), "Unsupported");
    assert_eq!(location.requests, 0);
    assert!(speech.spoken.is_empty());
    assert_eq!(b.app.alert_state(), AlertState::Sent(LocationFix::Unsupported));
}

#[test]
fn muted_platform_still_shows_coordinates() {
    let mut b = Bench::new();
    let request = expire_countdown(&mut b);

    let mut speech = MockSpeech::unavailable();
    let fix = block_on(dispatch::locate(&mut MockLocation::at(SF)));
    b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink);

    let alert = &b.sink.alerts()[0];
    assert_eq!(alert.latitude.as_str(), "37.774900");
    assert!(!alert.announced);
    assert!(speech.spoken.is_empty());
}

#[test]
fn duplicate_completion_is_dropped() {
    let mut b = Bench::new();
    let request = expire_countdown(&mut b);
    let mut speech = MockSpeech::new();

    let fix = block_on(dispatch::locate(&mut MockLocation::at(SF)));
    assert!(b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink));
    assert!(!b.app.complete_dispatch(request, fix, &mut speech, &mut b.sink));

    assert_eq!(b.sink.alerts().len(), 1);
    assert_eq!(speech.spoken.len(), 1);
}
