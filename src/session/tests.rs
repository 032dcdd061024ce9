use super::provider::MockPositionProvider;
use super::*;
use crate::constants::test_constants::*;
use crate::heading::SourceKind;
use chrono::{Local, TimeZone, Utc};

fn coord(lat: f64, lon: f64) -> GeoCoordinate {
    GeoCoordinate::new(lat, lon).unwrap()
}

fn nyc() -> GeoCoordinate {
    coord(TEST_NYC_LATITUDE, TEST_NYC_LONGITUDE)
}

fn session_with_clock() -> (QiblaSession, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let session = QiblaSession::with_clock(SessionSettings::default(), clock.clone());
    (session, clock)
}

/// Relative sample that maps to the given compass bearing.
fn facing(bearing: f64) -> HeadingSample {
    HeadingSample::relative(360.0 - bearing)
}

fn located_session() -> (QiblaSession, Arc<ManualClock>) {
    let (mut session, clock) = session_with_clock();
    let ticket = session.request_fix();
    assert!(session.complete_fix(ticket, Ok(nyc())));
    (session, clock)
}

#[test]
fn test_initial_state() {
    let (session, _) = session_with_clock();
    assert_eq!(session.state(), SessionState::NoFixRequested);
    assert_eq!(session.permission_state(), PermissionState::Prompt);
    assert!(session.fix().is_none());
    assert!(session.current_frame().is_none());
    assert!(session.error().is_none());
}

#[test]
fn test_successful_fix_computes_bearing_once() {
    let (mut session, _) = session_with_clock();
    let ticket = session.request_fix();
    assert_eq!(session.state(), SessionState::Locating);

    assert!(session.complete_fix(ticket, Ok(nyc())));
    assert_eq!(session.state(), SessionState::Located);
    assert_eq!(session.permission_state(), PermissionState::Granted);

    let fix = session.fix().unwrap();
    assert!((fix.bearing - 58.5).abs() < 0.5, "bearing {}", fix.bearing);
    assert!((fix.distance_km - 10_300.0).abs() < 100.0);
    assert_eq!(fix.position, nyc());

    // Frames before any heading sample have no heading and are never aligned.
    let frame = session.current_frame().unwrap();
    assert_eq!(frame.heading, None);
    assert!(!frame.alignment.is_aligned);
    assert_eq!(frame.compass_point, CompassPoint::ENE);
}

#[test]
fn test_timeout_fails_the_cycle() {
    let (mut session, clock) = session_with_clock();
    let ticket = session.request_fix();

    clock.advance(Duration::from_secs(24));
    assert!(!session.poll_timeout());
    assert_eq!(session.state(), SessionState::Locating);

    clock.advance(Duration::from_secs(1));
    assert!(session.poll_timeout());
    assert_eq!(session.state(), SessionState::LocationFailed);
    assert_eq!(session.failure(), Some(FixFailure::Timeout));
    assert_eq!(session.error(), Some(QiblaError::PositionTimeout));

    // A result after the deadline does not revive the cycle.
    assert!(!session.complete_fix(ticket, Ok(nyc())));
    assert_eq!(session.state(), SessionState::LocationFailed);
    // Timeouts say nothing about the permission.
    assert_eq!(session.permission_state(), PermissionState::Prompt);
}

#[test]
fn test_late_result_loses_to_deadline_without_poll() {
    let (mut session, clock) = session_with_clock();
    let ticket = session.request_fix();
    clock.advance(Duration::from_secs(30));

    assert!(!session.complete_fix(ticket, Ok(nyc())));
    assert_eq!(session.failure(), Some(FixFailure::Timeout));
}

#[test]
fn test_new_request_cancels_previous_timeout() {
    let (mut session, clock) = session_with_clock();
    let first = session.request_fix();
    clock.advance(Duration::from_secs(20));

    let second = session.request_fix();
    assert!(second.generation() > first.generation());

    // The first deadline passes; the second cycle keeps locating.
    clock.advance(Duration::from_secs(10));
    assert!(!session.poll_timeout());
    assert_eq!(session.state(), SessionState::Locating);

    assert!(session.complete_fix(second, Ok(nyc())));
    clock.advance(Duration::from_secs(60));
    assert!(!session.poll_timeout());
    assert_eq!(session.state(), SessionState::Located);
}

#[test]
fn test_stale_ticket_is_ignored() {
    let (mut session, _) = session_with_clock();
    let first = session.request_fix();
    let second = session.request_fix();

    assert!(!session.complete_fix(first, Ok(coord(0.0, 0.0))));
    assert_eq!(session.state(), SessionState::Locating);

    assert!(session.complete_fix(second, Ok(nyc())));
    assert_eq!(session.fix().unwrap().position, nyc());

    // Nor can an old ticket overwrite a completed cycle.
    assert!(!session.complete_fix(first, Err(FixFailure::Denied)));
    assert_eq!(session.state(), SessionState::Located);
}

#[test]
fn test_failure_is_terminal_until_new_request() {
    let (mut session, _) = session_with_clock();
    let ticket = session.request_fix();
    assert!(session.complete_fix(ticket, Err(FixFailure::Unavailable)));
    assert_eq!(session.error(), Some(QiblaError::PositionUnavailable));

    assert!(!session.complete_fix(ticket, Ok(nyc())));
    assert_eq!(session.state(), SessionState::LocationFailed);

    let retry = session.request_fix();
    assert!(session.complete_fix(retry, Ok(nyc())));
    assert_eq!(session.state(), SessionState::Located);
}

#[test]
fn test_permission_states() {
    let (mut session, _) = session_with_clock();
    let ticket = session.request_fix();
    session.complete_fix(ticket, Err(FixFailure::Denied));
    assert_eq!(session.permission_state(), PermissionState::Denied);
    assert_eq!(session.error(), Some(QiblaError::PositionDenied));

    let ticket = session.request_fix();
    session.complete_fix(ticket, Err(FixFailure::Unsupported));
    assert_eq!(session.permission_state(), PermissionState::Unavailable);
    assert_eq!(session.error(), Some(QiblaError::PositionUnavailable));

    let ticket = session.request_fix();
    session.complete_fix(ticket, Err(FixFailure::Unknown));
    assert_eq!(session.permission_state(), PermissionState::Unavailable);
    assert_eq!(session.error(), Some(QiblaError::PositionUnknownFailure));
}

#[test]
fn test_heading_ignored_unless_located() {
    let (mut session, _) = session_with_clock();
    assert!(session.on_heading_sample(HeadingSample::absolute(58.0)).is_none());

    session.request_fix();
    assert!(session.on_heading_sample(HeadingSample::absolute(58.0)).is_none());
    assert_eq!(session.heading(), None);
}

#[test]
fn test_frames_track_alignment() {
    let (mut session, _) = located_session();
    let bearing = session.fix().unwrap().bearing;

    let frame = session
        .on_heading_sample(facing(bearing + 2.0))
        .unwrap();
    assert!(frame.alignment.is_aligned);
    assert!((frame.alignment.absolute_difference - 2.0).abs() < 1e-9);
    assert!((frame.pointer_rotation.unwrap() - 358.0).abs() < 1e-9);

    // 10° off, within the outlier window: smoothing moves 4° towards it.
    let frame = session
        .on_heading_sample(facing(bearing + 12.0))
        .unwrap();
    assert!((frame.heading.unwrap() - (bearing + 6.0)).abs() < 1e-9);
    assert!(!frame.alignment.is_aligned);
}

#[test]
fn test_missing_sample_produces_no_frame() {
    let (mut session, _) = located_session();
    assert!(
        session
            .on_heading_sample(HeadingSample::missing(SourceKind::Absolute))
            .is_none()
    );
    assert!(session.current_frame().is_some());
}

#[test]
fn test_glitch_keeps_heading() {
    let (mut session, _) = located_session();
    session.on_heading_sample(facing(40.0));
    let frame = session.on_heading_sample(facing(200.0)).unwrap();
    assert_eq!(frame.heading, Some(40.0));
    assert_eq!(session.heading_counts(), (1, 1));
}

#[test]
fn test_compass_reading_is_not_smoothed() {
    let (mut session, _) = located_session();
    session.on_heading_sample(HeadingSample::absolute(40.0));
    let frame = session
        .on_heading_sample(HeadingSample::absolute(200.0))
        .unwrap();
    assert_eq!(frame.heading, Some(200.0));
    assert_eq!(session.heading_counts(), (2, 0));
}

#[test]
fn test_new_request_resets_heading() {
    let (mut session, _) = located_session();
    session.on_heading_sample(HeadingSample::absolute(40.0));
    let ticket = session.request_fix();
    session.complete_fix(ticket, Ok(nyc()));
    assert_eq!(session.heading(), None);

    // First sample of the new cycle is adopted without lag.
    let frame = session
        .on_heading_sample(HeadingSample::absolute(200.0))
        .unwrap();
    assert_eq!(frame.heading, Some(200.0));
}

#[test]
fn test_orientation_unsupported() {
    let (mut session, _) = located_session();
    session.on_heading_sample(HeadingSample::absolute(58.0));
    session.mark_orientation_unsupported();

    assert_eq!(
        session.orientation_error(),
        Some(QiblaError::OrientationUnsupported)
    );
    let frame = session
        .on_heading_sample(HeadingSample::absolute(58.0))
        .unwrap();
    assert_eq!(frame.heading, None);
    assert_eq!(frame.pointer_rotation, None);
    assert!(!frame.alignment.is_aligned);
}

#[test]
fn test_stop_invalidates_pending_request() {
    let (mut session, _) = session_with_clock();
    let ticket = session.request_fix();
    session.stop();
    assert_eq!(session.state(), SessionState::NoFixRequested);
    assert!(!session.complete_fix(ticket, Ok(nyc())));
    assert_eq!(session.state(), SessionState::NoFixRequested);
}

#[test]
fn test_locate_with_mock_provider() {
    let (mut session, _) = session_with_clock();
    let mut provider = MockPositionProvider::new();
    provider
        .expect_request_position()
        .withf(|timeout| *timeout == Duration::from_secs(25))
        .times(1)
        .returning(|_| Ok(GeoCoordinate::new(TEST_LONDON_LATITUDE, TEST_LONDON_LONGITUDE).unwrap()));

    let fix = session.locate(&mut provider).unwrap();
    assert!((fix.bearing - 119.0).abs() < 0.5);
    assert_eq!(session.state(), SessionState::Located);
}

#[test]
fn test_locate_reports_provider_failure() {
    let (mut session, _) = session_with_clock();
    let mut provider = MockPositionProvider::new();
    provider
        .expect_request_position()
        .times(1)
        .returning(|_| Err(FixFailure::Denied));

    assert_eq!(session.locate(&mut provider), Err(QiblaError::PositionDenied));
    assert_eq!(session.permission_state(), PermissionState::Denied);
}

#[test]
fn test_locate_with_slow_provider_times_out() {
    let clock = Arc::new(ManualClock::new());
    let mut session = QiblaSession::with_clock(SessionSettings::default(), clock.clone());
    let provider_clock = clock.clone();
    let mut provider = MockPositionProvider::new();
    provider.expect_request_position().returning(move |_| {
        provider_clock.advance(Duration::from_secs(26));
        Ok(coord(0.0, 0.0))
    });

    assert_eq!(session.locate(&mut provider), Err(QiblaError::PositionTimeout));
}

#[test]
fn test_builtin_providers() {
    let (mut session, _) = session_with_clock();
    assert!(session.locate(&mut FixedPosition(nyc())).is_ok());
    assert_eq!(
        session.locate(&mut NoGeolocation),
        Err(QiblaError::PositionUnavailable)
    );
    assert_eq!(session.permission_state(), PermissionState::Unavailable);
}

#[test]
fn test_custom_settings_are_used() {
    let clock = Arc::new(ManualClock::new());
    let settings = SessionSettings {
        target: coord(0.0, 0.0),
        alignment_threshold: 1.0,
        fix_timeout: Duration::from_secs(5),
        ..SessionSettings::default()
    };
    let mut session = QiblaSession::with_clock(settings, clock.clone());

    session.request_fix();
    clock.advance(Duration::from_secs(5));
    assert!(session.poll_timeout());

    let ticket = session.request_fix();
    session.complete_fix(ticket, Ok(coord(10.0, 0.0)));
    // Due south of the position.
    assert!((session.fix().unwrap().bearing - 180.0).abs() < 1e-9);

    let frame = session
        .on_heading_sample(HeadingSample::absolute(182.0))
        .unwrap();
    assert!(!frame.alignment.is_aligned);
}

#[test]
fn test_day_times_follow_the_local_date() {
    let start = Local.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::starting_at(start));
    let mut session = QiblaSession::with_clock(SessionSettings::default(), clock.clone());
    assert!(session.day_times(0.0).unwrap().is_none());

    let ticket = session.request_fix();
    session.complete_fix(ticket, Ok(KAABA));

    let offset = 3.0;
    let first = session.day_times(offset).unwrap().unwrap().date;
    assert_eq!(first, session.local_date(offset));

    clock.advance(Duration::from_secs(24 * 3600));
    let second = session.day_times(offset).unwrap().unwrap().date;
    assert_eq!(second, first.succ_opt().unwrap());
}

#[test]
fn test_day_times_follow_the_utc_offset() {
    // Noon UTC is the same local date at both offsets.
    let start = Utc
        .with_ymd_and_hms(2024, 3, 20, 12, 0, 0)
        .unwrap()
        .with_timezone(&Local);
    let clock = Arc::new(ManualClock::starting_at(start));
    let mut session = QiblaSession::with_clock(SessionSettings::default(), clock);
    let ticket = session.request_fix();
    session.complete_fix(ticket, Ok(KAABA));

    let standard = session.day_times(3.0).unwrap().unwrap().clone();
    let shifted = session.day_times(4.0).unwrap().unwrap().clone();

    assert_eq!(standard.date, shifted.date);
    assert_eq!(shifted.utc_offset_hours, 4.0);
    assert_ne!(standard.declination, shifted.declination);
    assert_eq!(
        shifted,
        crate::solar::solar_day_times(shifted.date, KAABA, 4.0).unwrap()
    );
}

#[test]
fn test_next_prayer_uses_session_clock() {
    let (mut session, _) = session_with_clock();
    assert_eq!(session.next_prayer(0.0).unwrap(), None);

    let ticket = session.request_fix();
    session.complete_fix(ticket, Ok(KAABA));
    let next = session.next_prayer(3.0).unwrap().unwrap();
    assert!(SolarEvent::PRAYERS.contains(&next));
}

#[test]
fn test_settings_from_default_config() {
    let settings = SessionSettings::from_config(&Config::default()).unwrap();
    assert_eq!(settings, SessionSettings::default());
}
