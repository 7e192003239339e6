use crate::{ObservedStatus, ServerStatus, StatusFlags, StatusMachine};

use chrono::{TimeZone, Utc};
use googletest::prelude::*;

fn observe(status: ServerStatus) -> ObservedStatus {
    ObservedStatus::Known(status)
}

#[test]
fn given_offline_when_installing_then_active_with_installing_flag() {
    // Given
    let mut machine = StatusMachine::new(ServerStatus::Offline);

    // When
    let transition = machine.apply(&observe(ServerStatus::Installing));

    // Then
    assert!(transition.became_active());
    assert_that!(machine.status(), eq(ServerStatus::Installing));
    assert!(machine.flags().installing);
    assert!(!machine.flags().auth_required);
}

#[test]
fn given_installing_when_auth_required_then_installing_flag_kept() {
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Installing));

    let transition = machine.apply(&observe(ServerStatus::AuthRequired));

    assert_that!(transition.current, eq(ServerStatus::AuthRequired));
    assert!(transition.is_active);
    assert_eq!(
        machine.flags(),
        StatusFlags {
            installing: true,
            auth_required: true,
            booted: false,
        }
    );
}

#[test]
fn given_auth_required_when_running_then_flags_cleared_and_start_recorded() {
    // Given
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Installing));
    machine.apply(&observe(ServerStatus::AuthRequired));
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

    // When
    machine.apply_at(&observe(ServerStatus::Running), now);

    // Then
    assert_that!(machine.status(), eq(ServerStatus::Running));
    assert!(!machine.flags().installing);
    assert!(!machine.flags().auth_required);
    assert_that!(machine.started_at(), some(eq(now)));
}

#[test]
fn given_running_when_booted_then_marker_only() {
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::AuthRequired));
    machine.apply(&observe(ServerStatus::Starting));

    let transition = machine.apply(&observe(ServerStatus::Booted));

    assert_that!(transition.current, eq(ServerStatus::Starting));
    assert!(machine.flags().booted);
    assert!(machine.flags().auth_required);
    assert!(machine.is_active());
}

#[test]
fn given_auth_required_when_auth_success_then_flags_cleared_status_kept() {
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Installing));
    machine.apply(&observe(ServerStatus::AuthRequired));

    machine.apply(&observe(ServerStatus::AuthSuccess));

    assert_that!(machine.status(), eq(ServerStatus::AuthRequired));
    assert!(!machine.flags().auth_required);
    assert!(!machine.flags().installing);
}

#[test]
fn given_running_when_stopped_then_inactive_and_everything_cleared() {
    // Given
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Running));
    machine.apply(&observe(ServerStatus::Booted));

    // When
    let transition = machine.apply(&observe(ServerStatus::Stopped));

    // Then
    assert!(transition.became_inactive());
    assert!(!machine.is_active());
    assert_that!(machine.started_at(), none());
    assert_eq!(machine.flags(), StatusFlags::default());
}

#[test]
fn given_running_when_offline_then_inactive() {
    let mut machine = StatusMachine::new(ServerStatus::Running);

    let transition = machine.apply(&observe(ServerStatus::Offline));

    assert!(transition.became_inactive());
}

#[test]
fn given_running_when_unknown_status_then_nothing_changes() {
    // Given
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Running));
    let started = machine.started_at();

    // When
    let transition = machine.apply(&ObservedStatus::Other("hibernating".to_string()));

    // Then
    assert_that!(transition.current, eq(ServerStatus::Running));
    assert!(transition.is_active);
    assert_that!(machine.started_at(), eq(started));
    assert_eq!(
        transition.observed,
        ObservedStatus::Other("hibernating".to_string())
    );
}

#[test]
fn given_offline_when_starting_then_active_without_flags() {
    let mut machine = StatusMachine::default();

    let transition = machine.apply(&observe(ServerStatus::Starting));

    assert!(transition.became_active());
    assert_eq!(machine.flags(), StatusFlags::default());
}

#[test]
fn given_initial_auth_required_when_created_then_flag_set() {
    let machine = StatusMachine::new(ServerStatus::AuthRequired);

    assert!(machine.flags().auth_required);
    assert!(machine.is_active());
}

#[test]
fn given_running_when_missing_then_inactive_but_start_kept() {
    let mut machine = StatusMachine::new(ServerStatus::Offline);
    machine.apply(&observe(ServerStatus::Running));

    machine.apply(&observe(ServerStatus::Missing));

    assert!(!machine.is_active());
    assert!(machine.started_at().is_some());
}
