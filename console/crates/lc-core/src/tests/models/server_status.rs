use crate::{ObservedStatus, ServerStatus};

use std::str::FromStr;

#[test]
fn test_server_status_round_trips_every_variant() {
    for status in ServerStatus::ALL {
        assert_eq!(ServerStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_server_status_from_str_rejects_unknown() {
    assert!(ServerStatus::from_str("hibernating").is_err());
    assert!(ServerStatus::from_str("Running").is_err());
}

#[test]
fn test_server_status_is_active() {
    let active: Vec<ServerStatus> = ServerStatus::ALL
        .into_iter()
        .filter(ServerStatus::is_active)
        .collect();

    assert_eq!(
        active,
        vec![
            ServerStatus::Installing,
            ServerStatus::AuthRequired,
            ServerStatus::Starting,
            ServerStatus::Running,
        ]
    );
}

#[test]
fn test_server_status_default_is_offline() {
    assert_eq!(ServerStatus::default(), ServerStatus::Offline);
}

#[test]
fn test_observed_status_keeps_unknown_values_verbatim() {
    let observed = ObservedStatus::parse("hibernating");

    assert_eq!(observed, ObservedStatus::Other("hibernating".to_string()));
    assert_eq!(observed.known(), None);
    assert_eq!(observed.to_string(), "hibernating");
}

#[test]
fn test_observed_status_parses_known_values() {
    assert_eq!(
        ObservedStatus::parse("auth_required"),
        ObservedStatus::Known(ServerStatus::AuthRequired)
    );
}
