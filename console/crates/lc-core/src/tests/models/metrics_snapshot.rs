use crate::MetricsSnapshot;

use googletest::prelude::*;

#[test]
fn given_full_payload_when_decoded_then_all_fields_mapped() {
    // Given
    let payload = r#"{
        "cpu": 150.0,
        "cpu_normalized": 37.5,
        "memory": 1048576,
        "memory_limit": 4194304,
        "disk_bytes": 2048,
        "players": 2,
        "players_list": ["alice", "bob"]
    }"#;

    // When
    let snapshot = MetricsSnapshot::from_json(payload).unwrap();

    // Then
    assert_that!(snapshot.cpu, some(eq(150.0)));
    assert_that!(snapshot.cpu_normalized, some(eq(37.5)));
    assert_that!(snapshot.memory_bytes, eq(1_048_576));
    assert_that!(snapshot.memory_limit_bytes, some(eq(4_194_304)));
    assert_that!(snapshot.disk_bytes, some(eq(2048)));
    assert_that!(snapshot.players, eq(2));
    assert_eq!(snapshot.players_list, vec!["alice", "bob"]);
}

#[test]
fn given_normalized_cpu_when_cpu_percent_then_normalized_preferred() {
    let snapshot = MetricsSnapshot::from_json(r#"{"cpu": 150.0, "cpu_normalized": 37.5}"#).unwrap();

    assert_that!(snapshot.cpu_percent(), some(eq(37.5)));
}

#[test]
fn given_only_raw_cpu_when_cpu_percent_then_raw_used() {
    let snapshot = MetricsSnapshot::from_json(r#"{"cpu": 12.5}"#).unwrap();

    assert_that!(snapshot.cpu_percent(), some(eq(12.5)));
    assert_that!(snapshot.memory_bytes, eq(0));
    assert!(snapshot.players_list.is_empty());
}

#[test]
fn given_memory_limit_when_ratio_then_fraction_returned() {
    let snapshot = MetricsSnapshot::from_json(r#"{"memory": 512, "memory_limit": 1024}"#).unwrap();

    assert_that!(snapshot.memory_ratio(), some(eq(0.5)));
}

#[test]
fn given_zero_memory_limit_when_ratio_then_none() {
    let snapshot = MetricsSnapshot::from_json(r#"{"memory": 512, "memory_limit": 0}"#).unwrap();

    assert_that!(snapshot.memory_ratio(), none());
}

#[test]
fn given_garbage_when_decoded_then_error() {
    assert_that!(MetricsSnapshot::from_json("{not json"), err(anything()));
}
