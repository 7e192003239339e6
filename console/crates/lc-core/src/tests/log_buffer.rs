use crate::LogBuffer;

use googletest::prelude::*;
use proptest::prelude::*;

// =========================================================================
// Property-Based Tests - Log Buffer
// =========================================================================

proptest! {
    #[test]
    fn given_any_appends_when_buffered_then_newest_suffix_kept(
        lines in proptest::collection::vec("[a-z0-9 ]{0,12}", 0..1200),
    ) {
        let mut buffer = LogBuffer::new(500);

        for line in &lines {
            buffer.push(line.clone());
            prop_assert!(buffer.len() <= 500);
        }

        let keep = lines.len().min(500);
        let expected = &lines[lines.len() - keep..];
        prop_assert_eq!(buffer.texts(), expected.to_vec());
    }

    #[test]
    fn given_any_appends_when_buffered_then_sequence_strictly_increasing(count in 0usize..50) {
        let mut buffer = LogBuffer::new(16);

        for i in 0..count {
            buffer.push(format!("line {i}"));
        }

        let seqs: Vec<u64> = buffer.iter().map(|line| line.seq).collect();
        prop_assert!(seqs.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

// =========================================================================
// Unit Tests - Log Buffer
// =========================================================================

#[test]
fn given_full_buffer_when_pushed_then_oldest_evicted() {
    // Given
    let mut buffer = LogBuffer::new(3);
    buffer.extend(["a", "b", "c"]);

    // When
    buffer.push("d");

    // Then
    assert_eq!(buffer.texts(), vec!["b", "c", "d"]);
    assert_that!(buffer.len(), eq(3));
}

#[test]
fn given_zero_capacity_when_created_then_holds_one_line() {
    let mut buffer = LogBuffer::new(0);

    buffer.extend(["a", "b"]);

    assert_that!(buffer.capacity(), eq(1));
    assert_eq!(buffer.texts(), vec!["b"]);
}

#[test]
fn given_live_lines_when_backfilled_then_history_precedes_live() {
    // Given
    let mut buffer = LogBuffer::new(10);
    buffer.extend(["stale 1", "stale 2", "live 1", "live 2"]);

    // When
    buffer.backfill(["old 1", "old 2", "old 3"], 2);

    // Then
    assert_eq!(buffer.texts(), vec!["old 1", "old 2", "old 3", "live 1", "live 2"]);
}

#[test]
fn given_history_larger_than_capacity_when_backfilled_then_newest_kept() {
    let mut buffer = LogBuffer::new(3);
    buffer.push("live");

    let history_kept = buffer.backfill(["h1", "h2", "h3", "h4"], 1);

    assert_eq!(buffer.texts(), vec!["h3", "h4", "live"]);
    assert_that!(history_kept, eq(2));
}

#[test]
fn given_keep_newest_larger_than_len_when_backfilled_then_all_kept() {
    let mut buffer = LogBuffer::new(10);
    buffer.push("live");

    buffer.backfill(["h1"], 5);

    assert_eq!(buffer.texts(), vec!["h1", "live"]);
}

#[test]
fn given_buffer_when_cleared_then_empty_but_sequence_continues() {
    let mut buffer = LogBuffer::default();
    buffer.extend(["a", "b"]);

    buffer.clear();
    let seq = buffer.push("c").seq;

    assert_that!(buffer.len(), eq(1));
    assert_that!(seq, eq(2));
}
