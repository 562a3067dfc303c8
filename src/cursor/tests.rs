//! Tests for the pagination state machine
//!
//! Driven entirely through an in-memory [`WindowSource`] that records
//! every windowed query it receives.

use super::*;
use crate::error::Error;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::{Cell, RefCell};
use test_case::test_case;

/// In-memory source over `available` synthetic documents, reporting
/// `reported_total` to count queries (the two differ to simulate a
/// source shrinking after the count).
struct MockSource {
    reported_total: u64,
    available: u64,
    count_calls: Cell<usize>,
    /// Every (from, size) window that reached the source
    windows: RefCell<Vec<(u64, u64)>>,
    /// Offsets whose next fetch fails (consumed on use)
    fail_at: RefCell<Vec<u64>>,
}

impl MockSource {
    fn with_total(total: u64) -> Self {
        Self::stale(total, total)
    }

    fn stale(reported_total: u64, available: u64) -> Self {
        Self {
            reported_total,
            available,
            count_calls: Cell::new(0),
            windows: RefCell::new(Vec::new()),
            fail_at: RefCell::new(Vec::new()),
        }
    }

    fn failing_at(self, offset: u64) -> Self {
        self.fail_at.borrow_mut().push(offset);
        self
    }

    fn doc(i: u64) -> JsonValue {
        json!({ "_id": format!("doc-{i}"), "idx": i })
    }

    fn windows(&self) -> Vec<(u64, u64)> {
        self.windows.borrow().clone()
    }
}

impl WindowSource for MockSource {
    fn count(&self, _query: &QuerySpec) -> Result<u64> {
        self.count_calls.set(self.count_calls.get() + 1);
        Ok(self.reported_total)
    }

    fn search(&self, body: &JsonObject) -> Result<Vec<JsonValue>> {
        let from = body
            .get("from")
            .and_then(JsonValue::as_u64)
            .expect("cursor must inject from");
        let size = body
            .get("size")
            .and_then(JsonValue::as_u64)
            .expect("cursor must inject size");

        let failing = self.fail_at.borrow().iter().position(|&o| o == from);
        if let Some(i) = failing {
            self.fail_at.borrow_mut().remove(i);
            return Err(Error::response("transient failure"));
        }

        self.windows.borrow_mut().push((from, size));
        let end = (from + size).min(self.available);
        Ok((from..end.max(from)).map(Self::doc).collect())
    }
}

fn ids(items: Vec<Result<JsonValue>>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.unwrap()["_id"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Cap and Window Clamping
// ============================================================================

#[test_case(None, 25, 25; "unspecified cap takes the full count")]
#[test_case(Some(12), 25, 12; "cap below count is kept")]
#[test_case(Some(40), 25, 25; "cap above count clamps down")]
#[test_case(Some(0), 25, 0; "zero cap stays zero")]
#[test_case(None, 0, 0; "empty source")]
fn test_effective_cap(cap: Option<u64>, total: u64, expected: u64) {
    let mut config = CursorConfig::new().window_size(10);
    config.cap = cap;

    let cursor = PagedCursor::with_config(MockSource::with_total(total), QuerySpec::match_all(), config)
        .unwrap();
    assert_eq!(cursor.total_cap(), expected);
}

#[test_case(10, 25, 10; "window below cap is kept")]
#[test_case(1000, 25, 25; "window clamps down to cap")]
#[test_case(0, 25, 1; "window has a floor of one")]
fn test_effective_window(window: u64, total: u64, expected: u64) {
    let cursor = PagedCursor::with_config(
        MockSource::with_total(total),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(window),
    )
    .unwrap();
    assert_eq!(cursor.window_size(), expected);
}

#[test]
fn test_zero_cap_zeroes_the_window() {
    let cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().cap(0).window_size(10),
    )
    .unwrap();
    assert_eq!(cursor.window_size(), 0);
}

// ============================================================================
// Full Iteration Scenarios
// ============================================================================

#[test]
fn test_full_scan_in_three_pages() {
    // 25 docs, no cap, window 10: windows at 0, 10, 20; pages 10, 10, 5.
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let items = ids(cursor.iter().collect());
    assert_eq!(items.len(), 25);
    assert_eq!(items[0], "doc-0");
    assert_eq!(items[24], "doc-24");
    assert_eq!(cursor.source().windows(), vec![(0, 10), (10, 10), (20, 10)]);
}

#[test]
fn test_capped_scan_stops_mid_page() {
    // 25 docs, cap 12, window 10: second page is fetched whole but only
    // two of its items are pulled before the offset check ends the pass.
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().cap(12).window_size(10),
    )
    .unwrap();

    let items = ids(cursor.iter().collect());
    assert_eq!(items.len(), 12);
    assert_eq!(items[11], "doc-11");
    assert_eq!(cursor.source().windows(), vec![(0, 10), (10, 10)]);
}

#[test]
fn test_empty_source_never_queries_a_window() {
    let mut cursor =
        PagedCursor::new(MockSource::with_total(0), QuerySpec::match_all()).unwrap();

    assert_eq!(cursor.iter().count(), 0);
    assert!(cursor.source().windows().is_empty());
    assert_eq!(cursor.source().count_calls.get(), 1);
}

#[test]
fn test_zero_cap_never_queries_a_window() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().cap(0),
    )
    .unwrap();

    assert_eq!(cursor.iter().count(), 0);
    assert!(cursor.source().windows().is_empty());
}

#[test]
fn test_iterator_is_fused_after_exhaustion() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(3),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(2),
    )
    .unwrap();

    let mut items = cursor.iter();
    assert_eq!(items.by_ref().count(), 3);
    assert!(items.next().is_none());
    assert!(items.next().is_none());
}

// ============================================================================
// Restartability
// ============================================================================

#[test]
fn test_restart_reproduces_the_sequence() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let first = ids(cursor.iter().collect());
    let second = ids(cursor.iter().collect());
    assert_eq!(first, second);

    // The count runs once, at construction; restarting refetches pages.
    assert_eq!(cursor.source().count_calls.get(), 1);
    assert_eq!(cursor.source().windows().len(), 6);
}

#[test]
fn test_abandoned_pass_restarts_from_zero() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let partial = ids(cursor.iter().take(13).collect());
    assert_eq!(partial.len(), 13);

    let full = ids(cursor.iter().collect());
    assert_eq!(full.len(), 25);
    assert_eq!(full[0], "doc-0");
}

// ============================================================================
// Stale Counts and Early Exhaustion
// ============================================================================

#[test]
fn test_shrunken_source_exhausts_without_error() {
    // The count said 25 but only 13 docs remain: pages of 10 and 3, then
    // an empty window at offset 13 ends the pass cleanly.
    let mut cursor = PagedCursor::with_config(
        MockSource::stale(25, 13),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let items = ids(cursor.iter().collect());
    assert_eq!(items.len(), 13);
    assert_eq!(
        cursor.source().windows(),
        vec![(0, 10), (10, 10), (13, 10)]
    );
}

#[test]
fn test_immediately_empty_window_despite_positive_count() {
    let mut cursor = PagedCursor::with_config(
        MockSource::stale(10, 0),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    assert_eq!(cursor.iter().count(), 0);
    assert_eq!(cursor.source().windows(), vec![(0, 10)]);
}

// ============================================================================
// Error Propagation
// ============================================================================

#[test]
fn test_count_failure_surfaces_at_construction() {
    struct BrokenSource;
    impl WindowSource for BrokenSource {
        fn count(&self, _query: &QuerySpec) -> Result<u64> {
            Err(Error::response("count unavailable"))
        }
        fn search(&self, _body: &JsonObject) -> Result<Vec<JsonValue>> {
            unreachable!("construction must not reach search")
        }
    }

    let err = PagedCursor::new(BrokenSource, QuerySpec::match_all()).unwrap_err();
    assert!(err.to_string().contains("count unavailable"));
}

#[test]
fn test_fetch_failure_surfaces_at_the_triggering_pull() {
    let source = MockSource::with_total(25).failing_at(10);
    let mut cursor = PagedCursor::with_config(
        source,
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let mut items = cursor.iter();
    for i in 0..10 {
        assert_eq!(items.next().unwrap().unwrap()["idx"], i);
    }

    // The eleventh pull triggers the failing window.
    let err = items.next().unwrap().unwrap_err();
    assert!(err.to_string().contains("transient failure"));

    // The failed window was not consumed: the next pull re-attempts it
    // and the pass completes.
    let rest = ids(items.collect());
    assert_eq!(rest.len(), 15);
    assert_eq!(rest[0], "doc-10");
}

// ============================================================================
// Query Pass-Through
// ============================================================================

#[test]
fn test_injected_window_overrides_caller_fields() {
    let query = QuerySpec::from_value(json!({
        "query": { "term": { "account": 7 } },
        "from": 999,
        "size": 999
    }))
    .unwrap();

    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(5),
        query,
        CursorConfig::new().window_size(3),
    )
    .unwrap();

    assert_eq!(cursor.iter().count(), 5);
    assert_eq!(cursor.source().windows(), vec![(0, 3), (3, 3)]);
}

// ============================================================================
// Iterator Plumbing
// ============================================================================

#[test]
fn test_size_hint_upper_bound_tracks_consumption() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(25),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(10),
    )
    .unwrap();

    let mut items = cursor.iter();
    assert_eq!(items.size_hint(), (0, Some(25)));

    for _ in 0..10 {
        items.next().unwrap().unwrap();
    }
    assert_eq!(items.size_hint(), (0, Some(15)));
}

#[test]
fn test_into_iterator_on_mutable_reference() {
    let mut cursor = PagedCursor::with_config(
        MockSource::with_total(4),
        QuerySpec::match_all(),
        CursorConfig::new().window_size(2),
    )
    .unwrap();

    let mut seen = 0;
    for doc in &mut cursor {
        doc.unwrap();
        seen += 1;
    }
    assert_eq!(seen, 4);
}
