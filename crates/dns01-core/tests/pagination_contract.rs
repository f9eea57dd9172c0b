//! Architectural Contract Test: Paginated Record Lookup
//!
//! Zones can hold more records than one page returns. The lookup must walk
//! every page before concluding a record is absent.
//!
//! Constraints verified:
//! - A record on the last page is found (no duplicate create)
//! - The walk stops at the first page containing a match
//! - An error on any page aborts the operation with no mutation
//! - The TXT comparison includes the surrounding quotes

mod common;

use common::*;
use dns01_core::locator::RECORDS_PAGE_SIZE;
use dns01_core::{ChallengeAction, ChallengeOutcome};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn record_on_last_page_is_found() {
    let filler = 2 * RECORDS_PAGE_SIZE as usize + 10;
    let zone = FakeZone::new(ZONE)
        .with_filler(filler)
        .with_record("_acme-challenge", "TXT", "\"token-abc\"");
    let h = Harness::new(zone).await;

    let outcome = assert_ok!(
        h.solver
            .present(&challenge_request(ChallengeAction::Present, "token-abc"))
            .await
    );

    assert!(matches!(outcome, ChallengeOutcome::AlreadyPresent { .. }));
    assert_eq!(h.zone.list_calls(), 3);
    assert_eq!(h.zone.create_calls(), 0);
}

#[tokio::test]
async fn absent_record_scans_all_pages_then_creates() {
    let zone = FakeZone::new(ZONE).with_filler(2 * RECORDS_PAGE_SIZE as usize + 1);
    let h = Harness::new(zone).await;

    assert_ok!(
        h.solver
            .present(&challenge_request(ChallengeAction::Present, "token-abc"))
            .await
    );

    assert_eq!(h.zone.list_calls(), 3);
    assert_eq!(h.zone.create_calls(), 1);
}

#[tokio::test]
async fn lookup_stops_after_first_matching_page() {
    let zone = FakeZone::new(ZONE)
        .with_record("_acme-challenge", "TXT", "\"token-abc\"")
        .with_filler(2 * RECORDS_PAGE_SIZE as usize);
    let h = Harness::new(zone).await;

    let outcome = assert_ok!(
        h.solver
            .clean_up(&challenge_request(ChallengeAction::CleanUp, "token-abc"))
            .await
    );

    assert!(matches!(outcome, ChallengeOutcome::Deleted { .. }));
    assert_eq!(h.zone.list_calls(), 1);
}

#[tokio::test]
async fn error_on_later_page_aborts_without_mutation() {
    let zone = FakeZone::new(ZONE)
        .with_filler(RECORDS_PAGE_SIZE as usize + 5)
        .with_list_failure_on_call(2);
    let h = Harness::new(zone).await;

    let err = assert_err!(
        h.solver
            .present(&challenge_request(ChallengeAction::Present, "token-abc"))
            .await
    );

    assert_eq!(err.status(), Some(500));
    assert_eq!(h.zone.list_calls(), 2);
    assert_eq!(h.zone.mutation_calls(), 0);
}

#[tokio::test]
async fn cleanup_list_error_means_no_delete() {
    let zone = FakeZone::new(ZONE)
        .with_record("_acme-challenge", "TXT", "\"token-abc\"")
        .with_list_failure_on_call(1);
    let h = Harness::new(zone).await;

    assert_err!(
        h.solver
            .clean_up(&challenge_request(ChallengeAction::CleanUp, "token-abc"))
            .await
    );

    assert_eq!(h.zone.delete_calls(), 0);
    assert_eq!(h.zone.txt_records().len(), 1);
}

#[tokio::test]
async fn unquoted_value_is_a_different_record() {
    let zone = FakeZone::new(ZONE).with_record("_acme-challenge", "TXT", "token-abc");
    let h = Harness::new(zone).await;

    let outcome = assert_ok!(
        h.solver
            .present(&challenge_request(ChallengeAction::Present, "token-abc"))
            .await
    );

    assert!(matches!(outcome, ChallengeOutcome::Created { .. }));
    assert_eq!(h.zone.txt_records().len(), 2);
}
