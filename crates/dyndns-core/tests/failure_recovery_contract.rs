//! Architectural Contract Test: Failure Recovery Without Retries
//!
//! This test verifies that a failed cycle leaves the system in a state from
//! which the next scheduled cycle recovers on its own.
//!
//! Constraints verified:
//! - A rejected transaction invalidates the cached IP
//! - A local write fault is reported as I/O and also invalidates the cache
//! - The engine never retries within a cycle
//! - The next cycle resubmits the full transaction
//! - A failed lookup leaves the cache untouched
//!
//! If this test fails, a transient outage can leave DNS permanently stale.

mod common;

use common::*;
use dyndns_core::traits::IpCache;
use dyndns_core::{
    Error, FileIpCache, IpAddress, MemoryIpCache, UpdateEngine, UpdateOutcome, UpdateRequest,
    ZoneBuilder,
};

#[tokio::test]
async fn rejected_update_invalidates_cache() {
    let cache = MemoryIpCache::with_ip(IpAddress::parse("203.0.113.5").unwrap());
    let executor = RecordingExecutor::rejecting(2);

    let engine = UpdateEngine::new(
        Box::new(FixedIpResolver::new("198.51.100.7")),
        Box::new(cache.clone()),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(executor.clone()),
        ZoneBuilder::new("dynhost.example.net"),
    );

    let err = engine
        .run_once(&UpdateRequest::new(test_domain()))
        .await
        .unwrap_err();

    match err {
        Error::UpdateRejected { status, stderr } => {
            assert_eq!(status, Some(2));
            assert!(stderr.contains("tsig verify failure"));
        }
        other => panic!("expected UpdateRejected, got {:?}", other),
    }

    assert_eq!(executor.apply_call_count(), 1, "No retry inside a cycle");
    assert!(
        cache.load().await.unwrap().is_unset(),
        "Cached IP must be dropped after a rejected update"
    );
}

#[tokio::test]
async fn local_write_fault_is_io_error_and_invalidates_cache() {
    let cache = MemoryIpCache::with_ip(IpAddress::parse("203.0.113.5").unwrap());
    let executor = RecordingExecutor::failing_locally();

    let engine = UpdateEngine::new(
        Box::new(FixedIpResolver::new("198.51.100.7")),
        Box::new(cache.clone()),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(executor.clone()),
        ZoneBuilder::new("dynhost.example.net"),
    );

    let err = engine
        .run_once(&UpdateRequest::new(test_domain()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)), "got {:?}", err);
    assert_eq!(executor.apply_call_count(), 1);
    assert!(
        cache.load().await.unwrap().is_unset(),
        "Cached IP must be dropped after a local failure too"
    );
}

#[tokio::test]
async fn next_cycle_resubmits_after_failure() {
    let cache = MemoryIpCache::new();
    let failing = RecordingExecutor::rejecting(1);
    let accepting = RecordingExecutor::accepting();

    let first = UpdateEngine::new(
        Box::new(FixedIpResolver::new("198.51.100.7")),
        Box::new(cache.clone()),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(failing.clone()),
        ZoneBuilder::new("dynhost.example.net"),
    );
    assert!(first.run_once(&UpdateRequest::new(test_domain())).await.is_err());

    // Same IP as the failed attempt, so only the invalidation forces a resend
    let second = UpdateEngine::new(
        Box::new(FixedIpResolver::new("198.51.100.7")),
        Box::new(cache.clone()),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(accepting.clone()),
        ZoneBuilder::new("dynhost.example.net"),
    );
    let outcome = second
        .run_once(&UpdateRequest::new(test_domain()))
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated { previous: None, .. }));
    assert_eq!(accepting.apply_call_count(), 1);
    assert_eq!(failing.applied()[0].0, accepting.applied()[0].0, "Same full transaction");
    assert_eq!(cache.load().await.unwrap().as_str(), "198.51.100.7");
}

#[tokio::test]
async fn failed_lookup_leaves_cache_untouched() {
    let cache = MemoryIpCache::with_ip(IpAddress::parse("203.0.113.5").unwrap());
    let executor = RecordingExecutor::accepting();

    let engine = UpdateEngine::new(
        Box::new(FixedIpResolver::unreachable()),
        Box::new(cache.clone()),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(executor.clone()),
        ZoneBuilder::new("dynhost.example.net"),
    );

    let err = engine
        .run_once(&UpdateRequest::new(test_domain()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::IpResolution(_)), "got {:?}", err);
    assert_eq!(executor.apply_call_count(), 0);
    assert_eq!(cache.load().await.unwrap().as_str(), "203.0.113.5");
}

#[tokio::test]
async fn file_cache_is_removed_after_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old_ip");
    tokio::fs::write(&path, "203.0.113.5").await.unwrap();

    let engine = UpdateEngine::new(
        Box::new(FixedIpResolver::new("198.51.100.7")),
        Box::new(FileIpCache::new(&path)),
        Box::new(MockKeyStore::with_key("foo.example.org")),
        Box::new(RecordingExecutor::rejecting(1)),
        ZoneBuilder::new("dynhost.example.net"),
    );

    assert!(engine.run_once(&UpdateRequest::new(test_domain())).await.is_err());
    assert!(!path.exists(), "Cache file must be gone so the next cycle resends");
}
