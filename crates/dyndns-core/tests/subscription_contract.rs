//! Architectural Contract Test: Subscription Ordering
//!
//! This test verifies the order of side effects during a subscription.
//!
//! Constraints verified:
//! - An unavailable domain aborts before any key is generated or posted
//! - A rejected key leaves no schedule behind
//! - A supplied public key is posted verbatim, the key store is not consulted
//! - A schedule failure after acceptance is reported, registration stands
//!
//! If this test fails, a subscription can leave partial state behind.

mod common;

use common::*;
use dyndns_core::traits::{Availability, Registration};
use dyndns_core::{Error, SubscriptionClient, SubscriptionState};

fn client(
    registrar: &MockRegistrar,
    key_store: &MockKeyStore,
    scheduler: &MockScheduler,
) -> SubscriptionClient {
    SubscriptionClient::new(
        Box::new(registrar.clone()),
        Box::new(key_store.clone()),
        Box::new(scheduler.clone()),
    )
}

#[tokio::test]
async fn successful_subscription_generates_registers_and_schedules() {
    let registrar = MockRegistrar::accepting();
    let key_store = MockKeyStore::empty();
    let scheduler = MockScheduler::new();

    let outcome = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap();

    assert_eq!(outcome.state, SubscriptionState::Subscribed);
    assert_eq!(outcome.domain, test_domain());
    assert!(outcome.key.is_some());

    assert_eq!(key_store.generate_call_count(), 1);
    assert_eq!(
        registrar.registered_keys(),
        vec![(
            "foo.example.org".to_string(),
            "c2VjcmV0LWtleS1tYXRlcmlhbA==".to_string()
        )]
    );
    assert_eq!(scheduler.install_call_count(), 1);
}

#[tokio::test]
async fn existing_key_is_reused() {
    let registrar = MockRegistrar::accepting();
    let key_store = MockKeyStore::with_key("foo.example.org");
    let scheduler = MockScheduler::new();

    client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap();

    assert_eq!(key_store.generate_call_count(), 0);
    assert_eq!(registrar.registered_keys().len(), 1);
}

#[tokio::test]
async fn unavailable_domain_aborts_before_key_generation() {
    let registrar = MockRegistrar::new(
        Availability::Unavailable { status: 404 },
        Registration::Accepted,
    );
    let key_store = MockKeyStore::empty();
    let scheduler = MockScheduler::new();

    let err = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap_err();

    match err {
        Error::DomainUnavailable { domain, status } => {
            assert_eq!(domain, "foo.example.org");
            assert_eq!(status, 404);
        }
        other => panic!("expected DomainUnavailable, got {:?}", other),
    }
    assert_eq!(registrar.check_call_count(), 1);
    assert_eq!(key_store.get_or_create_call_count(), 0, "No key generated");
    assert!(registrar.registered_keys().is_empty(), "Nothing posted");
    assert_eq!(scheduler.install_call_count(), 0);
}

#[tokio::test]
async fn rejected_registration_carries_registrar_message() {
    let registrar = MockRegistrar::new(
        Availability::Available,
        Registration::Rejected {
            message: "Key already exists".to_string(),
        },
    );
    let key_store = MockKeyStore::empty();
    let scheduler = MockScheduler::new();

    let err = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap_err();

    match err {
        Error::RegistrationRejected { domain, message } => {
            assert_eq!(domain, "foo.example.org");
            assert_eq!(message, "Key already exists");
        }
        other => panic!("expected RegistrationRejected, got {:?}", other),
    }
    assert_eq!(scheduler.install_call_count(), 0, "No schedule without registration");
}

#[tokio::test]
async fn key_generation_failure_posts_nothing() {
    let registrar = MockRegistrar::accepting();
    let key_store = MockKeyStore::failing();
    let scheduler = MockScheduler::new();

    let err = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::KeyGeneration(_)), "got {:?}", err);
    assert!(registrar.registered_keys().is_empty());
}

#[tokio::test]
async fn supplied_public_key_skips_key_store() {
    let registrar = MockRegistrar::accepting();
    let key_store = MockKeyStore::empty();
    let scheduler = MockScheduler::new();

    let outcome = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), Some("b3BlcmF0b3Ita2V5"))
        .await
        .unwrap();

    assert!(outcome.key.is_none());
    assert_eq!(key_store.get_or_create_call_count(), 0);
    assert_eq!(registrar.registered_keys()[0].1, "b3BlcmF0b3Ita2V5");
}

#[tokio::test]
async fn schedule_failure_after_registration_is_reported() {
    let registrar = MockRegistrar::accepting();
    let key_store = MockKeyStore::empty();
    let scheduler = MockScheduler::failing();

    let err = client(&registrar, &key_store, &scheduler)
        .subscribe(&test_domain(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ScheduleInstall(_)), "got {:?}", err);
    assert_eq!(registrar.registered_keys().len(), 1, "Registration stands");
    assert_eq!(scheduler.install_call_count(), 1);
}
