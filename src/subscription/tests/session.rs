use crate::subscription::session::{collect, Ack, Kind, SubscriptionSession};
use alloc::vec;
use bytes::Bytes;

fn name(data: &'static str) -> Bytes {
    Bytes::from_static(data.as_bytes())
}

#[test]
fn test_subscribe_confirmed() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["foo", "bar"]));

    assert!(!session.is_exhausted());
    assert!(session.has_any(Kind::Channel));
    assert!(!session.is_tracked(Kind::Channel, &name("foo")));

    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("foo"), 1);
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("bar"), 2);

    assert!(session.is_tracked(Kind::Channel, &name("foo")));
    assert_eq!(vec![name("bar"), name("foo")], session.names(Kind::Channel));
    assert_eq!(Some(2), session.last_count(Kind::Channel));
    assert_eq!(None, session.last_count(Kind::Pattern));
    assert!(!session.has_any(Kind::Pattern));
}

#[test]
fn test_exhausted_after_all_unsubscribed() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["foo"]));
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("foo"), 1);

    session.unsubscribing(Kind::Channel, &collect(["foo"]));
    assert!(!session.is_exhausted());

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("foo"), 0);
    assert!(session.is_exhausted());
    assert_eq!(Some(0), session.last_count(Kind::Channel));
}

#[test]
fn test_bare_unsubscribe_awaits_one_ack_per_subscription() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["foo", "bar"]));
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("foo"), 1);

    // bar is still pending, but will be confirmed before the unsubscribe
    session.unsubscribing(Kind::Channel, &[]);
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("bar"), 2);

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("foo"), 1);
    assert!(!session.is_exhausted());

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("bar"), 0);
    assert!(session.is_exhausted());
}

#[test]
fn test_bare_unsubscribe_without_subscription_awaits_nil_ack() {
    let mut session = SubscriptionSession::new();
    session.unsubscribing(Kind::Pattern, &[]);
    assert!(!session.is_exhausted());

    session.apply_ack(Kind::Pattern, Ack::Unsubscribe, &Bytes::new(), 0);
    assert!(session.is_exhausted());
}

#[test]
fn test_bare_unsubscribe_excludes_leaving_names() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["foo", "bar"]));
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("foo"), 1);
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("bar"), 2);

    session.unsubscribing(Kind::Channel, &collect(["foo"]));
    session.unsubscribing(Kind::Channel, &[]);

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("foo"), 1);
    assert!(!session.is_exhausted());

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("bar"), 0);
    assert!(session.is_exhausted());
}

#[test]
fn test_repeated_bare_unsubscribe_awaits_single_nil_ack() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["foo", "bar"]));
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("foo"), 1);
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("bar"), 2);

    session.unsubscribing(Kind::Channel, &[]);
    assert!(!session.needs_unsubscribe(Kind::Channel));
    session.unsubscribing(Kind::Channel, &[]);

    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("foo"), 1);
    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &name("bar"), 0);
    assert!(!session.is_exhausted());

    // Second command finds no subscription left
    session.apply_ack(Kind::Channel, Ack::Unsubscribe, &Bytes::new(), 0);
    assert!(session.is_exhausted());
}

#[test]
fn test_subscription_after_bare_unsubscribe_needs_unsubscribe() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Pattern, &collect(["news.*"]));
    session.apply_ack(Kind::Pattern, Ack::Subscribe, &name("news.*"), 1);

    session.unsubscribing(Kind::Pattern, &[]);
    session.subscribing(Kind::Pattern, &collect(["news.*"]));
    assert!(session.needs_unsubscribe(Kind::Pattern));
    assert!(!session.needs_unsubscribe(Kind::Channel));

    session.unsubscribing(Kind::Pattern, &[]);
    session.apply_ack(Kind::Pattern, Ack::Unsubscribe, &name("news.*"), 0);
    session.apply_ack(Kind::Pattern, Ack::Subscribe, &name("news.*"), 1);
    assert!(!session.is_exhausted());

    session.apply_ack(Kind::Pattern, Ack::Unsubscribe, &name("news.*"), 0);
    assert!(session.is_exhausted());
}

#[test]
fn test_channels_and_patterns_tracked_separately() {
    let mut session = SubscriptionSession::new();
    session.subscribing(Kind::Channel, &collect(["news"]));
    session.subscribing(Kind::Pattern, &collect(["news"]));
    session.apply_ack(Kind::Channel, Ack::Subscribe, &name("news"), 1);
    session.apply_ack(Kind::Pattern, Ack::Subscribe, &name("news"), 2);

    session.unsubscribing(Kind::Pattern, &collect(["news"]));
    session.apply_ack(Kind::Pattern, Ack::Unsubscribe, &name("news"), 1);

    assert!(session.is_tracked(Kind::Channel, &name("news")));
    assert!(!session.is_tracked(Kind::Pattern, &name("news")));
    assert!(!session.is_exhausted());
}

#[test]
fn test_stop_and_release() {
    let mut session = SubscriptionSession::new();
    let foo = name("foo");

    assert!(session.stop(Kind::Channel, &foo));
    assert!(!session.stop(Kind::Channel, &foo));
    assert!(session.is_stopped(Kind::Channel, &foo));
    assert!(!session.is_stopped(Kind::Pattern, &foo));

    session.release_stopped(Kind::Channel, &foo);
    assert!(!session.is_stopped(Kind::Channel, &foo));
}
