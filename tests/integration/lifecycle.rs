use crate::*;

use beacon_core::TopicError;

/// The reference scenario: two active topics, five deliveries, counters
/// split 3/2 and summing to 5.
#[test]
fn test_two_topics_counter_split() {
    let (manager, _store) = make_node();
    let calls_a = Arc::new(AtomicUsize::new(0));
    let calls_b = Arc::new(AtomicUsize::new(0));

    manager
        .subscribe_to_topic("tm_a", counting_handler(calls_a.clone()))
        .unwrap();
    manager
        .subscribe_to_topic("tm_b", counting_handler(calls_b.clone()))
        .unwrap();

    for i in 0..3 {
        manager
            .handle_topic_message(&make_message("tm_a", &format!("msg-a{i}")))
            .unwrap();
    }
    for i in 0..2 {
        manager
            .handle_topic_message(&make_message("tm_b", &format!("msg-b{i}")))
            .unwrap();
    }

    assert_eq!(manager.topic_message_count("tm_a"), 3);
    assert_eq!(manager.topic_message_count("tm_b"), 2);
    assert_eq!(manager.total_message_count(), 5);
    assert_eq!(manager.active_topic_count(), 2);
    assert_eq!(calls_a.load(Ordering::SeqCst), 3);
    assert_eq!(calls_b.load(Ordering::SeqCst), 2);
}

/// Full per-topic lifecycle: create → subscribe → deliver → unsubscribe →
/// silent traffic → resubscribe, with the record surviving throughout.
#[test]
fn test_topic_lifecycle_preserves_record() {
    let (manager, _store) = make_node();
    let calls = Arc::new(AtomicUsize::new(0));

    let created = manager.create_topic_subscription("tm_ads").unwrap();
    assert!(!created.is_active);

    manager
        .subscribe_to_topic("tm_ads", counting_handler(calls.clone()))
        .unwrap();
    manager
        .handle_topic_message(&make_message("tm_ads", "msg-1"))
        .unwrap();

    manager.unsubscribe_from_topic("tm_ads").unwrap();
    assert!(!manager.is_subscribed_to_topic("tm_ads"));

    // Traffic while inactive is silently dropped and not counted.
    manager
        .handle_topic_message(&make_message("tm_ads", "msg-2"))
        .unwrap();
    assert_eq!(manager.topic_message_count("tm_ads"), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    manager
        .subscribe_to_topic("tm_ads", counting_handler(calls.clone()))
        .unwrap();
    manager
        .handle_topic_message(&make_message("tm_ads", "msg-3"))
        .unwrap();

    let subs = manager.subscribed_topics();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].message_count, 2);
    assert_eq!(subs[0].created_at, created.created_at);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Shutdown deactivates everything but the node can come back.
#[test]
fn test_close_then_resubscribe() {
    let (manager, _store) = make_node();
    let calls = Arc::new(AtomicUsize::new(0));

    for topic in ["tm_a", "tm_b", "tm_c"] {
        manager
            .subscribe_to_topic(topic, counting_handler(calls.clone()))
            .unwrap();
        manager
            .handle_topic_message(&make_message(topic, "msg-1"))
            .unwrap();
    }

    manager.close();
    manager.close();

    assert_eq!(manager.active_topic_count(), 0);
    assert_eq!(manager.subscribed_topics().len(), 3);
    assert_eq!(manager.total_message_count(), 3);

    // Deliveries after close are silent no-ops.
    manager
        .handle_topic_message(&make_message("tm_a", "msg-2"))
        .unwrap();
    assert_eq!(manager.total_message_count(), 3);

    // An unsubscribe after close reports NotSubscribed, not a crash.
    let err = manager.unsubscribe_from_topic("tm_a").unwrap_err();
    assert!(matches!(err, TopicError::NotSubscribed(_)));

    manager
        .subscribe_to_topic("tm_a", counting_handler(calls.clone()))
        .unwrap();
    manager
        .handle_topic_message(&make_message("tm_a", "msg-3"))
        .unwrap();
    assert_eq!(manager.topic_message_count("tm_a"), 2);
}

/// A failing handler surfaces the error but the attempt still counts,
/// and other topics are unaffected.
#[test]
fn test_handler_failure_counts_attempt() {
    let (manager, _store) = make_node();
    let calls = Arc::new(AtomicUsize::new(0));

    manager
        .subscribe_to_topic(
            "tm_flaky",
            Arc::new(|_message: &TopicMessage| -> anyhow::Result<()> {
                anyhow::bail!("backend unavailable")
            }),
        )
        .unwrap();
    manager
        .subscribe_to_topic("tm_ok", counting_handler(calls.clone()))
        .unwrap();

    let err = manager
        .handle_topic_message(&make_message("tm_flaky", "msg-1"))
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("failed to handle message for topic tm_flaky"));
    assert!(err.to_string().contains("backend unavailable"));

    manager
        .handle_topic_message(&make_message("tm_ok", "msg-2"))
        .unwrap();

    assert_eq!(manager.topic_message_count("tm_flaky"), 1);
    assert_eq!(manager.topic_message_count("tm_ok"), 1);
    assert_eq!(manager.total_message_count(), 2);

    // The caller retries explicitly; the second attempt counts too.
    manager
        .handle_topic_message(&make_message("tm_flaky", "msg-1"))
        .unwrap_err();
    assert_eq!(manager.topic_message_count("tm_flaky"), 2);
}
