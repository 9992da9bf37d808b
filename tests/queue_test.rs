//! Integration tests for CoalescingQueue batching, ordering and requeue.

mod common;

use std::time::Duration;

use chatmod::error::QueueError;
use chatmod::queue::{CoalescingQueue, QueueOptions};
use common::{s, settle, RecordingHandler, Step};

// ===== Deduplication =====

#[tokio::test(start_paused = true)]
async fn test_add_twice_yields_one_occurrence() {
    let handler = RecordingHandler::new();
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(50)).unwrap();

    queue.add(s("x"));
    queue.add(s("x"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(handler.batches(), vec![vec![s("x")]]);
}

// ===== Flush triggers =====

#[tokio::test(start_paused = true)]
async fn test_count_triggered_flush() {
    let handler = RecordingHandler::new();
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(3)).unwrap();
    let start = tokio::time::Instant::now();

    queue.add(s("a"));
    queue.add(s("b"));
    queue.add(s("c"));
    settle().await;

    assert_eq!(handler.batches(), vec![vec![s("a"), s("b"), s("c")]]);
    assert_eq!(tokio::time::Instant::now(), start);

    // no timer is left behind to flush again
    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;
    assert_eq!(handler.batches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_time_triggered_flush() {
    let handler = RecordingHandler::new();
    let options = QueueOptions::new(50).with_timeout_ms(50);
    let queue = CoalescingQueue::new(handler.clone(), options).unwrap();

    queue.add(s("only"));
    tokio::time::sleep(Duration::from_millis(40)).await;
    settle().await;
    assert!(handler.batches().is_empty());

    tokio::time::sleep(Duration::from_millis(20)).await;
    settle().await;
    assert_eq!(handler.batches(), vec![vec![s("only")]]);
}

#[tokio::test(start_paused = true)]
async fn test_batches_never_exceed_max_count() {
    let handler = RecordingHandler::new();
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(2)).unwrap();

    for item in ["1", "2", "3", "4", "5"] {
        queue.add(s(item));
    }
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(
        handler.batches(),
        vec![vec![s("1"), s("2")], vec![s("3"), s("4")], vec![s("5")]]
    );
}

// ===== Sequential execution =====

#[tokio::test(start_paused = true)]
async fn test_second_batch_waits_for_first() {
    let handler = RecordingHandler::with_script([Step::Block]);
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(2)).unwrap();

    queue.add(s("a"));
    queue.add(s("b"));
    settle().await;
    queue.add(s("c"));
    queue.add(s("d"));
    settle().await;

    // batch #2 is formed but must not start while #1 is blocked
    assert_eq!(handler.batches(), vec![vec![s("a"), s("b")]]);

    handler.release();
    settle().await;

    assert_eq!(
        handler.batches(),
        vec![vec![s("a"), s("b")], vec![s("c"), s("d")]]
    );
    assert_eq!(handler.max_in_flight(), 1);
}

// ===== Failure handling =====

#[tokio::test(start_paused = true)]
async fn test_failed_batch_is_requeued_before_new_items() {
    let handler = RecordingHandler::with_script([Step::Fail]);
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(10)).unwrap();

    queue.add(s("a"));
    queue.add(s("b"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;
    assert_eq!(handler.batches().len(), 1);

    // requeue alone does not schedule a flush
    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;
    assert_eq!(handler.batches().len(), 1);

    queue.add(s("c"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(
        handler.batches(),
        vec![vec![s("a"), s("b")], vec![s("a"), s("b"), s("c")]]
    );
}

#[tokio::test(start_paused = true)]
async fn test_items_left_after_count_flush_still_go_out() {
    let handler = RecordingHandler::with_script([Step::Fail]);
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(2)).unwrap();

    queue.add(s("a"));
    queue.add(s("b"));
    settle().await;

    // [a, b] is back in the queue, so "c" makes three pending items and
    // the count flush takes only the first two
    queue.add(s("c"));
    settle().await;
    assert_eq!(
        handler.batches(),
        vec![vec![s("a"), s("b")], vec![s("a"), s("b")]]
    );

    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(
        handler.batches(),
        vec![
            vec![s("a"), s("b")],
            vec![s("a"), s("b")],
            vec![s("c")]
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_requeue_skips_items_added_meanwhile() {
    let handler = RecordingHandler::with_script([Step::BlockThenFail]);
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(3)).unwrap();

    queue.add(s("a"));
    queue.add(s("b"));
    queue.add(s("c"));
    settle().await;

    // "a" is in flight, not pending, so it can be added again
    queue.add(s("a"));
    handler.release();
    settle().await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(
        handler.batches(),
        vec![
            vec![s("a"), s("b"), s("c")],
            vec![s("a"), s("b"), s("c")]
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_of_requeued_item_ignored() {
    let handler = RecordingHandler::with_script([Step::Fail]);
    let queue = CoalescingQueue::new(handler.clone(), QueueOptions::new(10)).unwrap();

    queue.add(s("a"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    queue.add(s("a"));
    queue.add(s("b"));
    tokio::time::sleep(Duration::from_millis(60)).await;
    settle().await;

    assert_eq!(handler.batches()[1], vec![s("a"), s("b")]);
}

// ===== Construction =====

#[tokio::test]
async fn test_zero_max_count_rejected() {
    let result = CoalescingQueue::new(RecordingHandler::new(), QueueOptions::new(0));
    assert!(matches!(result, Err(QueueError::InvalidMaxCount)));
}
