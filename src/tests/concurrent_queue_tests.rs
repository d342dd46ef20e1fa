//! ConcurrentQueue suite: FIFO order, split handles and multi-producer delivery.

use std::collections::HashMap;
use std::thread;

use proptest::prelude::*;

use crate::config::QueueConfig;
use crate::data_structures::{ConcurrentQueue, Record, Spsc};
use crate::error::ContainerError;
use crate::tests::{records_strategy, EventCounter};

#[test]
fn test_peek_does_not_remove() {
    let mut queue = ConcurrentQueue::<Record>::new();
    queue.enqueue(Record::new("Seoul", 1));
    queue.enqueue(Record::new("Tokyo", 2));

    assert_eq!(queue.peek().map(|r| r.name.as_str()), Some("Seoul"));
    assert_eq!(queue.peek().map(|r| r.name.as_str()), Some("Seoul"));
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dequeue().map(|r| r.number), Some(1));
    assert_eq!(queue.peek().map(|r| r.number), Some(2));
}

#[test]
fn test_empty_queue() {
    let mut queue = ConcurrentQueue::<u8, Spsc>::new();
    assert!(queue.is_empty());
    assert_eq!(queue.peek(), None);
    assert_eq!(queue.dequeue(), None);
    assert!(!queue.pop());
    assert_eq!(queue.try_dequeue(), Err(ContainerError::Empty));
}

#[test]
fn test_dequeue_events_only_on_removal() {
    let mut queue = ConcurrentQueue::<i32>::new();
    let dequeued = EventCounter::attach(queue.on_dequeue());
    queue.enqueue(1);
    assert!(queue.pop());
    assert!(!queue.pop());
    assert_eq!(queue.dequeue(), None);
    assert_eq!(dequeued.count(), 1);
}

#[test]
fn test_broadcast_disabled() {
    let mut queue = ConcurrentQueue::<i32>::with_config(QueueConfig::new().with_broadcast(false));
    let enqueued = EventCounter::attach(queue.on_enqueue());
    queue.enqueue(1);
    queue.set_broadcast(true);
    queue.enqueue(2);
    assert_eq!(enqueued.count(), 1);
}

#[test]
fn test_cloned_producers_preserve_per_producer_order() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 2_000;

    let mut queue = ConcurrentQueue::<(usize, usize)>::new();
    let (producer, mut consumer) = queue.split();
    let mut received = Vec::with_capacity(PRODUCERS * PER_PRODUCER);

    thread::scope(|scope| {
        for id in 0..PRODUCERS {
            let producer = producer.clone();
            scope.spawn(move || {
                for seq in 0..PER_PRODUCER {
                    producer.enqueue((id, seq));
                }
            });
        }
        drop(producer);

        while received.len() < PRODUCERS * PER_PRODUCER {
            match consumer.dequeue() {
                Some(item) => received.push(item),
                None => thread::yield_now(),
            }
        }
    });

    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    for (id, seq) in received {
        if let Some(previous) = last_seen.insert(id, seq) {
            assert!(seq > previous, "producer {id} out of order");
        }
    }
    assert_eq!(last_seen.len(), PRODUCERS);
    assert!(queue.is_empty());
}

proptest! {
    #[test]
    fn prop_fifo_single_thread(records in records_strategy()) {
        let mut queue = ConcurrentQueue::<Record, Spsc>::new();
        for record in &records {
            queue.enqueue(record.clone());
        }
        prop_assert_eq!(queue.len(), records.len());

        let mut names = Vec::new();
        while let Some(record) = queue.dequeue() {
            names.push(record.name);
        }
        let expected: Vec<String> = records.into_iter().map(|r| r.name).collect();
        prop_assert_eq!(names, expected);
        prop_assert!(queue.is_empty());
    }
}
