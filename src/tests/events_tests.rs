//! Observer behaviour shared by every container.
//!
//! Uses mockall observers to pin down how many events arrive and with what
//! payload.

use std::sync::Arc;

use mockall::{mock, predicate, Sequence};
use parking_lot::Mutex;

use crate::config::CollectionConfig;
use crate::data_structures::{DynamicArray, HashMap, HashSet, MultiMap, Observer};

mock! {
    pub BoolObserver {}

    impl Observer<bool> for BoolObserver {
        fn notify(&self, event: &bool);
    }
}

mock! {
    pub ValueObserver {}

    impl Observer<i32> for ValueObserver {
        fn notify(&self, event: &i32);
    }
}

#[test]
fn test_array_add_notifies_once_per_insertion() {
    let mut observer = MockBoolObserver::new();
    observer
        .expect_notify()
        .with(predicate::eq(true))
        .times(3)
        .return_const(());

    let mut array = DynamicArray::new();
    array.on_add().subscribe(observer);
    array.add(1);
    array.add(2);
    array.insert_at(0, 0).unwrap();
    assert!(!array.add_unique(2));
    assert!(array.insert_at(9, 10).is_err());
}

#[test]
fn test_array_remove_notifies_only_on_actual_removal() {
    let mut observer = MockBoolObserver::new();
    observer.expect_notify().times(2).return_const(());

    let mut array: DynamicArray<i32> = [1, 2, 3].into_iter().collect();
    array.on_remove().subscribe(observer);
    assert!(array.remove_first(&2));
    assert!(!array.remove_first(&2));
    assert!(!array.remove_at(10));
    assert_eq!(array.remove_matching(|value| *value > 100), 0);
    assert_eq!(array.pop_front(), Some(1));
}

#[test]
fn test_map_events_carry_value_copies() {
    let mut seq = Sequence::new();
    let mut added = MockValueObserver::new();
    added
        .expect_notify()
        .with(predicate::eq(10))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    added
        .expect_notify()
        .with(predicate::eq(20))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut removed = MockValueObserver::new();
    removed
        .expect_notify()
        .with(predicate::eq(10))
        .times(1)
        .return_const(());

    let mut map = HashMap::new();
    map.on_add().subscribe(added);
    map.on_remove().subscribe(removed);
    map.add("a", 10);
    map.add("b", 20);
    assert_eq!(map.remove_and_take(&"a"), Some(10));
    assert_eq!(map.remove_and_take(&"a"), None);
}

#[test]
fn test_broadcast_disabled_delivers_nothing() {
    let mut observer = MockBoolObserver::new();
    observer.expect_notify().never();

    let mut set = HashSet::with_config(CollectionConfig::new().with_broadcast(false));
    set.on_add().subscribe(observer);
    set.add(1);
    set.add(2);
}

#[test]
fn test_set_broadcast_toggles_at_runtime() {
    let mut observer = MockBoolObserver::new();
    observer.expect_notify().times(1).return_const(());

    let mut set = HashSet::new();
    set.on_add().subscribe(observer);
    set.set_broadcast(false);
    set.add(1);
    set.set_broadcast(true);
    set.add(2);
    assert!(!set.add(2));
}

#[test]
fn test_observers_run_in_registration_order_after_mutation() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut multi_map = MultiMap::new();

    let first = Arc::clone(&log);
    multi_map
        .on_add()
        .subscribe(move |key: &&str| first.lock().push(format!("first:{key}")));
    let second = Arc::clone(&log);
    multi_map
        .on_add()
        .subscribe(move |key: &&str| second.lock().push(format!("second:{key}")));

    multi_map.add("k", 1);
    assert_eq!(*log.lock(), vec!["first:k", "second:k"]);
}

#[test]
fn test_observer_sees_completed_mutation() {
    let seen = Arc::new(Mutex::new(0));
    let mut array = DynamicArray::new();
    let counter = Arc::clone(&seen);
    array.on_add().subscribe(move |_: &bool| *counter.lock() += 1);

    for value in 0..5 {
        array.add(value);
        assert_eq!(*seen.lock(), array.len());
    }
}

#[test]
fn test_unsubscribed_observer_receives_nothing_further() {
    let mut observer = MockBoolObserver::new();
    observer.expect_notify().times(1).return_const(());

    let mut array = DynamicArray::new();
    let id = array.on_add().subscribe(observer);
    array.add(1);
    assert!(array.on_add().unsubscribe(id));
    array.add(2);
}
