//! HashMap suite: silent-default lookups, ordering and properties.

use proptest::prelude::*;
use test_case::test_case;
use uuid::Uuid;

use crate::config::ParallelConfig;
use crate::data_structures::{HashMap, KeyedRecord, RecordSorting, WorkerPool};
use crate::error::ContainerError;
use crate::tests::{keyed_record_strategy, EventCounter};

fn cities() -> HashMap<Uuid, KeyedRecord> {
    let mut map = HashMap::new();
    for (index, (name, number)) in [("Cairo", 3), ("Amsterdam", 1), ("Berlin", 2)]
        .into_iter()
        .enumerate()
    {
        let record = KeyedRecord::with_key(Uuid::from_u128(index as u128 + 1), name, number);
        map.add(record.key, record);
    }
    map
}

#[test_case(RecordSorting::NumberAsc, &[1, 2, 3] ; "number ascending")]
#[test_case(RecordSorting::NumberDesc, &[3, 2, 1] ; "number descending")]
#[test_case(RecordSorting::NameAsc, &[1, 2, 3] ; "name ascending")]
#[test_case(RecordSorting::NameDesc, &[3, 2, 1] ; "name descending")]
fn test_sort_by_value(ordering: RecordSorting, expected: &[i32]) {
    let mut map = cities();
    map.sort_by_value(|a, b| ordering.compare(a, b));
    let numbers: Vec<i32> = map.values().iter().map(|r| r.number).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_sort_by_key_keeps_pairs_together() {
    let mut map = cities();
    map.sort_by_key(|a, b| b.cmp(a));
    let pairs: Vec<(u128, i32)> = map.iter().map(|(k, v)| (k.as_u128(), v.number)).collect();
    assert_eq!(pairs, vec![(3, 2), (2, 1), (1, 3)]);
}

#[test]
fn test_get_after_remove_returns_default() {
    let mut map = cities();
    let key = Uuid::from_u128(2);

    assert_eq!(map.get(&key).name, "Amsterdam");
    let taken = map.remove_and_take(&key).unwrap();
    assert_eq!(taken.name, "Amsterdam");

    let missing = map.get(&key);
    assert!(missing.key.is_nil());
    assert!(missing.name.is_empty());
    assert_eq!(map.find(&key).map(|r| r.number), None);
    assert_eq!(map.try_get(&key).unwrap_err(), ContainerError::NotFound);
}

#[test]
fn test_clear_emits_no_events() {
    let mut map = cities();
    let removed = EventCounter::attach(map.on_remove());
    map.clear(8);
    assert!(map.is_empty());
    assert_eq!(removed.count(), 0);
}

#[test]
fn test_parallel_value_pass() {
    let pool = WorkerPool::new(&ParallelConfig::new().with_worker_threads(3).with_min_chunk_len(4))
        .unwrap();
    let mut map = HashMap::new();
    for key in 0..1_000u32 {
        map.add(key, u64::from(key));
    }

    map.par_for_each_value_mut(&pool, |key, value| *value += u64::from(*key));

    assert!(map.iter().all(|(key, value)| *value == 2 * u64::from(*key)));
    assert_eq!(map.keys(), (0..1_000).collect::<Vec<_>>());
}

proptest! {
    #[test]
    fn prop_add_get_remove(record in keyed_record_strategy()) {
        let mut map = HashMap::new();
        map.add(record.key, record.clone());
        prop_assert_eq!(map.get(&record.key).name, record.name.clone());

        let taken = map.remove_and_take(&record.key);
        prop_assert_eq!(taken.map(|r| r.name), Some(record.name));
        prop_assert!(map.get(&record.key).name.is_empty());
        prop_assert!(!map.contains_key(&record.key));
    }

    #[test]
    fn prop_one_value_per_key(records in proptest::collection::vec(keyed_record_strategy(), 0..64)) {
        let mut map = HashMap::new();
        for record in &records {
            map.add(record.key, record.clone());
        }
        let distinct: std::collections::HashSet<Uuid> = records.iter().map(|r| r.key).collect();
        prop_assert_eq!(map.len(), distinct.len());

        // The last write for each key wins.
        for record in records.iter().rev() {
            if let Some(stored) = map.find(&record.key) {
                let last = records.iter().rev().find(|r| r.key == record.key).unwrap();
                prop_assert_eq!(&stored.name, &last.name);
            }
        }
    }

    #[test]
    fn prop_removal_preserves_relative_order(keys in proptest::collection::vec(0u8..32, 0..48), victim in 0u8..32) {
        let mut map = HashMap::new();
        for key in &keys {
            map.add(*key, ());
        }
        let mut expected = map.keys();
        expected.retain(|key| *key != victim);

        map.remove_and_take(&victim);
        prop_assert_eq!(map.keys(), expected);
    }
}
