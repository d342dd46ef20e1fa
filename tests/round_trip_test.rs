//! Integration tests: values taken out of a container and re-inserted into a
//! freshly cleared one reproduce an equivalent container.

use proptest::prelude::*;

use ba_containers_lib::data_structures::{
    ConcurrentQueue, DynamicArray, HashMap, HashSet, KeyedRecord, MultiMap, Record,
};
use uuid::Uuid;

fn record() -> impl Strategy<Value = Record> {
    ("[A-Z][a-z]{0,8}", -100i32..100).prop_map(|(name, number)| Record::new(name, number))
}

fn keyed_record() -> impl Strategy<Value = KeyedRecord> {
    (0u128..12, "[A-Z][a-z]{0,8}", -100i32..100)
        .prop_map(|(key, name, number)| KeyedRecord::with_key(Uuid::from_u128(key), name, number))
}

fn sorted_numbers<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<i32> {
    let mut numbers: Vec<i32> = records.into_iter().map(|r| r.number).collect();
    numbers.sort_unstable();
    numbers
}

proptest! {
    #[test]
    fn array_round_trip(records in proptest::collection::vec(record(), 0..48)) {
        let mut array: DynamicArray<Record> = records.into_iter().collect();
        let values = array.values();

        array.clear(values.len());
        for value in values.iter().cloned() {
            array.add(value);
        }

        prop_assert_eq!(array.len(), values.len());
        let names: Vec<&str> = array.as_slice().iter().map(|r| r.name.as_str()).collect();
        let expected: Vec<&str> = values.iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn map_round_trip(records in proptest::collection::vec(keyed_record(), 0..48)) {
        let mut map = HashMap::new();
        for record in records {
            map.add(record.key, record);
        }
        let keys = map.keys();
        let values = map.values();

        map.clear(0);
        for (key, value) in keys.iter().zip(values.iter()) {
            map.add(*key, value.clone());
        }

        prop_assert_eq!(map.keys(), keys);
        for (key, value) in map.iter() {
            prop_assert_eq!(key, &value.key);
        }
    }

    #[test]
    fn multi_map_round_trip(records in proptest::collection::vec(keyed_record(), 0..48)) {
        let mut multi_map = MultiMap::new();
        for record in &records {
            multi_map.add(record.key, record.clone());
        }
        let values = multi_map.all_values();

        multi_map.clear(0);
        for value in values.iter().cloned() {
            multi_map.add(value.key, value);
        }

        prop_assert_eq!(multi_map.len(), records.len());
        for record in &records {
            prop_assert!(multi_map.contains_pair(&record.key, record));
        }
        prop_assert_eq!(multi_map.all_values().len(), values.len());
    }

    #[test]
    fn set_round_trip(records in proptest::collection::vec(record(), 0..48)) {
        let mut set: HashSet<Record> = records.into_iter().collect();
        let values = set.to_vec();

        set.clear(0);
        for value in values.iter().cloned() {
            prop_assert!(set.add(value));
        }

        prop_assert_eq!(set.len(), values.len());
        prop_assert_eq!(sorted_numbers(set.iter()), sorted_numbers(&values));
    }

    #[test]
    fn queue_round_trip(records in proptest::collection::vec(record(), 0..48)) {
        let mut queue = ConcurrentQueue::<Record>::new();
        for record in &records {
            queue.enqueue(record.clone());
        }
        let mut drained = Vec::new();
        while let Some(record) = queue.dequeue() {
            drained.push(record);
        }

        for record in drained.iter().cloned() {
            queue.enqueue(record);
        }
        let mut again = Vec::new();
        while let Some(record) = queue.dequeue() {
            again.push(record.name);
        }

        let names: Vec<String> = records.into_iter().map(|r| r.name).collect();
        prop_assert_eq!(again, names);
    }
}
