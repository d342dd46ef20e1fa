//! Scripted scenarios that drive each container end to end.
//!
//! Every scenario populates a container with deterministic city records,
//! counts its change events, sorts by each supported ordering, filters the
//! "cities with a population larger than [`POPULATION_THRESHOLD`]", prefixes
//! every name serially and then in parallel where the container supports
//! in-place iteration, and finally removes part of the content.
//!
//! The CLI's `demo` subcommand prints the resulting [`DemoReport`].

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ContainersConfig;
use crate::data_structures::{
    ConcurrentQueue, DynamicArray, EventChannel, HashMap, HashSet, KeyedRecord, MultiMap, Record,
    RecordFields, RecordSorting, WorkerPool,
};
use crate::error::{ContainersError, ContainersResult};

/// Largest number of records a scenario accepts.
pub const MAX_DEMO_SIZE: usize = 1_000_000;

/// Records with a number above this count as "large cities".
pub const POPULATION_THRESHOLD: i32 = 500_000;

/// Prefix applied to every name by the serial pass.
pub const SERIAL_PREFIX: &str = "Old ";

/// Prefix applied to every name by the parallel pass.
pub const PARALLEL_PREFIX: &str = "New ";

const CITIES: [&str; 16] = [
    "Amsterdam", "Barcelona", "Berlin", "Bogota", "Cairo", "Dublin", "Helsinki", "Lagos",
    "Lima", "Lisbon", "Nairobi", "Oslo", "Seoul", "Sydney", "Tokyo", "Vienna",
];

// Prime modulus: `index * STRIDE % MODULUS` is distinct for every index below it.
// A stride just above half the modulus alternates consecutive records across
// `POPULATION_THRESHOLD`, so even a handful of records lands on both sides.
const STRIDE: usize = 500_029;
const MODULUS: usize = 1_000_003;

/// Which container a scenario exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    /// [`DynamicArray`]
    Array,
    /// [`HashMap`]
    Map,
    /// [`MultiMap`]
    MultiMap,
    /// [`ConcurrentQueue`]
    Queue,
    /// [`HashSet`]
    Set,
}

impl ContainerKind {
    /// Every kind, in declaration order.
    pub const ALL: [ContainerKind; 5] = [
        ContainerKind::Array,
        ContainerKind::Map,
        ContainerKind::MultiMap,
        ContainerKind::Queue,
        ContainerKind::Set,
    ];
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Array => "array",
            ContainerKind::Map => "map",
            ContainerKind::MultiMap => "multi-map",
            ContainerKind::Queue => "queue",
            ContainerKind::Set => "set",
        };
        f.write_str(name)
    }
}

/// First and last name after sorting by one ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortCheck {
    /// Ordering applied
    pub ordering: RecordSorting,
    /// Name of the first record, if any
    pub first: Option<String>,
    /// Name of the last record, if any
    pub last: Option<String>,
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    /// Container exercised
    pub container: ContainerKind,
    /// Records generated
    pub size: usize,
    /// Events delivered to the "added" observer
    pub added_events: usize,
    /// Events delivered to the "removed" observer
    pub removed_events: usize,
    /// One entry per ordering the container can sort by
    pub sorts: Vec<SortCheck>,
    /// Records with a number above [`POPULATION_THRESHOLD`]
    pub above_threshold: usize,
    /// Serial prefix pass, in microseconds
    pub serial_pass_us: Option<u64>,
    /// Parallel prefix pass, in microseconds
    pub parallel_pass_us: Option<u64>,
    /// Records carrying both prefixes after the passes
    pub prefixed: usize,
    /// Records removed at the end of the scenario
    pub removed: usize,
    /// Records left in the container
    pub remaining: usize,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "container:        {}", self.container)?;
        writeln!(f, "size:             {}", self.size)?;
        writeln!(f, "added events:     {}", self.added_events)?;
        writeln!(f, "removed events:   {}", self.removed_events)?;
        for sort in &self.sorts {
            writeln!(
                f,
                "sorted {:<11} first={} last={}",
                format!("{:?}:", sort.ordering),
                sort.first.as_deref().unwrap_or("-"),
                sort.last.as_deref().unwrap_or("-"),
            )?;
        }
        writeln!(f, "above threshold:  {}", self.above_threshold)?;
        if let Some(us) = self.serial_pass_us {
            writeln!(f, "serial pass:      {us} us")?;
        }
        if let Some(us) = self.parallel_pass_us {
            writeln!(f, "parallel pass:    {us} us")?;
        }
        writeln!(f, "prefixed:         {}", self.prefixed)?;
        writeln!(f, "removed:          {}", self.removed)?;
        write!(f, "remaining:        {}", self.remaining)
    }
}

/// Deterministic city records: distinct numbers in `0..1_000_003`.
pub fn city_records(size: usize) -> Vec<Record> {
    (0..size)
        .map(|index| Record::new(city_name(index), city_number(index)))
        .collect()
}

/// Deterministic keyed city records; keys are derived from the index.
pub fn keyed_city_records(size: usize) -> Vec<KeyedRecord> {
    (0..size)
        .map(|index| {
            KeyedRecord::with_key(
                Uuid::from_u128(index as u128 + 1),
                city_name(index),
                city_number(index),
            )
        })
        .collect()
}

fn city_name(index: usize) -> String {
    let city = CITIES[index % CITIES.len()];
    match index / CITIES.len() {
        0 => city.to_string(),
        round => format!("{city} {round}"),
    }
}

fn city_number(index: usize) -> i32 {
    // Always below MODULUS, which fits in i32.
    ((index % MODULUS) * STRIDE % MODULUS) as i32
}

fn prefix_name(name: &mut String) {
    name.insert_str(0, SERIAL_PREFIX);
}

fn prefix_name_parallel(name: &mut String) {
    name.insert_str(0, PARALLEL_PREFIX);
}

fn carries_both_prefixes<R: RecordFields>(record: &R) -> bool {
    record
        .name()
        .strip_prefix(PARALLEL_PREFIX)
        .is_some_and(|rest| rest.starts_with(SERIAL_PREFIX))
}

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

fn count_events<E: 'static>(channel: &EventChannel<E>) -> Arc<AtomicUsize> {
    let counter = Arc::new(AtomicUsize::new(0));
    let observer = Arc::clone(&counter);
    channel.subscribe(move |_: &E| {
        observer.fetch_add(1, Ordering::Relaxed);
    });
    counter
}

fn sort_check<R: RecordFields>(ordering: RecordSorting, sorted: &[R]) -> SortCheck {
    SortCheck {
        ordering,
        first: sorted.first().map(|record| record.name().to_string()),
        last: sorted.last().map(|record| record.name().to_string()),
    }
}

/// Runs the scenario for `kind` over `size` records.
///
/// # Errors
///
/// [`ContainersError::Custom`] if `size` exceeds [`MAX_DEMO_SIZE`].
pub fn run(
    kind: ContainerKind,
    size: usize,
    config: &ContainersConfig,
    pool: &WorkerPool,
) -> ContainersResult<DemoReport> {
    if size > MAX_DEMO_SIZE {
        return Err(ContainersError::Custom(format!(
            "Demo size {size} exceeds the maximum of {MAX_DEMO_SIZE}"
        )));
    }

    tracing::info!(container = %kind, size, "Running demo scenario");
    let report = match kind {
        ContainerKind::Array => run_array(size, config, pool),
        ContainerKind::Map => run_map(size, config, pool),
        ContainerKind::MultiMap => run_multi_map(size, config),
        ContainerKind::Queue => run_queue(size, config, pool),
        ContainerKind::Set => run_set(size, config),
    };
    tracing::info!(
        container = %kind,
        added = report.added_events,
        removed = report.removed,
        remaining = report.remaining,
        "Demo scenario finished"
    );
    Ok(report)
}

fn run_array(size: usize, config: &ContainersConfig, pool: &WorkerPool) -> DemoReport {
    let mut array = DynamicArray::with_config(config.array.clone());
    let added = count_events(array.on_add());
    let removed_events = count_events(array.on_remove());

    for record in city_records(size) {
        array.add(record);
    }
    if let Some(first) = array.get(0).cloned() {
        array.add_unique(first);
    }

    let sorts = RecordSorting::ALL
        .iter()
        .map(|&ordering| {
            array.sort(|a, b| ordering.compare(a, b));
            sort_check(ordering, array.as_slice())
        })
        .collect();

    let above_threshold = array
        .filter(|record| record.number > POPULATION_THRESHOLD)
        .len();
    let serial = array.for_each_mut(|record| prefix_name(&mut record.name));
    let parallel = array.par_for_each_mut(pool, |record| prefix_name_parallel(&mut record.name));
    let prefixed = array.filter(carries_both_prefixes).len();
    let removed = array.remove_matching(|record| record.number <= POPULATION_THRESHOLD);

    DemoReport {
        container: ContainerKind::Array,
        size,
        added_events: added.load(Ordering::Relaxed),
        removed_events: removed_events.load(Ordering::Relaxed),
        sorts,
        above_threshold,
        serial_pass_us: Some(micros(serial)),
        parallel_pass_us: Some(micros(parallel)),
        prefixed,
        removed,
        remaining: array.len(),
    }
}

fn run_map(size: usize, config: &ContainersConfig, pool: &WorkerPool) -> DemoReport {
    let mut map = HashMap::with_config(config.map.clone());
    let added = count_events(map.on_add());
    let removed_events = count_events(map.on_remove());

    for record in keyed_city_records(size) {
        map.add(record.key, record);
    }

    let sorts = RecordSorting::ALL
        .iter()
        .map(|&ordering| {
            map.sort_by_value(|a, b| ordering.compare(a, b));
            sort_check(ordering, &map.values())
        })
        .collect();

    let above_threshold = map
        .filter_by_predicate(|_, record| record.number > POPULATION_THRESHOLD)
        .len();
    let serial = map.for_each_value_mut(|_, record| prefix_name(&mut record.name));
    let parallel =
        map.par_for_each_value_mut(pool, |_, record| prefix_name_parallel(&mut record.name));
    let prefixed = map
        .filter_by_predicate(|_, record| carries_both_prefixes(record))
        .len();

    let small: Vec<Uuid> = map
        .iter()
        .filter(|(_, record)| record.number <= POPULATION_THRESHOLD)
        .map(|(key, _)| *key)
        .collect();
    let removed = small
        .iter()
        .filter(|key| map.remove_and_take(key).is_some())
        .count();

    DemoReport {
        container: ContainerKind::Map,
        size,
        added_events: added.load(Ordering::Relaxed),
        removed_events: removed_events.load(Ordering::Relaxed),
        sorts,
        above_threshold,
        serial_pass_us: Some(micros(serial)),
        parallel_pass_us: Some(micros(parallel)),
        prefixed,
        removed,
        remaining: map.len(),
    }
}

fn run_multi_map(size: usize, config: &ContainersConfig) -> DemoReport {
    let mut multi_map = MultiMap::with_config(config.multi_map.clone());
    let added = count_events(multi_map.on_add());
    let removed_events = count_events(multi_map.on_remove());

    for (index, record) in keyed_city_records(size).into_iter().enumerate() {
        multi_map.add(CITIES[index % CITIES.len()].to_string(), record);
    }

    let above_threshold = multi_map
        .all_values()
        .iter()
        .filter(|record| record.number > POPULATION_THRESHOLD)
        .count();

    let first_city = CITIES[0].to_string();
    let mut removed = 0;
    if let Some(first) = multi_map.find_all(&first_city).first().cloned() {
        removed += multi_map.remove_first(&first_city, &first);
    }
    removed += multi_map.remove_all(&first_city);

    DemoReport {
        container: ContainerKind::MultiMap,
        size,
        added_events: added.load(Ordering::Relaxed),
        removed_events: removed_events.load(Ordering::Relaxed),
        sorts: Vec::new(),
        above_threshold,
        serial_pass_us: None,
        parallel_pass_us: None,
        prefixed: 0,
        removed,
        remaining: multi_map.len(),
    }
}

fn run_queue(size: usize, config: &ContainersConfig, pool: &WorkerPool) -> DemoReport {
    use rayon::prelude::*;

    let mut queue = ConcurrentQueue::<Record>::with_config(config.queue.clone());
    let added = count_events(queue.on_enqueue());
    let removed_events = count_events(queue.on_dequeue());

    let records = city_records(size);
    let min_len = pool.min_chunk_len();
    {
        let queue = &queue;
        pool.install(|| {
            records
                .par_iter()
                .with_min_len(min_len)
                .for_each(|record| queue.enqueue(record.clone()))
        });
    }

    let mut drained = Vec::with_capacity(queue.len());
    while let Some(record) = queue.dequeue() {
        drained.push(record);
    }
    let above_threshold = drained
        .iter()
        .filter(|record| record.number > POPULATION_THRESHOLD)
        .count();

    DemoReport {
        container: ContainerKind::Queue,
        size,
        added_events: added.load(Ordering::Relaxed),
        removed_events: removed_events.load(Ordering::Relaxed),
        sorts: Vec::new(),
        above_threshold,
        serial_pass_us: None,
        parallel_pass_us: None,
        prefixed: 0,
        removed: drained.len(),
        remaining: queue.len(),
    }
}

fn run_set(size: usize, config: &ContainersConfig) -> DemoReport {
    let mut set = HashSet::with_config(config.set.clone());
    let added = count_events(set.on_add());
    let removed_events = count_events(set.on_remove());

    let records = city_records(size);
    for record in &records {
        set.add(record.clone());
    }
    if let Some(first) = records.first() {
        set.add(first.clone());
    }

    let sorts = RecordSorting::ALL
        .iter()
        .map(|&ordering| sort_check(ordering, &set.sort(|a, b| ordering.compare(a, b))))
        .collect();

    let above_threshold = set
        .filter(|record| record.number > POPULATION_THRESHOLD)
        .len();
    let removed = set
        .filter(|record| record.number <= POPULATION_THRESHOLD)
        .iter()
        .filter(|record| set.remove(record))
        .count();

    DemoReport {
        container: ContainerKind::Set,
        size,
        added_events: added.load(Ordering::Relaxed),
        removed_events: removed_events.load(Ordering::Relaxed),
        sorts,
        above_threshold,
        serial_pass_us: None,
        parallel_pass_us: None,
        prefixed: 0,
        removed,
        remaining: set.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParallelConfig;

    fn pool() -> WorkerPool {
        WorkerPool::new(&ParallelConfig::new().with_worker_threads(2).with_min_chunk_len(8))
            .unwrap()
    }

    #[test]
    fn test_city_numbers_are_distinct() {
        let records = city_records(5_000);
        let unique: std::collections::HashSet<i32> =
            records.iter().map(|record| record.number).collect();
        assert_eq!(unique.len(), records.len());
    }

    #[test]
    fn test_small_sizes_straddle_the_threshold() {
        for size in [2, 10, 50] {
            let records = city_records(size);
            let above = records
                .iter()
                .filter(|record| record.number > POPULATION_THRESHOLD)
                .count();
            assert!(above > 0, "size {size}: nothing above the threshold");
            assert!(above < size, "size {size}: nothing at or below the threshold");
        }
    }

    #[test]
    fn test_small_map_scenario_keeps_large_cities() {
        let report = run(ContainerKind::Map, 50, &ContainersConfig::default(), &pool()).unwrap();
        assert_eq!(report.above_threshold, 25);
        assert_eq!(report.remaining, report.above_threshold);
        assert_eq!(report.removed, 50 - report.above_threshold);
    }

    #[test]
    fn test_city_names_repeat_with_round_suffix() {
        let records = city_records(CITIES.len() + 1);
        assert_eq!(records[0].name, "Amsterdam");
        assert_eq!(records[CITIES.len()].name, "Amsterdam 1");
    }

    #[test]
    fn test_every_kind_runs() {
        let config = ContainersConfig::default();
        let pool = pool();
        for kind in ContainerKind::ALL {
            let report = run(kind, 200, &config, &pool).unwrap();
            assert_eq!(report.container, kind);
            assert_eq!(report.added_events, 200);
        }
    }

    #[test]
    fn test_oversized_demo_is_rejected() {
        let result = run(
            ContainerKind::Array,
            MAX_DEMO_SIZE + 1,
            &ContainersConfig::default(),
            &pool(),
        );
        assert!(matches!(result, Err(ContainersError::Custom(_))));
    }
}
