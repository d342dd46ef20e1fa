//! Demo element types and the orderings used to sort them.
//!
//! Both record kinds compare equal on `number` alone. Hashing follows
//! equality (`number` only) so that `a == b` always implies equal hashes.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read access to the fields every record kind shares.
pub trait RecordFields {
    /// Display name
    fn name(&self) -> &str;

    /// Numeric payload, also the equality key
    fn number(&self) -> i32;

    /// Case-insensitive prefix test on the name.
    fn name_starts_with(&self, prefix: &str) -> bool {
        self.name()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }
}

/// Element type of the array, set and queue demos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Display name
    pub name: String,
    /// Numeric payload
    pub number: i32,
}

impl Record {
    /// Creates a record.
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl RecordFields for Record {
    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i32 {
        self.number
    }
}

/// Element type of the map and multimap demos: a record carrying its own key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyedRecord {
    /// Map key; the nil UUID by default
    pub key: Uuid,
    /// Display name
    pub name: String,
    /// Numeric payload
    pub number: i32,
}

impl KeyedRecord {
    /// Creates a record under a fresh random key.
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self::with_key(Uuid::new_v4(), name, number)
    }

    /// Creates a record under the given key.
    pub fn with_key(key: Uuid, name: impl Into<String>, number: i32) -> Self {
        Self {
            key,
            name: name.into(),
            number,
        }
    }
}

impl PartialEq for KeyedRecord {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for KeyedRecord {}

impl Hash for KeyedRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl RecordFields for KeyedRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i32 {
        self.number
    }
}

/// The four orderings the demos sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSorting {
    /// Ascending by number
    NumberAsc,
    /// Descending by number
    NumberDesc,
    /// Lexical, ascending by name
    NameAsc,
    /// Lexical, descending by name
    NameDesc,
}

impl RecordSorting {
    /// All orderings, in declaration order.
    pub const ALL: [RecordSorting; 4] = [
        RecordSorting::NumberAsc,
        RecordSorting::NumberDesc,
        RecordSorting::NameAsc,
        RecordSorting::NameDesc,
    ];

    /// Compares two records under this ordering.
    pub fn compare<R: RecordFields>(self, a: &R, b: &R) -> Ordering {
        match self {
            RecordSorting::NumberAsc => a.number().cmp(&b.number()),
            RecordSorting::NumberDesc => b.number().cmp(&a.number()),
            RecordSorting::NameAsc => a.name().cmp(b.name()),
            RecordSorting::NameDesc => b.name().cmp(a.name()),
        }
    }
}
