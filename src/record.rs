// record.rs - Core record, bundle and grouping types

/// Stream tag - identifies which of the two input legs a record came from.
///
/// Exactly two tags exist for the lifetime of the pipeline, so this is a
/// closed enum rather than an open string-keyed map. The wire names match
/// the historical step labels of the load test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Primary input stream
    Pc1,
    /// Secondary (co-input) stream
    Pc2,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Pc1 => "pc1",
            Tag::Pc2 => "pc2",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic key/value record.
///
/// Keys are NOT unique: the key space is `256^key_size_bytes`, so small key
/// sizes produce collisions by construction. Collisions are the mechanism
/// under test, not a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// A contiguous slice of a generated record stream - the unit of parallel
/// work assignment.
///
/// Bundles from one source partition its record stream exactly: no record is
/// duplicated or dropped across the bundle set.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub records: Vec<Record>,
    /// Estimated payload bytes, used by the execution layer for split sizing
    pub size_estimate_bytes: u64,
}

impl Bundle {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record labeled with its originating stream, used only during grouping
#[derive(Debug, Clone)]
pub struct TaggedRecord {
    pub tag: Tag,
    pub record: Record,
}

impl TaggedRecord {
    pub fn new(tag: Tag, record: Record) -> Self {
        Self { tag, record }
    }
}

/// Per-tag value collections for one grouping key.
///
/// Both tags are always present. A key seen on only one stream keeps an
/// empty Vec for the other tag - downstream code never has to special-case
/// a missing tag.
#[derive(Debug, Clone, Default)]
pub struct GroupedValues {
    pub pc1: Vec<Vec<u8>>,
    pub pc2: Vec<Vec<u8>>,
}

impl GroupedValues {
    pub fn for_tag(&self, tag: Tag) -> &[Vec<u8>] {
        match tag {
            Tag::Pc1 => &self.pc1,
            Tag::Pc2 => &self.pc2,
        }
    }

    pub fn push(&mut self, tag: Tag, value: Vec<u8>) {
        match tag {
            Tag::Pc1 => self.pc1.push(value),
            Tag::Pc2 => self.pc2.push(value),
        }
    }

    /// Total values across both tags
    pub fn total_len(&self) -> usize {
        self.pc1.len() + self.pc2.len()
    }
}

/// One distinct key with every value contributed by each stream
#[derive(Debug, Clone)]
pub struct GroupedEntry {
    pub key: Vec<u8>,
    pub values: GroupedValues,
}
