//! Bins (nodes) and items (pods) of a single cluster snapshot.  None of these types hold on to the
//! Kubernetes objects they were built from.

/// `Item::bin` for the pod that could not be scheduled; real bins are numbered from 1.
pub const UNPLACED_BIN: usize = 0;

/// A node, as a container with fixed capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bin {
    /// Position among the bins, starting at 1.
    pub index: usize,
    /// Allocatable memory in bytes.
    pub memory: i64,
    /// Allocatable CPU in milli-cores.
    pub milli_cpu: i64,
    /// Node labels as `key=value`.
    pub labels: Vec<String>,
}

/// A pod, as a resource demand placed on a bin (or on none).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Position among the items, starting at 0.
    pub index: usize,
    /// Effective memory request in bytes.
    pub memory: i64,
    /// Effective CPU request in milli-cores.
    pub milli_cpu: i64,
    /// Index of the bin the pod runs on, or `UNPLACED_BIN`.
    pub bin: usize,
    /// Declared pod priority, 0 when absent.
    pub priority: i32,
    /// Values of the preferred pod-affinity `matchLabels`.
    pub affinity: Vec<String>,
    /// Values of the preferred pod-anti-affinity `matchLabels`.
    pub anti_affinity: Vec<String>,
}

impl Item {
    /// Whether this is the pod that could not be scheduled.
    pub const fn is_unplaced(&self) -> bool {
        self.bin == UNPLACED_BIN
    }
}

/// One row of the snapshot table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// A `bin` row.
    Bin(Bin),
    /// A `pod` row.
    Item(Item),
}

/// Records in traversal order: each bin followed by the items placed on it, then the unplaced
/// item last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<Record>,
}

impl Snapshot {
    pub(crate) fn new(records: Vec<Record>) -> Snapshot {
        Snapshot { records }
    }

    /// All records, in table order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The bin records, in order.
    pub fn bins(&self) -> impl Iterator<Item = &Bin> {
        self.records.iter().filter_map(|r| match r {
            Record::Bin(b) => Some(b),
            Record::Item(_) => None,
        })
    }

    /// The item records, in order; the unplaced item is last.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.records.iter().filter_map(|r| match r {
            Record::Item(i) => Some(i),
            Record::Bin(_) => None,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Only true for a snapshot that was never finished.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
