//! Clustering of consecutive overlaps into overlap groups.
//!
//! An aligner may split one long A/B overlap into several records when the
//! alignment breaks across a low-quality stretch. When grouping is enabled,
//! consecutive records between the same pair of reads that line up on both
//! axes are folded into one [`OverlapGroup`] spanning all of them, so that the
//! B-read contributes a single supporting fragment.

use crate::las::OverlapRecord;

/// Maximum A-axis gap (exclusive) between two records folded into one group.
pub const ADJACENCY_THRESHOLD: i32 = 251;

/// Default number of groups kept per A-read.
pub const DEFAULT_MAX_GROUPS: usize = 50_000;

/// Largest accepted group-table capacity.
pub const MAX_GROUPS_CEILING: usize = 1_000_000;

/// Lengths of the two reads of the record being processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignmentContext {
    /// Length of the A-read.
    pub alen: i32,
    /// Length of the B-read.
    pub blen: i32,
}

/// A run of consistently oriented overlaps between one A-read and one B-read.
///
/// `begin` and `end` are the first and last records folded into the group;
/// together they bound the combined span on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlapGroup {
    /// First record of the run.
    pub begin: OverlapRecord,
    /// Last record of the run.
    pub end: OverlapRecord,
    /// Quality score of the combined span.
    pub score: i64,
    /// Length of the B-read when the group was started.
    pub blen: i32,
}

impl OverlapGroup {
    /// Starts a group holding a single record.
    #[must_use]
    pub fn new(context: AlignmentContext, record: OverlapRecord) -> Self {
        Self {
            begin: record,
            end: record,
            score: score(context, &record, &record),
            blen: context.blen,
        }
    }

    /// Whether `record` continues this group.
    ///
    /// The record must have the tail's flags and start strictly after the
    /// tail's end on both reads, with an A-axis gap below
    /// [`ADJACENCY_THRESHOLD`].
    #[must_use]
    pub fn belongs(&self, record: &OverlapRecord) -> bool {
        let tail = &self.end;
        tail.flags == record.flags
            && record.path.abpos > tail.path.aepos
            && record.path.bbpos > tail.path.bepos
            && record.path.abpos - tail.path.aepos < ADJACENCY_THRESHOLD
    }

    /// Folds `record` into the group and rescores the combined span.
    pub fn extend(&mut self, context: AlignmentContext, record: OverlapRecord) {
        self.end = record;
        self.score = score(context, &self.begin, &self.end);
    }

    /// 0-based index of the B-read.
    #[must_use]
    pub fn bread(&self) -> u32 {
        self.begin.bread
    }

    /// Whether the B-read aligns in reverse-complement orientation.
    #[must_use]
    pub fn is_complemented(&self) -> bool {
        self.end.is_complemented()
    }

    /// Start and end of the combined span on the (oriented) B-read.
    #[must_use]
    pub fn b_span(&self) -> (i32, i32) {
        (self.begin.path.bbpos, self.end.path.bepos)
    }
}

/// Scores the span from `begin` to `end`: the B-axis overlap length minus the
/// unaligned overhang at both ends.
#[must_use]
pub fn score(context: AlignmentContext, begin: &OverlapRecord, end: &OverlapRecord) -> i64 {
    let overlap = i64::from(end.path.bepos) - i64::from(begin.path.bbpos);
    let leading = i64::from(begin.path.abpos.min(begin.path.bbpos));
    let trailing = (i64::from(context.alen) - i64::from(end.path.aepos))
        .min(i64::from(context.blen) - i64::from(end.path.bepos));
    overlap - (leading + trailing)
}

/// The groups of the current A-read, in creation order.
///
/// The last group is the open one. Once `capacity` groups exist the table is
/// full and stays full until [`GroupTable::clear`].
#[derive(Clone, Debug)]
pub struct GroupTable {
    groups: Vec<OverlapGroup>,
    capacity: usize,
}

impl GroupTable {
    /// Creates an empty table holding at most `capacity` groups.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { groups: Vec::new(), capacity }
    }

    /// Maximum number of groups.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no further record may be added for this A-read.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.groups.len() >= self.capacity
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the table holds no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group records are currently being folded into.
    #[must_use]
    pub fn open_group(&self) -> Option<&OverlapGroup> {
        self.groups.last()
    }

    /// The groups in their current order.
    #[must_use]
    pub fn groups(&self) -> &[OverlapGroup] {
        &self.groups
    }

    /// Mutable access for in-place ranking.
    pub fn groups_mut(&mut self) -> &mut [OverlapGroup] {
        &mut self.groups
    }

    /// Drops all groups, keeping the allocation.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Adds overlap records to a [`GroupTable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupBuilder {
    grouping: bool,
}

impl GroupBuilder {
    /// Creates a builder. Without grouping every record starts its own group.
    #[must_use]
    pub fn new(grouping: bool) -> Self {
        Self { grouping }
    }

    /// Whether consecutive records are folded together.
    #[must_use]
    pub fn grouping(&self) -> bool {
        self.grouping
    }

    /// Adds a record of the current A-read, returning `true` if it started a
    /// new group and `false` if it extended the open group.
    ///
    /// Records must arrive with non-decreasing B-read indices. A full table
    /// ignores the record and returns `false`.
    pub fn add_overlap(
        &self,
        table: &mut GroupTable,
        context: AlignmentContext,
        record: &OverlapRecord,
    ) -> bool {
        if table.is_full() {
            return false;
        }
        if self.grouping {
            if let Some(open) = table.groups.last_mut() {
                if open.bread() == record.bread && open.belongs(record) {
                    open.extend(context, *record);
                    return false;
                }
            }
        }
        table.groups.push(OverlapGroup::new(context, *record));
        true
    }
}
