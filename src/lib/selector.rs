//! Ranking of overlap groups and top-K selection.

use crate::grouper::OverlapGroup;

/// Default number of supporting hits emitted per A-read.
pub const DEFAULT_MAX_HITS: usize = 400;

/// Largest number of supporting hits emitted per A-read.
pub const MAX_HITS_CEILING: usize = 2000;

/// Sorts `groups` by descending score and returns the best `max_hits`.
///
/// The sort is stable, so groups with equal scores keep their creation order
/// and the output is deterministic.
pub fn select_hits(groups: &mut [OverlapGroup], max_hits: usize) -> &[OverlapGroup] {
    groups.sort_by(|a, b| b.score.cmp(&a.score));
    let n = groups.len().min(max_hits);
    &groups[..n]
}
