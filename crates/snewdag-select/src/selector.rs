//! k-th smallest selection with a bounded working set.
//!
//! The working set starts as the first k values. Each later value smaller
//! than the current working maximum evicts one occurrence of that maximum.
//! After the scan the working maximum is the k-th smallest value, counting
//! duplicates with multiplicity. Cost is O(N·k), which is fine for the
//! handful of observations an event carries.

use crate::rank::Rank;

/// Select the `rank`-th smallest of `values`.
///
/// Returns `None` when there are fewer than `rank` values. Values that do not
/// order (NaN) never panic, but the result is then unspecified.
///
/// # Examples
///
/// ```
/// use snewdag_select::{nth_smallest, Rank};
///
/// let k = |n| Rank::new(n).unwrap();
/// assert_eq!(nth_smallest(&[9, 5, 7], k(2)), Some(7));
/// assert_eq!(nth_smallest(&[5, 5, 9], k(2)), Some(5));
/// assert_eq!(nth_smallest(&[1, 2], k(3)), None);
/// ```
pub fn nth_smallest<T: PartialOrd + Copy>(values: &[T], rank: Rank) -> Option<T> {
    let k = rank.get();
    if values.len() < k {
        return None;
    }

    let (head, tail) = values.split_at(k);
    let mut lowest: Vec<T> = Vec::with_capacity(k);
    lowest.extend_from_slice(head);
    let mut top = max_index(&lowest);

    for &v in tail {
        if v < lowest[top] {
            // Evicting the max and inserting v is the same multiset as
            // overwriting the max slot.
            lowest[top] = v;
            top = max_index(&lowest);
        }
    }

    Some(lowest[top])
}

/// Index of the first maximum. `set` is never empty here.
fn max_index<T: PartialOrd>(set: &[T]) -> usize {
    let mut best = 0;
    for (i, v) in set.iter().enumerate().skip(1) {
        if *v > set[best] {
            best = i;
        }
    }
    best
}

/// Selector bound to a fixed rank, as configured on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderStatisticSelector {
    rank: Rank,
}

impl OrderStatisticSelector {
    pub const fn new(rank: Rank) -> Self {
        Self { rank }
    }

    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// See [`nth_smallest`].
    pub fn select<T: PartialOrd + Copy>(&self, values: &[T]) -> Option<T> {
        nth_smallest(values, self.rank)
    }
}
