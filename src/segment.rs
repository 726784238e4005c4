//! Zone segmentation
//!
//! Splits a depth-ordered flag column into maximal contiguous runs. Group ids
//! are the running count of flag changes, so the first sample is group 0 and
//! every change of value opens the next group.
//!
//! Two adjacent NaN flags are the same value: a gap in the quality flag is one
//! zone, not one zone per sample.

use std::ops::Range;

/// Values that can be compared for zone boundaries
pub trait ZoneKey {
    /// Whether `self` and `other` belong to the same zone
    fn same_zone(&self, other: &Self) -> bool;
}

impl ZoneKey for f64 {
    fn same_zone(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self == other
    }
}

impl ZoneKey for i64 {
    fn same_zone(&self, other: &Self) -> bool {
        self == other
    }
}

impl ZoneKey for bool {
    fn same_zone(&self, other: &Self) -> bool {
        self == other
    }
}

impl ZoneKey for Option<String> {
    fn same_zone(&self, other: &Self) -> bool {
        self == other
    }
}

/// Group id per sample (`0, 0, 1, 1, 2, ...`)
#[must_use]
pub fn segment<K: ZoneKey>(flags: &[K]) -> Vec<usize> {
    let mut ids = Vec::with_capacity(flags.len());
    let mut current = 0usize;
    for (i, flag) in flags.iter().enumerate() {
        if i > 0 && !flag.same_zone(&flags[i - 1]) {
            current += 1;
        }
        ids.push(current);
    }
    ids
}

/// Contiguous zones of a flag column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zones {
    ids: Vec<usize>,
    bounds: Vec<Range<usize>>,
}

impl Zones {
    /// Segment a flag column
    #[must_use]
    pub fn from_flags<K: ZoneKey>(flags: &[K]) -> Self {
        let ids = segment(flags);
        let mut bounds: Vec<Range<usize>> = Vec::new();
        for (row, &id) in ids.iter().enumerate() {
            if id == bounds.len() {
                bounds.push(row..row + 1);
            } else if let Some(last) = bounds.last_mut() {
                last.end = row + 1;
            }
        }
        Self { ids, bounds }
    }

    /// Group id of every sample
    #[must_use]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Group ids as an integer column
    #[must_use]
    pub fn ids_i64(&self) -> Vec<i64> {
        self.ids
            .iter()
            .map(|&id| i64::try_from(id).unwrap_or(i64::MAX))
            .collect()
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Whether there are no samples at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Row range of group `id`
    #[must_use]
    pub fn rows(&self, id: usize) -> Option<Range<usize>> {
        self.bounds.get(id).cloned()
    }

    /// Row ranges in group order
    pub fn iter(&self) -> impl Iterator<Item = (usize, Range<usize>)> + '_ {
        self.bounds.iter().cloned().enumerate()
    }
}
