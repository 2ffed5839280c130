//! Back-to-front depth clustering for transparent draw submission
//!
//! Collects (depth, id, material) entries, orders them far-to-near, and
//! exposes contiguous same-material runs so the submitter can batch them
//! into single draw calls.

use core::ops::Range;

/// Fixed capacity growth step; matches the typical per-frame delta of
/// transparent objects so steady-state frames never reallocate.
const GROWTH: usize = 128;

/// One submission entry
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthEntry {
    /// View-space depth (larger = farther)
    pub depth: f32,
    /// Caller-side object id
    pub id: u32,
    /// Material key used for run batching
    pub material: u16,
}

/// Depth-ordered entry list with material run extraction.
///
/// Typical frame loop: [`DepthCluster::clear`], a `push` per visible
/// transparent object, [`DepthCluster::construct`], then iterate
/// [`DepthCluster::runs`] for batched submission.
///
/// Not synchronized; callers sharing a cluster across threads must wrap
/// it in a lock or keep one per thread.
#[derive(Default)]
pub struct DepthCluster {
    entries: Vec<DepthEntry>,
}

impl DepthCluster {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Add an entry. Capacity grows by a fixed step rather than doubling,
    /// keeping the allocation close to the frame's working set.
    pub fn push(&mut self, depth: f32, id: u32, material: u16) {
        if self.entries.len() == self.entries.capacity() {
            log::debug!(
                "depth cluster grows {} -> {}",
                self.entries.capacity(),
                self.entries.capacity() + GROWTH
            );
            self.entries.reserve_exact(GROWTH);
        }
        self.entries.push(DepthEntry { depth, id, material });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries, keeping the allocation
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sort far-to-near.
    ///
    /// NaN depths sort last (nearest) instead of panicking; equal depths
    /// tie-break on ascending id so the order is deterministic across frames.
    pub fn construct(&mut self) {
        // Under total_cmp a positive NaN outranks +inf, which would put it
        // FIRST in a descending sort; collapse NaN of either sign to -inf so
        // it lands at the tail.
        fn key(depth: f32) -> f32 {
            if depth.is_nan() {
                f32::NEG_INFINITY
            } else {
                depth
            }
        }
        self.entries.sort_unstable_by(|x, y| {
            key(y.depth).total_cmp(&key(x.depth)).then(x.id.cmp(&y.id))
        });
    }

    /// Sorted entries (call [`DepthCluster::construct`] first)
    #[inline]
    pub fn entries(&self) -> &[DepthEntry] {
        &self.entries
    }

    /// Iterator over maximal contiguous same-material runs, as
    /// `(material, index_range)` into [`DepthCluster::entries`].
    pub fn runs(&self) -> Runs<'_> {
        Runs {
            entries: &self.entries,
            start: 0,
        }
    }
}

/// See [`DepthCluster::runs`]
pub struct Runs<'a> {
    entries: &'a [DepthEntry],
    start: usize,
}

impl Iterator for Runs<'_> {
    type Item = (u16, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.entries.len() {
            return None;
        }

        let material = self.entries[self.start].material;
        let mut end = self.start + 1;
        while end < self.entries.len() && self.entries[end].material == material {
            end += 1;
        }

        let run = (material, self.start..end);
        self.start = end;
        Some(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_far_to_near() {
        let mut cluster = DepthCluster::new();
        cluster.push(1.0, 0, 0);
        cluster.push(5.0, 1, 0);
        cluster.push(3.0, 2, 0);
        cluster.construct();

        let depths: Vec<f32> = cluster.entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_equal_depth_tie_breaks_on_id() {
        let mut cluster = DepthCluster::new();
        cluster.push(2.0, 7, 0);
        cluster.push(2.0, 3, 0);
        cluster.push(2.0, 5, 0);
        cluster.construct();

        let ids: Vec<u32> = cluster.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_nan_depth_sorts_last() {
        let mut cluster = DepthCluster::new();
        cluster.push(f32::NAN, 0, 0);
        cluster.push(1.0, 1, 0);
        cluster.push(-f32::NAN, 2, 0);
        cluster.push(f32::INFINITY, 3, 0);
        cluster.construct();

        assert_eq!(cluster.entries()[0].id, 3);
        assert_eq!(cluster.entries()[1].id, 1);
        assert!(cluster.entries()[2].depth.is_nan());
        assert!(cluster.entries()[3].depth.is_nan());
    }

    #[test]
    fn test_runs_coalesce_materials() {
        let mut cluster = DepthCluster::new();
        cluster.push(9.0, 0, 1);
        cluster.push(8.0, 1, 1);
        cluster.push(7.0, 2, 2);
        cluster.push(6.0, 3, 1);
        cluster.push(5.0, 4, 1);
        cluster.construct();

        let runs: Vec<(u16, Range<usize>)> = cluster.runs().collect();
        assert_eq!(runs, vec![(1, 0..2), (2, 2..3), (1, 3..5)]);
        // Ranges tile the whole entry list.
        assert_eq!(runs.iter().map(|(_, r)| r.len()).sum::<usize>(), cluster.len());
    }

    #[test]
    fn test_runs_empty() {
        let cluster = DepthCluster::new();
        assert_eq!(cluster.runs().count(), 0);
    }

    #[test]
    fn test_clear_reuses_capacity() {
        let mut cluster = DepthCluster::with_capacity(4);
        for i in 0..4 {
            cluster.push(i as f32, i, 0);
        }
        cluster.clear();
        assert!(cluster.is_empty());
        cluster.push(1.0, 0, 0);
        assert_eq!(cluster.len(), 1);
    }
}
