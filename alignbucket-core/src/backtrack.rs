//! Bucket reconstruction from predecessor pointers
//!
//! Walks `p` backwards from the longest length class. Each step emits the
//! bucket `[p[i] + 1, upper_bound(i)]`, with its top clipped to just below the
//! bucket emitted before it: `B[p[i]]` may have been solved over a prefix
//! reaching past `p[i]`, and those lengths are already owned by the later
//! bucket.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{BucketError, BucketResult};
use crate::histogram::IdentifierMap;
use crate::optimizer::Solution;
use crate::prefix::PrefixSums;
use crate::types::Interval;

/// Disjoint, contiguous buckets covering every considered length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Longest lengths first, as produced by the backward walk
    intervals: Vec<Interval>,
    start: usize,
    max_length: usize,
}

impl Partition {
    /// Rebuild the buckets chosen by `solution` and check they partition the domain.
    pub fn reconstruct(solution: &Solution) -> BucketResult<Self> {
        let bound = &solution.bound;
        let start = bound.start();
        let n = solution.len();
        if n == 0 {
            return Err(BucketError::EmptyDomain { start });
        }

        let mut intervals = Vec::new();
        let mut index = n - 1;
        let mut ceiling = bound.upper_bound(index);

        loop {
            let predecessor = solution.predecessors[index];
            let low = predecessor.map_or(0, |lower| lower + 1);
            let high = bound.upper_bound(index).min(ceiling);
            if low > high {
                return Err(BucketError::violation(format!(
                    "empty bucket at index {} ({}..={})",
                    index, low, high
                )));
            }
            intervals.push(Interval::new(low + start, high + start));

            match predecessor {
                None => break,
                Some(lower) if lower >= index => {
                    return Err(BucketError::violation(format!(
                        "predecessor {} of index {} does not decrease",
                        lower, index
                    )));
                }
                Some(lower) => {
                    ceiling = low - 1;
                    index = lower;
                }
            }
        }

        let partition = Self {
            intervals,
            start,
            max_length: start + n - 1,
        };
        partition.verify()?;
        Ok(partition)
    }

    /// Check that the buckets are non-empty, disjoint and cover `start..=max_length`.
    pub fn verify(&self) -> BucketResult<()> {
        let first = self
            .intervals
            .first()
            .ok_or_else(|| BucketError::violation("no buckets"))?;
        if first.high != self.max_length {
            return Err(BucketError::violation(format!(
                "top bucket {} does not reach length {}",
                first, self.max_length
            )));
        }
        for pair in self.intervals.windows(2) {
            if pair[1].high + 1 != pair[0].low {
                return Err(BucketError::violation(format!(
                    "buckets {} and {} are not adjacent",
                    pair[1], pair[0]
                )));
            }
        }
        if let Some(interval) = self.intervals.iter().find(|iv| iv.low > iv.high) {
            return Err(BucketError::violation(format!("bucket {} is empty", interval)));
        }
        let last = &self.intervals[self.intervals.len() - 1];
        if last.low != self.start {
            return Err(BucketError::violation(format!(
                "bottom bucket {} does not start at length {}",
                last, self.start
            )));
        }
        Ok(())
    }

    /// Buckets from the longest lengths to the shortest
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Buckets from the shortest lengths to the longest
    pub fn ascending(&self) -> Vec<Interval> {
        self.intervals.iter().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn bucket_of(&self, length: usize) -> Option<Interval> {
        self.intervals.iter().copied().find(|iv| iv.contains(length))
    }

    /// Total cost of the emitted buckets. Never exceeds the optimizer's `B[n - 1]`.
    pub fn realized_cost(&self, sums: &PrefixSums) -> BigUint {
        self.intervals.iter().fold(BigUint::zero(), |total, iv| {
            total + sums.cost(iv.low - self.start, iv.high - self.start)
        })
    }

    /// `(identifier, bucket)` pairs in bucket order, lengths ascending within a
    /// bucket and identifiers in the order they were read.
    pub fn assignments<'a>(
        &'a self,
        identifiers: &'a IdentifierMap,
    ) -> impl Iterator<Item = (&'a str, Interval)> + 'a {
        self.intervals.iter().flat_map(move |&interval| {
            identifiers
                .range(interval.low..=interval.high)
                .flat_map(move |(_, ids)| ids.iter().map(move |id| (id.as_str(), interval)))
        })
    }
}
