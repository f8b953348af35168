//! Dense length histogram
//!
//! Counts are indexed by offset from the minimum considered length. Every
//! length between `start` and the longest observed length has an entry, with
//! zero for lengths that no sequence has.

use std::collections::BTreeMap;

use crate::error::{BucketError, BucketResult};
use crate::types::LengthIndex;

/// Sequence identifiers grouped by length, in the order they were observed.
pub type IdentifierMap = BTreeMap<usize, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    start: usize,
    counts: Vec<u64>,
}

impl Histogram {
    /// Wrap dense counts, `counts[i]` being the number of sequences of length `i + start`.
    pub fn new(start: usize, counts: Vec<u64>) -> BucketResult<Self> {
        if counts.is_empty() {
            return Err(BucketError::EmptyDomain { start });
        }
        Ok(Self { start, counts })
    }

    /// Build from `(length, count)` pairs in non-decreasing length order.
    ///
    /// Missing lengths are zero-filled, repeated lengths are summed and
    /// lengths below `start` are dropped.
    pub fn from_sorted_pairs<I>(start: usize, pairs: I) -> BucketResult<Self>
    where
        I: IntoIterator<Item = (usize, u64)>,
    {
        let mut counts: Vec<u64> = Vec::new();
        let mut dropped = 0u64;

        for (length, count) in pairs {
            if length < start {
                dropped += count;
                continue;
            }
            let index = length - start;
            if index + 1 < counts.len() {
                return Err(BucketError::UnsortedLengths {
                    length,
                    previous: counts.len() - 1 + start,
                });
            }
            if index >= counts.len() {
                counts.resize(index + 1, 0);
            }
            counts[index] = counts[index]
                .checked_add(count)
                .ok_or(BucketError::CountOverflow { length })?;
        }

        if dropped > 0 {
            log::warn!(
                "Ignored {} sequences shorter than the minimum length {}",
                dropped,
                start
            );
        }

        Self::new(start, counts)
    }

    /// Aggregate per-length identifier lists into dense counts.
    pub fn from_identifiers(start: usize, identifiers: &IdentifierMap) -> BucketResult<Self> {
        Self::from_sorted_pairs(
            start,
            identifiers
                .iter()
                .map(|(&length, ids)| (length, ids.len() as u64)),
        )
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of length classes `n`
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false: construction rejects an empty domain
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn length_of(&self, index: LengthIndex) -> usize {
        index + self.start
    }

    pub fn max_length(&self) -> usize {
        self.start + self.counts.len() - 1
    }

    /// Total number of sequences, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }
}
