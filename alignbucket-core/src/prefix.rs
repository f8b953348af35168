//! Cumulative count and weighted-length arrays
//!
//! With both prefix arrays in hand the cost of any contiguous length range
//! is a constant number of big-integer operations.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::histogram::Histogram;
use crate::types::LengthIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSums {
    start: usize,
    /// `sum_counts[i]`: number of sequences with length index `<= i`
    sum_counts: Vec<BigUint>,
    /// `sum_weights[i]`: total residues over sequences with length index `<= i`
    sum_weights: Vec<BigUint>,
}

impl PrefixSums {
    pub fn build(histogram: &Histogram) -> Self {
        let n = histogram.len();
        let mut sum_counts = Vec::with_capacity(n);
        let mut sum_weights = Vec::with_capacity(n);
        let mut running_count = BigUint::zero();
        let mut running_weight = BigUint::zero();

        log::trace!("i\tsumS\tsumSigma");
        for (index, &count) in histogram.counts().iter().enumerate() {
            let length = histogram.length_of(index);
            running_count += count;
            running_weight += BigUint::from(length) * count;
            log::trace!("{}\t{}\t{}", index, running_count, running_weight);
            sum_counts.push(running_count.clone());
            sum_weights.push(running_weight.clone());
        }

        log::debug!(
            "Built prefix sums over {} lengths ({} sequences, {} residues)",
            n,
            running_count,
            running_weight
        );

        Self {
            start: histogram.start(),
            sum_counts,
            sum_weights,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.sum_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sum_counts.is_empty()
    }

    pub fn sum_counts(&self) -> &[BigUint] {
        &self.sum_counts
    }

    pub fn sum_weights(&self) -> &[BigUint] {
        &self.sum_weights
    }

    /// Exact cost of treating lengths `lower..=upper` (indices) as one bucket.
    ///
    /// `weight * (count + 1)`, where `weight` is the residue total of the range
    /// and `count` its number of sequences. Panics if `lower > upper` or
    /// `upper` is out of range.
    pub fn cost(&self, lower: LengthIndex, upper: LengthIndex) -> BigUint {
        assert!(lower <= upper, "cost range {}..={} is inverted", lower, upper);

        let (weight, count) = if lower == 0 {
            (
                self.sum_weights[upper].clone(),
                self.sum_counts[upper].clone(),
            )
        } else {
            (
                &self.sum_weights[upper] - &self.sum_weights[lower - 1],
                &self.sum_counts[upper] - &self.sum_counts[lower - 1],
            )
        };

        weight * (count + 1u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(start: usize, counts: &[u64]) -> PrefixSums {
        PrefixSums::build(&Histogram::new(start, counts.to_vec()).unwrap())
    }

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_prefix_arrays() {
        let p = sums(1, &[3, 0, 2]);
        assert_eq!(p.sum_counts(), &[big(3), big(3), big(5)]);
        assert_eq!(p.sum_weights(), &[big(3), big(3), big(9)]);
    }

    #[test]
    fn test_prefix_respects_start() {
        let p = sums(10, &[1, 2]);
        assert_eq!(p.sum_weights(), &[big(10), big(32)]);
    }

    #[test]
    fn test_cost_values() {
        let p = sums(1, &[3, 0, 2]);
        // 3 residues, 3 sequences
        assert_eq!(p.cost(0, 0), big(12));
        assert_eq!(p.cost(0, 1), big(12));
        // 9 residues, 5 sequences
        assert_eq!(p.cost(0, 2), big(54));
        // 6 residues, 2 sequences
        assert_eq!(p.cost(1, 2), big(18));
        assert_eq!(p.cost(2, 2), big(18));
        assert_eq!(p.cost(1, 1), big(0));
    }

    #[test]
    fn test_cost_beyond_u64() {
        let huge = u64::MAX / 2;
        let p = sums(1_000, &[huge, huge]);
        let expected = (BigUint::from(1_000u64) * huge + BigUint::from(1_001u64) * huge)
            * (BigUint::from(huge) * 2u32 + 1u32);
        assert_eq!(p.cost(0, 1), expected);
    }

    #[test]
    fn test_cost_monotone() {
        let p = sums(1, &[4, 1, 0, 7, 2, 9]);
        for lower in 0..p.len() {
            for upper in lower + 1..p.len() {
                assert!(p.cost(lower, upper) >= p.cost(lower, upper - 1));
            }
        }
        for upper in 0..p.len() {
            for lower in 1..=upper {
                assert!(p.cost(lower, upper) <= p.cost(lower - 1, upper));
            }
        }
    }
}
