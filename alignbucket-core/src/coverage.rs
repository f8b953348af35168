//! Coverage-derived bucket reach
//!
//! A sequence of length `l` may share a bucket with sequences up to
//! `floor(l * 100 / delta)` long. The quotient is exact integer arithmetic,
//! so lengths landing exactly on the boundary are included.

use crate::types::{CoverageRatio, LengthIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBound {
    start: usize,
    last: LengthIndex,
    coverage: CoverageRatio,
}

impl CoverageBound {
    /// `len` is the number of length classes and must be non-zero.
    pub fn new(start: usize, len: usize, coverage: CoverageRatio) -> Self {
        debug_assert!(len > 0);
        Self {
            start,
            last: len.saturating_sub(1),
            coverage,
        }
    }

    pub fn coverage(&self) -> CoverageRatio {
        self.coverage
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Farthest index that may share a bucket with index `i`.
    ///
    /// Never below `i` for in-domain indices and non-decreasing in `i`.
    pub fn upper_bound(&self, i: LengthIndex) -> LengthIndex {
        let length = i + self.start;
        let max_length = self.last + self.start;
        let reach = if self.coverage.is_full() {
            length
        } else {
            length * 100 / self.coverage.percent() as usize
        };
        reach.min(max_length) - self.start
    }

    /// First index of the fixed-ratio bucket ending at index `i`'s reach.
    ///
    /// `max(ceil(l * delta / 100), start) - start`; only feeds the naive baseline.
    pub fn naive_lower(&self, i: LengthIndex) -> LengthIndex {
        let length = i + self.start;
        let floor_length = if self.coverage.is_full() {
            length
        } else {
            (length * self.coverage.percent() as usize).div_ceil(100)
        };
        floor_length.max(self.start) - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(start: usize, len: usize, delta: u32) -> CoverageBound {
        CoverageBound::new(start, len, CoverageRatio::new(delta).unwrap())
    }

    #[test]
    fn test_full_coverage_is_identity() {
        let b = bound(1, 10, 100);
        for i in 0..10 {
            assert_eq!(b.upper_bound(i), i);
            assert_eq!(b.naive_lower(i), i);
        }
    }

    #[test]
    fn test_partial_coverage_reach() {
        let b = bound(1, 20, 90);
        // length 1 reaches floor(1.11) = 1
        assert_eq!(b.upper_bound(0), 0);
        // length 9 reaches exactly 10
        assert_eq!(b.upper_bound(8), 9);
        // length 18 reaches exactly 20
        assert_eq!(b.upper_bound(17), 19);
        // capped at the longest length
        assert_eq!(b.upper_bound(19), 19);
    }

    #[test]
    fn test_half_coverage_reach() {
        let b = bound(10, 100, 50);
        assert_eq!(b.upper_bound(0), 10);
        assert_eq!(b.upper_bound(5), 20);
        assert_eq!(b.naive_lower(10), 0);
        assert_eq!(b.naive_lower(90), 40);
    }

    #[test]
    fn test_naive_lower_rounds_up() {
        let b = bound(1, 20, 90);
        // ceil(10 * 0.9) = 9
        assert_eq!(b.naive_lower(9), 8);
        // ceil(11 * 0.9) = ceil(9.9) = 10
        assert_eq!(b.naive_lower(10), 9);
    }

    #[test]
    fn test_upper_bound_monotone_and_dominating() {
        for delta in [1, 33, 67, 90, 99, 100] {
            let b = bound(3, 200, delta);
            let mut previous = 0;
            for i in 0..200 {
                let upper = b.upper_bound(i);
                assert!(upper >= i);
                assert!(upper >= previous);
                assert!(upper < 200);
                assert!(b.naive_lower(i) <= i);
                previous = upper;
            }
        }
    }
}
