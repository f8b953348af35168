//! Optimal length partitioning
//!
//! Dynamic programming over length indices. For index `i` the last bucket is
//! forced to end at `upper_bound(i)`; the optimizer searches its start `k`,
//! reusing the optimal prefix cost `B[k - 1]`:
//!
//! ```text
//! B[i] = min( cost(0, u), min_{1 <= k <= i} cost(k, u) + B[k - 1] ),  u = upper_bound(i)
//! ```
//!
//! The outer loop is sequential because `B[i]` feeds every later index. The
//! candidates of a single index are independent and are evaluated on the
//! rayon pool once their span is large enough.

use std::convert::Infallible;

use num_bigint::BigUint;
use num_traits::Zero;
use rayon::prelude::*;

use crate::coverage::CoverageBound;
use crate::prefix::PrefixSums;
use crate::types::{CoverageRatio, LengthIndex, Predecessor};

/// Receives one `(i, B[i], p[i])` row per index as the optimizer advances.
///
/// The optimizer never reads anything back from the sink.
pub trait TraceSink {
    type Error;

    fn record(
        &mut self,
        index: LengthIndex,
        cost: &BigUint,
        predecessor: Predecessor,
    ) -> Result<(), Self::Error>;
}

/// Sink that drops every row
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    type Error = Infallible;

    fn record(&mut self, _: LengthIndex, _: &BigUint, _: Predecessor) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Sink that keeps every row in memory
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub rows: Vec<(LengthIndex, BigUint, Predecessor)>,
}

impl TraceSink for VecSink {
    type Error = Infallible;

    fn record(
        &mut self,
        index: LengthIndex,
        cost: &BigUint,
        predecessor: Predecessor,
    ) -> Result<(), Infallible> {
        self.rows.push((index, cost.clone(), predecessor));
        Ok(())
    }
}

/// Parameters for the partition optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionParams {
    pub coverage: CoverageRatio,
    /// Candidate spans at least this long are evaluated in parallel; `usize::MAX` disables it
    pub min_parallel_span: usize,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            coverage: CoverageRatio::default(),
            min_parallel_span: 2048,
        }
    }
}

impl PartitionParams {
    pub fn with_coverage(coverage: CoverageRatio) -> Self {
        Self {
            coverage,
            ..Default::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.min_parallel_span = usize::MAX;
        self
    }
}

/// Output of the dynamic program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// `costs[i]` is `B[i]`
    pub costs: Vec<BigUint>,
    /// `predecessors[i]` is `p[i]`
    pub predecessors: Vec<Predecessor>,
    /// Fixed-ratio baseline, reported only
    pub naive_cost: BigUint,
    pub bound: CoverageBound,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// `B[n - 1]`, the optimal total cost
    pub fn min_cost(&self) -> &BigUint {
        // construction guarantees a non-empty domain
        &self.costs[self.costs.len() - 1]
    }
}

pub struct PartitionOptimizer<'a> {
    sums: &'a PrefixSums,
    bound: CoverageBound,
    params: PartitionParams,
}

impl<'a> PartitionOptimizer<'a> {
    pub fn new(sums: &'a PrefixSums, params: PartitionParams) -> Self {
        let bound = CoverageBound::new(sums.start(), sums.len(), params.coverage);
        Self {
            sums,
            bound,
            params,
        }
    }

    /// Run the full dynamic program without tracing.
    pub fn solve(&self) -> Solution {
        match self.solve_traced(&mut NullSink) {
            Ok(solution) => solution,
            Err(never) => match never {},
        }
    }

    /// Run the full dynamic program, reporting each `(i, B[i], p[i])` to `sink`.
    ///
    /// Only sink failures can abort the run.
    pub fn solve_traced<S: TraceSink>(&self, sink: &mut S) -> Result<Solution, S::Error> {
        let n = self.sums.len();
        let mut costs: Vec<BigUint> = Vec::with_capacity(n);
        let mut predecessors: Vec<Predecessor> = Vec::with_capacity(n);
        let mut naive_cost = BigUint::zero();

        for i in 0..n {
            let upper = self.bound.upper_bound(i);

            let mut best = self.sums.cost(0, upper);
            let mut predecessor = None;
            if let Some((candidate, lower)) = self.best_split(i, upper, &costs) {
                if candidate < best {
                    best = candidate;
                    predecessor = Some(lower);
                }
            }

            naive_cost += self.sums.cost(self.bound.naive_lower(i), upper);

            sink.record(i, &best, predecessor)?;
            costs.push(best);
            predecessors.push(predecessor);
        }

        log::debug!("Solved {} length classes at coverage {}", n, self.bound.coverage());

        Ok(Solution {
            costs,
            predecessors,
            naive_cost,
            bound: self.bound,
        })
    }

    /// Cheapest `cost(k, upper) + B[k - 1]` over `k = 1..=i`, with the
    /// smallest `k` winning ties. Returns the cost and `k - 1`.
    fn best_split(
        &self,
        i: LengthIndex,
        upper: LengthIndex,
        solved: &[BigUint],
    ) -> Option<(BigUint, LengthIndex)> {
        let candidate = |k: usize| (self.sums.cost(k, upper) + &solved[k - 1], k - 1);

        if i >= self.params.min_parallel_span {
            (1..=i)
                .into_par_iter()
                .map(candidate)
                .min_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)))
        } else {
            let mut best: Option<(BigUint, LengthIndex)> = None;
            for k in 1..=i {
                let (cost, lower) = candidate(k);
                let improves = match &best {
                    Some((current, _)) => cost < *current,
                    None => true,
                };
                if improves {
                    best = Some((cost, lower));
                }
            }
            best
        }
    }
}

/// Convenience wrapper: prefix sums in, solution out.
pub fn optimize(sums: &PrefixSums, params: PartitionParams) -> Solution {
    PartitionOptimizer::new(sums, params).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;

    fn sums(start: usize, counts: &[u64]) -> PrefixSums {
        PrefixSums::build(&Histogram::new(start, counts.to_vec()).unwrap())
    }

    fn params(delta: u32) -> PartitionParams {
        PartitionParams::with_coverage(CoverageRatio::new(delta).unwrap())
    }

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_single_length_class() {
        let p = sums(1, &[5]);
        let solution = optimize(&p, params(90));
        assert_eq!(solution.costs, vec![big(30)]);
        assert_eq!(solution.predecessors, vec![None]);
        assert_eq!(solution.min_cost(), &big(30));
    }

    #[test]
    fn test_hand_computed_recurrence() {
        // lengths 1, 2, 3 with counts 3, 0, 2
        let p = sums(1, &[3, 0, 2]);
        let solution = optimize(&p, params(100));
        assert_eq!(solution.costs, vec![big(12), big(12), big(30)]);
        // single bucket wins the tie at i = 1, smallest k wins at i = 2
        assert_eq!(solution.predecessors, vec![None, None, Some(0)]);
        // naive at delta = 100 is the sum of singleton costs: 12 + 0 + 18
        assert_eq!(solution.naive_cost, big(30));
    }

    #[test]
    fn test_never_worse_than_one_bucket() {
        let p = sums(20, &[9, 0, 3, 14, 1, 1, 0, 8, 2, 5, 11, 0, 4]);
        for delta in [50, 75, 90, 100] {
            let solution = optimize(&p, params(delta));
            assert!(*solution.min_cost() <= p.cost(0, p.len() - 1));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let counts: Vec<u64> = (0..300u64).map(|i| (i * 7919) % 13).collect();
        let p = sums(30, &counts);
        for delta in [80, 100] {
            let sequential = optimize(&p, params(delta).sequential());
            let mut parallel_params = params(delta);
            parallel_params.min_parallel_span = 1;
            let parallel = optimize(&p, parallel_params);
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let p = sums(5, &[2, 8, 0, 1, 6, 3, 3]);
        let first = optimize(&p, params(85));
        let second = optimize(&p, params(85));
        assert_eq!(first, second);
    }

    #[test]
    fn test_trace_rows_match_solution() {
        let p = sums(1, &[3, 0, 2]);
        let optimizer = PartitionOptimizer::new(&p, params(100));
        let mut sink = VecSink::default();
        let solution = optimizer.solve_traced(&mut sink).unwrap();
        assert_eq!(sink.rows.len(), 3);
        for (i, cost, predecessor) in &sink.rows {
            assert_eq!(cost, &solution.costs[*i]);
            assert_eq!(*predecessor, solution.predecessors[*i]);
        }
    }

    #[test]
    fn test_predecessors_point_backwards() {
        let p = sums(1, &[1, 4, 2, 0, 0, 9, 1, 3]);
        let solution = optimize(&p, params(70));
        for (i, predecessor) in solution.predecessors.iter().enumerate() {
            if let Some(lower) = predecessor {
                assert!(*lower < i);
            }
        }
    }
}
