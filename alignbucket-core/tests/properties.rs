use alignbucket_core::{
    optimize, CoverageBound, CoverageRatio, Histogram, Partition, PartitionParams, PrefixSums,
};
use proptest::prelude::*;

fn histogram_strategy() -> impl Strategy<Value = (usize, Vec<u64>)> {
    (0usize..500, prop::collection::vec(0u64..1_000, 1..60))
}

proptest! {
    #[test]
    fn buckets_partition_the_domain(
        (start, counts) in histogram_strategy(),
        delta in 1u32..=100,
    ) {
        let n = counts.len();
        let hist = Histogram::new(start, counts).unwrap();
        let sums = PrefixSums::build(&hist);
        let params = PartitionParams::with_coverage(CoverageRatio::new(delta).unwrap());
        let solution = optimize(&sums, params);
        let partition = Partition::reconstruct(&solution).unwrap();

        let mut covered: Vec<usize> = partition
            .intervals()
            .iter()
            .flat_map(|iv| iv.low..=iv.high)
            .collect();
        covered.sort_unstable();
        let expected: Vec<usize> = (start..start + n).collect();
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn optimum_bounded_by_single_bucket(
        (start, counts) in histogram_strategy(),
        delta in 1u32..=100,
    ) {
        let hist = Histogram::new(start, counts).unwrap();
        let sums = PrefixSums::build(&hist);
        let params = PartitionParams::with_coverage(CoverageRatio::new(delta).unwrap());
        let solution = optimize(&sums, params);
        let partition = Partition::reconstruct(&solution).unwrap();

        prop_assert!(*solution.min_cost() <= sums.cost(0, sums.len() - 1));
        prop_assert!(partition.realized_cost(&sums) <= *solution.min_cost());
    }

    #[test]
    fn cost_is_monotone((start, counts) in histogram_strategy(), a in 0usize..60, b in 0usize..60) {
        let sums = PrefixSums::build(&Histogram::new(start, counts).unwrap());
        let n = sums.len();
        let (a, b) = (a % n, b % n);
        let (lower, upper) = (a.min(b), a.max(b));
        if upper + 1 < n {
            prop_assert!(sums.cost(lower, upper + 1) >= sums.cost(lower, upper));
        }
        if lower > 0 {
            prop_assert!(sums.cost(lower - 1, upper) >= sums.cost(lower, upper));
        }
    }

    #[test]
    fn full_coverage_bound_is_identity(start in 0usize..10_000, n in 1usize..500) {
        let bound = CoverageBound::new(start, n, CoverageRatio::FULL);
        for i in 0..n {
            prop_assert_eq!(bound.upper_bound(i), i);
        }
    }

    #[test]
    fn coverage_bound_is_monotone(start in 0usize..10_000, n in 1usize..300, delta in 1u32..=100) {
        let bound = CoverageBound::new(start, n, CoverageRatio::new(delta).unwrap());
        let mut previous = 0;
        for i in 0..n {
            let upper = bound.upper_bound(i);
            prop_assert!(upper >= i && upper >= previous && upper < n);
            previous = upper;
        }
    }
}
