//! alignbucket core library
//!
//! Optimal partitioning of a sequence length distribution into contiguous
//! length buckets for bucketed all-pairs alignment, plus the loaders and
//! writers around it.

pub mod backtrack;
pub mod coverage;
pub mod error;
pub mod histogram;
pub mod io;
pub mod optimizer;
pub mod prefix;
pub mod types;

// Re-export commonly used types and functions
pub use backtrack::Partition;
pub use coverage::CoverageBound;
pub use error::{BucketError, BucketResult};
pub use histogram::{Histogram, IdentifierMap};
pub use optimizer::{
    optimize, NullSink, PartitionOptimizer, PartitionParams, Solution, TraceSink, VecSink,
};
pub use prefix::PrefixSums;
pub use types::{CoverageRatio, Interval, LengthIndex, Predecessor};

/// Version information for the alignbucket core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one partitioning run produces
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub solution: Solution,
    pub partition: Partition,
    /// Cost of putting every length in a single bucket
    pub full_interval_cost: num_bigint::BigUint,
    pub realized_cost: num_bigint::BigUint,
}

/// Prefix sums, optimizer and backtracker in one call, tracing into `sink`.
pub fn partition_histogram_traced<S>(
    histogram: &Histogram,
    params: PartitionParams,
    sink: &mut S,
) -> BucketResult<PartitionOutcome>
where
    S: TraceSink,
    S::Error: Into<BucketError>,
{
    let sums = PrefixSums::build(histogram);
    let solution = PartitionOptimizer::new(&sums, params)
        .solve_traced(sink)
        .map_err(Into::<BucketError>::into)?;
    let partition = Partition::reconstruct(&solution)?;

    Ok(PartitionOutcome {
        full_interval_cost: sums.cost(0, sums.len() - 1),
        realized_cost: partition.realized_cost(&sums),
        solution,
        partition,
    })
}

pub fn partition_histogram(
    histogram: &Histogram,
    params: PartitionParams,
) -> BucketResult<PartitionOutcome> {
    partition_histogram_traced(histogram, params, &mut NullSink)
}
