//! Partition command implementation - compute optimal length buckets

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use alignbucket_core::io::{load_fasta, write_assignments_file, DistributionParser, TsvTraceWriter};
use alignbucket_core::{
    partition_histogram, partition_histogram_traced, CoverageRatio, Histogram, IdentifierMap,
    Interval, PartitionOutcome, PartitionParams,
};

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Machine-readable record of one partitioning run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub start: usize,
    pub delta: u32,
    pub distinct_lengths: usize,
    pub sequences: u64,
    pub naive_cost: String,
    pub full_interval_cost: String,
    pub min_cost: String,
    pub realized_cost: String,
    pub buckets: usize,
    /// Shortest lengths first
    pub intervals: Vec<Interval>,
}

impl RunSummary {
    pub fn new(histogram: &Histogram, coverage: CoverageRatio, outcome: &PartitionOutcome) -> Self {
        Self {
            start: histogram.start(),
            delta: coverage.percent(),
            distinct_lengths: histogram.len(),
            sequences: histogram.total(),
            naive_cost: outcome.solution.naive_cost.to_string(),
            full_interval_cost: outcome.full_interval_cost.to_string(),
            min_cost: outcome.solution.min_cost().to_string(),
            realized_cost: outcome.realized_cost.to_string(),
            buckets: outcome.partition.len(),
            intervals: outcome.partition.ascending(),
        }
    }
}

pub fn execute(
    config: &Config,
    distribution: Option<PathBuf>,
    fasta: Option<PathBuf>,
    start: Option<usize>,
    delta: Option<u32>,
    outdir: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let start = start.unwrap_or(config.partition.start);
    let coverage = resolve_coverage(delta.unwrap_or(config.partition.delta))?;
    log::info!("Minimum length set to {}", start);
    log::info!("Coverage set to {}", coverage);

    // Input must be resolved before anything is written
    let (histogram, identifiers) = load_input(distribution, fasta, start)?;

    let outdir = outdir.unwrap_or_else(|| config.output.outdir.clone());
    if !outdir.exists() {
        std::fs::create_dir_all(&outdir).map_err(CliError::from)?;
    }
    log::info!("Output directory set to {}", outdir.display());
    log::info!("Different lengths considered = {}", histogram.len());

    let params = PartitionParams {
        coverage,
        min_parallel_span: config.partition.min_parallel_span,
    };

    let outcome = if verbose {
        let trace_path = config.trace_path(&outdir);
        let file = File::create(&trace_path)
            .with_context(|| format!("Failed to create trace file: {}", trace_path.display()))?;
        let mut sink = TsvTraceWriter::new(BufWriter::new(file))?;
        let outcome = partition_histogram_traced(&histogram, params, &mut sink)
            .context("Partitioning failed")?;
        let rows = sink.rows();
        sink.finish()?;
        log::debug!("Wrote {} trace rows to {}", rows, trace_path.display());
        outcome
    } else {
        partition_histogram(&histogram, params).context("Partitioning failed")?
    };

    report(&outcome, histogram.len());

    if let Some(identifiers) = &identifiers {
        let buckets_path = config.buckets_path(&outdir);
        let written = write_assignments_file(&buckets_path, &outcome.partition, identifiers)
            .with_context(|| format!("Failed to write {}", buckets_path.display()))?;
        log::info!("Wrote {} bucket assignments to {}", written, buckets_path.display());
    }

    let summary = RunSummary::new(&histogram, coverage, &outcome);
    let summary_path = config.summary_path(&outdir);
    write_summary(&summary_path, &summary)?;
    log::info!("Summary written to {}", summary_path.display());

    Ok(())
}

fn resolve_coverage(delta: u32) -> CliResult<CoverageRatio> {
    CoverageRatio::new(delta).map_err(|e| CliError::validation(e.to_string()))
}

fn load_input(
    distribution: Option<PathBuf>,
    fasta: Option<PathBuf>,
    start: usize,
) -> Result<(Histogram, Option<IdentifierMap>)> {
    match (distribution, fasta) {
        (Some(path), _) => {
            require_file(&path)?;
            log::info!("Reading distribution file {}", path.display());
            let histogram = DistributionParser::parse_file(&path, start)
                .with_context(|| format!("Failed to read distribution file: {}", path.display()))?;
            log::info!("Done reading.");
            Ok((histogram, None))
        }
        (None, Some(path)) => {
            require_file(&path)?;
            log::info!("Reading fasta file {}", path.display());
            let (histogram, identifiers) = load_fasta(&path, start)
                .with_context(|| format!("Failed to read fasta file: {}", path.display()))?;
            log::info!("Done reading.");
            Ok((histogram, Some(identifiers)))
        }
        (None, None) => Err(CliError::input_unavailable(
            "please specify a distribution or a fasta file",
        )
        .into()),
    }
}

fn require_file(path: &Path) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::file_not_found(path.to_path_buf()))
    }
}

fn report(outcome: &PartitionOutcome, distinct_lengths: usize) {
    log::info!(
        "Naive partitioning cost={} using {} buckets",
        outcome.solution.naive_cost,
        distinct_lengths
    );
    log::info!("Cost of full interval = {}", outcome.full_interval_cost);
    log::info!("Minimum cost found = {}", outcome.solution.min_cost());
    log::info!("For a total of {} subsets", outcome.partition.len());
    if outcome.realized_cost != *outcome.solution.min_cost() {
        log::info!("Cost of the emitted buckets = {}", outcome.realized_cost);
    }

    log::debug!("Intervals:");
    for interval in outcome.partition.intervals() {
        log::debug!("{}, {}", interval.low, interval.high);
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    write_summary_to(file, summary)
        .with_context(|| format!("Failed to write summary file: {}", path.display()))
}

fn write_summary_to<W: Write>(writer: W, summary: &RunSummary) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, summary)
        .context("Failed to serialize run summary")?;
    writer.flush().context("Failed to flush run summary")?;
    Ok(())
}
