use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "alignbucket")]
#[command(about = "alignbucket - optimal length bucketing for all-pairs alignment")]
#[command(version)]
#[command(long_about = "
alignbucket partitions a set of sequences, grouped by length, into contiguous
length buckets that minimize the modeled cost of all-pairs alignment. A
sequence of length L only shares a bucket with sequences up to L / (delta/100)
long.

Examples:
  alignbucket partition --distribution lengths.txt --delta 90
  alignbucket partition --fasta proteins.fa --start 30 --outdir buckets/
  alignbucket split --fasta proteins.fa --buckets buckets/buckets.list --outdir buckets/
  alignbucket config --out alignbucket.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output; also writes the optimizer trace (may be large)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the optimal length buckets
    Partition {
        /// File with length distribution, one `<length> <num. of sequences>` per line
        #[arg(short, long, conflicts_with = "fasta")]
        distribution: Option<PathBuf>,

        /// File containing the sequences in FASTA format
        #[arg(short, long)]
        fasta: Option<PathBuf>,

        /// Minimum sequence length to consider
        #[arg(short, long)]
        start: Option<usize>,

        /// Coverage percentage needed (1-100)
        #[arg(long)]
        delta: Option<u32>,

        /// Output directory
        #[arg(long)]
        outdir: Option<PathBuf>,
    },

    /// Write one FASTA file per bucket from a bucket assignment list
    Split {
        /// Sequence file to split
        #[arg(short, long, required = true)]
        fasta: PathBuf,

        /// Bucket assignment list (defaults to <outdir>/buckets.list)
        #[arg(short, long)]
        buckets: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        outdir: Option<PathBuf>,

        /// Residues per output line (0 for unwrapped)
        #[arg(long, default_value = "60")]
        line_width: usize,

        /// Maximum bucket files held open at once
        #[arg(long, default_value = "128")]
        max_open_files: usize,
    },

    /// Print the default configuration as TOML
    Config {
        /// Write it to this file instead of standard output
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    match cli.command {
        Commands::Partition {
            distribution,
            fasta,
            start,
            delta,
            outdir,
        } => {
            commands::partition::execute(
                &config,
                distribution,
                fasta,
                start,
                delta,
                outdir,
                cli.verbose > 0,
            )?;
        }

        Commands::Split {
            fasta,
            buckets,
            outdir,
            line_width,
            max_open_files,
        } => {
            commands::split::execute(
                &config,
                fasta,
                buckets,
                outdir,
                line_width,
                max_open_files,
            )?;
        }

        Commands::Config { out } => match out {
            Some(path) => {
                Config::default().save_to_file(&path)?;
                log::info!("Default configuration written to {}", path.display());
            }
            None => println!("{}", Config::example_toml()?),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    match run(cli) {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => Err(err),
        },
    }
}
