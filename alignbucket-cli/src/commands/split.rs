//! Split command implementation - write one FASTA file per bucket

use anyhow::{Context, Result};
use std::path::PathBuf;

use alignbucket_core::io::{read_assignments_file, FastaSplitter};

use crate::config::Config;
use crate::error::CliError;

pub fn execute(
    config: &Config,
    fasta: PathBuf,
    buckets: Option<PathBuf>,
    outdir: Option<PathBuf>,
    line_width: usize,
    max_open_files: usize,
) -> Result<()> {
    let outdir = outdir.unwrap_or_else(|| config.output.outdir.clone());
    let buckets = buckets.unwrap_or_else(|| config.buckets_path(&outdir));

    for path in [&fasta, &buckets] {
        if !path.is_file() {
            return Err(CliError::file_not_found(path.clone()).into());
        }
    }
    if !outdir.exists() {
        std::fs::create_dir_all(&outdir).map_err(CliError::from)?;
    }

    log::info!("Reading bucket assignments from {}", buckets.display());
    let assignments = read_assignments_file(&buckets)
        .with_context(|| format!("Failed to read {}", buckets.display()))?;
    log::info!("{} sequences have a bucket", assignments.len());

    log::info!("Splitting {} into {}", fasta.display(), outdir.display());
    let summary = FastaSplitter::new(&assignments, &outdir)
        .with_line_width(line_width)
        .with_max_open_files(max_open_files)
        .split_file(&fasta)
        .with_context(|| format!("Failed to split {}", fasta.display()))?;

    log::info!(
        "Wrote {} records into {} bucket files",
        summary.records_written,
        summary.files.len()
    );
    for file in &summary.files {
        log::debug!("  {}", file.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_from_assignment_list() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("seqs.fa");
        std::fs::write(&fasta, ">a\nMKV\n>b\nMKVLAGG\n").unwrap();
        std::fs::write(dir.path().join("buckets.list"), "a\t1-3\nb\t4-7\n").unwrap();

        let outdir = Some(dir.path().to_path_buf());
        execute(&Config::default(), fasta, None, outdir, 0, 1).unwrap();

        let low = std::fs::read_to_string(dir.path().join("1-3.fasta")).unwrap();
        assert_eq!(low, ">a\nMKV\n");
        let high = std::fs::read_to_string(dir.path().join("4-7.fasta")).unwrap();
        assert_eq!(high, ">b\nMKVLAGG\n");
    }

    #[test]
    fn test_missing_assignment_list() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("seqs.fa");
        std::fs::write(&fasta, ">a\nMKV\n").unwrap();

        let outdir = Some(dir.path().to_path_buf());
        let err = execute(&Config::default(), fasta, None, outdir, 60, 128).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound { .. })
        ));
    }
}
