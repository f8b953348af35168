//! Per-sequence bucket assignments
//!
//! `buckets.list` holds one `<identifier>\t<low>-<high>` line per sequence.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::backtrack::Partition;
use crate::error::{BucketError, BucketResult};
use crate::histogram::IdentifierMap;

/// Bucket labels keyed by sequence identifier
pub type AssignmentMap = HashMap<String, Vec<String>>;

/// Write every identifier with its bucket. Returns the number of lines written.
pub fn write_assignments<W: Write>(
    writer: &mut W,
    partition: &Partition,
    identifiers: &IdentifierMap,
) -> std::io::Result<usize> {
    let mut written = 0;
    for (id, interval) in partition.assignments(identifiers) {
        writeln!(writer, "{}\t{}-{}", id, interval.low, interval.high)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

pub fn write_assignments_file<P: AsRef<Path>>(
    path: P,
    partition: &Partition,
    identifiers: &IdentifierMap,
) -> BucketResult<usize> {
    let mut writer = BufWriter::new(File::create(&path)?);
    Ok(write_assignments(&mut writer, partition, identifiers)?)
}

/// Parse an assignment list. An identifier may appear under several buckets.
pub fn read_assignments<R: BufRead>(reader: R) -> BucketResult<AssignmentMap> {
    let mut assignments = AssignmentMap::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        // identifiers may contain tabs from free-text headers; the label is the last field
        let (id, label) = line.rsplit_once('\t').ok_or_else(|| {
            BucketError::malformed(line_idx + 1, "expected `<identifier>\\t<low>-<high>`")
        })?;
        if !is_bucket_label(label) {
            return Err(BucketError::malformed(
                line_idx + 1,
                format!("invalid bucket label: {}", label),
            ));
        }
        assignments
            .entry(id.to_string())
            .or_default()
            .push(label.to_string());
    }

    Ok(assignments)
}

pub fn read_assignments_file<P: AsRef<Path>>(path: P) -> BucketResult<AssignmentMap> {
    let file = File::open(&path)?;
    read_assignments(BufReader::new(file))
}

fn is_bucket_label(label: &str) -> bool {
    match label.split_once('-') {
        Some((low, high)) => match (low.parse::<usize>(), high.parse::<usize>()) {
            (Ok(low), Ok(high)) => low <= high,
            _ => false,
        },
        None => false,
    }
}
