//! FASTA/FASTQ length scanning
//!
//! Uses needletail, which handles plain and gzip-compressed input and joins
//! wrapped sequence lines. An identifier is the full header after `>`.

use std::path::Path;

use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};

use crate::error::{BucketError, BucketResult};
use crate::histogram::{Histogram, IdentifierMap};

pub struct FastaLengthReader;

impl FastaLengthReader {
    /// Group identifiers by sequence length
    pub fn read_file<P: AsRef<Path>>(path: P) -> BucketResult<IdentifierMap> {
        let reader = parse_fastx_file(&path).map_err(|e| BucketError::Fasta(e.to_string()))?;
        Self::collect(reader)
    }

    pub fn read_reader<R: std::io::Read + Send>(reader: R) -> BucketResult<IdentifierMap> {
        let reader = parse_fastx_reader(reader).map_err(|e| BucketError::Fasta(e.to_string()))?;
        Self::collect(reader)
    }

    fn collect(mut reader: Box<dyn FastxReader + '_>) -> BucketResult<IdentifierMap> {
        let mut identifiers = IdentifierMap::new();
        let mut total = 0usize;

        while let Some(record) = reader.next() {
            let record = record.map_err(|e| BucketError::Fasta(e.to_string()))?;
            let id = String::from_utf8_lossy(record.id()).to_string();
            let length = record.seq().len();
            identifiers.entry(length).or_default().push(id);
            total += 1;
        }

        log::debug!(
            "Scanned {} sequences over {} distinct lengths",
            total,
            identifiers.len()
        );
        Ok(identifiers)
    }
}

/// Read a sequence file into a histogram plus its identifier map.
pub fn load_fasta<P: AsRef<Path>>(
    path: P,
    start: usize,
) -> BucketResult<(Histogram, IdentifierMap)> {
    let identifiers = FastaLengthReader::read_file(path)?;
    let histogram = Histogram::from_identifiers(start, &identifiers)?;
    Ok((histogram, identifiers))
}
