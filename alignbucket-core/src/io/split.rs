//! Split a sequence file into one FASTA file per bucket
//!
//! Each record is copied to `<low>-<high>.fasta` for every bucket its
//! identifier is assigned to. Records without an assignment are skipped.
//! At most `max_open_files` bucket files are held open at once; the least
//! recently written one is closed first and reopened for append later.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};

use crate::error::{BucketError, BucketResult};
use crate::io::buckets::AssignmentMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub records_read: usize,
    pub records_written: usize,
    pub unassigned: usize,
    /// Bucket files created, sorted by path
    pub files: Vec<PathBuf>,
}

pub const DEFAULT_MAX_OPEN_FILES: usize = 128;

pub struct FastaSplitter<'a> {
    assignments: &'a AssignmentMap,
    outdir: PathBuf,
    line_width: usize,
    max_open_files: usize,
}

impl<'a> FastaSplitter<'a> {
    pub fn new<P: AsRef<Path>>(assignments: &'a AssignmentMap, outdir: P) -> Self {
        Self {
            assignments,
            outdir: outdir.as_ref().to_path_buf(),
            line_width: 60,
            max_open_files: DEFAULT_MAX_OPEN_FILES,
        }
    }

    /// Cap on simultaneously open bucket files, at least one
    pub fn with_max_open_files(mut self, max_open_files: usize) -> Self {
        self.max_open_files = max_open_files.max(1);
        self
    }

    /// Residues per output line; 0 writes each sequence on one line
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn split_file<P: AsRef<Path>>(&self, path: P) -> BucketResult<SplitSummary> {
        let reader = parse_fastx_file(&path).map_err(|e| BucketError::Fasta(e.to_string()))?;
        self.split(reader)
    }

    pub fn split_reader<R: std::io::Read + Send>(&self, reader: R) -> BucketResult<SplitSummary> {
        let reader = parse_fastx_reader(reader).map_err(|e| BucketError::Fasta(e.to_string()))?;
        self.split(reader)
    }

    fn split(&self, mut reader: Box<dyn FastxReader + '_>) -> BucketResult<SplitSummary> {
        let mut pool = WriterPool::new(&self.outdir, self.max_open_files);
        let mut summary = SplitSummary::default();

        while let Some(record) = reader.next() {
            let record = record.map_err(|e| BucketError::Fasta(e.to_string()))?;
            summary.records_read += 1;

            let id = String::from_utf8_lossy(record.id()).to_string();
            let Some(labels) = self.assignments.get(&id) else {
                summary.unassigned += 1;
                continue;
            };
            let seq = record.seq();

            for label in labels {
                let writer = pool.writer(label, &mut summary.files)?;
                write_record(writer, &id, &seq, self.line_width)?;
                summary.records_written += 1;
            }
        }

        pool.flush_all()?;
        summary.files.sort();

        if summary.unassigned > 0 {
            log::warn!(
                "{} of {} records had no bucket assignment",
                summary.unassigned,
                summary.records_read
            );
        }
        Ok(summary)
    }
}

/// Open bucket files, least recently written first in `order`
struct WriterPool<'p> {
    outdir: &'p Path,
    capacity: usize,
    open: HashMap<String, BufWriter<File>>,
    order: VecDeque<String>,
    created: HashSet<String>,
}

impl<'p> WriterPool<'p> {
    fn new(outdir: &'p Path, capacity: usize) -> Self {
        Self {
            outdir,
            capacity,
            open: HashMap::new(),
            order: VecDeque::new(),
            created: HashSet::new(),
        }
    }

    /// Writer for `label`, creating its file on first use. New paths are
    /// pushed onto `files`.
    fn writer(
        &mut self,
        label: &str,
        files: &mut Vec<PathBuf>,
    ) -> std::io::Result<&mut BufWriter<File>> {
        if let Some(pos) = self.order.iter().position(|open| open == label) {
            if let Some(recent) = self.order.remove(pos) {
                self.order.push_back(recent);
            }
        } else {
            if self.order.len() >= self.capacity {
                if let Some(evicted) = self.order.pop_front() {
                    if let Some(mut writer) = self.open.remove(&evicted) {
                        writer.flush()?;
                    }
                }
            }

            let path = self.outdir.join(format!("{}.fasta", label));
            let file = if self.created.insert(label.to_string()) {
                log::debug!("Creating bucket file {}", path.display());
                files.push(path.clone());
                File::create(&path)?
            } else {
                OpenOptions::new().append(true).open(&path)?
            };
            self.open.insert(label.to_string(), BufWriter::new(file));
            self.order.push_back(label.to_string());
        }

        self.open.get_mut(label).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("bucket file for {} is not open", label),
            )
        })
    }

    fn flush_all(&mut self) -> std::io::Result<()> {
        for writer in self.open.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

fn write_record<W: Write>(
    writer: &mut W,
    id: &str,
    seq: &[u8],
    line_width: usize,
) -> std::io::Result<()> {
    writeln!(writer, ">{}", id)?;
    if line_width == 0 || seq.is_empty() {
        writer.write_all(seq)?;
        writer.write_all(b"\n")?;
        return Ok(());
    }
    for chunk in seq.chunks(line_width) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn assignments(pairs: &[(&str, &str)]) -> AssignmentMap {
        let mut map = AssignmentMap::new();
        for (id, label) in pairs {
            map.entry(id.to_string()).or_default().push(label.to_string());
        }
        map
    }

    #[test]
    fn test_split_writes_bucket_files() {
        let dir = TempDir::new().unwrap();
        let map = assignments(&[("a", "1-3"), ("b", "4-6"), ("c", "1-3")]);
        let fasta = b">a\nMK\n>b\nMKVLA\n>c\nMKV\n>d\nM\n";

        let summary = FastaSplitter::new(&map, dir.path())
            .split_reader(Cursor::new(&fasta[..]))
            .unwrap();

        assert_eq!(summary.records_read, 4);
        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.unassigned, 1);
        assert_eq!(summary.files.len(), 2);

        let low = std::fs::read_to_string(dir.path().join("1-3.fasta")).unwrap();
        assert_eq!(low, ">a\nMK\n>c\nMKV\n");
        let high = std::fs::read_to_string(dir.path().join("4-6.fasta")).unwrap();
        assert_eq!(high, ">b\nMKVLA\n");
    }

    #[test]
    fn test_split_wraps_lines() {
        let mut out = Vec::new();
        write_record(&mut out, "x", b"ABCDEFG", 3).unwrap();
        assert_eq!(out, b">x\nABC\nDEF\nG\n");
    }

    #[test]
    fn test_reopened_buckets_keep_earlier_records() {
        let dir = TempDir::new().unwrap();
        let map = assignments(&[("a", "1-3"), ("b", "4-6"), ("c", "1-3"), ("d", "4-6")]);
        let fasta = b">a\nMK\n>b\nMKVLA\n>c\nMKV\n>d\nMKVL\n";

        let summary = FastaSplitter::new(&map, dir.path())
            .with_max_open_files(1)
            .split_reader(Cursor::new(&fasta[..]))
            .unwrap();

        assert_eq!(summary.records_written, 4);
        assert_eq!(summary.files.len(), 2);
        let low = std::fs::read_to_string(dir.path().join("1-3.fasta")).unwrap();
        assert_eq!(low, ">a\nMK\n>c\nMKV\n");
        let high = std::fs::read_to_string(dir.path().join("4-6.fasta")).unwrap();
        assert_eq!(high, ">b\nMKVLA\n>d\nMKVL\n");
    }

    #[test]
    fn test_stale_bucket_file_truncated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1-3.fasta"), ">old\nM\n").unwrap();
        let map = assignments(&[("a", "1-3")]);

        FastaSplitter::new(&map, dir.path())
            .split_reader(Cursor::new(&b">a\nMK\n"[..]))
            .unwrap();

        let low = std::fs::read_to_string(dir.path().join("1-3.fasta")).unwrap();
        assert_eq!(low, ">a\nMK\n");
    }

    #[test]
    fn test_record_in_several_buckets() {
        let dir = TempDir::new().unwrap();
        let map = assignments(&[("a", "1-3"), ("a", "2-5")]);
        let summary = FastaSplitter::new(&map, dir.path())
            .split_reader(Cursor::new(&b">a\nMK\n"[..]))
            .unwrap();
        assert_eq!(summary.records_written, 2);
        assert!(dir.path().join("2-5.fasta").exists());
    }
}
