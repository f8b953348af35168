//! Length distribution file parser
//!
//! One `<length> <count>` pair per line, whitespace separated, in
//! non-decreasing length order. Lengths without a line get a count of zero.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{BucketError, BucketResult};
use crate::histogram::Histogram;

pub struct DistributionParser;

impl DistributionParser {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line_num: usize, line: &str) -> BucketResult<Option<(usize, u64)>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(BucketError::malformed(
                line_num,
                format!("expected `<length> <count>`, got {} fields", fields.len()),
            ));
        }

        let length = fields[0].parse::<usize>().map_err(|_| {
            BucketError::malformed(line_num, format!("invalid length: {}", fields[0]))
        })?;
        let count = fields[1].parse::<u64>().map_err(|_| {
            BucketError::malformed(line_num, format!("invalid count: {}", fields[1]))
        })?;

        Ok(Some((length, count)))
    }

    pub fn parse_file<P: AsRef<Path>>(path: P, start: usize) -> BucketResult<Histogram> {
        let file = File::open(&path)?;
        Self::parse_reader(BufReader::new(file), start)
    }

    pub fn parse_reader<R: BufRead>(reader: R, start: usize) -> BucketResult<Histogram> {
        let mut pairs = Vec::new();
        let mut previous: Option<usize> = None;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = line_idx + 1;
            let Some((length, count)) = Self::parse_line(line_num, &line)? else {
                continue;
            };

            if let Some(prev) = previous {
                if length < prev {
                    return Err(BucketError::malformed(
                        line_num,
                        format!("length {} follows length {}", length, prev),
                    ));
                }
            }
            previous = Some(length);
            pairs.push((length, count));
        }

        log::debug!("Read {} distribution records", pairs.len());
        Histogram::from_sorted_pairs(start, pairs)
    }
}
