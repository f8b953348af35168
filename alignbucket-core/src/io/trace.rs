//! Tab-separated optimizer trace (`matrix.csv`)

use std::io::Write;

use num_bigint::BigUint;

use crate::optimizer::TraceSink;
use crate::types::{LengthIndex, Predecessor};

/// Writes `i\tB\tp` rows, `p` being `-1` when the last bucket starts at index 0.
pub struct TsvTraceWriter<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> TsvTraceWriter<W> {
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        writeln!(writer, "i\tB\tp")?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TraceSink for TsvTraceWriter<W> {
    type Error = std::io::Error;

    fn record(
        &mut self,
        index: LengthIndex,
        cost: &BigUint,
        predecessor: Predecessor,
    ) -> std::io::Result<()> {
        match predecessor {
            Some(lower) => writeln!(self.writer, "{}\t{}\t{}", index, cost, lower)?,
            None => writeln!(self.writer, "{}\t{}\t-1", index, cost)?,
        }
        self.rows += 1;
        Ok(())
    }
}
