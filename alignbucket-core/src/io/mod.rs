//! Boundary adapters: histogram loaders, trace and assignment writers
//!
//! The optimizer never touches the file system; everything here converts
//! between files and the in-memory types the engine consumes and produces.

pub mod buckets;
pub mod distribution;
pub mod fasta;
pub mod split;
pub mod trace;

pub use buckets::{
    read_assignments, read_assignments_file, write_assignments, write_assignments_file,
    AssignmentMap,
};
pub use distribution::DistributionParser;
pub use fasta::{load_fasta, FastaLengthReader};
pub use split::{FastaSplitter, SplitSummary};
pub use trace::TsvTraceWriter;
