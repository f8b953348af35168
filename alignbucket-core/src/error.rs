//! Error types for histogram assembly and partitioning

use thiserror::Error;

/// Errors raised while building a histogram or validating a partition.
///
/// The optimizer itself cannot fail once its inputs exist: every variant here
/// is detected while assembling those inputs or while checking the output.
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("Empty length domain: no sequence lengths at or above the minimum length {start}")]
    EmptyDomain { start: usize },

    #[error("Invalid coverage percentage {0}: expected a value in 1..=100")]
    InvalidCoverage(u32),

    #[error("Length {length} listed after length {previous}: lengths must be non-decreasing")]
    UnsortedLengths { length: usize, previous: usize },

    #[error("Sequence count for length {length} overflows a 64-bit counter")]
    CountOverflow { length: usize },

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FASTA parse error: {0}")]
    Fasta(String),

    #[error("Partition violation: {0}")]
    PartitionViolation(String),
}

impl BucketError {
    pub fn malformed<S: Into<String>>(line: usize, message: S) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    pub fn violation<S: Into<String>>(message: S) -> Self {
        Self::PartitionViolation(message.into())
    }
}

impl From<std::convert::Infallible> for BucketError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

pub type BucketResult<T> = Result<T, BucketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = BucketError::malformed(7, "missing count");
        assert_eq!(err.to_string(), "Malformed record at line 7: missing count");
    }

    #[test]
    fn test_unsorted_message() {
        let err = BucketError::UnsortedLengths { length: 3, previous: 5 };
        assert_eq!(
            err.to_string(),
            "Length 3 listed after length 5: lengths must be non-decreasing"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BucketError = io_err.into();
        assert!(matches!(err, BucketError::Io(_)));
    }
}
