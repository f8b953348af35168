use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BucketError;

/// Zero-based offset from the minimum length; `length = index + start`.
pub type LengthIndex = usize;

/// Optimal predecessor of an index. `None` means the last bucket starts at index 0.
pub type Predecessor = Option<LengthIndex>;

/// Coverage percentage in `1..=100`.
///
/// A sequence of length `l` may share a bucket with sequences up to
/// `l / (delta / 100)` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CoverageRatio(u32);

impl CoverageRatio {
    pub const FULL: CoverageRatio = CoverageRatio(100);

    pub fn new(percent: u32) -> Result<Self, BucketError> {
        if percent == 0 || percent > 100 {
            return Err(BucketError::InvalidCoverage(percent));
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    pub fn is_full(self) -> bool {
        self.0 == 100
    }
}

impl Default for CoverageRatio {
    fn default() -> Self {
        Self(90)
    }
}

impl TryFrom<u32> for CoverageRatio {
    type Error = BucketError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CoverageRatio> for u32 {
    fn from(value: CoverageRatio) -> Self {
        value.0
    }
}

impl fmt::Display for CoverageRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Inclusive range of absolute sequence lengths forming one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub low: usize,
    pub high: usize,
}

impl Interval {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, length: usize) -> bool {
        self.low <= length && length <= self.high
    }

    /// Number of distinct lengths in the bucket
    pub fn width(&self) -> usize {
        self.high + 1 - self.low
    }

    /// Label used in assignment files and split output names
    pub fn label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}
