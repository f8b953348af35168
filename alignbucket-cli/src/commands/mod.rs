//! Command implementations for alignbucket CLI

pub mod partition;
pub mod split;
