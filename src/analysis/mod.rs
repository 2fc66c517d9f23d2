//! Statistics engine.
//!
//! `parse` turns raw upstream fields into typed values; `aggregator` folds
//! result records into summaries.

pub mod aggregator;
pub mod parse;

pub use aggregator::*;
