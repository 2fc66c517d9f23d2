//! Report generation.
//!
//! Builds a [`crate::models::Report`] from result records and renders it
//! as Markdown or JSON.

pub mod builder;
pub mod format;
pub mod generator;

pub use builder::build_report;
pub use generator::*;
