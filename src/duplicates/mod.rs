//! Content grouping and the parallel hash orchestrator.
//!
//! # Overview
//!
//! This module turns a discovered file set into a content grouping:
//! every file is hashed (in parallel, on a bounded thread pool) and files
//! sharing a fingerprint are collected into a [`ContentGroup`]. The
//! grouping partitions the successfully hashed set: every file appears in
//! exactly one group, and a group holds one or more byte-identical files.
//!
//! Groups of size one are kept. Downstream placement copies exactly one
//! representative per group either way, so unique files and duplicated
//! files take the same path through the pipeline.

pub mod finder;
pub mod groups;

pub use finder::{format_size, group_by_content, Deduplicator, GrouperConfig, HashStats, ScanSummary};
pub use groups::ContentGroup;
