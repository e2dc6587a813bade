//! Path filtering for lintcfg.
//!
//! This module handles:
//! - Parsing comma-separated exclusion strings
//! - Substring matching of paths against the parsed fragments

pub mod excludes;

pub use excludes::Excludes;
