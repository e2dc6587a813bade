//! Configuration documents for lintcfg.
//!
//! This module handles:
//! - YAML and TOML document loading
//! - The closed value model documents are normalized into
//! - Scoped, typed lookups with defaults

pub mod loader;
pub mod tree;
pub mod value;

pub use loader::{DocumentFormat, load_path, load_reader, load_str};
pub use tree::ConfigTree;
pub use value::{ConfigValue, FromConfigValue};
