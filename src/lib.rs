//! lintcfg - hierarchical rule configuration for static-analysis tools.
//!
//! This library provides:
//! - YAML and TOML document loading into an immutable configuration tree
//! - Scoped sub-sections and typed lookups that fall back to defaults
//! - Comma-separated path exclusion filters
//!
//! # Example
//!
//! ```
//! use lintcfg::config::{DocumentFormat, load_str};
//! use lintcfg::filter::Excludes;
//!
//! let content = r#"
//! complexity:
//!   LongMethod:
//!     threshold: 40
//!     excludes: "build/, test*"
//! "#;
//! let root = load_str(content, DocumentFormat::Yaml).unwrap();
//! let rule = root.sub_config("complexity").sub_config("LongMethod");
//!
//! assert_eq!(rule.value_or_default("threshold", 20), 40);
//! assert_eq!(rule.value_or_default("ignoreOverloaded", false), false);
//!
//! let excludes = Excludes::from_config(&rule, "excludes");
//! assert!(excludes.none("src/main.kt"));
//! assert!(excludes.contains("src/testUtils.kt"));
//! ```

pub mod config;
pub mod error;
pub mod filter;

pub use config::{ConfigTree, ConfigValue};
pub use error::{ConfigError, Result};
pub use filter::Excludes;
