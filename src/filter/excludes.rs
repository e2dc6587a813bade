use crate::config::ConfigTree;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Path exclusion fragments parsed from a comma-separated string.
///
/// Each fragment is trimmed, blank fragments are dropped, and a single trailing
/// `*` is removed. Matching is plain substring containment: `"test*"` excludes
/// `"src/testUtils.kt"`. A `*` anywhere else in a fragment is literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Excludes {
	excludes: Vec<String>,
}

impl Excludes {
	pub fn new(raw: &str) -> Self {
		let excludes = raw
			.split(',')
			.map(str::trim)
			.filter(|fragment| !fragment.is_empty())
			.map(|fragment| fragment.strip_suffix('*').unwrap_or(fragment).to_string())
			.collect();

		Excludes { excludes }
	}

	/// Read the raw pattern string stored under `key`; a missing or
	/// non-string value gives an empty set.
	pub fn from_config(config: &ConfigTree, key: &str) -> Self {
		Excludes::new(&config.value_or_default(key, String::new()))
	}

	/// True if `value` contains any fragment.
	pub fn contains(&self, value: &str) -> bool {
		self.excludes
			.iter()
			.any(|fragment| value.contains(fragment.as_str()))
	}

	/// True if `value` contains none of the fragments.
	pub fn none(&self, value: &str) -> bool {
		!self.contains(value)
	}

	pub fn patterns(&self) -> &[String] {
		&self.excludes
	}

	pub fn is_empty(&self) -> bool {
		self.excludes.is_empty()
	}
}

impl FromStr for Excludes {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Excludes::new(s))
	}
}

impl fmt::Display for Excludes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.excludes.join(","))
	}
}
