use crate::config::value::{ConfigValue, FromConfigValue, fmt_mapping};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One level of a nested configuration document.
///
/// A tree never changes after construction. Scoping into a section produces a
/// new tree over that section, or an empty tree when the section is missing or
/// is not a mapping, so callers can chain lookups without checking each step:
///
/// ```
/// use lintcfg::config::{ConfigTree, DocumentFormat, load_str};
///
/// let root = load_str("complexity:\n  LongMethod:\n    threshold: 40\n", DocumentFormat::Yaml).unwrap();
/// let rule = root.sub_config("complexity").sub_config("LongMethod");
/// assert_eq!(rule.value_or_default("threshold", 20), 40);
/// assert_eq!(rule.value_or_default("active", true), true);
/// assert_eq!(root.sub_config("style"), ConfigTree::empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
	properties: BTreeMap<String, ConfigValue>,
}

impl ConfigTree {
	pub fn new(properties: BTreeMap<String, ConfigValue>) -> Self {
		ConfigTree { properties }
	}

	/// A tree with no properties. Every lookup on it returns the default.
	pub const fn empty() -> Self {
		ConfigTree {
			properties: BTreeMap::new(),
		}
	}

	pub fn properties(&self) -> &BTreeMap<String, ConfigValue> {
		&self.properties
	}

	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.properties.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.properties.keys().map(String::as_str)
	}

	/// Raw value stored under `key`, if any.
	pub fn get(&self, key: &str) -> Option<&ConfigValue> {
		self.properties.get(key)
	}

	/// Scope into the mapping stored under `key`.
	///
	/// Keys are matched literally; a `.` in `key` is not a path separator.
	pub fn sub_config(&self, key: &str) -> ConfigTree {
		match self.properties.get(key) {
			Some(ConfigValue::Mapping(map)) => ConfigTree::new(map.clone()),
			_ => ConfigTree::empty(),
		}
	}

	/// Scope through several nested sections in order.
	pub fn at_path(&self, path: &[&str]) -> ConfigTree {
		path.iter().fold(self.clone(), |tree, key| tree.sub_config(key))
	}

	/// Resolve `key` as the type of `default`.
	///
	/// Returns `default` when the key is absent or when the stored value cannot
	/// be read as `T`. Integers and floats convert into each other when no
	/// information is lost, and strings are parsed into numbers and booleans.
	pub fn value_or_default<T: FromConfigValue>(&self, key: &str, default: T) -> T {
		let Some(value) = self.properties.get(key) else {
			return default;
		};

		match T::from_config_value(value) {
			Some(resolved) => resolved,
			None => {
				tracing::debug!(
					key,
					expected = T::EXPECTED,
					found = value.kind(),
					"config value has unexpected type, using default"
				);
				default
			}
		}
	}
}

impl FromConfigValue for ConfigTree {
	const EXPECTED: &'static str = "ConfigTree";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		value.as_mapping().cloned().map(ConfigTree::new)
	}
}

impl From<BTreeMap<String, ConfigValue>> for ConfigTree {
	fn from(properties: BTreeMap<String, ConfigValue>) -> Self {
		ConfigTree::new(properties)
	}
}

impl fmt::Display for ConfigTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ConfigTree(properties=")?;
		fmt_mapping(&self.properties, f)?;
		write!(f, ")")
	}
}
