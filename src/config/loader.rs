use crate::config::tree::ConfigTree;
use crate::config::value::ConfigValue;
use crate::error::{ConfigError, ParseFailure, Result};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Document syntaxes the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
	Yaml,
	Toml,
}

impl DocumentFormat {
	/// File extensions accepted for this format, without the leading dot.
	pub fn extensions(self) -> &'static [&'static str] {
		match self {
			DocumentFormat::Yaml => &["yml", "yaml"],
			DocumentFormat::Toml => &["toml"],
		}
	}

	/// Pick the format from a path's extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;
		[DocumentFormat::Yaml, DocumentFormat::Toml]
			.into_iter()
			.find(|format| format.extensions().contains(&ext))
	}
}

/// Load a configuration file.
///
/// The path must exist and carry a recognized extension; both are checked
/// before the file is opened.
pub fn load_path(path: &Path) -> Result<ConfigTree> {
	if !path.is_file() {
		return Err(ConfigError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}
	let format =
		DocumentFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedExtension {
			path: path.to_path_buf(),
		})?;

	let source_name = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
		source_name: source_name.clone(),
		source,
	})?;

	parse_document(&content, format, &source_name)
}

/// Load a configuration from any readable stream. No extension check applies.
pub fn load_reader<R: Read>(mut reader: R, format: DocumentFormat) -> Result<ConfigTree> {
	let mut content = String::new();
	reader
		.read_to_string(&mut content)
		.map_err(|source| ConfigError::ConfigReadError {
			source_name: "<reader>".to_string(),
			source,
		})?;

	parse_document(&content, format, "<reader>")
}

/// Parse a configuration from a string (useful for testing).
pub fn load_str(content: &str, format: DocumentFormat) -> Result<ConfigTree> {
	parse_document(content, format, "<string>")
}

fn parse_document(content: &str, format: DocumentFormat, source_name: &str) -> Result<ConfigTree> {
	if content.is_empty() {
		tracing::debug!(source = source_name, "config document is empty");
		return Ok(ConfigTree::empty());
	}

	let parse_error = |source: ParseFailure| ConfigError::ConfigParseError {
		source_name: source_name.to_string(),
		source,
	};
	let invalid = |reason: String| ConfigError::InvalidConfiguration {
		source_name: source_name.to_string(),
		reason,
	};

	let root = match format {
		DocumentFormat::Yaml => {
			let mut document: serde_yaml::Value =
				serde_yaml::from_str(content).map_err(|e| parse_error(e.into()))?;
			document.apply_merge().map_err(|e| parse_error(e.into()))?;
			// A document holding only comments parses to null.
			if document.is_null() {
				None
			} else {
				yaml_to_value(document).map_err(invalid)?
			}
		}
		DocumentFormat::Toml => {
			let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(e.into()))?;
			Some(toml_to_value(toml::Value::Table(table)))
		}
	};

	let tree = match root {
		None => ConfigTree::empty(),
		Some(ConfigValue::Mapping(properties)) => ConfigTree::new(properties),
		Some(other) => {
			return Err(invalid(format!(
				"top level must be a mapping, found {}",
				other.kind()
			)));
		}
	};

	tracing::debug!(
		source = source_name,
		?format,
		keys = tree.properties().len(),
		"loaded config document"
	);
	Ok(tree)
}

/// Convert a YAML node. Nulls map to `None` and are dropped by the caller.
fn yaml_to_value(value: serde_yaml::Value) -> std::result::Result<Option<ConfigValue>, String> {
	use serde_yaml::Value;

	let converted = match value {
		Value::Null => return Ok(None),
		Value::Bool(b) => ConfigValue::Boolean(b),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				ConfigValue::Integer(i)
			} else if let Some(x) = n.as_f64() {
				ConfigValue::Float(x)
			} else {
				return Err(format!("unrepresentable number {n}"));
			}
		}
		Value::String(s) => ConfigValue::String(s),
		Value::Sequence(items) => {
			let mut converted = Vec::with_capacity(items.len());
			for item in items {
				if let Some(item) = yaml_to_value(item)? {
					converted.push(item);
				}
			}
			ConfigValue::Sequence(converted)
		}
		Value::Mapping(entries) => {
			let mut map = BTreeMap::new();
			for (key, value) in entries {
				let key = yaml_key(key)?;
				if let Some(value) = yaml_to_value(value)?
					&& map.insert(key.clone(), value).is_some()
				{
					return Err(format!("duplicate mapping key {key:?}"));
				}
			}
			ConfigValue::Mapping(map)
		}
		Value::Tagged(tagged) => return yaml_to_value(tagged.value),
	};

	Ok(Some(converted))
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
	use serde_yaml::Value;

	match key {
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(b) => Ok(b.to_string()),
		Value::Tagged(tagged) => yaml_key(tagged.value),
		Value::Null => Err("mapping keys must not be null".to_string()),
		Value::Sequence(_) | Value::Mapping(_) => {
			Err("mapping keys must be scalars".to_string())
		}
	}
}

fn toml_to_value(value: toml::Value) -> ConfigValue {
	match value {
		toml::Value::String(s) => ConfigValue::String(s),
		toml::Value::Integer(i) => ConfigValue::Integer(i),
		toml::Value::Float(x) => ConfigValue::Float(x),
		toml::Value::Boolean(b) => ConfigValue::Boolean(b),
		toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
		toml::Value::Array(items) => {
			ConfigValue::Sequence(items.into_iter().map(toml_to_value).collect())
		}
		toml::Value::Table(table) => ConfigValue::Mapping(
			table
				.into_iter()
				.map(|(key, value)| (key, toml_to_value(value)))
				.collect(),
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;
	use std::path::PathBuf;

	#[test]
	fn test_load_empty_document() {
		let tree = load_str("", DocumentFormat::Yaml).unwrap();
		assert_eq!(tree, ConfigTree::empty());
		assert_eq!(tree.value_or_default("anything", 42), 42);

		let tree = load_str("", DocumentFormat::Toml).unwrap();
		assert!(tree.is_empty());
	}

	#[test]
	fn test_load_comment_only_yaml_is_empty() {
		let tree = load_str("# nothing configured yet\n", DocumentFormat::Yaml).unwrap();
		assert!(tree.is_empty());
	}

	#[test]
	fn test_load_nested_yaml() {
		let content = r#"
complexity:
  active: true
  LongMethod:
    threshold: 20
    ratio: 0.5
    excludes: "build/, test*"
    names: [foo, bar]
"#;
		let root = load_str(content, DocumentFormat::Yaml).unwrap();
		let complexity = root.sub_config("complexity");
		assert!(complexity.value_or_default("active", false));

		let rule = complexity.sub_config("LongMethod");
		assert_eq!(rule.value_or_default("threshold", 0), 20);
		assert_eq!(rule.value_or_default("ratio", 1.0), 0.5);
		assert_eq!(
			rule.value_or_default("excludes", String::new()),
			"build/, test*"
		);
		assert_eq!(
			rule.value_or_default("names", Vec::<String>::new()),
			vec!["foo", "bar"]
		);
	}

	#[test]
	fn test_load_toml() {
		let content = r#"
[style.MagicNumber]
active = true
ignoreNumbers = [-1, 0, 1, 2]
since = 2024-01-15
"#;
		let root = load_str(content, DocumentFormat::Toml).unwrap();
		let rule = root.sub_config("style").sub_config("MagicNumber");
		assert!(rule.value_or_default("active", false));
		assert_eq!(
			rule.value_or_default("ignoreNumbers", Vec::<i64>::new()),
			vec![-1, 0, 1, 2]
		);
		assert_eq!(rule.value_or_default("since", String::new()), "2024-01-15");
	}

	#[test]
	fn test_non_mapping_top_level_is_invalid() {
		for content in ["just a string", "42", "- a\n- b\n", "true"] {
			let result = load_str(content, DocumentFormat::Yaml);
			match result.unwrap_err() {
				ConfigError::InvalidConfiguration { reason, .. } => {
					assert!(reason.contains("top level must be a mapping"));
				}
				other => panic!("Expected InvalidConfiguration error, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_yaml_syntax_error() {
		let result = load_str("key: [unclosed", DocumentFormat::Yaml);
		assert!(matches!(
			result.unwrap_err(),
			ConfigError::ConfigParseError {
				source: ParseFailure::Yaml(_),
				..
			}
		));
	}

	#[test]
	fn test_toml_syntax_error() {
		let result = load_str("invalid toml [[[", DocumentFormat::Toml);
		assert!(matches!(
			result.unwrap_err(),
			ConfigError::ConfigParseError {
				source: ParseFailure::Toml(_),
				..
			}
		));
	}

	#[test]
	fn test_yaml_nulls_read_as_absent() {
		let content = "rule:\n  threshold:\n  items: [a, ~, b]\n";
		let rule = load_str(content, DocumentFormat::Yaml).unwrap().sub_config("rule");
		assert!(!rule.contains_key("threshold"));
		assert_eq!(rule.value_or_default("threshold", 7), 7);
		assert_eq!(
			rule.value_or_default("items", Vec::<String>::new()),
			vec!["a", "b"]
		);
	}

	#[test]
	fn test_yaml_scalar_keys_become_strings() {
		let content = "1: one\ntrue: yes\n";
		let root = load_str(content, DocumentFormat::Yaml).unwrap();
		assert_eq!(root.value_or_default("1", String::new()), "one");
		assert_eq!(root.value_or_default("true", String::new()), "yes");
	}

	#[test]
	fn test_yaml_merge_keys_are_resolved() {
		let content = "defaults: &d\n  active: true\n  threshold: 10\nLongMethod:\n  <<: *d\n  threshold: 40\n";
		let rule = load_str(content, DocumentFormat::Yaml)
			.unwrap()
			.sub_config("LongMethod");
		assert!(!rule.contains_key("<<"));
		assert!(rule.value_or_default("active", false));
		assert_eq!(rule.value_or_default("threshold", 0), 40);
	}

	#[test]
	fn test_yaml_keys_colliding_after_stringify_are_invalid() {
		let result = load_str("1: int\n'1': str\n", DocumentFormat::Yaml);
		match result.unwrap_err() {
			ConfigError::InvalidConfiguration { reason, .. } => {
				assert!(reason.contains("duplicate mapping key"));
			}
			other => panic!("Expected InvalidConfiguration error, got {other:?}"),
		}
	}

	#[test]
	fn test_nan_sections_compare_equal() {
		let root = load_str("a:\n  x: .nan\n", DocumentFormat::Yaml).unwrap();
		assert_eq!(root.sub_config("a"), root.sub_config("a"));
	}

	#[test]
	fn test_yaml_complex_keys_are_invalid() {
		let content = "? [a, b]\n: value\n";
		let result = load_str(content, DocumentFormat::Yaml);
		assert!(matches!(
			result.unwrap_err(),
			ConfigError::InvalidConfiguration { .. }
		));
	}

	#[test]
	fn test_load_reader() {
		let reader = Cursor::new("a:\n  b: 5\n");
		let root = load_reader(reader, DocumentFormat::Yaml).unwrap();
		assert_eq!(root.sub_config("a").value_or_default("b", 0), 5);

		let empty = load_reader(Cursor::new(""), DocumentFormat::Yaml).unwrap();
		assert!(empty.is_empty());
	}

	#[test]
	fn test_load_path_missing_file() {
		let result = load_path(Path::new("/nonexistent/dir/config.yml"));
		let err = result.unwrap_err();
		assert!(err.is_validation());
		assert!(matches!(err, ConfigError::ConfigNotFound { .. }));
	}

	#[test]
	fn test_load_path_rejects_unknown_extension() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		std::fs::write(&path, "{\"a\": 1}").unwrap();

		let err = load_path(&path).unwrap_err();
		assert!(err.is_validation());
		match err {
			ConfigError::UnsupportedExtension { path: reported } => assert_eq!(reported, path),
			other => panic!("Expected UnsupportedExtension error, got {other:?}"),
		}
	}

	#[test]
	fn test_load_path_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("detekt.yml");
		std::fs::write(&path, "a:\n  b: 5\n").unwrap();

		let root = load_path(&path).unwrap();
		assert_eq!(root.sub_config("a").value_or_default("b", 0), 5);
	}

	#[test]
	fn test_format_from_path() {
		assert_eq!(
			DocumentFormat::from_path(&PathBuf::from("a/detekt.yml")),
			Some(DocumentFormat::Yaml)
		);
		assert_eq!(
			DocumentFormat::from_path(&PathBuf::from("detekt.yaml")),
			Some(DocumentFormat::Yaml)
		);
		assert_eq!(
			DocumentFormat::from_path(&PathBuf::from("lint.toml")),
			Some(DocumentFormat::Toml)
		);
		assert_eq!(DocumentFormat::from_path(&PathBuf::from("README")), None);
		assert_eq!(DocumentFormat::from_path(&PathBuf::from("notes.txt")), None);
	}
}
