use std::path::PathBuf;

/// Library-level structured errors for lintcfg.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
///
/// Lookups never produce an error; only loading a document can fail.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Config file has no recognized extension (expected .yml, .yaml or .toml): {path}")]
	UnsupportedExtension { path: PathBuf },

	#[error("Failed to read config: {source_name}")]
	ConfigReadError {
		source_name: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config: {source_name}")]
	ConfigParseError {
		source_name: String,
		#[source]
		source: ParseFailure,
	},

	#[error("Invalid configuration in {source_name}: {reason}")]
	InvalidConfiguration { source_name: String, reason: String },
}

impl ConfigError {
	/// True for argument-level failures raised before any parsing is attempted.
	pub fn is_validation(&self) -> bool {
		matches!(
			self,
			ConfigError::ConfigNotFound { .. } | ConfigError::UnsupportedExtension { .. }
		)
	}
}

/// Syntax error reported by one of the document parsers.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),

	#[error(transparent)]
	Toml(#[from] toml::de::Error),
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
