use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single value in a configuration document.
///
/// Documents are normalized into this closed set of kinds at load time, so
/// every lookup can match exhaustively instead of probing an open type.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
	String(String),
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Sequence(Vec<ConfigValue>),
	Mapping(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
	/// Short name of the value kind, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			ConfigValue::String(_) => "string",
			ConfigValue::Integer(_) => "integer",
			ConfigValue::Float(_) => "float",
			ConfigValue::Boolean(_) => "boolean",
			ConfigValue::Sequence(_) => "sequence",
			ConfigValue::Mapping(_) => "mapping",
		}
	}

	pub fn as_mapping(&self) -> Option<&BTreeMap<String, ConfigValue>> {
		match self {
			ConfigValue::Mapping(map) => Some(map),
			_ => None,
		}
	}
}

/// Floats compare by bit pattern, so a NaN equals itself.
impl PartialEq for ConfigValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(ConfigValue::String(a), ConfigValue::String(b)) => a == b,
			(ConfigValue::Integer(a), ConfigValue::Integer(b)) => a == b,
			(ConfigValue::Float(a), ConfigValue::Float(b)) => a.to_bits() == b.to_bits(),
			(ConfigValue::Boolean(a), ConfigValue::Boolean(b)) => a == b,
			(ConfigValue::Sequence(a), ConfigValue::Sequence(b)) => a == b,
			(ConfigValue::Mapping(a), ConfigValue::Mapping(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for ConfigValue {}

impl fmt::Display for ConfigValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigValue::String(s) => write!(f, "{s}"),
			ConfigValue::Integer(i) => write!(f, "{i}"),
			ConfigValue::Float(x) => write!(f, "{x}"),
			ConfigValue::Boolean(b) => write!(f, "{b}"),
			ConfigValue::Sequence(items) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{item}")?;
				}
				write!(f, "]")
			}
			ConfigValue::Mapping(map) => fmt_mapping(map, f),
		}
	}
}

/// Render a mapping as `{key=value, ...}`.
pub(crate) fn fmt_mapping(
	map: &BTreeMap<String, ConfigValue>,
	f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
	write!(f, "{{")?;
	for (i, (key, value)) in map.iter().enumerate() {
		if i > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{key}={value}")?;
	}
	write!(f, "}}")
}

/// Conversion from a stored value into the type a caller asked for.
///
/// Returning `None` means the value cannot be read as `Self`; lookups then
/// fall back to the caller's default.
pub trait FromConfigValue: Sized {
	/// Rust name of the target type, used in diagnostics.
	const EXPECTED: &'static str;

	fn from_config_value(value: &ConfigValue) -> Option<Self>;
}

impl FromConfigValue for ConfigValue {
	const EXPECTED: &'static str = "ConfigValue";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		Some(value.clone())
	}
}

impl FromConfigValue for String {
	const EXPECTED: &'static str = "String";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		match value {
			ConfigValue::String(s) => Some(s.clone()),
			ConfigValue::Integer(_)
			| ConfigValue::Float(_)
			| ConfigValue::Boolean(_)
			| ConfigValue::Sequence(_)
			| ConfigValue::Mapping(_) => None,
		}
	}
}

impl FromConfigValue for bool {
	const EXPECTED: &'static str = "bool";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		match value {
			ConfigValue::Boolean(b) => Some(*b),
			ConfigValue::String(s) => {
				let s = s.trim();
				if s.eq_ignore_ascii_case("true") {
					Some(true)
				} else if s.eq_ignore_ascii_case("false") {
					Some(false)
				} else {
					None
				}
			}
			ConfigValue::Integer(_)
			| ConfigValue::Float(_)
			| ConfigValue::Sequence(_)
			| ConfigValue::Mapping(_) => None,
		}
	}
}

impl FromConfigValue for i64 {
	const EXPECTED: &'static str = "i64";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		match value {
			ConfigValue::Integer(i) => Some(*i),
			ConfigValue::Float(x) => float_to_i64(*x),
			ConfigValue::String(s) => s.trim().parse().ok(),
			ConfigValue::Boolean(_) | ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => None,
		}
	}
}

/// Narrow a float to an integer only when no information is lost.
fn float_to_i64(x: f64) -> Option<i64> {
	// i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
	if x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
		Some(x as i64)
	} else {
		None
	}
}

macro_rules! integer_from_config_value {
	($($ty:ty),*) => {
		$(
			impl FromConfigValue for $ty {
				const EXPECTED: &'static str = stringify!($ty);

				fn from_config_value(value: &ConfigValue) -> Option<Self> {
					i64::from_config_value(value).and_then(|i| <$ty>::try_from(i).ok())
				}
			}
		)*
	};
}

integer_from_config_value!(i32, u32, u64, usize);

impl FromConfigValue for f64 {
	const EXPECTED: &'static str = "f64";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		match value {
			ConfigValue::Float(x) => Some(*x),
			ConfigValue::Integer(i) => Some(*i as f64),
			ConfigValue::String(s) => s.trim().parse().ok(),
			ConfigValue::Boolean(_) | ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => None,
		}
	}
}

impl FromConfigValue for f32 {
	const EXPECTED: &'static str = "f32";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		f64::from_config_value(value).and_then(|x| {
			let narrowed = x as f32;
			// Out-of-range values would saturate to infinity.
			(narrowed.is_finite() || !x.is_finite()).then_some(narrowed)
		})
	}
}

impl<T: FromConfigValue> FromConfigValue for Vec<T> {
	const EXPECTED: &'static str = "Vec";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		match value {
			ConfigValue::Sequence(items) => items.iter().map(T::from_config_value).collect(),
			ConfigValue::String(_)
			| ConfigValue::Integer(_)
			| ConfigValue::Float(_)
			| ConfigValue::Boolean(_)
			| ConfigValue::Mapping(_) => None,
		}
	}
}

impl FromConfigValue for BTreeMap<String, ConfigValue> {
	const EXPECTED: &'static str = "BTreeMap";

	fn from_config_value(value: &ConfigValue) -> Option<Self> {
		value.as_mapping().cloned()
	}
}
