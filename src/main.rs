use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use lintcfg::config::{ConfigTree, load_path};
use lintcfg::filter::Excludes;

#[derive(Parser)]
#[command(name = "lintcfg")]
#[command(
	author,
	version,
	about = "Resolve scoped rule configuration and path exclusions for static analysis"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print a configuration file, or one section of it, as YAML
	Show {
		/// Configuration file (.yml, .yaml or .toml)
		file: PathBuf,

		/// Section to scope into; repeat to descend further
		#[arg(short, long = "section", value_name = "SECTION")]
		sections: Vec<String>,
	},
	/// Resolve a single value, falling back to a default
	Get {
		/// Configuration file (.yml, .yaml or .toml)
		file: PathBuf,

		/// Key to resolve inside the selected section
		key: String,

		/// Section to scope into; repeat to descend further
		#[arg(short, long = "section", value_name = "SECTION")]
		sections: Vec<String>,

		/// Value printed when the key is missing or has the wrong type
		#[arg(long)]
		default: Option<String>,

		/// Type the value must have; without it the raw value is printed
		#[arg(long, value_enum)]
		kind: Option<ValueKind>,
	},
	/// Print the paths that are not excluded
	Filter {
		/// Paths to check; read from stdin (one per line) when omitted
		paths: Vec<String>,

		/// Comma-separated exclusion fragments
		#[arg(
			long,
			value_name = "PATTERNS",
			conflicts_with = "config",
			required_unless_present = "config"
		)]
		excludes: Option<String>,

		/// Read the exclusion fragments from a configuration file
		#[arg(long, value_name = "FILE", requires = "key")]
		config: Option<PathBuf>,

		/// Section to scope into; repeat to descend further
		#[arg(short, long = "section", value_name = "SECTION", requires = "config")]
		sections: Vec<String>,

		/// Key holding the exclusion string
		#[arg(long, requires = "config")]
		key: Option<String>,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
	String,
	Integer,
	Float,
	Boolean,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	Registry::default()
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Show { file, sections } => handle_show(&file, &sections),
		Commands::Get {
			file,
			key,
			sections,
			default,
			kind,
		} => handle_get(&file, &key, &sections, default, kind),
		Commands::Filter {
			paths,
			excludes,
			config,
			sections,
			key,
		} => {
			let excludes = match (excludes, config, key) {
				(Some(raw), _, _) => Excludes::new(&raw),
				(None, Some(file), Some(key)) => {
					Excludes::from_config(&load_section(&file, &sections)?, &key)
				}
				_ => anyhow::bail!("Either --excludes or --config with --key is required"),
			};
			handle_filter(&excludes, paths)
		}
	}
}

fn load_section(file: &Path, sections: &[String]) -> Result<ConfigTree> {
	let root = load_path(file).with_context(|| format!("Failed to load {}", file.display()))?;
	let path: Vec<&str> = sections.iter().map(String::as_str).collect();
	Ok(root.at_path(&path))
}

fn handle_show(file: &Path, sections: &[String]) -> Result<ExitCode> {
	let tree = load_section(file, sections)?;
	let rendered = serde_yaml::to_string(&tree).context("Failed to render configuration")?;
	print!("{rendered}");
	Ok(ExitCode::SUCCESS)
}

fn handle_get(
	file: &Path,
	key: &str,
	sections: &[String],
	default: Option<String>,
	kind: Option<ValueKind>,
) -> Result<ExitCode> {
	let tree = load_section(file, sections)?;

	let Some(kind) = kind else {
		match (tree.get(key), default) {
			(Some(value), _) => println!("{value}"),
			(None, Some(default)) => println!("{default}"),
			(None, None) => anyhow::bail!("Key not found: {key}"),
		}
		return Ok(ExitCode::SUCCESS);
	};

	match kind {
		ValueKind::String => {
			println!("{}", tree.value_or_default(key, default.unwrap_or_default()));
		}
		ValueKind::Integer => {
			let default: i64 = parse_default(default, "integer")?;
			println!("{}", tree.value_or_default(key, default));
		}
		ValueKind::Float => {
			let default: f64 = parse_default(default, "float")?;
			println!("{}", tree.value_or_default(key, default));
		}
		ValueKind::Boolean => {
			let default: bool = parse_default(default, "boolean")?;
			println!("{}", tree.value_or_default(key, default));
		}
	}

	Ok(ExitCode::SUCCESS)
}

/// Parse the `--default` argument, using the type's zero value when omitted.
fn parse_default<T>(default: Option<String>, kind: &str) -> Result<T>
where
	T: std::str::FromStr + Default,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	match default {
		Some(raw) => raw
			.trim()
			.parse()
			.with_context(|| format!("Invalid {kind} default: {raw}")),
		None => Ok(T::default()),
	}
}

fn handle_filter(excludes: &Excludes, paths: Vec<String>) -> Result<ExitCode> {
	tracing::debug!(patterns = %excludes, "filtering paths");

	let paths = if paths.is_empty() {
		std::io::stdin()
			.lock()
			.lines()
			.collect::<std::io::Result<Vec<_>>>()
			.context("Failed to read paths from stdin")?
	} else {
		paths
	};

	for path in paths.iter().filter(|path| excludes.none(path)) {
		println!("{path}");
	}

	Ok(ExitCode::SUCCESS)
}
