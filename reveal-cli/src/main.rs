//! Command-line interface for reveal
//! This binary augments a lexer's token tree so the characters of tracked ranges can be
//! animated one by one.
//!
//! Usage:
//!   reveal `<tokens.json>` [--ranges `<manifest.toml>`] [--format `<format>`]   - Augment a token tree
//!   reveal --list-formats                                                  - List all output formats
//!
//! Without `--ranges`, a `reveal.toml` in the working directory is used when present.

mod logger;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, LevelFilter};
use reveal_config::{ConfigError, Loader, ManifestError, RangeMeta, RevealConfig};
use reveal_core::formats::{FormatError, FormatRegistry, JsonFormatter};
use reveal_core::json::{parse_token_tree, TreeError};
use reveal_core::{augment_from, flatten};
use serde_json::Value;
use std::fmt;
use std::fs;

const DEFAULT_MANIFEST: &str = "reveal.toml";

/// Errors that end a `reveal` run
#[derive(Debug)]
enum CliError {
    Read { path: String, source: std::io::Error },
    Config(ConfigError),
    Tree { path: String, source: TreeError },
    Manifest(ManifestError),
    Format(FormatError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Read { path, source } => write!(f, "cannot read {}: {}", path, source),
            CliError::Config(err) => write!(f, "invalid configuration: {}", err),
            CliError::Tree { path, source } => write!(f, "{}: {}", path, source),
            CliError::Manifest(err) => write!(f, "invalid ranges: {}", err),
            CliError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CliError {}

fn build_cli() -> Command {
    Command::new("reveal")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split tracked ranges of a token tree into per-character leaves")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the token tree JSON produced by the lexer")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("ranges")
                .long("ranges")
                .short('r')
                .help("TOML manifest listing the ranges to track"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default: output.format from the configuration)"),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .help("Offset of the first character, for snippets continuing a previous one")
                .value_parser(value_parser!(i64).range(0..)),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Write JSON on a single line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Logging verbosity")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .default_value("warn"),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if let Err(e) = logger::init(level) {
        eprintln!("Cannot install logger: {}", e);
    }

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match handle_reveal_command(&matches) {
        Ok(output) => {
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let CliError::Format(FormatError::FormatNotFound(_)) = &e {
                let registry = FormatRegistry::<Value, RangeMeta>::with_defaults();
                eprintln!("\nAvailable formats:");
                for (name, description) in registry.describe() {
                    eprintln!("  {} - {}", name, description);
                }
            }
            std::process::exit(1);
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<RevealConfig, ConfigError> {
    let mut loader = match matches.get_one::<String>("ranges") {
        Some(manifest) => Loader::new().with_file(manifest),
        None => Loader::new().with_optional_file(DEFAULT_MANIFEST),
    };
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if let Some(start) = matches.get_one::<i64>("start") {
        loader = loader.set_override("augment.start", *start)?;
    }
    if matches.get_flag("compact") {
        loader = loader.set_override("output.pretty", false)?;
    }
    loader.build()
}

/// Handle the default command: read, augment, serialize
fn handle_reveal_command(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches).map_err(CliError::Config)?;

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_default();
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    let tree = parse_token_tree::<Value>(&source).map_err(|source| CliError::Tree {
        path: path.to_string(),
        source,
    })?;

    let snippet = flatten(&tree);
    debug!("{}: {} characters", path, snippet.chars().count());
    let ranges = config.range_index(&snippet).map_err(CliError::Manifest)?;

    let doc = augment_from(tree, &ranges, config.augment.start);

    let mut registry = FormatRegistry::<Value, RangeMeta>::with_defaults();
    if !config.output.pretty {
        registry.register(JsonFormatter::compact());
    }
    registry
        .serialize(&doc, &ranges, &config.output.format)
        .map_err(CliError::Format)
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::<Value, RangeMeta>::with_defaults();
    println!("Available formats:\n");

    for (name, description) in registry.describe() {
        println!("  {}", name);
        println!("    {}", description);
        println!();
    }
}
