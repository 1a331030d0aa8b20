//! Shared configuration loader for reveal.
//!
//! `defaults/reveal.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. A snippet's range manifest is layered on top of those
//! defaults via [`Loader`] before deserializing into [`RevealConfig`]; the manifest's
//! `[[ranges]]` entries then become a [`RangeIndex`] over the snippet text.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use log::debug;
use reveal_core::{RangeError, RangeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/reveal.default.toml");

/// Top-level configuration consumed by reveal applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    pub output: OutputConfig,
    pub augment: AugmentConfig,
    pub ranges: Vec<RangeConfig>,
}

/// How results are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AugmentConfig {
    pub start: usize,
}

/// One `[[ranges]]` entry of a manifest.
///
/// Exactly one of `match`, `alternatives` or `start`/`end` must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeConfig {
    #[serde(rename = "match")]
    pub literal: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    pub start: Option<usize>,
    pub end: Option<usize>,
    #[serde(default)]
    pub immediate: bool,
}

/// Per-range metadata handed to the renderer.
///
/// `immediate` ranges animate as soon as they are reached instead of waiting for the
/// previous range to finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeMeta {
    pub immediate: bool,
}

/// Errors raised while turning a manifest into a range index
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// An entry that does not say which kind of range it is.
    InvalidEntry { index: usize, reason: String },
    /// The entry is well-formed but cannot be located in the snippet.
    Range(RangeError),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::InvalidEntry { index, reason } => {
                write!(f, "ranges[{}]: {}", index, reason)
            }
            ManifestError::Range(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Range(err) => Some(err),
            ManifestError::InvalidEntry { .. } => None,
        }
    }
}

enum RangeKind<'a> {
    Literal(&'a str),
    Alternatives(&'a [String]),
    Bounds(usize, usize),
}

impl RangeConfig {
    fn kind(&self) -> Result<RangeKind<'_>, String> {
        let bounds = match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => return Err("`start` and `end` must be given together".to_string()),
        };
        match (&self.literal, self.alternatives.as_slice(), bounds) {
            (Some(literal), [], None) => Ok(RangeKind::Literal(literal)),
            (None, [_, ..], None) => Ok(RangeKind::Alternatives(&self.alternatives)),
            (None, [], Some((start, end))) => Ok(RangeKind::Bounds(start, end)),
            (None, [], None) => {
                Err("expected one of `match`, `alternatives` or `start`/`end`".to_string())
            }
            _ => Err("`match`, `alternatives` and `start`/`end` are exclusive".to_string()),
        }
    }

    pub fn meta(&self) -> RangeMeta {
        RangeMeta {
            immediate: self.immediate,
        }
    }
}

impl RevealConfig {
    /// Builds the range index for `snippet` from the manifest's entries, in order.
    pub fn range_index(&self, snippet: &str) -> Result<RangeIndex<RangeMeta>, ManifestError> {
        let mut builder = RangeIndex::builder(snippet);
        for (index, entry) in self.ranges.iter().enumerate() {
            let meta = entry.meta();
            let kind = entry
                .kind()
                .map_err(|reason| ManifestError::InvalidEntry { index, reason })?;
            builder = match kind {
                RangeKind::Literal(literal) => builder.literal_with(literal, meta),
                RangeKind::Alternatives(alternatives) => {
                    builder.alternatives(alternatives.iter().map(|literal| (literal, meta)))
                }
                RangeKind::Bounds(start, end) => builder.bounds(start, end, meta),
            };
        }
        let index = builder.build().map_err(ManifestError::Range)?;
        debug!("manifest resolved to {} ranges", index.len());
        Ok(index)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a manifest file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional manifest file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a manifest given as TOML text.
    pub fn with_str(mut self, toml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RevealConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RevealConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"
[[ranges]]
match = " md:p-0"

[[ranges]]
match = " md:p-8"
immediate = true

[[ranges]]
alternatives = ["md:w-48", "md:w-56"]

[[ranges]]
start = 0
end = 2
"#;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.output.format, "json");
        assert!(config.output.pretty);
        assert_eq!(config.augment.start, 0);
        assert!(config.ranges.is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "tag")
            .expect("override to apply")
            .set_override("augment.start", 12i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "tag");
        assert_eq!(config.augment.start, 12);
    }

    #[test]
    fn layers_manifest_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MANIFEST.as_bytes()).expect("write manifest");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");

        assert_eq!(config.ranges.len(), 4);
        assert_eq!(config.ranges[0].literal.as_deref(), Some(" md:p-0"));
        assert!(config.ranges[1].immediate);
        assert_eq!(config.ranges[2].alternatives, vec!["md:w-48", "md:w-56"]);
        assert_eq!((config.ranges[3].start, config.ranges[3].end), (Some(0), Some(2)));
        assert_eq!(config.output.format, "json");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/reveal.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/reveal.toml")
            .build()
            .expect("config to build");
        assert!(config.ranges.is_empty());
    }

    #[test]
    fn builds_range_index_in_manifest_order() {
        let config = Loader::new().with_str(MANIFEST).build().unwrap();
        let index = config
            .range_index(" md:p-0 md:p-8 md:w-48 md:w-56")
            .expect("all literals present");

        assert_eq!(index.len(), 4);
        let hit = index.classify(8).unwrap();
        assert_eq!((hit.range, hit.offset), (1, 1));
        assert!(hit.meta.immediate);

        // Explicit bounds come last, so offsets 0 and 1 still belong to range 0.
        assert_eq!(index.classify(1).unwrap().range, 0);

        let hit = index.classify(16).unwrap();
        assert_eq!((hit.range, hit.offset), (2, 1));
        assert!(!hit.meta.immediate);
    }

    #[test]
    fn unmatched_literal_names_entry() {
        let config = Loader::new().with_str(MANIFEST).build().unwrap();
        let err = config.range_index("md:p-0 md:p-8").unwrap_err();
        assert_eq!(
            err.to_string(),
            "range 0: literal \" md:p-0\" does not occur in the snippet"
        );
    }

    #[test]
    fn rejects_ambiguous_entries() {
        let config = Loader::new()
            .with_str(
                r#"
[[ranges]]
match = "a"
start = 0
end = 1
"#,
            )
            .build()
            .unwrap();
        assert_eq!(
            config.range_index("abc"),
            Err(ManifestError::InvalidEntry {
                index: 0,
                reason: "`match`, `alternatives` and `start`/`end` are exclusive".to_string(),
            })
        );
    }

    #[test]
    fn rejects_half_bounds_and_empty_entries() {
        let half = RevealConfig {
            output: OutputConfig {
                format: "json".to_string(),
                pretty: true,
            },
            augment: AugmentConfig { start: 0 },
            ranges: vec![
                RangeConfig {
                    literal: Some("a".to_string()),
                    ..RangeConfig::default()
                },
                RangeConfig {
                    start: Some(1),
                    ..RangeConfig::default()
                },
            ],
        };
        assert_eq!(
            half.range_index("abc").unwrap_err().to_string(),
            "ranges[1]: `start` and `end` must be given together"
        );

        let empty = RevealConfig {
            ranges: vec![RangeConfig::default()],
            ..half
        };
        assert_eq!(
            empty.range_index("abc").unwrap_err().to_string(),
            "ranges[0]: expected one of `match`, `alternatives` or `start`/`end`"
        );
    }
}
