//! Format registry for augmented-tree serialization
//!
//! This module provides a pluggable registry of output formats. Each format implements
//! the `Formatter` trait and is registered with `FormatRegistry` under its name.

use crate::augment::Augmented;
use crate::ranges::RangeIndex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for augmented-tree formatters
///
/// `T` is the lexer's tag type and `M` the range metadata type.
pub trait Formatter<T, M>: Send + Sync {
    /// The name of this format (e.g., "json", "tag")
    fn name(&self) -> &str;

    /// Serialize an augmented tree, with the ranges it was augmented against
    fn serialize(&self, doc: &Augmented<T, M>, ranges: &RangeIndex<M>)
        -> Result<String, FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of formatters
pub struct FormatRegistry<T, M> {
    formatters: HashMap<String, Box<dyn Formatter<T, M>>>,
}

impl<T, M> FormatRegistry<T, M> {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter<T, M> + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter<T, M>> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize using the specified format
    pub fn serialize(
        &self,
        doc: &Augmented<T, M>,
        ranges: &RangeIndex<M>,
        format: &str,
    ) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(doc, ranges)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name and description of every format, sorted by name
    pub fn describe(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .formatters
            .values()
            .map(|f| (f.name(), f.description()))
            .collect();
        entries.sort();
        entries
    }
}

impl<T: Serialize + 'static, M: Serialize + 'static> FormatRegistry<T, M> {
    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Register built-in formatters
        registry.register(super::JsonFormatter::pretty());
        registry.register(super::TagFormatter);
        registry.register(super::TextFormatter);

        registry
    }
}

impl<T: Serialize + 'static, M: Serialize + 'static> Default for FormatRegistry<T, M> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
