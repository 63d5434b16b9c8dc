//! Placeholder bindings
//!
//! Maps a placeholder's label (the verbatim text between `{{` and `}}`) to the
//! value substituted for it. Bindings can be built in code, parsed from
//! `LABEL=VALUE` assignments, or loaded from a TOML file:
//!
//! ```toml
//! [metadata]
//! name = "node service"
//!
//! [values]
//! "版本" = "18-alpine"
//! "端口号，如：8080" = "3000"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading or parsing bindings
#[derive(Error, Debug)]
pub enum BindingsError {
    #[error("Failed to read bindings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse bindings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid assignment '{0}': expected LABEL=VALUE")]
    InvalidAssignment(String),
}

/// Label to value mapping used for a single render
///
/// Lookup is by exact label; insertion order never affects output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    /// Optional name for the binding set
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    values: HashMap<String, String>,
}

/// TOML structure for deserializing bindings
#[derive(Deserialize)]
struct TomlBindings {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    values: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Bindings {
    /// Create an empty binding set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load bindings from TOML file
    pub fn from_file(path: &Path) -> Result<Self, BindingsError> {
        debug!(path = %path.display(), "loading bindings file");
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load bindings from TOML string
    pub fn from_str(content: &str) -> Result<Self, BindingsError> {
        let parsed: TomlBindings = toml::from_str(content)?;

        Ok(Bindings {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            values: parsed.values,
        })
    }

    /// Parse a `LABEL=VALUE` assignment
    ///
    /// Splits at the first `=`, so values may contain `=` but labels may not.
    /// The label must be non-empty; the value may be empty.
    pub fn parse_assignment(assignment: &str) -> Result<(String, String), BindingsError> {
        match assignment.split_once('=') {
            Some((label, value)) if !label.is_empty() => {
                Ok((label.to_string(), value.to_string()))
            }
            _ => Err(BindingsError::InvalidAssignment(assignment.to_string())),
        }
    }

    /// Bind a label, replacing any previous value
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(label.into(), value.into())
    }

    /// Add a binding from a `LABEL=VALUE` assignment
    pub fn assign(&mut self, assignment: &str) -> Result<(), BindingsError> {
        let (label, value) = Self::parse_assignment(assignment)?;
        self.insert(label, value);
        Ok(())
    }

    /// Builder form of [`Bindings::insert`]
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(label, value);
        self
    }

    /// Value bound to a label
    ///
    /// Returns None if the label is not bound.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(|s| s.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound labels, in no particular order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    /// Overlay another binding set; its values win on conflict
    pub fn merge(&mut self, other: Bindings) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        self.values.extend(other.values);
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bindings = Bindings::new();
        for (label, value) in iter {
            bindings.insert(label, value);
        }
        bindings
    }
}

impl From<HashMap<String, String>> for Bindings {
    fn from(values: HashMap<String, String>) -> Self {
        Self {
            name: None,
            description: None,
            values,
        }
    }
}
