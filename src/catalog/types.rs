//! Catalog entry types

use std::fmt;

use serde::Deserialize;

use crate::parser::{parse, Document};

/// The two artifact families the catalog covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Dockerfile,
    Compose,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Dockerfile, ArtifactKind::Compose];

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Dockerfile => "dockerfile",
            ArtifactKind::Compose => "compose",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a compose directive may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Top level of the compose file (`services`, `volumes`, ...)
    TopLevel,
    /// Inside a service definition (`image`, `ports`, ...)
    Service,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::TopLevel => write!(f, "top-level"),
            Scope::Service => write!(f, "service"),
        }
    }
}

/// Kind of form input an instruction takes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Single-line value
    #[default]
    Text,
    /// Multi-line value
    Textarea,
    /// One of a fixed list of options
    Select,
}

/// Descriptor for one Dockerfile instruction or compose directive
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instruction {
    pub name: String,
    /// Compose scope; None for Dockerfile instructions
    #[serde(default, rename = "category")]
    pub scope: Option<Scope>,
    pub description: String,
    pub example: String,
    #[serde(default)]
    pub input_type: InputType,
    /// Allowed values for select inputs
    #[serde(default)]
    pub options: Vec<String>,
    /// Example values shown next to the input
    #[serde(default)]
    pub hint: Option<String>,
}

/// A worked example in a guide entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Example {
    pub code: String,
    pub explanation: String,
}

/// Long-form guide entry for an instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandDetail {
    pub name: String,
    pub syntax: String,
    pub description: String,
    pub usage: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub best_practices: Vec<String>,
}

/// A named starter template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateEntry {
    /// ASCII slug for command-line selection
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Template text with `{{label}}` placeholders
    pub content: String,
}

impl TemplateEntry {
    /// Parse the template content
    pub fn document(&self) -> Document<'_> {
        parse(&self.content)
    }

    /// Check whether a key selects this template (id or display name)
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name == key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SectionMetadata {
    pub kind: ArtifactKind,
}

/// TOML layout of a catalog file
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TomlSection {
    pub metadata: SectionMetadata,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,
    #[serde(default)]
    pub commands: Vec<CommandDetail>,
}
