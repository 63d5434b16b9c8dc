//! Docker reference catalog
//!
//! Static, authored content for both artifact kinds: instruction descriptors
//! (the fields of the generator forms), starter templates, and long-form guide
//! entries. The builtin content is embedded as TOML and deserialized once per
//! process; user catalog files with the same layout can extend it.
//!
//! Instruction names are not unique across compose scopes (`volumes` and
//! `networks` are both top-level and service-level directives), so sections
//! keep entries as ordered lists and lookups take an optional [`Scope`].
//!
//! # Example
//!
//! ```rust
//! use dockhand::catalog::{builtin, ArtifactKind, Scope};
//!
//! let compose = builtin().section(ArtifactKind::Compose);
//! let volumes = compose.instruction("volumes", Some(Scope::Service)).unwrap();
//! assert_eq!(volumes.scope, Some(Scope::Service));
//! ```

mod registry;
mod types;

pub use registry::{builtin, Catalog, CatalogError, Section};
pub use types::{
    ArtifactKind, CommandDetail, Example, InputType, Instruction, Scope, TemplateEntry,
};
