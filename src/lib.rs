//! Dockhand - Docker instruction reference and starter-template renderer
//!
//! This library carries a catalog of Dockerfile instructions, docker-compose
//! directives and starter templates, and renders templates by substituting
//! `{{label}}` placeholders with user-supplied values.
//!
//! # Example
//!
//! ```rust
//! use dockhand::{render, Bindings};
//!
//! let bindings = Bindings::new()
//!     .with("版本", "18-alpine")
//!     .with("端口号，如：8080", "3000");
//!
//! let out = render("FROM node:{{版本}}\nEXPOSE {{端口号，如：8080}}", &bindings);
//! assert_eq!(out, "FROM node:18-alpine\nEXPOSE 3000");
//! ```

pub mod bindings;
pub mod catalog;
pub mod form;
pub mod lint;
pub mod parser;
pub mod renderer;

pub use bindings::{Bindings, BindingsError};
pub use catalog::{ArtifactKind, Catalog, CatalogError};
pub use form::{Form, FormError};
pub use lint::{LintCategory, LintWarning};
pub use parser::{parse, Document};
pub use renderer::{render_text, MissingPolicy, TextConfig};

use thiserror::Error;
use tracing::debug;

/// Errors that can occur around the render pipeline
///
/// Rendering itself is total; these come from loading inputs.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error looking up or loading catalog content
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error loading bindings
    #[error("bindings error: {0}")]
    Bindings(#[from] BindingsError),

    /// Error filling a Dockerfile form
    #[error("form error: {0}")]
    Form(#[from] FormError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Text output configuration
    pub text: TextConfig,
    /// Lint mode: collect warnings about unfinished placeholders
    pub check: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text configuration
    pub fn with_text(mut self, config: TextConfig) -> Self {
        self.text = config;
        self
    }

    /// Set the policy for unbound placeholders
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.text.missing = missing;
        self
    }

    /// Enable or disable lint checking
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
}

/// Render a template with default configuration
///
/// This is the main entry point for the library. Bound placeholders are
/// replaced verbatim; unbound ones stay in the output so the gap is visible.
/// Never fails.
///
/// # Example
///
/// ```rust
/// use dockhand::{render, Bindings};
///
/// let out = render("A{{x}}B", &Bindings::new().with("x", "<script>"));
/// assert_eq!(out, "A<script>B");
///
/// let out = render("EXPOSE {{port}}", &Bindings::new());
/// assert_eq!(out, "EXPOSE {{port}}");
/// ```
pub fn render(template: &str, bindings: &Bindings) -> String {
    render_with_config(template, bindings, &RenderConfig::default())
}

/// Render a template with custom configuration
///
/// # Example
///
/// ```rust
/// use dockhand::{render_with_config, Bindings, MissingPolicy, RenderConfig};
///
/// let config = RenderConfig::new().with_missing(MissingPolicy::Blank);
/// let out = render_with_config("node:{{tag}}", &Bindings::new(), &config);
/// assert_eq!(out, "node:");
/// ```
pub fn render_with_config(template: &str, bindings: &Bindings, config: &RenderConfig) -> String {
    let doc = parse(template);
    render_text(&doc, bindings, &config.text)
}

/// Render a template and collect lint warnings
///
/// Returns the output and any warnings. When `config.check` is false no
/// checks run and the warning list is empty.
pub fn render_with_check(
    template: &str,
    bindings: &Bindings,
    config: &RenderConfig,
) -> (String, Vec<LintWarning>) {
    let doc = parse(template);
    let out = render_text(&doc, bindings, &config.text);

    let warnings = if config.check {
        lint::check(&doc, bindings)
    } else {
        Vec::new()
    };
    debug!(warnings = warnings.len(), "checked template");

    (out, warnings)
}

/// Render a catalog template selected by id or display name
///
/// # Example
///
/// ```rust
/// use dockhand::{catalog, render_catalog_template, Bindings, RenderConfig};
///
/// let bindings = Bindings::new().with("应用容器名", "shop-app");
/// let out = render_catalog_template(
///     catalog::builtin(),
///     "java-mysql",
///     None,
///     &bindings,
///     &RenderConfig::default(),
/// )
/// .unwrap();
/// assert!(out.contains("container_name: shop-app"));
/// ```
pub fn render_catalog_template(
    catalog: &Catalog,
    key: &str,
    kind: Option<ArtifactKind>,
    bindings: &Bindings,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let (kind, entry) = catalog.find_template(key, kind)?;
    debug!(%kind, id = %entry.id, "rendering catalog template");
    Ok(render_with_config(&entry.content, bindings, config))
}
