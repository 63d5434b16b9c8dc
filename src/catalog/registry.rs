//! Catalog storage and lookup

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, info};

use super::types::{
    ArtifactKind, CommandDetail, Instruction, Scope, TemplateEntry, TomlSection,
};

/// Errors that can occur during catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Error reading a catalog file
    #[error("error reading catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid TOML or has the wrong shape
    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// No template with this id or name
    #[error("template not found: {key}")]
    TemplateNotFound { key: String },

    /// No guide entry with this name
    #[error("no guide entry for: {name}")]
    CommandNotFound { name: String },

    /// Template id already present in the section
    #[error("duplicate template id in {kind} catalog: {id}")]
    Duplicate { kind: ArtifactKind, id: String },
}

/// Builtin Dockerfile instructions, templates and guide entries
const DOCKERFILE_CATALOG: &str = include_str!("../../catalog/dockerfile.toml");

/// Builtin docker-compose directives, templates and guide entries
const COMPOSE_CATALOG: &str = include_str!("../../catalog/compose.toml");

/// Content for one artifact kind, kept in authored order
#[derive(Debug, Clone)]
pub struct Section {
    kind: ArtifactKind,
    instructions: Vec<Instruction>,
    templates: Vec<TemplateEntry>,
    commands: Vec<CommandDetail>,
}

impl Section {
    fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            instructions: Vec::new(),
            templates: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// All instructions in authored order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instructions belonging to one compose scope
    pub fn instructions_in(&self, scope: Scope) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(move |i| i.scope == Some(scope))
    }

    /// Find an instruction by name (ASCII case-insensitive)
    ///
    /// Names repeat across compose scopes, so pass the scope to pick one;
    /// with None the first entry in authored order wins.
    pub fn instruction(&self, name: &str, scope: Option<Scope>) -> Option<&Instruction> {
        self.instructions.iter().find(|i| {
            i.name.eq_ignore_ascii_case(name) && (scope.is_none() || i.scope == scope)
        })
    }

    pub fn templates(&self) -> &[TemplateEntry] {
        &self.templates
    }

    /// Find a template by id or display name
    pub fn template(&self, key: &str) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.matches(key))
    }

    /// All guide entries in authored order
    pub fn commands(&self) -> &[CommandDetail] {
        &self.commands
    }

    /// Find a guide entry by name (ASCII case-insensitive)
    pub fn command(&self, name: &str) -> Option<&CommandDetail> {
        self.commands
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn absorb(&mut self, parsed: TomlSection) {
        self.instructions.extend(parsed.instructions);
        self.templates.extend(parsed.templates);
        self.commands.extend(parsed.commands);
    }
}

/// Read-only reference content for both artifact kinds
#[derive(Debug, Clone)]
pub struct Catalog {
    dockerfile: Section,
    compose: Section,
}

impl Catalog {
    /// Create a catalog with no entries
    pub fn empty() -> Self {
        Self {
            dockerfile: Section::new(ArtifactKind::Dockerfile),
            compose: Section::new(ArtifactKind::Compose),
        }
    }

    /// Load a single-section catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        catalog.extend_from_file(path)?;
        Ok(catalog)
    }

    /// Load a single-section catalog from a TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        catalog.extend_from_str(content)?;
        Ok(catalog)
    }

    /// Append the entries of a TOML catalog file to its section
    ///
    /// Returns the kind named in the file's `[metadata]` table.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<ArtifactKind, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kind = self.extend_from_str(&content)?;
        info!(path = %path.display(), %kind, "extended catalog");
        Ok(kind)
    }

    /// Append the entries of a TOML catalog string to its section
    pub fn extend_from_str(&mut self, content: &str) -> Result<ArtifactKind, CatalogError> {
        let parsed: TomlSection = toml::from_str(content)?;
        let kind = parsed.metadata.kind;
        debug!(
            %kind,
            instructions = parsed.instructions.len(),
            templates = parsed.templates.len(),
            commands = parsed.commands.len(),
            "loading catalog section"
        );
        self.check_template_ids(&parsed)?;
        self.section_mut(kind).absorb(parsed);
        Ok(kind)
    }

    /// Template ids are unique across both sections, so an id alone selects one
    fn check_template_ids(&self, parsed: &TomlSection) -> Result<(), CatalogError> {
        for (index, template) in parsed.templates.iter().enumerate() {
            let existing = self
                .sections(None)
                .find(|s| s.templates.iter().any(|t| t.id == template.id))
                .map(Section::kind);
            let repeated = parsed.templates[..index].iter().any(|t| t.id == template.id);

            if let Some(kind) = existing.or(repeated.then_some(parsed.metadata.kind)) {
                return Err(CatalogError::Duplicate {
                    kind,
                    id: template.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn section(&self, kind: ArtifactKind) -> &Section {
        match kind {
            ArtifactKind::Dockerfile => &self.dockerfile,
            ArtifactKind::Compose => &self.compose,
        }
    }

    fn section_mut(&mut self, kind: ArtifactKind) -> &mut Section {
        match kind {
            ArtifactKind::Dockerfile => &mut self.dockerfile,
            ArtifactKind::Compose => &mut self.compose,
        }
    }

    /// Sections to search: one kind, or both in Dockerfile-then-compose order
    fn sections(&self, kind: Option<ArtifactKind>) -> impl Iterator<Item = &Section> {
        ArtifactKind::ALL
            .into_iter()
            .filter(move |k| kind.map_or(true, |wanted| wanted == *k))
            .map(move |k| self.section(k))
    }

    /// Every template with its kind
    pub fn templates(&self) -> impl Iterator<Item = (ArtifactKind, &TemplateEntry)> {
        self.sections(None)
            .flat_map(|s| s.templates.iter().map(move |t| (s.kind(), t)))
    }

    /// Find a template by id or display name
    pub fn find_template(
        &self,
        key: &str,
        kind: Option<ArtifactKind>,
    ) -> Result<(ArtifactKind, &TemplateEntry), CatalogError> {
        self.sections(kind)
            .find_map(|s| s.template(key).map(|t| (s.kind(), t)))
            .ok_or_else(|| CatalogError::TemplateNotFound {
                key: key.to_string(),
            })
    }

    /// Find a guide entry by name
    pub fn find_command(
        &self,
        name: &str,
        kind: Option<ArtifactKind>,
    ) -> Result<(ArtifactKind, &CommandDetail), CatalogError> {
        self.sections(kind)
            .find_map(|s| s.command(name).map(|c| (s.kind(), c)))
            .ok_or_else(|| CatalogError::CommandNotFound {
                name: name.to_string(),
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog
            .extend_from_str(DOCKERFILE_CATALOG)
            .expect("Builtin Dockerfile catalog should be valid TOML");
        catalog
            .extend_from_str(COMPOSE_CATALOG)
            .expect("Builtin compose catalog should be valid TOML");
        catalog
    }
}

/// The builtin catalog, loaded on first use and shared for the process
pub fn builtin() -> &'static Catalog {
    static BUILTIN: OnceLock<Catalog> = OnceLock::new();
    BUILTIN.get_or_init(Catalog::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTRA: &str = r#"
[metadata]
kind = "dockerfile"

[[instructions]]
name = "STOPSIGNAL"
description = "Signal sent to stop the container."
example = "STOPSIGNAL SIGTERM"

[[templates]]
id = "go-service"
name = "Go service"
description = "Static Go binary on distroless"
content = "FROM golang:{{go version}} AS builder"
"#;

    #[test]
    fn test_builtin_counts() {
        let catalog = Catalog::default();
        let dockerfile = catalog.section(ArtifactKind::Dockerfile);
        assert_eq!(dockerfile.instructions().len(), 15);
        assert_eq!(dockerfile.templates().len(), 4);
        assert_eq!(dockerfile.commands().len(), 15);

        let compose = catalog.section(ArtifactKind::Compose);
        assert_eq!(compose.instructions().len(), 19);
        assert_eq!(compose.templates().len(), 5);
        assert_eq!(compose.commands().len(), 17);
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(std::ptr::eq(builtin(), builtin()));
    }

    #[test]
    fn test_scoped_lookup_keeps_duplicates_apart() {
        let compose = builtin().section(ArtifactKind::Compose);
        let top = compose.instruction("volumes", Some(Scope::TopLevel)).unwrap();
        let service = compose.instruction("volumes", Some(Scope::Service)).unwrap();
        assert_ne!(top.description, service.description);
        assert_eq!(compose.instruction("volumes", None), Some(top));
    }

    #[test]
    fn test_scope_filter() {
        let compose = builtin().section(ArtifactKind::Compose);
        assert_eq!(compose.instructions_in(Scope::TopLevel).count(), 4);
        assert_eq!(compose.instructions_in(Scope::Service).count(), 15);
    }

    #[test]
    fn test_instruction_lookup_ignores_ascii_case() {
        let dockerfile = builtin().section(ArtifactKind::Dockerfile);
        assert_eq!(dockerfile.instruction("expose", None).unwrap().name, "EXPOSE");
        assert!(dockerfile.instruction("MAINTAINER", None).is_none());
    }

    #[test]
    fn test_find_template_by_id_and_name() {
        let catalog = builtin();
        let (kind, by_id) = catalog.find_template("java-maven", None).unwrap();
        assert_eq!(kind, ArtifactKind::Dockerfile);
        let (_, by_name) = catalog.find_template("Java 单体项目 (Maven)", None).unwrap();
        assert_eq!(by_id, by_name);

        let (kind, _) = catalog.find_template("vue-nginx", None).unwrap();
        assert_eq!(kind, ArtifactKind::Compose);
    }

    #[test]
    fn test_find_template_respects_kind() {
        let result = builtin().find_template("java-maven", Some(ArtifactKind::Compose));
        assert!(matches!(result, Err(CatalogError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_find_command() {
        let (kind, detail) = builtin().find_command("healthcheck", None).unwrap();
        assert_eq!(kind, ArtifactKind::Dockerfile);
        assert_eq!(detail.name, "HEALTHCHECK");

        let (kind, _) = builtin()
            .find_command("healthcheck", Some(ArtifactKind::Compose))
            .unwrap();
        assert_eq!(kind, ArtifactKind::Compose);

        assert!(matches!(
            builtin().find_command("nope", None),
            Err(CatalogError::CommandNotFound { .. })
        ));
    }

    #[test]
    fn test_extend_appends_to_section() {
        let mut catalog = Catalog::default();
        let kind = catalog.extend_from_str(EXTRA).expect("Should extend");
        assert_eq!(kind, ArtifactKind::Dockerfile);

        let dockerfile = catalog.section(ArtifactKind::Dockerfile);
        assert_eq!(dockerfile.instructions().len(), 16);
        assert_eq!(dockerfile.instructions().last().unwrap().name, "STOPSIGNAL");
        assert!(dockerfile.template("go-service").is_some());
    }

    #[test]
    fn test_extend_duplicate_template_error() {
        let mut catalog = Catalog::default();
        catalog.extend_from_str(EXTRA).expect("First extend should succeed");
        let result = catalog.extend_from_str(EXTRA);
        assert!(matches!(result, Err(CatalogError::Duplicate { .. })));
    }

    #[test]
    fn test_extend_duplicate_id_across_kinds() {
        let mut catalog = Catalog::default();
        let result = catalog.extend_from_str(
            r#"
[metadata]
kind = "compose"

[[templates]]
id = "java-maven"
name = "Java on compose"
description = "Clashes with the Dockerfile template id"
content = "services: {}"
"#,
        );
        match result {
            Err(CatalogError::Duplicate { kind, id }) => {
                assert_eq!(kind, ArtifactKind::Dockerfile);
                assert_eq!(id, "java-maven");
            }
            other => panic!("Expected duplicate error, got {:?}", other),
        }
        assert_eq!(catalog.section(ArtifactKind::Compose).templates().len(), 5);
    }

    #[test]
    fn test_extend_duplicate_id_within_file() {
        let mut catalog = Catalog::empty();
        let result = catalog.extend_from_str(
            r#"
[metadata]
kind = "dockerfile"

[[templates]]
id = "twice"
name = "One"
description = ""
content = ""

[[templates]]
id = "twice"
name = "Two"
description = ""
content = ""
"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::Duplicate { kind: ArtifactKind::Dockerfile, .. })
        ));
        assert!(catalog.section(ArtifactKind::Dockerfile).templates().is_empty());
    }

    #[test]
    fn test_extend_rejects_unknown_kind() {
        let result = Catalog::from_str("[metadata]\nkind = \"helm\"\n");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = Catalog::from_file(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
