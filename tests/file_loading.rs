//! Integration tests for loading bindings and catalog files

use std::fs;

use dockhand::catalog::{ArtifactKind, Catalog, CatalogError};
use dockhand::{render, Bindings, BindingsError};
use tempfile::TempDir;

const BINDINGS: &str = r#"
[metadata]
name = "node service"
description = "Values for the node starter"

[values]
"版本" = "18-alpine"
"端口号，如：8080" = "3000"
"#;

const CATALOG: &str = r#"
[metadata]
kind = "compose"

[[instructions]]
name = "profiles"
category = "service"
description = "Services started only for the listed profiles."
example = "profiles: [debug]"

[[templates]]
id = "redis-only"
name = "Redis"
description = "Single Redis cache"
content = '''
services:
  cache:
    image: redis:{{Redis版本}}'''
"#;

#[test]
fn test_bindings_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("node.toml");
    fs::write(&path, BINDINGS).unwrap();

    let bindings = Bindings::from_file(&path).expect("Should load bindings");
    assert_eq!(bindings.name.as_deref(), Some("node service"));
    assert_eq!(bindings.len(), 2);
    assert_eq!(
        render("FROM node:{{版本}}\nEXPOSE {{端口号，如：8080}}", &bindings),
        "FROM node:18-alpine\nEXPOSE 3000"
    );
}

#[test]
fn test_bindings_file_missing() {
    let dir = TempDir::new().unwrap();
    let result = Bindings::from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(BindingsError::IoError(_))));
}

#[test]
fn test_bindings_file_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[values]\nport = 8080\n").unwrap();

    let result = Bindings::from_file(&path);
    assert!(matches!(result, Err(BindingsError::ParseError(_))));
}

#[test]
fn test_catalog_extension_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.toml");
    fs::write(&path, CATALOG).unwrap();

    let mut catalog = Catalog::default();
    let kind = catalog.extend_from_file(&path).expect("Should extend catalog");
    assert_eq!(kind, ArtifactKind::Compose);

    let (_, template) = catalog.find_template("redis-only", None).unwrap();
    assert!(template.content.starts_with("services:"));
    assert_eq!(template.document().labels(), vec!["Redis版本"]);

    let compose = catalog.section(ArtifactKind::Compose);
    assert_eq!(compose.instructions().len(), 20);
    assert!(compose.instruction("profiles", None).is_some());
}

#[test]
fn test_catalog_file_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.toml");
    fs::write(&path, CATALOG).unwrap();

    let catalog = Catalog::from_file(&path).unwrap();
    assert!(catalog.section(ArtifactKind::Dockerfile).templates().is_empty());
    assert_eq!(catalog.templates().count(), 1);
}

#[test]
fn test_catalog_file_duplicate_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dup.toml");
    fs::write(
        &path,
        "[metadata]\nkind = \"compose\"\n\n[[templates]]\nid = \"fullstack\"\nname = \"x\"\ndescription = \"x\"\ncontent = \"x\"\n",
    )
    .unwrap();

    let mut catalog = Catalog::default();
    let result = catalog.extend_from_file(&path);
    assert!(matches!(result, Err(CatalogError::Duplicate { .. })));
}
