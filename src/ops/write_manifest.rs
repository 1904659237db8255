//! Writing flix.toml from a package identity and its resolved dependencies.
//!
//! This is the inverse of metadata synthesis: each first-level dependency is
//! sorted back into the manifest field it would be read from.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use toml_edit::{value, Array, DocumentMut, Item, Table};

use crate::core::dependency::is_compiler_runtime;
use crate::core::manifest::{DEPENDENCIES_TABLE, MVN_DEPENDENCIES_TABLE};
use crate::core::{DependencyKind, ModuleVersionId};
use crate::ops::synthesize::GITHUB_KEY_PREFIX;
use crate::util::fs;

/// Identity of the package being written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// A first-level dependency and whether it resolved to a Flix package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedDependency {
    #[serde(flatten)]
    pub id: ModuleVersionId,
    #[serde(default)]
    pub foreign: bool,
}

impl ClassifiedDependency {
    pub fn new(id: ModuleVersionId, foreign: bool) -> Self {
        ClassifiedDependency { id, foreign }
    }

    /// Which manifest field this dependency is written to.
    ///
    /// Only Flix packages in the `io.github.` namespace can be expressed as a
    /// `github:` key; anything else falls through to the other rules.
    pub fn kind(&self) -> DependencyKind {
        let module = self.id.module();
        if self.foreign && module.github_owner().is_some() {
            DependencyKind::Foreign
        } else if is_compiler_runtime(&module) {
            DependencyKind::CompilerRuntime
        } else {
            DependencyKind::External
        }
    }
}

/// Render a manifest as TOML text.
pub fn render_manifest(identity: &PackageIdentity, deps: &[ClassifiedDependency]) -> String {
    let mut doc = DocumentMut::new();

    let mut package = Table::new();
    package.insert("name", value(identity.name.as_str()));
    package.insert("version", value(identity.version.as_str()));
    if let Some(ref description) = identity.description {
        package.insert("description", value(description.as_str()));
    }
    if let Some(ref license) = identity.license {
        package.insert("license", value(license.as_str()));
    }
    if !identity.authors.is_empty() {
        let authors: Array = identity.authors.iter().map(String::as_str).collect();
        package.insert("authors", value(authors));
    }

    let mut dependencies = Table::new();
    let mut mvn_dependencies = Table::new();

    for dep in deps {
        let id = &dep.id;
        let kind = dep.kind();
        tracing::debug!("writing {} as {} dependency", id, kind);
        match kind {
            DependencyKind::Foreign => {
                let owner = id.module().github_owner().unwrap_or_default().to_string();
                let key = format!("{}{}/{}", GITHUB_KEY_PREFIX, owner, id.name);
                dependencies.insert(&key, value(id.version.as_str()));
            }
            DependencyKind::CompilerRuntime => {
                package.insert("flix", value(id.version.as_str()));
            }
            DependencyKind::External => {
                let key = format!("{}:{}", id.group, id.name);
                mvn_dependencies.insert(&key, value(id.version.as_str()));
            }
        }
    }

    doc.insert("package", Item::Table(package));
    doc.insert(DEPENDENCIES_TABLE, Item::Table(dependencies));
    doc.insert(MVN_DEPENDENCIES_TABLE, Item::Table(mvn_dependencies));

    doc.to_string()
}

/// Write a manifest to `path`, replacing any existing file and creating
/// parent directories.
pub fn write_manifest(
    path: &Path,
    identity: &PackageIdentity,
    deps: &[ClassifiedDependency],
) -> Result<()> {
    let content = render_manifest(identity, deps);
    fs::write_string(path, &content)?;

    tracing::info!(
        "Wrote {} with {} dependencies to {}",
        identity.name,
        deps.len(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::FlixManifest;
    use tempfile::TempDir;

    fn identity() -> PackageIdentity {
        PackageIdentity {
            name: "widget".to_string(),
            version: "1.2.0".to_string(),
            description: Some("Widgets".to_string()),
            license: None,
            authors: vec!["Ada".to_string()],
        }
    }

    fn dep(group: &str, name: &str, version: &str, foreign: bool) -> ClassifiedDependency {
        ClassifiedDependency::new(ModuleVersionId::new(group, name, version), foreign)
    }

    #[test]
    fn test_classification() {
        assert_eq!(dep("io.github.acme", "gears", "1", true).kind(), DependencyKind::Foreign);
        assert_eq!(dep("io.github.acme", "gears", "1", false).kind(), DependencyKind::External);
        assert_eq!(dep("com.example", "lib", "1", true).kind(), DependencyKind::External);
        assert_eq!(dep("dev.flix", "flix", "0.40.0", false).kind(), DependencyKind::CompilerRuntime);
    }

    #[test]
    fn test_render_tables() {
        let deps = vec![
            dep("io.github.acme", "gears", "0.3.1", true),
            dep("com.example", "lib", "2.3", false),
            dep("dev.flix", "flix", "0.40.0", false),
        ];
        let text = render_manifest(&identity(), &deps);
        let manifest = FlixManifest::parse(&text).unwrap();

        let package = manifest.package.as_ref().unwrap();
        assert_eq!(package.name, "widget");
        assert_eq!(package.description.as_deref(), Some("Widgets"));
        assert_eq!(package.license, None);
        assert_eq!(package.authors, vec!["Ada"]);
        assert_eq!(manifest.compiler_version(), Some("0.40.0"));
        assert_eq!(manifest.dependencies["github:acme/gears"], "0.3.1");
        assert_eq!(manifest.mvn_dependencies["com.example:lib"], "2.3");
        assert_eq!(manifest.dependency_count(), 3);
    }

    #[test]
    fn test_render_without_optional_fields() {
        let identity = PackageIdentity {
            name: "bare".to_string(),
            version: "0.1.0".to_string(),
            ..Default::default()
        };
        let text = render_manifest(&identity, &[]);
        assert!(!text.contains("authors"));
        assert!(!text.contains("description"));
        assert!(text.contains("[dependencies]"));
        assert!(text.contains("[mvn-dependencies]"));
    }

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build").join("fpkg").join("flix.toml");

        write_manifest(&path, &identity(), &[dep("com.example", "old", "1", false)]).unwrap();
        write_manifest(&path, &identity(), &[dep("com.example", "new", "1", false)]).unwrap();

        let manifest = FlixManifest::load(&path).unwrap();
        assert!(manifest.mvn_dependencies.contains_key("com.example:new"));
        assert!(!manifest.mvn_dependencies.contains_key("com.example:old"));
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = write_manifest(&blocker.join("flix.toml"), &identity(), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classified_dependency_json() {
        let json = r#"{"group": "io.github.acme", "name": "gears", "version": "1.0", "foreign": true}"#;
        let parsed: ClassifiedDependency = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, dep("io.github.acme", "gears", "1.0", true));
    }
}
