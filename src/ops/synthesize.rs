//! Module metadata synthesis from a flix.toml manifest.
//!
//! Every synthesized document has two variants:
//!
//! - `fpkgApiElements`: the release's `.fpkg` archive plus every dependency
//!   the manifest declares.
//! - `sourcesElements`: GitHub's source archive for the release tag, with no
//!   dependencies.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::coordinate::github_group;
use crate::core::metadata::{
    attributes, AttributeValue, Component, MetadataDependency, ModuleMetadata, Variant,
    VariantFile,
};
use crate::core::manifest::unquote_key;
use crate::core::{DependencyDeclaration, DependencyKind, FlixManifest, PackageCoordinate};
use crate::sources::GithubLayout;

/// Key prefix of GitHub-hosted entries in `[dependencies]`.
pub const GITHUB_KEY_PREFIX: &str = "github:";

/// Name of the primary variant.
pub const API_VARIANT: &str = "fpkgApiElements";

/// Name of the documentation variant.
pub const SOURCES_VARIANT: &str = "sourcesElements";

/// JVM compatibility level advertised by the primary variant.
pub const JVM_VERSION: u32 = 11;

/// Error while turning a manifest into metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("unknown dependency type `{key}`")]
    UnknownDependencyType { key: String },

    #[error("malformed dependency `{key}`: expected `github:owner/name`")]
    MalformedForeignKey { key: String },

    #[error("malformed dependency `{key}`: expected `group:module`")]
    MalformedExternalKey { key: String },
}

/// Build the metadata document for `coord` from its manifest.
pub fn synthesize(
    coord: &PackageCoordinate,
    manifest: &FlixManifest,
    layout: &GithubLayout,
) -> Result<ModuleMetadata, SynthesisError> {
    let dependencies = collect_dependencies(manifest)?;

    let mut doc = ModuleMetadata::new(Component::from(coord.module_version_id()));
    doc.variants.push(api_variant(coord, &dependencies));
    doc.variants.push(sources_variant(coord, layout));

    tracing::debug!(
        "synthesized metadata for {} with {} dependencies",
        coord,
        dependencies.len()
    );

    Ok(doc)
}

/// Read every dependency a manifest declares, compiler runtime first.
pub fn collect_dependencies(
    manifest: &FlixManifest,
) -> Result<Vec<DependencyDeclaration>, SynthesisError> {
    let mut deps = Vec::with_capacity(manifest.dependency_count());

    if let Some(flix) = manifest.compiler_version() {
        deps.push(DependencyDeclaration::compiler_runtime(flix));
    }

    for (key, requirement) in &manifest.dependencies {
        let (owner, name) = parse_foreign_key(&unquote_key(key))?;
        deps.push(DependencyDeclaration::new(
            DependencyKind::Foreign,
            github_group(&owner),
            name,
            requirement,
        ));
    }

    for (key, requirement) in &manifest.mvn_dependencies {
        let (group, module) = parse_external_key(&unquote_key(key))?;
        deps.push(DependencyDeclaration::new(
            DependencyKind::External,
            group,
            module,
            requirement,
        ));
    }

    Ok(deps)
}

/// Split `github:owner/name` into its owner and name.
fn parse_foreign_key(key: &str) -> Result<(String, String), SynthesisError> {
    let rest = key
        .strip_prefix(GITHUB_KEY_PREFIX)
        .ok_or_else(|| SynthesisError::UnknownDependencyType {
            key: key.to_string(),
        })?;

    match rest.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(SynthesisError::MalformedForeignKey {
            key: key.to_string(),
        }),
    }
}

/// Split `group:module`.
fn parse_external_key(key: &str) -> Result<(String, String), SynthesisError> {
    match key.split_once(':') {
        Some((group, module)) if !group.is_empty() && !module.is_empty() && !module.contains(':') => {
            Ok((group.to_string(), module.to_string()))
        }
        _ => Err(SynthesisError::MalformedExternalKey {
            key: key.to_string(),
        }),
    }
}

fn api_variant(coord: &PackageCoordinate, deps: &[DependencyDeclaration]) -> Variant {
    let mut attrs = BTreeMap::new();
    attrs.insert(attributes::CATEGORY.to_string(), AttributeValue::from("library"));
    attrs.insert(attributes::BUNDLING.to_string(), AttributeValue::from("external"));
    attrs.insert(attributes::JVM_VERSION.to_string(), AttributeValue::from(JVM_VERSION));
    attrs.insert(attributes::LIBRARY_ELEMENTS.to_string(), AttributeValue::from("fpkg"));
    attrs.insert(attributes::USAGE.to_string(), AttributeValue::from("java-api"));

    // Relative URL: the engine resolves it next to the .module file, which
    // routes back through the layer and becomes a release redirect.
    let archive = coord.archive_file_name();

    Variant {
        name: API_VARIANT.to_string(),
        attributes: attrs,
        files: vec![VariantFile {
            name: archive.clone(),
            url: archive,
        }],
        dependencies: deps.iter().map(MetadataDependency::from).collect(),
    }
}

fn sources_variant(coord: &PackageCoordinate, layout: &GithubLayout) -> Variant {
    let mut attrs = BTreeMap::new();
    attrs.insert(attributes::CATEGORY.to_string(), AttributeValue::from("documentation"));
    attrs.insert(attributes::BUNDLING.to_string(), AttributeValue::from("external"));
    attrs.insert(attributes::DOCS_TYPE.to_string(), AttributeValue::from("sources"));
    attrs.insert(attributes::USAGE.to_string(), AttributeValue::from("java-runtime"));

    Variant {
        name: SOURCES_VARIANT.to_string(),
        attributes: attrs,
        files: vec![VariantFile {
            name: format!("{}-{}-sources.zip", coord.name(), coord.version()),
            url: layout.source_archive(coord),
        }],
        dependencies: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    fn coord() -> PackageCoordinate {
        PackageCoordinate::new("acme", "widget", "1.2.0")
    }

    #[test]
    fn test_component_matches_request() {
        let manifest = FlixManifest::parse(fixtures::WIDGET_MANIFEST).unwrap();
        let doc = synthesize(&coord(), &manifest, &GithubLayout::default()).unwrap();

        assert_eq!(doc.format_version, "1.1");
        assert_eq!(doc.component.group, "io.github.acme");
        assert_eq!(doc.component.module, "widget");
        assert_eq!(doc.component.version, "1.2.0");
    }

    #[test]
    fn test_dependency_count() {
        let manifest = FlixManifest::parse(fixtures::WIDGET_MANIFEST).unwrap();
        let doc = synthesize(&coord(), &manifest, &GithubLayout::default()).unwrap();

        let api = doc.variant(API_VARIANT).unwrap();
        assert_eq!(api.dependencies.len(), manifest.dependency_count());
        assert_eq!(api.dependencies.len(), 4);
    }

    #[test]
    fn test_dependency_order_and_shape() {
        let manifest = FlixManifest::parse(fixtures::WIDGET_MANIFEST).unwrap();
        let deps = collect_dependencies(&manifest).unwrap();

        let ids: Vec<String> = deps.iter().map(|d| d.module_id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "dev.flix:flix",
                "io.github.acme:gears",
                "io.github.globex:sprockets",
                "org.json:json",
            ]
        );
        assert_eq!(deps[0].kind(), DependencyKind::CompilerRuntime);
        assert_eq!(deps[1].kind(), DependencyKind::Foreign);
        assert_eq!(deps[3].kind(), DependencyKind::External);
    }

    #[test]
    fn test_foreign_key_requires() {
        let manifest = FlixManifest::parse(
            r#"
[dependencies]
"github:acme/widget" = "1.2.0"
"#,
        )
        .unwrap();
        let doc = synthesize(&coord(), &manifest, &GithubLayout::default()).unwrap();
        let dep = &doc.variant(API_VARIANT).unwrap().dependencies[0];

        assert_eq!(dep.group, "io.github.acme");
        assert_eq!(dep.module, "widget");
        assert_eq!(dep.version.requires, "1.2.0");
    }

    #[test]
    fn test_quoted_key_is_unescaped() {
        let mut manifest = FlixManifest::default();
        manifest
            .dependencies
            .insert("\"github:acme/widget\"".to_string(), "1.0".to_string());

        let deps = collect_dependencies(&manifest).unwrap();
        assert_eq!(deps[0].module_id().to_string(), "io.github.acme:widget");
    }

    #[test]
    fn test_unknown_dependency_type_is_fatal() {
        let manifest = FlixManifest::parse(
            r#"
[dependencies]
"gitlab:acme/widget" = "1.0"
"#,
        )
        .unwrap();

        let err = synthesize(&coord(), &manifest, &GithubLayout::default()).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::UnknownDependencyType {
                key: "gitlab:acme/widget".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown dependency type `gitlab:acme/widget`");
    }

    #[test]
    fn test_malformed_keys() {
        assert!(matches!(
            parse_foreign_key("github:acme"),
            Err(SynthesisError::MalformedForeignKey { .. })
        ));
        assert!(matches!(
            parse_foreign_key("github:acme/a/b"),
            Err(SynthesisError::MalformedForeignKey { .. })
        ));
        assert!(matches!(
            parse_external_key("org.json"),
            Err(SynthesisError::MalformedExternalKey { .. })
        ));
        assert!(matches!(
            parse_external_key(":json"),
            Err(SynthesisError::MalformedExternalKey { .. })
        ));
    }

    #[test]
    fn test_variants() {
        let manifest = FlixManifest::parse(fixtures::WIDGET_MANIFEST).unwrap();
        let doc = synthesize(&coord(), &manifest, &GithubLayout::default()).unwrap();
        assert_eq!(doc.variants.len(), 2);

        let api = doc.variant(API_VARIANT).unwrap();
        assert_eq!(api.attributes[attributes::USAGE], AttributeValue::from("java-api"));
        assert_eq!(api.attributes[attributes::JVM_VERSION], AttributeValue::Int(11));
        assert_eq!(api.files[0].name, "widget.fpkg");
        assert_eq!(api.files[0].url, "widget.fpkg");

        let sources = doc.variant(SOURCES_VARIANT).unwrap();
        assert!(sources.dependencies.is_empty());
        assert_eq!(
            sources.attributes[attributes::CATEGORY],
            AttributeValue::from("documentation")
        );
        assert_eq!(
            sources.files[0].url,
            "https://github.com/acme/widget/archive/refs/tags/v1.2.0.zip"
        );
    }

    #[test]
    fn test_empty_manifest_has_no_dependencies() {
        let doc = synthesize(&coord(), &FlixManifest::default(), &GithubLayout::default()).unwrap();
        assert!(doc.variant(API_VARIANT).unwrap().dependencies.is_empty());
    }
}
