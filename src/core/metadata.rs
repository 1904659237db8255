//! Module metadata documents (Gradle module metadata, format 1.1).
//!
//! These are the JSON documents the resolution engine fetches as
//! `{name}-{version}.module`. Field order follows declaration order so the
//! serialized output is stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::coordinate::ModuleVersionId;
use crate::core::dependency::DependencyDeclaration;

/// Metadata format version this crate emits.
pub const FORMAT_VERSION: &str = "1.1";

/// Attribute keys used by the emitted variants.
pub mod attributes {
    pub const CATEGORY: &str = "org.gradle.category";
    pub const BUNDLING: &str = "org.gradle.dependency.bundling";
    pub const DOCS_TYPE: &str = "org.gradle.docstype";
    pub const JVM_VERSION: &str = "org.gradle.jvm.version";
    pub const LIBRARY_ELEMENTS: &str = "org.gradle.libraryelements";
    pub const USAGE: &str = "org.gradle.usage";
}

/// A complete module metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetadata {
    pub format_version: String,
    pub component: Component,
    pub variants: Vec<Variant>,
}

impl ModuleMetadata {
    /// Create a document with no variants yet.
    pub fn new(component: Component) -> Self {
        ModuleMetadata {
            format_version: FORMAT_VERSION.to_string(),
            component,
            variants: Vec::new(),
        }
    }

    /// Find a variant by name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The module this document describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub group: String,
    pub module: String,
    pub version: String,
}

impl From<ModuleVersionId> for Component {
    fn from(id: ModuleVersionId) -> Self {
        Component {
            group: id.group,
            module: id.name,
            version: id.version,
        }
    }
}

/// One attribute-tagged usage of the module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub files: Vec<VariantFile>,
    #[serde(default)]
    pub dependencies: Vec<MetadataDependency>,
}

/// Attribute values are either strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(u32),
    Text(String),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(value)
    }
}

/// A file belonging to a variant. Relative URLs resolve against the
/// document's own location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFile {
    pub name: String,
    pub url: String,
}

/// A dependency as it appears in a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDependency {
    pub group: String,
    pub module: String,
    pub version: VersionConstraint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConstraint {
    pub requires: String,
}

impl From<&DependencyDeclaration> for MetadataDependency {
    fn from(dep: &DependencyDeclaration) -> Self {
        MetadataDependency {
            group: dep.group().to_string(),
            module: dep.module().to_string(),
            version: VersionConstraint {
                requires: dep.version_requirement().to_string(),
            },
        }
    }
}
