//! Dependency declarations.
//!
//! A `DependencyDeclaration` is one entry in a module's dependency list. Its
//! `kind` records which manifest field it came from so the same entry can be
//! written back to the right place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::coordinate::ModuleId;

/// Group of the Flix compiler runtime module.
pub const FLIX_GROUP: &str = "dev.flix";

/// Name of the Flix compiler runtime module.
pub const FLIX_MODULE: &str = "flix";

/// Where a dependency is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// A package released on GitHub, keyed `github:owner/name`.
    Foreign,
    /// A conventional registry module, keyed `group:module`.
    External,
    /// The compiler's own runtime, from the manifest's `flix` field.
    CompilerRuntime,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Foreign => write!(f, "foreign"),
            DependencyKind::External => write!(f, "external"),
            DependencyKind::CompilerRuntime => write!(f, "compiler-runtime"),
        }
    }
}

/// A single dependency of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyDeclaration {
    kind: DependencyKind,
    group: String,
    module: String,
    version_requirement: String,
}

impl DependencyDeclaration {
    /// Create a new declaration.
    pub fn new(
        kind: DependencyKind,
        group: impl Into<String>,
        module: impl Into<String>,
        version_requirement: impl Into<String>,
    ) -> Self {
        DependencyDeclaration {
            kind,
            group: group.into(),
            module: module.into(),
            version_requirement: version_requirement.into(),
        }
    }

    /// The compiler runtime at the given version.
    pub fn compiler_runtime(version: impl Into<String>) -> Self {
        Self::new(
            DependencyKind::CompilerRuntime,
            FLIX_GROUP,
            FLIX_MODULE,
            version,
        )
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// The version requirement string, written as `requires` in metadata.
    pub fn version_requirement(&self) -> &str {
        &self.version_requirement
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.module)
    }
}

/// Check whether a module is the compiler runtime.
pub fn is_compiler_runtime(id: &ModuleId) -> bool {
    id.group == FLIX_GROUP && id.name == FLIX_MODULE
}
