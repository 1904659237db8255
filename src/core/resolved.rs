//! Resolved dependency trees, as reported by the resolution engine.
//!
//! A tree is path-local: the same module may appear under several parents
//! and is kept once per path.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::coordinate::ModuleVersionId;
use crate::util::fs;

/// Extension of a packaged Flix archive.
pub const FPKG_EXTENSION: &str = "fpkg";

/// One artifact file of a resolved module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub extension: String,
}

impl ResolvedArtifact {
    pub fn new(extension: impl Into<String>) -> Self {
        ResolvedArtifact {
            extension: extension.into(),
        }
    }

    /// Whether this artifact is a Flix package archive.
    pub fn is_fpkg(&self) -> bool {
        self.extension == FPKG_EXTENSION
    }
}

/// A node of the resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependencyNode {
    pub module: ModuleVersionId,
    #[serde(default)]
    pub artifacts: Vec<ResolvedArtifact>,
    #[serde(default)]
    pub children: Vec<ResolvedDependencyNode>,
}

impl ResolvedDependencyNode {
    /// Create a leaf node.
    pub fn new(module: ModuleVersionId, artifacts: Vec<ResolvedArtifact>) -> Self {
        ResolvedDependencyNode {
            module,
            artifacts,
            children: Vec::new(),
        }
    }

    /// Add children to this node.
    pub fn with_children(mut self, children: Vec<ResolvedDependencyNode>) -> Self {
        self.children = children;
        self
    }

    /// True when every artifact is a Flix archive. An empty artifact set
    /// counts as self-describing.
    pub fn is_self_describing(&self) -> bool {
        self.artifacts.iter().all(ResolvedArtifact::is_fpkg)
    }
}

/// Load a resolved forest from a JSON file.
pub fn load_forest(path: &Path) -> Result<Vec<ResolvedDependencyNode>> {
    let content = fs::read_to_string(path)?;

    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse dependency tree: {}", path.display()))
}
