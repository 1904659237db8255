//! flix.toml manifest parsing and schema.
//!
//! The manifest describes a Flix package: its identity, the compiler version
//! it was built against, and two dependency tables.
//!
//! ```toml
//! [package]
//! name = "widget"
//! version = "1.2.0"
//! flix = "0.40.0"
//!
//! [dependencies]
//! "github:acme/gears" = "0.3.1"
//!
//! [mvn-dependencies]
//! "org.json:json" = "20240303"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs;

/// File name of the manifest inside a package and on a release.
pub const MANIFEST_FILE_NAME: &str = "flix.toml";

/// Table holding GitHub-hosted dependencies.
pub const DEPENDENCIES_TABLE: &str = "dependencies";

/// Table holding conventional registry dependencies.
pub const MVN_DEPENDENCIES_TABLE: &str = "mvn-dependencies";

/// The parsed flix.toml manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlixManifest {
    /// Package metadata from `[package]`
    #[serde(default)]
    pub package: Option<PackageSection>,

    /// Compiler version written at the document root by older tooling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flix: Option<String>,

    /// `github:owner/name` -> version requirement
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// `group:module` -> version requirement
    #[serde(default, rename = "mvn-dependencies")]
    pub mvn_dependencies: BTreeMap<String, String>,
}

/// Package metadata from the `[package]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Authors
    #[serde(default)]
    pub authors: Vec<String>,

    /// Compiler version the package was built against
    #[serde(default)]
    pub flix: Option<String>,
}

impl FlixManifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        Self::parse(&content).with_context(|| format!("in manifest {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "failed to parse flix.toml")
    }

    /// The compiler version, preferring `package.flix` over a root `flix` key.
    pub fn compiler_version(&self) -> Option<&str> {
        self.package
            .as_ref()
            .and_then(|p| p.flix.as_deref())
            .or(self.flix.as_deref())
    }

    /// Total number of table entries plus the compiler runtime, if any.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
            + self.mvn_dependencies.len()
            + usize::from(self.compiler_version().is_some())
    }
}

/// Strip one layer of TOML/Java-style string quoting from a table key.
///
/// The TOML parser already unquotes keys, so this only changes keys that were
/// double-quoted by the tool that produced the manifest.
pub fn unquote_key(key: &str) -> String {
    let inner = match key
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return key.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
