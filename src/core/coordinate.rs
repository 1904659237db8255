//! Package identification - WHICH release and WHICH module.
//!
//! A `PackageCoordinate` names one GitHub-hosted release (owner + repository
//! + version). `ModuleId` and `ModuleVersionId` are the registry-side names
//! for the same thing, as the resolution engine sees them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Group namespace under which GitHub owners are published.
pub const GITHUB_GROUP_PREFIX: &str = "io.github.";

/// A release on the foreign host: `owner/name` at `version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageCoordinate {
    owner: String,
    name: String,
    version: String,
}

impl PackageCoordinate {
    /// Create a new coordinate.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        PackageCoordinate {
            owner: owner.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name, which is also the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The release version, without the `v` tag prefix.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Registry group for this release's owner.
    pub fn group(&self) -> String {
        github_group(&self.owner)
    }

    /// The conventional per-version metadata filename, `{name}-{version}.module`.
    pub fn metadata_file_name(&self) -> String {
        format!("{}-{}.module", self.name, self.version)
    }

    /// File name of the package archive attached to the release.
    pub fn archive_file_name(&self) -> String {
        format!("{}.fpkg", self.name)
    }

    /// Registry identity of this release.
    pub fn module_version_id(&self) -> ModuleVersionId {
        ModuleVersionId::new(self.group(), &self.name, &self.version)
    }
}

impl fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} v{}", self.owner, self.name, self.version)
    }
}

/// Registry group for a GitHub owner.
pub fn github_group(owner: &str) -> String {
    format!("{}{}", GITHUB_GROUP_PREFIX, owner)
}

/// Registry module identity without a version, `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        ModuleId {
            group: group.into(),
            name: name.into(),
        }
    }

    /// The GitHub owner, if this module lives in the `io.github.` namespace.
    pub fn github_owner(&self) -> Option<&str> {
        self.group
            .strip_prefix(GITHUB_GROUP_PREFIX)
            .filter(|owner| !owner.is_empty())
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Registry module identity with a version, `group:name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleVersionId {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleVersionId {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ModuleVersionId {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Drop the version.
    pub fn module(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.name)
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}
