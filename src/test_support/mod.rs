//! Test utilities and mocks for fpkg-layer unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use fpkg_layer::test_support::{fixtures, StaticManifests};
//!
//! let mut source = StaticManifests::new();
//! source.insert(PackageCoordinate::new("acme", "widget", "1.2.0"), fixtures::WIDGET_MANIFEST);
//! let router = Router::new(GithubLayout::default(), Arc::new(source))?;
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::core::PackageCoordinate;
use crate::sources::ManifestSource;

/// In-memory manifest source.
///
/// Serves manifests registered with [`StaticManifests::insert`] and records
/// every coordinate it was asked about.
#[derive(Debug, Clone, Default)]
pub struct StaticManifests {
    manifests: HashMap<PackageCoordinate, String>,
    unreachable: bool,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticManifests {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose every call fails, like an unreachable host.
    pub fn failing() -> Self {
        StaticManifests {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Register the manifest of a release.
    pub fn insert(&mut self, coord: PackageCoordinate, manifest: impl Into<String>) {
        self.manifests.insert(coord, manifest.into());
    }

    /// Coordinates queried so far, as `owner/name vX` strings.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn record(&self, coord: &PackageCoordinate) -> Result<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(coord.to_string());
        }
        if self.unreachable {
            bail!("connection refused");
        }
        Ok(())
    }
}

impl ManifestSource for StaticManifests {
    fn name(&self) -> &str {
        "static"
    }

    fn exists(&self, coord: &PackageCoordinate) -> Result<bool> {
        self.record(coord)?;
        Ok(self.manifests.contains_key(coord))
    }

    fn fetch(&self, coord: &PackageCoordinate) -> Result<String> {
        self.record(coord)?;
        match self.manifests.get(coord) {
            Some(manifest) => Ok(manifest.clone()),
            None => bail!("no manifest for {}", coord),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_manifests() {
        let coord = PackageCoordinate::new("acme", "widget", "1.2.0");
        let mut source = StaticManifests::new();
        source.insert(coord.clone(), fixtures::WIDGET_MANIFEST);

        assert!(source.exists(&coord).unwrap());
        assert_eq!(source.fetch(&coord).unwrap(), fixtures::WIDGET_MANIFEST);

        let other = PackageCoordinate::new("acme", "widget", "9.9.9");
        assert!(!source.exists(&other).unwrap());
        assert!(source.fetch(&other).is_err());
        assert_eq!(source.requests().len(), 4);
    }

    #[test]
    fn test_failing_source() {
        let source = StaticManifests::failing();
        let coord = PackageCoordinate::new("acme", "widget", "1.2.0");
        assert!(source.exists(&coord).is_err());
        assert!(source.fetch(&coord).is_err());
    }
}
