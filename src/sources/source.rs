//! ManifestSource trait - common interface for manifest fetchers.

use anyhow::Result;

use crate::core::PackageCoordinate;

/// A place that can hand out a release's flix.toml.
///
/// Implementations are shared between request handlers, so they must be
/// safe to call from several threads at once.
pub trait ManifestSource: Send + Sync {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Check whether the release has a manifest, without downloading it.
    fn exists(&self, coord: &PackageCoordinate) -> Result<bool>;

    /// Download the raw manifest text.
    fn fetch(&self, coord: &PackageCoordinate) -> Result<String>;
}
