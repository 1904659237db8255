//! GitHub releases - manifests and assets attached to tagged releases.
//!
//! Releases are tagged `v{version}`. Every release of a Flix package carries
//! its `flix.toml` and its `{name}.fpkg` archive as loose assets:
//!
//! ```text
//! https://github.com/{owner}/{name}/releases/download/v{version}/flix.toml
//! https://github.com/{owner}/{name}/releases/download/v{version}/{name}.fpkg
//! https://github.com/{owner}/{name}/archive/refs/tags/v{version}.zip
//! ```

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use url::Url;

use crate::core::manifest::MANIFEST_FILE_NAME;
use crate::core::PackageCoordinate;
use crate::sources::ManifestSource;

/// Default GitHub web root.
pub const GITHUB_URL: &str = "https://github.com/";

/// URL layout of release assets on a GitHub-like host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubLayout {
    /// Base URL, always ending in `/`
    base: String,
}

impl GithubLayout {
    /// Create a layout rooted at `base`. A missing trailing slash is added so
    /// paths stay under the base path.
    pub fn new(base: Url) -> Self {
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        GithubLayout { base }
    }

    /// Parse a layout from a URL string.
    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base).with_context(|| format!("invalid GitHub base URL: {}", base))?;
        Ok(Self::new(url))
    }

    /// The base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of a file attached to the release.
    pub fn release_asset(&self, owner: &str, name: &str, version: &str, file: &str) -> String {
        format!(
            "{}{}/{}/releases/download/v{}/{}",
            self.base, owner, name, version, file
        )
    }

    /// URL of the release's flix.toml.
    pub fn manifest(&self, coord: &PackageCoordinate) -> String {
        self.release_asset(
            coord.owner(),
            coord.name(),
            coord.version(),
            MANIFEST_FILE_NAME,
        )
    }

    /// URL of the source archive GitHub generates for the release tag.
    pub fn source_archive(&self, coord: &PackageCoordinate) -> String {
        format!(
            "{}{}/{}/archive/refs/tags/v{}.zip",
            self.base,
            coord.owner(),
            coord.name(),
            coord.version()
        )
    }
}

impl Default for GithubLayout {
    fn default() -> Self {
        GithubLayout {
            base: GITHUB_URL.to_string(),
        }
    }
}

/// Fetches manifests from GitHub release assets.
pub struct GithubReleases {
    layout: GithubLayout,
    client: Client,
}

impl GithubReleases {
    /// Create a fetcher for the given layout.
    pub fn new(layout: GithubLayout) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fpkg-layer/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "failed to create HTTP client")?;

        Ok(GithubReleases { layout, client })
    }
}

impl ManifestSource for GithubReleases {
    fn name(&self) -> &str {
        "github"
    }

    fn exists(&self, coord: &PackageCoordinate) -> Result<bool> {
        let url = self.layout.manifest(coord);
        tracing::debug!("HEAD {}", url);

        let response = self
            .client
            .head(&url)
            .send()
            .with_context(|| format!("failed to query {}", url))?;

        Ok(response.status().is_success())
    }

    fn fetch(&self, coord: &PackageCoordinate) -> Result<String> {
        let url = self.layout.manifest(coord);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("failed to download manifest from {}", url))?;

        if !response.status().is_success() {
            bail!(
                "failed to download manifest from {}: HTTP {}",
                url,
                response.status()
            );
        }

        response
            .text()
            .with_context(|| "failed to read manifest response body")
    }
}
