//! Manifest sources.
//!
//! Sources fetch a release's flix.toml from wherever the release is hosted.
//! Only GitHub releases are supported.

pub mod github;
pub mod source;

pub use github::{GithubLayout, GithubReleases};
pub use source::ManifestSource;
