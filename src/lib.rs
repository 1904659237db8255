//! fpkg-layer - a local metadata layer for Flix packages hosted on GitHub
//!
//! Flix packages are published as GitHub release assets, which a standard
//! dependency resolver cannot understand. This crate runs a small HTTP server
//! that presents those releases as a conventional module repository: module
//! metadata is synthesized on the fly from each release's `flix.toml`, and
//! every other file request is redirected to the release asset.
//!
//! It also provides the two pieces that sit around resolution: flattening a
//! resolved dependency tree into direct declarations, and writing a resolved
//! dependency list back into a `flix.toml`.

pub mod core;
pub mod ops;
pub mod server;
pub mod sources;
pub mod util;

/// Test utilities and mocks for fpkg-layer unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides an in-memory manifest source and manifest fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    DependencyDeclaration, DependencyKind, FlixManifest, ModuleId, ModuleMetadata,
    ModuleVersionId, PackageCoordinate, ResolvedDependencyNode,
};

pub use server::{LayerServer, Router};
pub use util::Config;
