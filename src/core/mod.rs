//! Core data types for the metadata layer.

pub mod coordinate;
pub mod dependency;
pub mod manifest;
pub mod metadata;
pub mod resolved;

pub use coordinate::{ModuleId, ModuleVersionId, PackageCoordinate};
pub use dependency::{DependencyDeclaration, DependencyKind};
pub use manifest::FlixManifest;
pub use metadata::ModuleMetadata;
pub use resolved::{ResolvedArtifact, ResolvedDependencyNode};
