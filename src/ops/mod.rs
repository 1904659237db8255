//! High-level operations.

pub mod flatten;
pub mod synthesize;
pub mod write_manifest;

pub use flatten::{flatten, flatten_unique};
pub use synthesize::{synthesize, SynthesisError};
pub use write_manifest::{render_manifest, write_manifest, ClassifiedDependency, PackageIdentity};
