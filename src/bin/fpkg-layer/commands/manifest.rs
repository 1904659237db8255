//! `fpkg-layer manifest` command

use anyhow::{Context, Result};

use crate::cli::ManifestArgs;
use fpkg_layer::ops::{write_manifest, ClassifiedDependency, PackageIdentity};
use fpkg_layer::util::fs;

pub fn execute(args: ManifestArgs) -> Result<()> {
    let identity = PackageIdentity {
        name: args.name,
        version: args.version,
        description: args.description,
        license: args.license,
        authors: args.authors,
    };

    let deps: Vec<ClassifiedDependency> = match args.dependencies {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse dependency list: {}", path.display()))?
        }
        None => Vec::new(),
    };

    write_manifest(&args.out, &identity, &deps)?;
    println!("Wrote {} ({} dependencies)", args.out.display(), deps.len());

    Ok(())
}
