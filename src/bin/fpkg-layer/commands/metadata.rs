//! `fpkg-layer metadata` command

use anyhow::Result;

use crate::cli::MetadataArgs;
use fpkg_layer::ops::synthesize;
use fpkg_layer::sources::{GithubReleases, ManifestSource};
use fpkg_layer::{FlixManifest, PackageCoordinate};

pub fn execute(args: MetadataArgs) -> Result<()> {
    let mut config = super::current_config()?;
    if args.github_url.is_some() {
        config.github.base_url = args.github_url;
    }
    let layout = config.github_layout()?;

    let coord = PackageCoordinate::new(args.owner, args.name, args.version);
    let manifest = match args.manifest {
        Some(path) => FlixManifest::load(&path)?,
        None => {
            let source = GithubReleases::new(layout.clone())?;
            FlixManifest::parse(&source.fetch(&coord)?)?
        }
    };

    let doc = synthesize(&coord, &manifest, &layout)?;
    println!("{}", doc.to_json_pretty()?);

    Ok(())
}
