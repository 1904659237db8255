//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// fpkg-layer - serve GitHub-hosted Flix packages as a module repository
#[derive(Parser)]
#[command(name = "fpkg-layer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the metadata layer until interrupted
    Serve(ServeArgs),

    /// Print the module metadata synthesized for a release
    Metadata(MetadataArgs),

    /// Print the direct declarations for a resolved dependency tree
    Flatten(FlattenArgs),

    /// Write a flix.toml from a resolved dependency list
    Manifest(ManifestArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Base port to listen on (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Number of request worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Web root of the release host
    #[arg(long, env = "FPKG_LAYER_GITHUB_URL")]
    pub github_url: Option<String>,
}

#[derive(Args)]
pub struct MetadataArgs {
    /// Repository owner
    pub owner: String,

    /// Repository name
    pub name: String,

    /// Release version, without the `v` prefix
    pub version: String,

    /// Read the manifest from a local file instead of the release
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Web root of the release host
    #[arg(long, env = "FPKG_LAYER_GITHUB_URL")]
    pub github_url: Option<String>,
}

#[derive(Args)]
pub struct FlattenArgs {
    /// JSON file holding the resolved forest
    pub tree: PathBuf,

    /// Print each module once
    #[arg(long)]
    pub unique: bool,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Package name
    #[arg(long)]
    pub name: String,

    /// Package version
    #[arg(long)]
    pub version: String,

    /// Package description
    #[arg(long)]
    pub description: Option<String>,

    /// License identifier
    #[arg(long)]
    pub license: Option<String>,

    /// Package author (repeatable)
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// JSON file listing resolved dependencies
    #[arg(long)]
    pub dependencies: Option<PathBuf>,

    /// Output path
    #[arg(short, long, default_value = "flix.toml")]
    pub out: PathBuf,
}
