//! fpkg-layer CLI - serve GitHub-hosted Flix packages as a module repository

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("fpkg_layer=debug")
    } else {
        EnvFilter::new("fpkg_layer=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args),
        Commands::Metadata(args) => commands::metadata::execute(args),
        Commands::Flatten(args) => commands::flatten::execute(args),
        Commands::Manifest(args) => commands::manifest::execute(args),
    }
}
