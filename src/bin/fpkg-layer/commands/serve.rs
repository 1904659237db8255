//! `fpkg-layer serve` command

use std::io::Write;

use anyhow::Result;

use crate::cli::ServeArgs;
use fpkg_layer::server;

pub fn execute(args: ServeArgs) -> Result<()> {
    let mut config = super::current_config()?;
    if args.port.is_some() {
        config.server.port = args.port;
    }
    if args.threads.is_some() {
        config.server.threads = args.threads;
    }
    if args.github_url.is_some() {
        config.github.base_url = args.github_url;
    }

    let server = server::shared(&config)?;
    println!("Listening on: {}", server.url());
    std::io::stdout().flush()?;

    while server.is_running() {
        std::thread::park();
    }

    Ok(())
}
