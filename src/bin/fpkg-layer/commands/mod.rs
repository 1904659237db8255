//! Command implementations

pub mod flatten;
pub mod manifest;
pub mod metadata;
pub mod serve;

use anyhow::{Context, Result};

use fpkg_layer::util::config::{global_config_path, load_config, project_config_path};
use fpkg_layer::Config;

/// Load the merged global and project configuration for the current directory.
pub fn current_config() -> Result<Config> {
    let cwd = std::env::current_dir().with_context(|| "failed to read current directory")?;
    let global = global_config_path();

    Ok(load_config(global.as_deref(), &project_config_path(&cwd)))
}
