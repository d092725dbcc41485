//! Config command implementations

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{resolve_config, save_config, ConfigFile, Overrides};
use crate::output::{print_success, print_warning};

/// Show the effective configuration as TOML
///
/// Command-line and environment overrides are applied on top of the file.
pub fn config_show(path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let mut config = resolve_config(path)?;
    overrides.apply(&mut config.session);
    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

/// Write a default configuration file
pub fn config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        print_warning(&format!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        ));
        return Ok(());
    }

    save_config(path, &ConfigFile::default())?;
    print_success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}
