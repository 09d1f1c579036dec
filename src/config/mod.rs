pub mod settings;

pub use settings::{CompletionConfig, Config, DebugLogRotation, SearchConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("newsrag");

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from the default path, or create a default file if missing
pub fn load_or_create_config() -> Result<Config> {
    load_or_create_config_at(&config_path()?)
}

/// Load configuration from `path`, or write defaults there if it does not exist
pub fn load_or_create_config_at(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }

    let config = Config::default();
    save_config_at(&config, path)?;

    eprintln!("Created default config at: {}", path.display());
    eprintln!("Please edit this file to add your search and completion credentials.");

    Ok(config)
}

/// Load configuration from an existing file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Config::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Save configuration to `path`, creating parent directories as needed
pub fn save_config_at(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
