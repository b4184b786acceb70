use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".cityping";

impl Config {
    /// Load `~/.cityping/config.toml` (or `path`), then apply environment
    /// overrides and validate. A missing file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let app_dir = app_dir()?;
        let config_path = path.map_or_else(|| app_dir.join("config.toml"), Path::to_path_buf);

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            Self::from_toml_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            Self::default()
        };
        config.config_path = config_path;

        config.apply_env_overrides()?;

        if config.store.path.is_none() {
            fs::create_dir_all(&app_dir)
                .with_context(|| format!("Failed to create {}", app_dir.display()))?;
            config.store.path = Some(app_dir.join("state.db"));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid config TOML")
    }
}

fn app_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(APP_DIR))
}
