//! Path utilities for marketlink.
//!
//! User-level files live under `~/.marketlink/`:
//! - `~/.marketlink/config.toml` - configuration picked up when `--config` is absent

use std::path::PathBuf;

/// Returns the marketlink home directory (`~/.marketlink/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".marketlink")
}

/// Returns the default config file path (`~/.marketlink/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
