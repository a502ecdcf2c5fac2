//! Settings persistence at `~/.agentdeck/settings.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::config::Settings;

/// Directory holding agentdeck state. `AGENTDECK_DIR` overrides the
/// default `~/.agentdeck` for tests and unusual setups.
pub fn settings_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = std::env::var("AGENTDECK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| "HOME is not set".to_string())?;
    Ok(PathBuf::from(home).join(".agentdeck"))
}

pub fn settings_path() -> Result<PathBuf, String> {
    Ok(settings_dir()?.join("settings.yaml"))
}

/// Load settings from an explicit path.
pub fn load(path: &Path) -> Result<Settings, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Write settings to an explicit path, creating parent directories.
pub fn save(path: &Path, settings: &Settings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let text = serde_yaml::to_string(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    fs::write(path, text).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Load from the default location. A missing file yields defaults; a
/// malformed file is reported and replaced by defaults so the supervisor
/// still starts.
pub fn load_or_default() -> Settings {
    let path = match settings_path() {
        Ok(p) => p,
        Err(_) => return Settings::default(),
    };
    if !path.exists() {
        return Settings::default();
    }
    match load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("adk: {}; using default settings", e);
            Settings::default()
        }
    }
}
