use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils::{CONFIG_FILE, URL_ENV_VAR};

// ============================================================================
// SETTINGS STORE
// ============================================================================

/// Persisted console settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_url: Option<String>,
}

impl Settings {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pixdeck")
    }

    /// Load persisted settings; a missing or unreadable file yields defaults.
    pub fn load() -> Self {
        let path = Self::config_dir().join(CONFIG_FILE);
        fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(dir.join(CONFIG_FILE), json)
    }
}

/// Resolve the board URL: explicit flag, then environment, then settings.
pub fn resolve_board_url(flag: Option<&str>) -> Option<String> {
    if let Some(url) = flag {
        return Some(url.to_string());
    }
    if let Ok(url) = env::var(URL_ENV_VAR) {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }
    Settings::load().board_url
}
