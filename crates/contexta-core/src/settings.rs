use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "CONTEXTA_MODEL";
pub const ENV_ENDPOINT: &str = "CONTEXTA_ENDPOINT";

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl AiSettings {
    /// Overlay non-empty values from `lookup` (normally the process environment).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |target: &mut String, var: &str| {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *target = value;
            }
        };
        set(&mut self.api_key, ENV_API_KEY);
        set(&mut self.model, ENV_MODEL);
        set(&mut self.endpoint, ENV_ENDPOINT);
        self
    }

    /// The key-bearing `generateContent` URL.
    pub fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    /// Same as [`AiSettings::request_url`] with the key masked, for logs.
    pub fn redacted_url(&self) -> String {
        let key = if self.api_key.is_empty() { "" } else { "***" };
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            key
        )
    }
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.api_key.is_empty() && !settings.model.is_empty() && !settings.endpoint.is_empty()
}

// --- Storage ---

/// Resolve the settings directory (~/.contexta/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".contexta")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Settings file contents; a missing or unreadable file yields defaults.
pub fn read_settings_from(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed settings file {}: {e}", path.display());
            AiSettings::default()
        }),
        Err(e) => {
            tracing::warn!("cannot read settings file {}: {e}", path.display());
            AiSettings::default()
        }
    }
}

pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

pub fn read_settings() -> AiSettings {
    read_settings_from(&settings_path())
}

pub fn write_settings(settings: &AiSettings) -> Result<()> {
    write_settings_to(&settings_path(), settings)
}

/// File settings with environment overrides applied.
pub fn load_settings() -> AiSettings {
    read_settings().with_overrides(|var| std::env::var(var).ok())
}
