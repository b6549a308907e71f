//! Persisted user preferences.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IdmaskError, Result};

/// Environment variable overriding the preferences file location.
pub const CONFIG_ENV: &str = "IDMASK_CONFIG";

/// User preferences stored between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Show hidden (vaulted) sets and keep them in encoded tokens
    #[serde(default, alias = "showVaulted")]
    pub include_hidden: bool,
}

impl Preferences {
    /// Default file location: `$IDMASK_CONFIG`, else the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        resolve_path(std::env::var_os(CONFIG_ENV))
    }

    /// Load preferences; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text)
            .map_err(|e| IdmaskError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write preferences, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| IdmaskError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), include_hidden = self.include_hidden, "saved preferences");
        Ok(())
    }
}

/// Pick the preferences file from an override value or the config dir.
fn resolve_path(override_path: Option<OsString>) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join("idmask").join("preferences.json")),
    }
}
