//! Configuration management for ticketsmith
//!
//! Stores settings in ~/.config/ticketsmith/config.json

use crate::prompt::ReplyMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_MS: u64 = 45_000;

/// Fully-resolved settings. Every field has a value; gaps in the stored file
/// are filled from defaults via [`Config::merge_defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_ms: u64,
    pub reply_mode: ReplyMode,
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            reply_mode: ReplyMode::Agent,
            system_prompt: String::new(),
        }
    }
}

/// On-disk shape: any subset of the fields may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_ms: Option<u64>,
    pub reply_mode: Option<ReplyMode>,
    pub system_prompt: Option<String>,
}

impl PartialConfig {
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some()
            && self.base_url.is_some()
            && self.model.is_some()
            && self.temperature.is_some()
            && self.timeout_ms.is_some()
            && self.reply_mode.is_some()
            && self.system_prompt.is_some()
    }
}

impl Config {
    /// Fill absent fields from defaults. Present fields are never overwritten.
    pub fn merge_defaults(partial: PartialConfig) -> Self {
        let d = Self::default();
        Self {
            api_key: partial.api_key.unwrap_or(d.api_key),
            base_url: partial.base_url.unwrap_or(d.base_url),
            model: partial.model.unwrap_or(d.model),
            temperature: partial.temperature.unwrap_or(d.temperature),
            timeout_ms: partial.timeout_ms.unwrap_or(d.timeout_ms),
            reply_mode: partial.reply_mode.unwrap_or(d.reply_mode),
            system_prompt: partial.system_prompt.unwrap_or(d.system_prompt),
        }
    }

    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ticketsmith"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str::<PartialConfig>(&content) {
                Ok(partial) => return Self::merge_defaults(partial),
                Err(err) => {
                    preserve_corrupt_config(path, &content);
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                }
            }
        }
        Self::default()
    }

    /// First-run initialization: load whatever the stored file has, fill the
    /// gaps from defaults, and persist only if something was absent. This is
    /// the one place "set only if missing" semantics apply; later edits go
    /// through normal [`Config::save`].
    pub fn initialize() -> Result<Self, String> {
        let path = Self::config_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        let partial = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<PartialConfig>(&content).unwrap_or_default(),
            Err(_) => PartialConfig::default(),
        };
        let complete = partial.is_complete();
        let config = Self::merge_defaults(partial);
        if !complete {
            config.save()?;
        }
        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)) {
                eprintln!("  Warning: Failed to set config directory permissions: {}", e);
            }
        }

        self.save_to(&dir.join("config.json"))
    }

    fn save_to(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content)
                .map_err(|e| format!("Failed to write config: {}", e))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;
        }

        Ok(())
    }

    /// Check if an API key is configured (whitespace does not count).
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/ticketsmith/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> Result<(), String> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| e.to_string())?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        eprintln!("  Warning: Failed to set temp config file permissions: {}", e);
    }

    file.write_all(content.as_bytes())
        .map_err(|e| e.to_string())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.to_string());
    }
    Ok(())
}
