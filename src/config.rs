//! Configuration management

use crate::speech::voice::{VoiceAccent, VoiceGender};
use crate::{ReaderError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Application configuration for the reader
///
/// Manages persistent settings: speech parameters, voice preferences,
/// and the AI service credential.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.readaloud.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from disk or create default
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| ReaderError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| ReaderError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| ReaderError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.readaloud.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".readaloud.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("speed", "1.0")
            .set("volume", "1.0")
            .set("voice_gender", "any")
            .set("voice_accent", "any");

        ini.with_section(Some("ai"));

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Reader-specific configuration getters

    /// Speech rate multiplier (1.0 is normal)
    pub fn speed(&self) -> f32 {
        self.get_float("speech", "speed", 1.0)
    }

    /// Speech volume (0.0 to 1.0)
    pub fn volume(&self) -> f32 {
        self.get_float("speech", "volume", 1.0)
    }

    /// Preferred voice gender
    pub fn voice_gender(&self) -> VoiceGender {
        VoiceGender::parse(&self.get_string("speech", "voice_gender", "any"))
    }

    /// Preferred voice accent
    pub fn voice_accent(&self) -> VoiceAccent {
        VoiceAccent::parse(&self.get_string("speech", "voice_accent", "any"))
    }

    /// AI service API key, if configured
    pub fn api_key(&self) -> Option<String> {
        let key = self.get_string("ai", "api_key", "");
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}
