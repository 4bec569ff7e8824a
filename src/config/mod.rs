use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::locale::normalize_language;
use crate::modal::ControllerOptions;
use crate::options::ThemeSetting;

/// Application configuration for the command line front end
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default dialog language
    pub language: Option<String>,

    /// Default theme: dark, light or auto
    pub theme: Option<String>,

    /// Default auto-dismiss timeout in seconds
    pub timeout: Option<i64>,

    /// Sound played when a dialog requests one
    pub sound_path: Option<PathBuf>,

    /// Directory with `<language>.json` locale overrides
    pub locale_dir: Option<PathBuf>,
}

impl Settings {
    /// Initialize configuration: defaults, then a config file, then the
    /// environment
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut settings = Self::default();

        match explicit_path {
            Some(path) => settings.merge_with(Self::load_file(path).await?),
            None => {
                if let Some(file_settings) = Self::load_from_file().await? {
                    settings.merge_with(file_settings);
                }
            }
        }

        settings.load_from_env();
        settings.validate()?;

        Ok(settings)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(language) = lookup("MODALGATE_LANGUAGE") {
            self.language = Some(language);
        }

        if let Some(theme) = lookup("MODALGATE_THEME") {
            self.theme = Some(theme);
        }

        if let Some(timeout) = lookup("MODALGATE_TIMEOUT") {
            if let Ok(timeout) = timeout.trim().parse() {
                self.timeout = Some(timeout);
            }
        }

        if let Some(sound) = lookup("MODALGATE_SOUND") {
            self.sound_path = Some(PathBuf::from(sound));
        }

        if let Some(dir) = lookup("MODALGATE_LOCALE_DIR") {
            self.locale_dir = Some(PathBuf::from(dir));
        }
    }

    /// Candidate configuration files, highest priority first:
    /// 1. ./.modalgate.json
    /// 2. ./modalgate.json
    /// 3. $CONFIG/modalgate/config.json
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.modalgate.json"),
            PathBuf::from("./modalgate.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("modalgate").join("config.json"));
        }

        paths
    }

    /// Load the first configuration file that exists
    pub async fn load_from_file() -> Result<Option<Self>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_file(&path).await.map(Some);
            }
        }

        Ok(None)
    }

    async fn load_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Merge another configuration into this one
    pub fn merge_with(&mut self, other: Self) {
        if other.language.is_some() {
            self.language = other.language;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.sound_path.is_some() {
            self.sound_path = other.sound_path;
        }
        if other.locale_dir.is_some() {
            self.locale_dir = other.locale_dir;
        }
    }

    /// Parsed theme, if one is configured
    pub fn theme_setting(&self) -> Result<Option<ThemeSetting>> {
        self.theme
            .as_deref()
            .map(|theme| theme.parse::<ThemeSetting>())
            .transpose()
            .context("Invalid theme in configuration")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.theme_setting()?;

        if let Some(language) = &self.language {
            if language.trim().is_empty() {
                return Err(anyhow::anyhow!("language must not be empty"));
            }
        }

        Ok(())
    }

    /// Global settings for a dialog controller
    pub fn controller_options(&self) -> Result<ControllerOptions> {
        Ok(ControllerOptions {
            language: self.language.as_deref().map(normalize_language),
            theme: self.theme_setting()?,
            timeout: self.timeout,
            sound_path: self.sound_path.clone(),
        })
    }
}
