use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Analysis service used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "https://impact-lens-api-602723277830.europe-west1.run.app";

/// Environment variable overriding `api_base_url`
pub const API_BASE_ENV: &str = "IMPACT_LENS_API_BASE";

/// Application settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the analysis service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Language used until one is picked in the panel
    #[serde(default)]
    pub default_language: Language,

    /// Location of the local store (defaults to the user data dir)
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Main-content selectors, replacing the built-in list when non-empty
    #[serde(default)]
    pub content_selectors: Vec<String>,

    /// Subscription settings
    #[serde(default)]
    pub entitlement: EntitlementSettings,
}

/// Subscription settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitlementSettings {
    /// Whether this installation has a paid subscription
    #[serde(default)]
    pub paid: bool,

    /// Payment page opened by `upgrade`
    #[serde(default)]
    pub payment_page_url: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_language: Language::default(),
            storage_path: None,
            content_selectors: Vec::new(),
            entitlement: EntitlementSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read(p);
            }
            tracing::debug!("Config file {:?} not found, trying defaults", p);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("impact-lens/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/impact-lens/config.toml")),
            dirs::home_dir().map(|p| p.join(".impact-lens.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read(path);
            }
        }

        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment overrides (environment takes precedence over the file)
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base_url = base.trim().to_string();
            }
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            default_api_base_url()
        } else {
            trimmed.to_string()
        };
        self.content_selectors.retain(|s| !s.trim().is_empty());
    }

    /// File backing the local store
    pub fn storage_file(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
            .unwrap_or_else(std::env::temp_dir)
            .join("impact-lens/storage.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE);
        assert_eq!(settings.default_language, Language::Dutch);
        assert!(!settings.entitlement.paid);
        assert!(settings.entitlement.payment_page_url.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            api_base_url = "http://localhost:8080/"
            default_language = "de"
            content_selectors = [".story-body", "  "]

            [entitlement]
            paid = true
            payment_page_url = "https://pay.example/choose"
        "#;

        let mut settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        settings.validate();
        assert_eq!(settings.api_base_url, "http://localhost:8080");
        assert_eq!(settings.default_language, Language::German);
        assert_eq!(settings.content_selectors, vec![".story-body".to_string()]);
        assert!(settings.entitlement.paid);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let settings: Settings = toml::from_str(r#"default_language = "fr""#).unwrap();
        assert_eq!(settings.default_language, Language::Dutch);
    }

    #[test]
    fn test_load_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "storage_path = \"/tmp/il/store.json\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.storage_file(), PathBuf::from("/tmp/il/store.json"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        temp_env::with_var(API_BASE_ENV, Some("http://127.0.0.1:9000/"), || {
            let mut settings = Settings::default();
            settings.apply_env();
            settings.validate();
            assert_eq!(settings.api_base_url, "http://127.0.0.1:9000");
        });
    }

    #[test]
    fn test_empty_env_ignored() {
        temp_env::with_var(API_BASE_ENV, Some(" "), || {
            let mut settings = Settings::default();
            settings.apply_env();
            assert_eq!(settings.api_base_url, DEFAULT_API_BASE);
        });
    }
}
