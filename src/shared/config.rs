//! Application configuration. AI credentials, paths.

use serde::Deserialize;
use std::path::PathBuf;

/// Gemini's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_AI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-pro";
/// Used for short completions such as the daily lunar insight.
pub const DEFAULT_AI_FAST_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Database, preferences and reports live here. Read from COSMIC_CRM_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Markdown report exports. Defaults to `<data_dir>/reports`.
    #[serde(default)]
    pub reports_dir: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Report Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// API key for the report model. Read from COSMIC_CRM_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// OpenAI-compatible chat completions URL. Read from COSMIC_CRM_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model for full reports. Read from COSMIC_CRM_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Model for short insights. Read from COSMIC_CRM_AI_FAST_MODEL.
    #[serde(default)]
    pub ai_fast_model: Option<String>,

    /// Per-request timeout. Reports are large; the default is generous.
    #[serde(default)]
    pub ai_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("COSMIC_CRM"));
        if let Ok(path) = std::env::var("COSMIC_CRM_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Numbers from the environment arrive as strings; parse explicitly.
        if let Ok(s) = std::env::var("COSMIC_CRM_AI_TIMEOUT_SECS") {
            if let Ok(n) = s.parse::<u64>() {
                cfg.ai_timeout_secs = Some(n);
            }
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn reports_dir_or_default(&self) -> PathBuf {
        self.reports_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("reports"))
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir_or_default().join("preferences.json")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the AI API key if configured. Reads from config or COSMIC_CRM_AI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("COSMIC_CRM_AI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string())
    }

    pub fn ai_fast_model_or_default(&self) -> String {
        self.ai_fast_model
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_FAST_MODEL.to_string())
    }

    pub fn ai_timeout_secs_or_default(&self) -> u64 {
        self.ai_timeout_secs.unwrap_or(DEFAULT_AI_TIMEOUT_SECS)
    }

    /// Returns true if AI is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data_dir_or_default(), PathBuf::from("./data"));
        assert_eq!(cfg.reports_dir_or_default(), PathBuf::from("./data").join("reports"));
        assert_eq!(cfg.ai_model_or_default(), "gemini-2.5-pro");
        assert_eq!(cfg.ai_fast_model_or_default(), "gemini-2.5-flash");
        assert_eq!(cfg.ai_timeout_secs_or_default(), 120);
        assert!(cfg.ai_api_url_or_default().contains("generativelanguage"));
    }

    #[test]
    fn test_reports_dir_follows_data_dir() {
        let cfg = AppConfig {
            data_dir: Some("/tmp/crm".into()),
            ..Default::default()
        };
        assert_eq!(cfg.reports_dir_or_default(), PathBuf::from("/tmp/crm/reports"));
        assert_eq!(cfg.preferences_path(), PathBuf::from("/tmp/crm/preferences.json"));

        let cfg = AppConfig {
            reports_dir: Some("/srv/exports".into()),
            ..Default::default()
        };
        assert_eq!(cfg.reports_dir_or_default(), PathBuf::from("/srv/exports"));
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let cfg = AppConfig {
            ai_api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(cfg.ai_api_key().is_none());
        assert!(!cfg.is_ai_configured());
    }
}
