//! Generative backend configuration: provider, credentials, models

use serde::Deserialize;

/// Fallback env var checked when the configured `key_env` is unset
pub const FALLBACK_KEY_ENV: &str = "CONTENTLOOP_API_KEY";

/// Which backend plays the collaborator roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// Gemini REST API (default)
    #[default]
    Gemini,
    /// Offline mock content
    Demo,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "demo" | "mock" => Self::Demo,
            _ => Self::Gemini,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Demo => "demo",
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub provider: ProviderKind,
    /// API base URL, models are addressed below it
    pub api_base: String,
    /// Key from the config file; env vars take precedence
    pub api_key: Option<String>,
    /// Env var holding the API key
    pub key_env: String,
    /// Search-grounded model for trend analysis
    pub trend_model: String,
    /// Reasoning model for content planning
    pub planner_model: String,
    /// Image generation model
    pub image_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Thinking token budget for planning
    pub thinking_budget: u32,
    /// Generated image size ("1K", "2K")
    pub image_size: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            key_env: "GEMINI_API_KEY".to_string(),
            trend_model: "gemini-3-flash-preview".to_string(),
            planner_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            timeout_secs: 120,
            thinking_budget: 4000,
            image_size: "1K".to_string(),
        }
    }
}

/// Backend settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileBackend {
    pub provider: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub key_env: Option<String>,
    pub trend_model: Option<String>,
    pub planner_model: Option<String>,
    pub image_model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub thinking_budget: Option<u32>,
    pub image_size: Option<String>,
}

impl BackendConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileBackend>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            provider: file
                .provider
                .map(|s| ProviderKind::from_str(&s))
                .unwrap_or(defaults.provider),
            api_base: file.api_base.unwrap_or(defaults.api_base),
            api_key: file.api_key.filter(|k| !k.trim().is_empty()),
            key_env: file.key_env.unwrap_or(defaults.key_env),
            trend_model: file.trend_model.unwrap_or(defaults.trend_model),
            planner_model: file.planner_model.unwrap_or(defaults.planner_model),
            image_model: file.image_model.unwrap_or(defaults.image_model),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            thinking_budget: file.thinking_budget.unwrap_or(defaults.thinking_budget),
            image_size: file.image_size.unwrap_or(defaults.image_size),
        }
    }

    /// API key: `$key_env` > `$CONTENTLOOP_API_KEY` > config file
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        lookup(&self.key_env)
            .or_else(|| lookup(FALLBACK_KEY_ENV))
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Whether any key source is present (for status display)
    pub fn has_api_key(&self) -> bool {
        self.resolve_api_key().is_some()
    }
}
