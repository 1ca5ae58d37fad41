//! Configuration for the content loop
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/contentloop/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod backend;
mod observability;
mod persona;
mod serialization;
mod timing;


pub use backend::{BackendConfig, FileBackend, ProviderKind};
pub use observability::{
    ApiConfig, FileApi, FileLogging, LogRotation, LoggingConfig, DEFAULT_API_BIND,
};
pub use persona::{FilePersona, LearningSeed, PersonaConfig};
pub use timing::{FileTiming, TimingConfig};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to run the dashboard (disabled for headless mode)
    pub enable_tui: bool,

    /// Demo mode: offline backend with mock content
    pub demo_mode: bool,

    /// Start the loop immediately instead of waiting for a toggle
    pub autostart: bool,

    /// Dashboard palette: "dark", "light", "neon"
    pub theme: String,

    pub backend: BackendConfig,

    pub timing: TimingConfig,

    pub persona: PersonaConfig,

    /// Learnings seeded into the loop at startup
    pub learnings: Vec<LearningSeed>,

    pub api: ApiConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_tui: true,
            demo_mode: false,
            autostart: false,
            theme: "dark".to_string(),
            backend: BackendConfig::default(),
            timing: TimingConfig::default(),
            persona: PersonaConfig::default(),
            learnings: Vec::new(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,
    pub autostart: Option<bool>,

    /// Optional [backend] section
    pub backend: Option<FileBackend>,

    /// Optional [timing] section
    pub timing: Option<FileTiming>,

    /// Optional [persona] section
    pub persona: Option<FilePersona>,

    /// Optional [api] section
    pub api: Option<FileApi>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [[learnings]] entries
    #[serde(default)]
    pub learnings: Vec<LearningSeed>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/contentloop/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("contentloop").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// Exits the process if the file exists but cannot be read or parsed; a
    /// broken config should not silently fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: check quoting, true/false values and [[learnings]] syntax.");
                    eprintln!("  To reset, run `contentloop config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Load the config file over defaults, ignoring the environment
    pub fn from_file_only() -> Self {
        Self::resolve(Self::load_file_config(), |_| None)
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| {
            env(name).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };

        // Runtime flags: env only
        let enable_tui = !flag("CONTENTLOOP_NO_TUI").unwrap_or(false);
        let demo_mode = flag("CONTENTLOOP_DEMO").unwrap_or(false);

        // Autostart: env > file > default
        let autostart = flag("CONTENTLOOP_AUTOSTART")
            .or(file.autostart)
            .unwrap_or(false);

        let theme = env("CONTENTLOOP_THEME")
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let mut backend = BackendConfig::from_file(file.backend);
        if let Some(base) = env("CONTENTLOOP_API_BASE") {
            backend.api_base = base;
        }

        // API: bind env > file > default; a bad address keeps the default
        let file_api = file.api.unwrap_or_default();
        let mut api = ApiConfig {
            enabled: file_api.enabled.unwrap_or(true),
            ..ApiConfig::default()
        };
        if let Some(bind) = env("CONTENTLOOP_BIND").or(file_api.bind_addr) {
            match bind.parse::<SocketAddr>() {
                Ok(addr) => api.bind_addr = addr,
                Err(_) => eprintln!(
                    "Invalid API bind address '{}', using {}",
                    bind, DEFAULT_API_BIND
                ),
            }
        }

        Self {
            enable_tui,
            demo_mode,
            autostart,
            theme,
            backend,
            timing: TimingConfig::from_file(file.timing),
            persona: PersonaConfig::from_file(file.persona),
            learnings: file.learnings,
            api,
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
