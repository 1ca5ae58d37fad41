// Startup module - banner and module status
//
// Printed before the TUI takes over the screen (or in headless mode), then
// repeated through tracing so it shows in the System Logs panel.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

fn module_status(config: &Config) -> Vec<ModuleStatus> {
    vec![
        ModuleStatus {
            name: "loop",
            enabled: true,
            description: "Analyze, plan, produce, learn",
        },
        ModuleStatus {
            name: "tui",
            enabled: config.enable_tui,
            description: "Terminal dashboard",
        },
        ModuleStatus {
            name: "api",
            enabled: config.api.enabled,
            description: "Local state/toggle API",
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: "JSON log files",
        },
        ModuleStatus {
            name: "autostart",
            enabled: config.autostart,
            description: "Start loop on launch",
        },
    ]
}

pub fn print_startup(config: &Config, backend_label: &str) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}contentloop{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Autonomous content generation loop{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!(
        "  {DIM}Persona:{RESET} {} {DIM}({}){RESET}",
        config.persona.name, config.persona.market
    );
    println!("  {DIM}Backend:{RESET} {}", backend_label);
    println!();

    println!("  {DIM}Loading modules...{RESET}");
    for module in &module_status(config) {
        print_module_status(module);
    }
    println!();

    if config.api.enabled {
        println!(
            "  {MAGENTA}▸{RESET} API listening on {BOLD}http://{}{RESET}",
            config.api.bind_addr
        );
    }
    if config.demo_mode {
        println!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(mock content){RESET}");
    }
    println!();
}

fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Same information for the System Logs panel
pub fn log_startup(config: &Config, backend_label: &str) {
    tracing::info!("contentloop v{}", VERSION);
    tracing::info!(
        "Persona: {} ({}), {} posts per cycle",
        config.persona.name,
        config.persona.market,
        config.persona.posts_per_cycle
    );
    tracing::info!("Backend: {}", backend_label);

    let enabled: Vec<&str> = module_status(config)
        .iter()
        .filter(|m| m.enabled)
        .map(|m| m.name)
        .collect();
    tracing::info!("Modules: {}", enabled.join(", "));

    if config.api.enabled {
        tracing::info!("API: http://{}", config.api.bind_addr);
    }
    if !config.learnings.is_empty() {
        tracing::info!("Seeded {} learnings from config", config.learnings.len());
    }
    if config.enable_tui && !config.autostart {
        tracing::info!("Press space to start the loop, q to quit");
    }
}
