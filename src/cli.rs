// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the dashboard runs (TUI, or headless with --headless).
// Subcommands:
// - cycle: run exactly one cycle and print the resulting state as JSON
// - config --show|--reset|--edit|--update|--path: manage the config file

use crate::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// contentloop - autonomous content generation loop
#[derive(Parser)]
#[command(name = "contentloop")]
#[command(version = VERSION)]
#[command(about = "Autonomous content generation loop", long_about = None)]
pub struct Cli {
    /// Run without the terminal dashboard (logs to stderr)
    #[arg(long, global = true)]
    pub headless: bool,

    /// Use the offline demo backend
    #[arg(long, global = true)]
    pub demo: bool,

    /// Start the loop immediately
    #[arg(long)]
    pub autostart: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one cycle and print the resulting state as JSON
    Cycle,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Update config with new defaults (preserves user values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Command-line flags that override configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub headless: bool,
    pub demo: bool,
    pub autostart: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if self.headless {
            config.enable_tui = false;
        }
        if self.demo {
            config.demo_mode = true;
        }
        if self.autostart {
            config.autostart = true;
        }
    }
}

/// What main should do after argument parsing
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    /// Run the dashboard
    Run(Overrides),
    /// Run a single cycle and exit
    Cycle(Overrides),
    /// A command was fully handled; exit
    Done,
}

pub fn handle_cli() -> CliAction {
    dispatch(Cli::parse())
}

fn dispatch(cli: Cli) -> CliAction {
    let overrides = Overrides {
        headless: cli.headless,
        demo: cli.demo,
        autostart: cli.autostart,
    };

    match cli.command {
        None => CliAction::Run(overrides),
        Some(Commands::Cycle) => CliAction::Cycle(Overrides {
            headless: true,
            ..overrides
        }),
        Some(Commands::Config {
            show,
            reset,
            edit,
            update,
            path,
        }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else if edit {
                handle_config_edit();
            } else if update {
                handle_config_update();
            } else {
                println!("Usage: contentloop config [--show|--reset|--edit|--update|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --update  Update config with new defaults (preserves user values)");
                println!("  --path    Show config file path");
            }
            CliAction::Done
        }
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let mut config = Config::from_env();
    let key_present = config.backend.has_api_key();
    if config.backend.api_key.is_some() {
        config.backend.api_key = Some("********".to_string());
    }

    println!("# Effective configuration (env > file > defaults)");
    println!("# API key: {}", if key_present { "set" } else { "not set" });
    println!("# TUI: {}, demo: {}", config.enable_tui, config.demo_mode);
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

fn handle_config_update() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    // Env overrides must not leak into the file, so merge the file alone
    let existing = Config::from_file_only();
    let updated = existing.to_toml();

    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = std::fs::write(&path, updated) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
    println!("Your values have been preserved.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        dispatch(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn no_subcommand_runs_dashboard() {
        assert_eq!(parse(&["contentloop"]), CliAction::Run(Overrides::default()));
        assert_eq!(
            parse(&["contentloop", "--demo", "--autostart"]),
            CliAction::Run(Overrides {
                headless: false,
                demo: true,
                autostart: true,
            })
        );
    }

    #[test]
    fn cycle_is_always_headless() {
        assert_eq!(
            parse(&["contentloop", "cycle", "--demo"]),
            CliAction::Cycle(Overrides {
                headless: true,
                demo: true,
                autostart: false,
            })
        );
    }

    #[test]
    fn overrides_apply_to_config() {
        let mut config = Config::default();
        Overrides {
            headless: true,
            demo: true,
            autostart: false,
        }
        .apply(&mut config);

        assert!(!config.enable_tui);
        assert!(config.demo_mode);
        assert!(!config.autostart);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn headless_help_names_stderr() {
        use clap::CommandFactory;
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "headless")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();
        assert!(help.contains("stderr"));
    }
}
