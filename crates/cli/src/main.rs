//! Muxplan CLI - declarative tmux layouts.
//!
//! Muxplan reads a layout file describing a session, its windows and their
//! panes, and turns it into the ordered tmux commands that recreate it.
//!
//! # Architecture
//!
//! The CLI handles:
//! - **Layout resolution**: Walks up the directory tree to find `muxplan.yaml`
//! - **Output selection**: script text, JSON plan, or direct execution
//! - **Session management**: Kills sessions and attaches after a build
//!
//! The layout model and command formatting live in `muxplan-core`.

mod cli;
mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::Colorize;
use muxplan_core::config::{LAYOUT_FILE, generate_layout, load_layout};
use tracing_subscriber::EnvFilter;

use commands::{
    layout::{apply_layout, print_plan, write_script},
    session::do_kill_session,
};

// =============================================================================
// Main Entry Point
// =============================================================================

/// Entry point for the muxplan CLI.
///
/// - **Subcommands** (`init`, `script`, `plan`, `apply`, `kill`): dispatched directly
/// - **No args**: print the script for the nearest layout file, or show help
///
/// The layout path is resolved by walking up the directory tree from the
/// current directory until `muxplan.yaml` is found, or uses the path given
/// with `-f/--file`.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout_path = resolve_layout_path(cli.file.as_deref());

    match cli.command {
        Some(Commands::Init) => init_layout(),
        Some(Commands::Script { output }) => {
            require_layout(&layout_path)?;
            write_script(&layout_path, output.as_deref())
        }
        Some(Commands::Plan) => {
            require_layout(&layout_path)?;
            print_plan(&layout_path)
        }
        Some(Commands::Apply { attach }) => {
            require_layout(&layout_path)?;
            apply_layout(&layout_path, attach)
        }
        Some(Commands::Kill { session, dry_run }) => {
            let name = match session {
                Some(name) => name,
                None => {
                    require_layout(&layout_path)?;
                    load_layout(&layout_path)
                        .with_context(|| {
                            format!("Failed to load layout {}", display_path(&layout_path))
                        })?
                        .session
                }
            };
            do_kill_session(&name, dry_run)
        }
        None if cli.file.is_some() || layout_path.exists() => write_script(&layout_path, None),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Send logs to stderr so scripts on stdout stay clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// =============================================================================
// Path Resolution
// =============================================================================

/// Resolve layout path from CLI option or the nearest muxplan.yaml
fn resolve_layout_path(cli_path: Option<&str>) -> PathBuf {
    if let Some(p) = cli_path {
        let path = PathBuf::from(p);
        return path.canonicalize().unwrap_or(path);
    }

    // Walk up directory tree looking for muxplan.yaml
    let mut current = std::env::current_dir().unwrap_or_default();
    loop {
        let candidate = current.join(LAYOUT_FILE);
        if candidate.exists() {
            return candidate.canonicalize().unwrap_or(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => break,
        }
    }

    std::env::current_dir().unwrap_or_default().join(LAYOUT_FILE)
}

fn require_layout(layout_path: &Path) -> Result<()> {
    if !layout_path.exists() {
        anyhow::bail!(
            "No {} found. Run '{}' to create one.",
            display_path(layout_path),
            "muxplan init".blue()
        );
    }
    Ok(())
}

/// Convert absolute path to display path (replace home with ~)
pub(crate) fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| {
            path.strip_prefix(&home)
                .ok()
                .map(|rel| Path::new("~").join(rel).display().to_string())
        })
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Layout Commands
// =============================================================================

/// Create a starter muxplan.yaml in the current directory
fn init_layout() -> Result<()> {
    use dialoguer::{Input, theme::ColorfulTheme};

    let current_dir = std::env::current_dir()?;
    let layout_path = current_dir.join(LAYOUT_FILE);

    if layout_path.exists() {
        anyhow::bail!("{} already exists in this directory", LAYOUT_FILE);
    }

    let theme = ColorfulTheme::default();

    // Default name from directory
    let default_name = current_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "workspace".to_string());

    let name: String = Input::with_theme(&theme)
        .with_prompt("Session name")
        .default(default_name)
        .interact_text()?;

    std::fs::write(&layout_path, generate_layout(&name))?;
    println!("{} {} {}", "✔".green(), "Created".dimmed(), LAYOUT_FILE);

    println!();
    println!("Preview with: {}", "muxplan script".blue());
    println!("Launch with:  {}", "muxplan apply".blue());

    Ok(())
}
