//! Layout output commands for muxplan.
//!
//! Turns a loaded layout file into a script, a JSON plan, or a live tmux
//! session.

use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use colored::Colorize;
use muxplan_core::{
    ExecSink, LayoutConfig, ScriptSink, TmuxCommand,
    config::load_layout,
    tmux::TMUX,
};
use serde::Serialize;

use crate::display_path;

/// JSON output format for one planned command
#[derive(Serialize)]
pub struct PlannedCommand {
    /// tmux subcommand (e.g., "split-window")
    pub kind: String,
    /// Arguments after the program name, unquoted
    pub args: Vec<String>,
}

impl From<&TmuxCommand> for PlannedCommand {
    fn from(command: &TmuxCommand) -> Self {
        PlannedCommand {
            kind: command.kind().to_string(),
            args: command.argv(),
        }
    }
}

fn load(layout_path: &Path) -> Result<LayoutConfig> {
    load_layout(layout_path)
        .with_context(|| format!("Failed to load layout {}", display_path(layout_path)))
}

/// Write the layout as a script to stdout or `output`
pub fn write_script(layout_path: &Path, output: Option<&str>) -> Result<()> {
    let config = load(layout_path)?;

    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
            let session = config.build(ScriptSink::new(BufWriter::new(file)))?;
            session.into_sink().into_inner()?;
            eprintln!("{} {} {}", "✔".green(), "Wrote".dimmed(), path);
        }
        None => {
            let stdout = io::stdout();
            let session = config.build(ScriptSink::new(stdout.lock()))?;
            session.into_sink().into_inner()?;
        }
    }

    Ok(())
}

/// Print the layout's commands as JSON
pub fn print_plan(layout_path: &Path) -> Result<()> {
    let config = load(layout_path)?;
    let session = config.build(Vec::<TmuxCommand>::new())?;

    let plan: Vec<PlannedCommand> = session.sink().iter().map(PlannedCommand::from).collect();
    let json = serde_json::to_string_pretty(&plan)?;
    println!("{}", json);

    Ok(())
}

/// Run the layout against tmux
pub fn apply_layout(layout_path: &Path, attach: bool) -> Result<()> {
    let config = load(layout_path)?;
    let session = config
        .build(ExecSink::new())
        .with_context(|| format!("Failed to build session {}", config.session))?;

    eprintln!(
        "{} {} session {}",
        "✔".green(),
        "Created".dimmed(),
        session.name().blue()
    );

    if attach {
        std::process::Command::new(TMUX)
            .args(["attach-session", "-t", session.name()])
            .status()
            .context("Failed to attach to tmux session")?;
    } else {
        println!();
        println!(
            "Attach with: {}",
            format!("tmux attach -t {}", session.name()).blue()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_command_json() {
        let command = TmuxCommand::send_keys("dev:0.1", "echo \"hi\"");
        let json = serde_json::to_string(&PlannedCommand::from(&command)).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"send-keys","args":["send-keys","-t","dev:0.1","echo \"hi\"","C-m"]}"#
        );
    }

    #[test]
    fn test_write_script_to_file() {
        let dir = std::env::temp_dir().join(format!(
            "muxplan-cli-script-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let layout = dir.join("muxplan.yaml");
        let output = dir.join("layout.sh");
        std::fs::write(&layout, "session: t\nwindows:\n  main: {}\n").unwrap();

        write_script(&layout, output.to_str()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "tmux kill-session -t \"t\"\n\
             tmux new-session -d -s \"t\" -n tmp\n\
             tmux rename-window -t \"t:0\" \"main\"\n"
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
