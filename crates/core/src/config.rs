//! Layout file configuration for muxplan
//!
//! A layout file (`muxplan.yaml`) describes one session declaratively. Loading
//! it yields a [`LayoutConfig`], and [`LayoutConfig::build`] replays it through
//! the [`Session`] model, so a layout file produces exactly the commands the
//! equivalent builder calls would.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    tmux::{Pane, PaneId, ResizeDirection, Session, Sink},
};

/// Default layout file name
pub const LAYOUT_FILE: &str = "muxplan.yaml";

// =============================================================================
// Layout Configuration
// =============================================================================

/// A session layout loaded from YAML
#[derive(Debug, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Session name (used as the tmux session name)
    #[serde(alias = "name")]
    pub session: String,
    /// Default working directory for every window and pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Windows by name, in index order
    #[serde(default)]
    pub windows: IndexMap<String, WindowConfig>,
    /// Path to the layout file (set during loading, not from YAML)
    #[serde(skip)]
    pub layout_path: Option<PathBuf>,
}

/// One window of a layout
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Working directory for this window's panes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Make this the active window once the layout is built
    #[serde(default)]
    pub select: bool,
    /// Panes in index order. The first entry describes the implicit pane 0.
    #[serde(default)]
    pub panes: Vec<PaneConfig>,
}

/// How a pane is split off an existing one.
///
/// `horizontal` and `vertical` are accepted as the builder's names for the
/// same splits: `horizontal` is [`Pane::split`], `vertical` is [`Pane::vsplit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    /// New pane below (`split-window -v`)
    #[serde(alias = "horizontal")]
    Below,
    /// New pane to the right (`split-window -h`)
    #[serde(alias = "vertical")]
    Right,
}

/// One pane of a window
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaneConfig {
    /// Required for every pane except the first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitKind>,
    /// Pane to split, defaults to the previous one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    /// Working directory for the split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Commands typed into the pane once it exists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeConfig>,
}

/// Resize amounts in cells, applied in the order right, left, up, down
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ResizeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<u32>,
}

impl ResizeConfig {
    fn steps(&self) -> impl Iterator<Item = (ResizeDirection, u32)> {
        [
            (ResizeDirection::Right, self.right),
            (ResizeDirection::Left, self.left),
            (ResizeDirection::Up, self.up),
            (ResizeDirection::Down, self.down),
        ]
        .into_iter()
        .filter_map(|(direction, cells)| cells.map(|c| (direction, c)))
    }
}

impl LayoutConfig {
    /// Directory containing the layout file
    pub fn layout_dir(&self) -> Option<PathBuf> {
        self.layout_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }

    /// Check the pane structure without emitting anything
    pub fn validate(&self) -> Result<()> {
        if self.session.is_empty() {
            return Err(Error::Config("session name is empty".to_string()));
        }

        for (name, window) in &self.windows {
            for (index, pane) in window.panes.iter().enumerate() {
                match (index, pane.split) {
                    (0, Some(_)) => {
                        return Err(Error::Config(format!(
                            "window '{}': the first pane already exists and cannot set 'split'",
                            name
                        )));
                    }
                    (0, None) => {}
                    (_, None) => {
                        return Err(Error::Config(format!(
                            "window '{}': pane {} needs 'split: below' or 'split: right'",
                            name, index
                        )));
                    }
                    (_, Some(_)) => {
                        let from = pane.from.unwrap_or(index - 1);
                        if from >= index {
                            return Err(Error::Config(format!(
                                "window '{}': pane {} splits pane {}, which does not exist yet",
                                name, index, from
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Build the layout into `sink`.
    ///
    /// The file is validated first, so an invalid layout emits nothing. Pane
    /// directories fall back to the window's and then the session's, the same
    /// as [`Pane::split_with_directory`].
    pub fn build<S: Sink>(&self, sink: S) -> Result<Session<S>> {
        self.validate()?;

        let mut session = match &self.directory {
            Some(dir) => Session::with_directory(&self.session, expand_path(dir), sink)?,
            None => Session::new(&self.session, sink)?,
        };

        for (name, config) in &self.windows {
            let mut window = match &config.directory {
                Some(dir) => session.add_window_in(name, expand_path(dir))?,
                None => session.add_window(name)?,
            };
            debug!(window = %name, index = window.index(), "building window");

            let mut ids: Vec<PaneId> = Vec::with_capacity(config.panes.len().max(1));
            ids.push(window.pane(0)?.id());

            for (index, pane_config) in config.panes.iter().enumerate() {
                let id = match pane_config.split {
                    None => ids[0],
                    Some(kind) => {
                        let from = pane_config.from.unwrap_or(index - 1);
                        let directory = pane_config
                            .directory
                            .as_deref()
                            .map(expand_path)
                            .unwrap_or_default();
                        let mut source = window.pane(ids[from].pane)?;
                        let id = match kind {
                            SplitKind::Below => source.split_with_directory(&directory)?.id(),
                            SplitKind::Right => source.vsplit_with_directory(&directory)?.id(),
                        };
                        ids.push(id);
                        id
                    }
                };
                apply_pane(&mut window.pane(id.pane)?, pane_config)?;
            }

            if config.select {
                window.select()?;
            }
        }

        Ok(session)
    }
}

fn apply_pane<S: Sink>(pane: &mut Pane<'_, S>, config: &PaneConfig) -> Result<()> {
    for command in &config.commands {
        pane.exec(command)?;
    }
    if let Some(resize) = &config.resize {
        for (direction, cells) in resize.steps() {
            pane.resize(direction, cells)?;
        }
    }
    Ok(())
}

// =============================================================================
// Loading
// =============================================================================

/// Load and parse a layout file
pub fn load_layout(path: &Path) -> Result<LayoutConfig> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_layout(&content)?;
    config.layout_path = Some(path.to_path_buf());
    Ok(config)
}

/// Parse layout YAML
pub fn parse_layout(content: &str) -> Result<LayoutConfig> {
    Ok(serde_yaml::from_str(content)?)
}

/// Generate a starter layout file
pub fn generate_layout(session: &str) -> String {
    format!(
        r#"# =============================================================================
# muxplan layout
# =============================================================================
# Build with:    muxplan apply
# Preview with:  muxplan script
#
# Directories cascade: pane -> window -> session. "~/" is expanded.

session: {session}
# directory: ~/src/{session}

windows:
  # Window 0 is created with the session and renamed
  editor:
    select: true
    panes:
      # The first entry configures the pane every window starts with
      - commands:
          - "vim ."
      # split: right  -> side by side (tmux split-window -h)
      # split: below  -> stacked      (tmux split-window -v)
      - split: right
        commands:
          - "git status"
        # resize: {{ left: 20 }}

  logs:
    # directory: /var/log
    panes:
      - commands:
          - "tail -f /var/log/system.log"
      - split: below
        from: 0
"#,
        session = session,
    )
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &str) -> String {
    path.strip_prefix("~/")
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmux::{ScriptSink, TmuxCommand};

    fn build_script(yaml: &str) -> Result<String> {
        let config = parse_layout(yaml)?;
        let session = config.build(ScriptSink::new(Vec::new()))?;
        Ok(session.sink().script())
    }

    #[test]
    fn test_build_layout() {
        let yaml = r#"
session: dev
windows:
  LOGS:
    panes:
      - commands: ["tail -f /var/log/authd.log"]
      - split: below
        commands: ["tail -f /var/log/system.log"]
  Vim:
    select: true
    panes:
      - commands: ['echo "this is to vim" | vim -']
        resize: { right: 30 }
      - split: right
        from: 0
        commands: ["cd /tmp/", "ls -la"]
"#;
        let script = build_script(yaml).unwrap();
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            [
                "tmux kill-session -t \"dev\"",
                "tmux new-session -d -s \"dev\" -n tmp",
                "tmux rename-window -t \"dev:0\" \"LOGS\"",
                "tmux send-keys -t \"dev:0.0\" \"tail -f /var/log/authd.log\" C-m",
                "tmux split-window -v -t \"dev:0.0\"",
                "tmux send-keys -t \"dev:0.1\" \"tail -f /var/log/system.log\" C-m",
                "tmux new-window -t \"dev:1\" -n \"Vim\"",
                "tmux rename-window -t \"dev:1\" \"Vim\"",
                "tmux send-keys -t \"dev:1.0\" \"echo \\\"this is to vim\\\" | vim -\" C-m",
                "tmux resize-pane -t \"dev:1.0\" -R 30",
                "tmux split-window -h -t \"dev:1.0\"",
                "tmux send-keys -t \"dev:1.1\" \"cd /tmp/\" C-m",
                "tmux send-keys -t \"dev:1.1\" \"ls -la\" C-m",
                "tmux select-window -t \"dev:1\"",
            ]
        );
    }

    #[test]
    fn test_layout_directories_cascade() {
        let yaml = r#"
session: dev
directory: /srv
windows:
  a:
    directory: /srv/a
    panes:
      - {}
      - split: below
  b:
    panes:
      - {}
      - split: right
        directory: /tmp
      - split: below
"#;
        let script = build_script(yaml).unwrap();
        let splits: Vec<&str> = script
            .lines()
            .filter(|l| l.contains("split-window"))
            .collect();
        assert_eq!(
            splits,
            [
                "tmux split-window -v -t \"dev:0.0\" -c /srv/a",
                "tmux split-window -h -t \"dev:1.0\" -c /tmp",
                "tmux split-window -v -t \"dev:1.1\" -c /srv",
            ]
        );
        assert!(script.contains("tmux new-window -t \"dev:1\" -n \"b\"\n"));
    }

    #[test]
    fn test_builder_split_names_are_accepted() {
        let yaml = r#"
session: dev
directory: /srv/project
windows:
  logs:
    directory: /var/log
    select: true
    panes:
      - commands: ["tail -f syslog"]
      - split: vertical
        from: 0
        directory: /tmp
        commands: ["ls -la"]
        resize: { right: 30 }
      - split: horizontal
"#;
        let config = parse_layout(yaml).unwrap();
        let panes = &config.windows["logs"].panes;
        assert_eq!(panes[1].split, Some(SplitKind::Right));
        assert_eq!(panes[2].split, Some(SplitKind::Below));

        let script = config.build(ScriptSink::new(Vec::new())).unwrap().sink().script();
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines[3..],
            [
                "tmux send-keys -t \"dev:0.0\" \"tail -f syslog\" C-m",
                "tmux split-window -h -t \"dev:0.0\" -c /tmp",
                "tmux send-keys -t \"dev:0.1\" \"ls -la\" C-m",
                "tmux resize-pane -t \"dev:0.1\" -R 30",
                "tmux split-window -v -t \"dev:0.1\" -c /var/log",
                "tmux select-window -t \"dev:0\"",
            ]
        );
    }

    #[test]
    fn test_first_pane_cannot_split() {
        let yaml = "session: dev\nwindows:\n  a:\n    panes:\n      - split: below\n";
        assert!(matches!(build_script(yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_later_pane_needs_split() {
        let yaml = "session: dev\nwindows:\n  a:\n    panes:\n      - {}\n      - commands: [ls]\n";
        assert!(matches!(build_script(yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_split_from_future_pane() {
        let yaml = "session: dev\nwindows:\n  a:\n    panes:\n      - {}\n      - split: right\n        from: 1\n";
        let config = parse_layout(yaml).unwrap();

        let mut recorded: Vec<TmuxCommand> = Vec::new();
        assert!(config.build(&mut recorded).is_err());
        assert!(recorded.is_empty());
    }

    #[test]
    fn test_window_without_panes() {
        let script = build_script("session: dev\nwindows:\n  only: {}\n").unwrap();
        assert_eq!(script.lines().count(), 3);
    }

    #[test]
    fn test_generated_layout_builds() {
        let config = parse_layout(&generate_layout("demo")).unwrap();
        assert_eq!(config.session, "demo");
        assert_eq!(config.windows.len(), 2);

        let session = config.build(ScriptSink::new(Vec::new())).unwrap();
        assert_eq!(session.window_count(), 2);
        assert!(session.sink().script().contains("tmux select-window -t \"demo:0\""));
    }

    #[test]
    fn test_load_layout_records_path() {
        let path = std::env::temp_dir().join(format!(
            "muxplan-test-layout-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "name: from-file\n").unwrap();

        let config = load_layout(&path).unwrap();
        assert_eq!(config.session, "from-file");
        assert_eq!(config.layout_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.layout_dir(), Some(std::env::temp_dir()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/abs/path"), "/abs/path");
        assert_eq!(expand_path("relative"), "relative");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_path("~/src"),
                home.join("src").to_string_lossy().into_owned()
            );
        }
    }
}
