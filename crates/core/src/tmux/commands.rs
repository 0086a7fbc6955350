//! Low-level tmux command values
//!
//! This module provides builder-pattern wrappers for the tmux commands a
//! layout needs. A [`TmuxCommand`] renders two ways: as a single script line
//! (`tmux split-window -v -t "dev:0.0"`) and as an argument vector for direct
//! process execution, which carries the same arguments without shell quoting.

use std::fmt;

/// Name of the tmux binary, used as the first word of every script line
pub const TMUX: &str = "tmux";

/// Placeholder name given to the window tmux creates with a new session.
///
/// The first [`Window`](super::Window) always renames it.
pub const PLACEHOLDER_WINDOW: &str = "tmp";

/// Key sent after a send-keys payload to submit it
const ENTER_KEY: &str = "C-m";

/// One argument of a tmux command
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    /// Rendered as-is in both modes
    Bare(String),
    /// Wrapped in double quotes in script mode
    Quoted(String),
    /// Wrapped in double quotes with embedded `"` escaped in script mode
    Keys(String),
}

impl Arg {
    fn as_raw(&self) -> &str {
        match self {
            Arg::Bare(s) | Arg::Quoted(s) | Arg::Keys(s) => s,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Bare(s) => f.write_str(s),
            Arg::Quoted(s) => write!(f, "\"{}\"", s),
            Arg::Keys(s) => write!(f, "\"{}\"", escape_quotes(s)),
        }
    }
}

/// Backslash-prefix every double quote. No other escaping is performed.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// A single tmux operation, ready to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxCommand {
    args: Vec<Arg>,
}

impl TmuxCommand {
    fn new(subcommand: &str) -> Self {
        Self {
            args: vec![Arg::Bare(subcommand.to_string())],
        }
    }

    fn bare(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Bare(arg.into()));
        self
    }

    fn quoted(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Quoted(arg.into()));
        self
    }

    fn keys(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Keys(arg.into()));
        self
    }

    /// The tmux subcommand, e.g. `"split-window"`
    pub fn kind(&self) -> &str {
        self.args.first().map(Arg::as_raw).unwrap_or_default()
    }

    /// Arguments for direct execution, excluding the `tmux` program name.
    ///
    /// No quoting is added and send-keys payloads are passed through unescaped.
    pub fn argv(&self) -> Vec<String> {
        self.args.iter().map(|a| a.as_raw().to_string()).collect()
    }

    /// The script line for this command, including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }

    /// `tmux kill-session -t "<session>"`
    pub fn kill_session(session: &str) -> Self {
        Self::new("kill-session").bare("-t").quoted(session)
    }

    /// `tmux rename-window -t "<target>" "<name>"`
    pub fn rename_window(target: &str, name: &str) -> Self {
        Self::new("rename-window")
            .bare("-t")
            .quoted(target)
            .quoted(name)
    }

    /// `tmux select-window -t "<target>"`
    pub fn select_window(target: &str) -> Self {
        Self::new("select-window").bare("-t").quoted(target)
    }

    /// `tmux resize-pane -t "<target>" -<R|L|U|D> <cells>`
    pub fn resize_pane(target: &str, direction: ResizeDirection, cells: u32) -> Self {
        Self::new("resize-pane")
            .bare("-t")
            .quoted(target)
            .bare(direction.flag())
            .bare(cells.to_string())
    }

    /// `tmux send-keys -t "<target>" "<keys>" C-m`
    pub fn send_keys(target: &str, keys: &str) -> Self {
        Self::new("send-keys")
            .bare("-t")
            .quoted(target)
            .keys(keys)
            .bare(ENTER_KEY)
    }
}

impl fmt::Display for TmuxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TMUX)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// =============================================================================
// Session Commands
// =============================================================================

/// Builder for new-session commands
#[derive(Default)]
pub struct NewSession<'a> {
    name: Option<&'a str>,
    detached: bool,
    start_dir: Option<&'a str>,
    window_name: Option<&'a str>,
}

impl<'a> NewSession<'a> {
    /// Create a new session builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session name
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Start the session detached
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Set the starting directory (ignored when empty)
    pub fn start_directory(mut self, dir: Option<&'a str>) -> Self {
        self.start_dir = dir.filter(|d| !d.is_empty());
        self
    }

    /// Set the initial window name
    pub fn window_name(mut self, name: &'a str) -> Self {
        self.window_name = Some(name);
        self
    }

    /// Build the new-session command
    pub fn build(self) -> TmuxCommand {
        let mut cmd = TmuxCommand::new("new-session");

        if self.detached {
            cmd = cmd.bare("-d");
        }

        if let Some(name) = self.name {
            cmd = cmd.bare("-s").quoted(name);
        }

        if let Some(dir) = self.start_dir {
            cmd = cmd.bare("-c").bare(dir);
        }

        if let Some(name) = self.window_name {
            cmd = cmd.bare("-n").bare(name);
        }

        cmd
    }
}

// =============================================================================
// Window Commands
// =============================================================================

/// Builder for new-window commands
pub struct NewWindow<'a> {
    target: &'a str,
    name: Option<&'a str>,
    start_dir: Option<&'a str>,
}

impl<'a> NewWindow<'a> {
    /// Create a builder for a window at `target` (`<session>:<index>`)
    pub fn new(target: &'a str) -> Self {
        Self {
            target,
            name: None,
            start_dir: None,
        }
    }

    /// Set the window name
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the starting directory (ignored when empty)
    pub fn start_directory(mut self, dir: Option<&'a str>) -> Self {
        self.start_dir = dir.filter(|d| !d.is_empty());
        self
    }

    /// Build the new-window command
    pub fn build(self) -> TmuxCommand {
        let mut cmd = TmuxCommand::new("new-window").bare("-t").quoted(self.target);

        if let Some(name) = self.name {
            cmd = cmd.bare("-n").quoted(name);
        }

        if let Some(dir) = self.start_dir {
            cmd = cmd.bare("-c").bare(dir);
        }

        cmd
    }
}

// =============================================================================
// Pane Commands
// =============================================================================

/// Split direction, named after tmux's own flags.
///
/// tmux's `-h` places the new pane beside the old one (left/right) and `-v`
/// places it below (top/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// `-h`: side by side
    Horizontal,
    /// `-v`: stacked
    Vertical,
}

impl SplitDirection {
    /// The tmux flag for this direction
    pub fn flag(self) -> &'static str {
        match self {
            SplitDirection::Horizontal => "-h",
            SplitDirection::Vertical => "-v",
        }
    }
}

/// Direction for resize-pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Right,
    Left,
    Up,
    Down,
}

impl ResizeDirection {
    /// The tmux flag for this direction
    pub fn flag(self) -> &'static str {
        match self {
            ResizeDirection::Right => "-R",
            ResizeDirection::Left => "-L",
            ResizeDirection::Up => "-U",
            ResizeDirection::Down => "-D",
        }
    }
}

/// Builder for split-window commands
pub struct SplitWindow<'a> {
    target: &'a str,
    direction: SplitDirection,
    start_dir: Option<&'a str>,
}

impl<'a> SplitWindow<'a> {
    /// Create a split of the pane at `target` (`<session>:<window>.<pane>`)
    pub fn new(target: &'a str, direction: SplitDirection) -> Self {
        Self {
            target,
            direction,
            start_dir: None,
        }
    }

    /// Set the starting directory (ignored when empty)
    pub fn start_directory(mut self, dir: Option<&'a str>) -> Self {
        self.start_dir = dir.filter(|d| !d.is_empty());
        self
    }

    /// Build the split-window command
    pub fn build(self) -> TmuxCommand {
        let mut cmd = TmuxCommand::new("split-window")
            .bare(self.direction.flag())
            .bare("-t")
            .quoted(self.target);

        if let Some(dir) = self.start_dir {
            cmd = cmd.bare("-c").bare(dir);
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_session() {
        let cmd = TmuxCommand::kill_session("mysession");
        assert_eq!(cmd.to_line(), "tmux kill-session -t \"mysession\"\n");
        assert_eq!(cmd.argv(), vec!["kill-session", "-t", "mysession"]);
        assert_eq!(cmd.kind(), "kill-session");
    }

    #[test]
    fn test_new_session_flag_order() {
        let cmd = NewSession::new()
            .name("dev")
            .detached()
            .start_directory(Some("/srv/app"))
            .window_name(PLACEHOLDER_WINDOW)
            .build();
        assert_eq!(
            cmd.to_string(),
            "tmux new-session -d -s \"dev\" -c /srv/app -n tmp"
        );
    }

    #[test]
    fn test_empty_directory_is_omitted() {
        let cmd = NewSession::new()
            .name("dev")
            .detached()
            .start_directory(Some(""))
            .window_name(PLACEHOLDER_WINDOW)
            .build();
        assert_eq!(cmd.to_string(), "tmux new-session -d -s \"dev\" -n tmp");

        let cmd = SplitWindow::new("dev:0.0", SplitDirection::Vertical)
            .start_directory(Some(""))
            .build();
        assert_eq!(cmd.to_string(), "tmux split-window -v -t \"dev:0.0\"");
    }

    #[test]
    fn test_new_window() {
        let cmd = NewWindow::new("dev:1")
            .name("logs")
            .start_directory(Some("/var/log"))
            .build();
        assert_eq!(
            cmd.to_string(),
            "tmux new-window -t \"dev:1\" -n \"logs\" -c /var/log"
        );
        assert_eq!(
            cmd.argv(),
            vec!["new-window", "-t", "dev:1", "-n", "logs", "-c", "/var/log"]
        );
    }

    #[test]
    fn test_split_flags() {
        let side = SplitWindow::new("s:0.1", SplitDirection::Horizontal).build();
        assert_eq!(side.to_string(), "tmux split-window -h -t \"s:0.1\"");

        let stacked = SplitWindow::new("s:0.1", SplitDirection::Vertical)
            .start_directory(Some("/tmp"))
            .build();
        assert_eq!(stacked.to_string(), "tmux split-window -v -t \"s:0.1\" -c /tmp");
    }

    #[test]
    fn test_resize_flags() {
        let cases = [
            (ResizeDirection::Right, "-R"),
            (ResizeDirection::Left, "-L"),
            (ResizeDirection::Up, "-U"),
            (ResizeDirection::Down, "-D"),
        ];
        for (direction, flag) in cases {
            let cmd = TmuxCommand::resize_pane("s:0.0", direction, 5);
            assert_eq!(
                cmd.to_string(),
                format!("tmux resize-pane -t \"s:0.0\" {} 5", flag)
            );
        }
    }

    #[test]
    fn test_send_keys_escapes_quotes_in_script_only() {
        let cmd = TmuxCommand::send_keys("s:0.0", "say \"hi\"");
        assert_eq!(
            cmd.to_string(),
            "tmux send-keys -t \"s:0.0\" \"say \\\"hi\\\"\" C-m"
        );
        assert_eq!(cmd.argv(), vec!["send-keys", "-t", "s:0.0", "say \"hi\"", "C-m"]);
    }

    #[test]
    fn test_rename_and_select() {
        assert_eq!(
            TmuxCommand::rename_window("s:2", "editor").to_string(),
            "tmux rename-window -t \"s:2\" \"editor\""
        );
        assert_eq!(
            TmuxCommand::select_window("s:2").to_string(),
            "tmux select-window -t \"s:2\""
        );
    }
}
