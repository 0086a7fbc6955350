//! Session, window and pane layout model.
//!
//! A [`Session`] is the root of a layout tree and owns the [`Sink`] every
//! command is emitted into. Windows and panes live inside the session as plain
//! indexed records; [`Window`] and [`Pane`] are short-lived handles that borrow
//! the session mutably, so the tree has no back-pointers.
//!
//! # Emission Order
//!
//! Every operation emits its command before returning, in call order. Replaying
//! the output from the top rebuilds the layout, because later commands only
//! address windows and panes created by earlier ones:
//!
//! 1. `Session::new` emits `kill-session` then `new-session`
//! 2. `add_window` emits `new-window` (not for window 0, which `new-session`
//!    created) and always `rename-window`
//! 3. pane operations emit one command each; splits also allocate a pane
//!
//! # Addressing
//!
//! Windows are addressed as `<session>:<window>` and panes as
//! `<session>:<window>.<pane>`. Indices start at 0, follow creation order and
//! are never reused.
//!
//! # Directories
//!
//! A directory given to a split overrides the window's directory, which
//! overrides the session's. When none of them is set the `-c` flag is left
//! out and tmux uses its own default.

use tracing::debug;

use super::{
    commands::{
        NewSession, NewWindow, PLACEHOLDER_WINDOW, ResizeDirection, SplitDirection, SplitWindow,
        TmuxCommand,
    },
    sink::Sink,
};
use crate::error::{Error, Result};

/// Target string for a window, e.g. `dev:1`
pub fn window_target(session: &str, window: usize) -> String {
    format!("{}:{}", session, window)
}

/// Target string for a pane, e.g. `dev:1.0`
pub fn pane_target(session: &str, window: usize, pane: usize) -> String {
    format!("{}:{}.{}", session, window, pane)
}

/// Emit a lone kill-session command.
///
/// [`Session::new`] already does this for its own name.
pub fn kill_session<S: Sink>(name: &str, sink: &mut S) -> Result<TmuxCommand> {
    let command = TmuxCommand::kill_session(name);
    debug!(session = name, kind = command.kind(), "{}", command);
    sink.emit(&command).map_err(Error::Sink)?;
    Ok(command)
}

/// Stable address of a pane inside a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId {
    pub window: usize,
    pub pane: usize,
}

fn non_empty(dir: String) -> Option<String> {
    if dir.is_empty() { None } else { Some(dir) }
}

#[derive(Debug)]
struct WindowState {
    name: String,
    directory: Option<String>,
    panes: Vec<usize>,
    next_pane: usize,
}

impl WindowState {
    /// New window record holding the implicit pane 0
    fn new(name: String, directory: Option<String>) -> Self {
        let mut state = Self {
            name,
            directory,
            panes: Vec::new(),
            next_pane: 0,
        };
        state.add_pane();
        state
    }

    fn add_pane(&mut self) -> usize {
        let index = self.next_pane;
        self.panes.push(index);
        self.next_pane += 1;
        index
    }
}

/// A tmux session under construction
#[derive(Debug)]
pub struct Session<S: Sink> {
    name: String,
    directory: Option<String>,
    windows: Vec<WindowState>,
    next_window: usize,
    sink: S,
}

impl<S: Sink> Session<S> {
    /// Replace any session called `name` with a fresh detached one
    pub fn new(name: impl Into<String>, sink: S) -> Result<Self> {
        Self::create(name.into(), None, sink)
    }

    /// Like [`Session::new`], with a default working directory for the
    /// session. An empty directory counts as none.
    pub fn with_directory(
        name: impl Into<String>,
        directory: impl Into<String>,
        sink: S,
    ) -> Result<Self> {
        Self::create(name.into(), non_empty(directory.into()), sink)
    }

    fn create(name: String, directory: Option<String>, sink: S) -> Result<Self> {
        let mut session = Self {
            name,
            directory,
            windows: Vec::new(),
            next_window: 0,
            sink,
        };

        let kill = TmuxCommand::kill_session(&session.name);
        session.emit(kill)?;

        let create = NewSession::new()
            .name(&session.name)
            .detached()
            .start_directory(session.directory.as_deref())
            .window_name(PLACEHOLDER_WINDOW)
            .build();
        session.emit(create)?;

        Ok(session)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Add a window at the next index
    pub fn add_window(&mut self, name: impl Into<String>) -> Result<Window<'_, S>> {
        self.push_window(name.into(), None)
    }

    /// Add a window at the next index with its own working directory
    pub fn add_window_in(
        &mut self,
        name: impl Into<String>,
        directory: impl Into<String>,
    ) -> Result<Window<'_, S>> {
        self.push_window(name.into(), non_empty(directory.into()))
    }

    fn push_window(&mut self, name: String, directory: Option<String>) -> Result<Window<'_, S>> {
        let index = self.next_window;
        let target = window_target(&self.name, index);

        let create = (index != 0).then(|| {
            NewWindow::new(&target)
                .name(&name)
                .start_directory(directory.as_deref())
                .build()
        });
        let rename = TmuxCommand::rename_window(&target, &name);

        self.windows.push(WindowState::new(name, directory));
        self.next_window += 1;

        if let Some(create) = create {
            self.emit(create)?;
        }
        self.emit(rename)?;

        Ok(Window {
            session: self,
            index,
        })
    }

    /// Handle to an existing window
    pub fn window(&mut self, index: usize) -> Result<Window<'_, S>> {
        if index >= self.windows.len() {
            return Err(Error::WindowOutOfRange {
                session: self.name.clone(),
                index,
                count: self.windows.len(),
            });
        }
        Ok(Window {
            session: self,
            index,
        })
    }

    /// Handle to an existing pane
    pub fn pane(&mut self, id: PaneId) -> Result<Pane<'_, S>> {
        self.window(id.window)?.into_pane(id.pane)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Finish building and hand the sink back
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, command: TmuxCommand) -> Result<TmuxCommand> {
        debug!(session = %self.name, kind = command.kind(), "{}", command);
        self.sink.emit(&command).map_err(Error::Sink)?;
        Ok(command)
    }

    fn resolve_directory(&self, window: usize, explicit: &str) -> Option<String> {
        [
            Some(explicit),
            self.windows[window].directory.as_deref(),
            self.directory.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|dir| !dir.is_empty())
        .map(str::to_string)
    }

    /// Emit a split of `id` and allocate the new pane.
    ///
    /// `directory` of `None` never adds `-c`; `Some` goes through the cascade.
    fn split_pane(
        &mut self,
        id: PaneId,
        direction: SplitDirection,
        directory: Option<&str>,
    ) -> Result<PaneId> {
        let resolved = directory.and_then(|dir| self.resolve_directory(id.window, dir));
        let target = pane_target(&self.name, id.window, id.pane);
        let split = SplitWindow::new(&target, direction)
            .start_directory(resolved.as_deref())
            .build();

        let pane = self.windows[id.window].add_pane();
        self.emit(split)?;

        Ok(PaneId {
            window: id.window,
            pane,
        })
    }
}

/// Handle to one window of a [`Session`]
#[derive(Debug)]
pub struct Window<'a, S: Sink> {
    session: &'a mut Session<S>,
    index: usize,
}

impl<'a, S: Sink> Window<'a, S> {
    fn state(&self) -> &WindowState {
        &self.session.windows[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.state().name
    }

    /// The window's own directory, without falling back to the session's
    pub fn directory(&self) -> Option<&str> {
        self.state().directory.as_deref()
    }

    pub fn target(&self) -> String {
        window_target(&self.session.name, self.index)
    }

    pub fn pane_count(&self) -> usize {
        self.state().panes.len()
    }

    fn check_pane(&self, index: usize) -> Result<PaneId> {
        let panes = &self.state().panes;
        let pane = panes.get(index).copied().ok_or_else(|| Error::PaneOutOfRange {
            target: self.target(),
            index,
            count: panes.len(),
        })?;
        Ok(PaneId {
            window: self.index,
            pane,
        })
    }

    /// Handle to the pane at `index`
    pub fn pane(&mut self, index: usize) -> Result<Pane<'_, S>> {
        let id = self.check_pane(index)?;
        Ok(Pane {
            session: &mut *self.session,
            id,
        })
    }

    /// Like [`Window::pane`], consuming the window handle
    pub fn into_pane(self, index: usize) -> Result<Pane<'a, S>> {
        let id = self.check_pane(index)?;
        Ok(Pane {
            session: self.session,
            id,
        })
    }

    /// Run a command in pane 0
    pub fn exec(&mut self, command: &str) -> Result<TmuxCommand> {
        self.pane(0)?.exec(command)
    }

    /// Make this the session's active window
    pub fn select(&mut self) -> Result<TmuxCommand> {
        let command = TmuxCommand::select_window(&self.target());
        self.session.emit(command)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<TmuxCommand> {
        let name = name.into();
        let command = TmuxCommand::rename_window(&self.target(), &name);
        self.session.windows[self.index].name = name;
        self.session.emit(command)
    }
}

/// Handle to one pane of a [`Window`]
#[derive(Debug)]
pub struct Pane<'a, S: Sink> {
    session: &'a mut Session<S>,
    id: PaneId,
}

impl<'a, S: Sink> Pane<'a, S> {
    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.id.pane
    }

    pub fn window_index(&self) -> usize {
        self.id.window
    }

    pub fn target(&self) -> String {
        pane_target(&self.session.name, self.id.window, self.id.pane)
    }

    /// Type `command` into the pane and press enter.
    ///
    /// Double quotes are escaped for the script line; the command is otherwise
    /// sent as written.
    pub fn exec(&mut self, command: &str) -> Result<TmuxCommand> {
        let keys = TmuxCommand::send_keys(&self.target(), command);
        self.session.emit(keys)
    }

    fn split_into(
        &mut self,
        direction: SplitDirection,
        directory: Option<&str>,
    ) -> Result<Pane<'_, S>> {
        let id = self.session.split_pane(self.id, direction, directory)?;
        Ok(Pane {
            session: &mut *self.session,
            id,
        })
    }

    /// Split top/bottom (`split-window -v`) and return the new pane
    pub fn split(&mut self) -> Result<Pane<'_, S>> {
        self.split_into(SplitDirection::Vertical, None)
    }

    /// Split left/right (`split-window -h`) and return the new pane
    pub fn vsplit(&mut self) -> Result<Pane<'_, S>> {
        self.split_into(SplitDirection::Horizontal, None)
    }

    /// [`Pane::split`] starting in `directory`, or in the window's or session's
    /// directory when `directory` is empty
    pub fn split_with_directory(&mut self, directory: &str) -> Result<Pane<'_, S>> {
        self.split_into(SplitDirection::Vertical, Some(directory))
    }

    /// [`Pane::vsplit`] with the same directory fallback as
    /// [`Pane::split_with_directory`]
    pub fn vsplit_with_directory(&mut self, directory: &str) -> Result<Pane<'_, S>> {
        self.split_into(SplitDirection::Horizontal, Some(directory))
    }

    pub fn resize(&mut self, direction: ResizeDirection, cells: u32) -> Result<TmuxCommand> {
        let command = TmuxCommand::resize_pane(&self.target(), direction, cells);
        self.session.emit(command)
    }

    pub fn resize_right(&mut self, cells: u32) -> Result<TmuxCommand> {
        self.resize(ResizeDirection::Right, cells)
    }

    pub fn resize_left(&mut self, cells: u32) -> Result<TmuxCommand> {
        self.resize(ResizeDirection::Left, cells)
    }

    pub fn resize_up(&mut self, cells: u32) -> Result<TmuxCommand> {
        self.resize(ResizeDirection::Up, cells)
    }

    pub fn resize_down(&mut self, cells: u32) -> Result<TmuxCommand> {
        self.resize(ResizeDirection::Down, cells)
    }
}
