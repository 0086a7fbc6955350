//! Tmux layout building for muxplan.
//!
//! This module turns an in-process session → window → pane tree into the
//! ordered tmux commands that recreate it.
//!
//! # Submodules
//!
//! - [`commands`]: tmux command values and builders (NewSession, SplitWindow, etc.)
//! - [`session`]: the layout model ([`Session`], [`Window`], [`Pane`])
//! - [`sink`]: where emitted commands go ([`ScriptSink`], [`ExecSink`])
//!
//! # Usage
//!
//! ```ignore
//! use muxplan_core::tmux::{ScriptSink, Session};
//!
//! let mut session = Session::new("dev", ScriptSink::new(std::io::stdout()))?;
//! let mut logs = session.add_window("logs")?;
//! logs.exec("tail -f /var/log/system.log")?;
//! logs.pane(0)?.vsplit()?.exec("htop")?;
//! ```

mod commands;
mod session;
mod sink;

pub use commands::*;
pub use session::*;
pub use sink::*;
