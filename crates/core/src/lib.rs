//! Muxplan Core - Core library for the muxplan tmux layout builder
//!
//! This crate provides the core functionality for muxplan including:
//! - The session → window → pane layout model
//! - Tmux command formatting (script lines and argument vectors)
//! - Command sinks (scripts, recorders, direct execution)
//! - Layout file parsing and types

pub mod config;
pub mod error;
pub mod tmux;

// Re-export commonly used types at crate root
pub use config::{LayoutConfig, PaneConfig, ResizeConfig, SplitKind, WindowConfig};
pub use error::{Error, Result};
pub use tmux::{ExecSink, Pane, PaneId, ScriptSink, Session, Sink, TmuxCommand, Window};
