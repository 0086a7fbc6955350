//! Destinations for emitted tmux commands.
//!
//! A layout emits each command the moment it is built. The [`Sink`] decides
//! what happens to it: [`ScriptSink`] writes one script line per command to
//! any [`io::Write`], [`ExecSink`] runs each command as its own `tmux`
//! process, and `Vec<TmuxCommand>` simply records them.

use std::{
    io::{self, Write},
    process::Command,
};

use tracing::warn;

use super::commands::{TMUX, TmuxCommand};

/// Accepts commands in the order they are emitted
pub trait Sink {
    /// Take one command. Errors are returned to the layout operation that
    /// emitted it.
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()> {
        (**self).emit(command)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()> {
        (**self).emit(command)
    }
}

impl Sink for Vec<TmuxCommand> {
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()> {
        self.push(command.clone());
        Ok(())
    }
}

/// Writes each command as a newline-terminated script line
#[derive(Debug, Default)]
pub struct ScriptSink<W> {
    writer: W,
}

impl<W: Write> ScriptSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl ScriptSink<Vec<u8>> {
    /// Script written so far, for in-memory sinks
    pub fn script(&self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<W: Write> Sink for ScriptSink<W> {
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()> {
        self.writer.write_all(command.to_line().as_bytes())
    }
}

/// Runs each command synchronously as a separate tmux process.
///
/// Only a failure to spawn the process is an error. A non-zero exit status is
/// logged and emission continues with the next command.
#[derive(Debug, Clone)]
pub struct ExecSink {
    program: String,
}

impl ExecSink {
    /// Execute commands with the `tmux` binary found on `PATH`
    pub fn new() -> Self {
        Self::with_program(TMUX)
    }

    /// Execute commands with a specific binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ExecSink {
    fn emit(&mut self, command: &TmuxCommand) -> io::Result<()> {
        let status = Command::new(&self.program).args(command.argv()).status()?;
        if !status.success() {
            warn!(command = %command, %status, "tmux command failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_script_sink_writes_lines_in_order() {
        let mut sink = ScriptSink::new(Vec::new());
        sink.emit(&TmuxCommand::kill_session("a")).unwrap();
        sink.emit(&TmuxCommand::select_window("a:0")).unwrap();
        assert_eq!(
            sink.script(),
            "tmux kill-session -t \"a\"\ntmux select-window -t \"a:0\"\n"
        );
    }

    #[test]
    fn test_script_sink_surfaces_write_errors() {
        let mut sink = ScriptSink::new(BrokenWriter);
        let err = sink.emit(&TmuxCommand::kill_session("a")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_vec_sink_records_commands() {
        let mut recorded: Vec<TmuxCommand> = Vec::new();
        recorded.emit(&TmuxCommand::kill_session("a")).unwrap();
        assert_eq!(recorded, vec![TmuxCommand::kill_session("a")]);
    }

    #[test]
    fn test_exec_sink_missing_binary_is_an_error() {
        let mut sink = ExecSink::with_program("/nonexistent/muxplan-tmux");
        assert!(sink.emit(&TmuxCommand::kill_session("a")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_sink_ignores_exit_status() {
        let mut sink = ExecSink::with_program("false");
        assert!(sink.emit(&TmuxCommand::kill_session("a")).is_ok());
    }
}
