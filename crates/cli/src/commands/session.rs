//! Session management commands for muxplan.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use muxplan_core::{ExecSink, ScriptSink, tmux::kill_session};

/// Kill a tmux session, or print the command when `dry_run` is set
pub fn do_kill_session(name: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        write_kill_script(name, std::io::stdout().lock())?;
        return Ok(());
    }

    kill_session(name, &mut ExecSink::new())
        .with_context(|| format!("Failed to kill session {}", name))?;
    eprintln!("{} {} session {}", "✔".green(), "Killed".dimmed(), name.blue());

    Ok(())
}

/// Write the kill-session script line to `writer` and hand it back
fn write_kill_script<W: Write>(name: &str, writer: W) -> Result<W> {
    let mut sink = ScriptSink::new(writer);
    kill_session(name, &mut sink)?;
    Ok(sink.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_writes_kill_script() {
        let script = write_kill_script("old-layout", Vec::new()).unwrap();
        assert_eq!(
            String::from_utf8(script).unwrap(),
            "tmux kill-session -t \"old-layout\"\n"
        );
    }
}
