use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "muxplan")]
#[command(about = "Build tmux layouts as replayable command scripts")]
#[command(version)]
pub struct Cli {
    /// Path to the layout file (default: nearest muxplan.yaml)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        env = "MUXPLAN_FILE",
        global = true
    )]
    pub file: Option<String>,

    /// Log every emitted command to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a muxplan.yaml in the current directory
    Init,

    /// Print the layout as a shell script of tmux commands
    Script {
        /// Write the script to a file instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<String>,
    },

    /// Print the layout as JSON (one argument vector per command)
    Plan,

    /// Build the layout by running each tmux command
    Apply {
        /// Attach to the session once it is built
        #[arg(short = 'a', long = "attach")]
        attach: bool,
    },

    /// Kill a tmux session
    Kill {
        /// Session name (default: the layout's session)
        session: Option<String>,

        /// Print the command instead of running it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}
