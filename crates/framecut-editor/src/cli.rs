// crates/framecut-editor/src/cli.rs
//
// Command-line surface of the `framecut` binary.

use std::path::PathBuf;
use clap::{Parser, Subcommand};

/// Timeline project tool: compile to a render composition or check invariants
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Editor configuration (JSON). Missing fields take defaults
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (default: info, -v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the composition JSON for a project document
    Compile {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Frame rate; overrides the config value
        #[arg(long = "fps", value_name = "N")]
        fps: Option<f64>,

        /// Pretty-print the JSON
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },
    /// Verify overlap, duration and position invariants; exits non-zero on violation
    Check {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
