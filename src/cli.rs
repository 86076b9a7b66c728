use clap::Parser;
use std::path::PathBuf;

const EXIT_STATUS_HELP: &str = "\
Exit status:
  0    success
  64   an error occurred
  72   file not found
  80   permission denied
  88   file not found and permission denied
  96   user/group lookup failed";

// `-h` is taken by --human-readable, so clap's automatic help short flag is
// disabled and --help is declared explicitly below.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lsr",
    version,
    about = "List files and their metadata",
    disable_help_flag = true,
    after_help = EXIT_STATUS_HELP
)]
pub struct Args {
    /// Files or directories to list (default: current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Do not ignore hidden entries (names starting with '.')
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Use long listing format
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// List subdirectories recursively
    #[arg(short = 'R', long = "recursive")]
    pub recursive: bool,

    /// Count entries only; print the total instead of per-entry lines
    #[arg(short = 'n', long = "count")]
    pub count_only: bool,

    /// Print sizes scaled to B/K/M/G/T/P/E (with -l)
    #[arg(short = 'h', long = "human-readable")]
    pub human_readable: bool,

    /// Accepted for compatibility; one entry per line is the default
    #[arg(short = '1', hide = true)]
    pub single_column: bool,

    /// Print help
    #[arg(long = "help", action = clap::ArgAction::Help, help = "Print help")]
    pub help: Option<bool>,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        // Human-readable scaling only exists in the long format.
        if !self.long {
            self.human_readable = false;
        }
        self
    }
}
