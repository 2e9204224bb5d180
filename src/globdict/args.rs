use clap::{Parser, Subcommand};
use globdict::allocator::IdPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "globdict", version)]
#[command(about = "Run dictionary scripts against an in-process store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Trace every store operation to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.json (defaults to $GLOBDICT_HOME, then the user config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Cap on the number of entries in the global dictionary
    #[arg(long, global = true)]
    pub max_global_size: Option<usize>,

    /// Handle allocation policy: compact or monotonic
    #[arg(long, global = true)]
    pub id_policy: Option<IdPolicy>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a script of store operations
    #[command(alias = "r")]
    Run {
        /// Script file (reads stdin when omitted)
        #[arg(required = false)]
        file: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to config.json
        #[arg(long)]
        save: bool,
    },
}
