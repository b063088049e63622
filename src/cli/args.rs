//! Command line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Plex Renamer - Rename and reorganize Plex media files from the Plex database
#[derive(Parser, Debug)]
#[command(name = "plex-renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List library sections and their locations
    Libraries {
        /// Path to the Plex database (com.plexapp.plugins.library.db)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },

    /// Interactively rename/move files
    Rename {
        /// Path to the Plex database (com.plexapp.plugins.library.db)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,

        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,

        /// Approve everything without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Emit a shell script instead of touching files
    Script {
        /// Path to the Plex database (com.plexapp.plugins.library.db)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,

        /// Script dialect: cmd, powershell or bash
        #[arg(long)]
        shell: Option<String>,

        /// Write the script to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        script_file: Option<PathBuf>,

        /// Print a non-executable preview instead of a script
        #[arg(long)]
        dry_run: bool,
    },

    /// Compile a plan and save it as JSON
    Plan {
        /// Path to the Plex database (com.plexapp.plugins.library.db)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,

        /// Output path for plan.json (default: plan_<timestamp>.json)
        #[arg(long, value_name = "FILE")]
        plan_file: Option<PathBuf>,
    },

    /// Execute a saved plan file
    Execute {
        /// Path to the plan.json file
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Dry run - show what would be done
        #[arg(long)]
        dry_run: bool,
    },
}

/// Options that shape plan compilation. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Global output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Operation mode: copy or move
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Episode filename template
    #[arg(long, value_name = "TEMPLATE")]
    pub tv_format: Option<String>,

    /// Movie filename template
    #[arg(long, value_name = "TEMPLATE")]
    pub movie_format: Option<String>,

    /// Rewrite source path prefixes, e.g. "/data:/mnt/nas" or "F:\Media:H:\Media"
    #[arg(long, value_name = "FROM:TO")]
    pub path_map: Option<String>,

    /// Only process these library section IDs (repeatable)
    #[arg(short, long = "library", value_name = "ID")]
    pub libraries: Vec<i64>,

    /// Config file (default: <config dir>/plex_renamer/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
