//! Plex Renamer CLI
//!
//! A command-line tool for renaming and reorganizing Plex media files using the Plex database.

use clap::Parser;
use plex_renamer::cli::{
    args::{Cli, Commands},
    commands::{execute, libraries, plan, rename, script},
};

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run the appropriate command
    match cli.command {
        Commands::Libraries { database } => {
            libraries::list_libraries(&database)?;
        }

        Commands::Rename {
            database,
            plan,
            dry_run,
            yes,
        } => {
            rename::rename(&database, &plan, dry_run, yes)?;
        }

        Commands::Script {
            database,
            plan,
            shell,
            script_file,
            dry_run,
        } => {
            script::generate_script(
                &database,
                &plan,
                shell.as_deref(),
                script_file.as_deref(),
                dry_run,
            )?;
        }

        Commands::Plan {
            database,
            plan: plan_args,
            plan_file,
        } => {
            plan::create_plan(&database, &plan_args, plan_file.as_deref())?;
        }

        Commands::Execute { plan_file, dry_run } => {
            execute::execute_plan(&plan_file, dry_run)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
///
/// Logs go to stderr so a script written to stdout stays clean.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("plex_renamer=debug")
    } else {
        EnvFilter::new("plex_renamer=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
