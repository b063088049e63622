//! Rename command implementation.
//!
//! Interactive flow: pick libraries and locations, review each movie or
//! show, confirm, then run the batch against the filesystem.

use crate::cli::args::PlanArgs;
use crate::cli::commands::collect_operations;
use crate::cli::display;
use crate::cli::prompt::{Approver, AutoApprover, TerminalPrompter};
use crate::cli::settings::Settings;
use crate::core::batch::BatchRunner;
use crate::core::executor::Executor;
use crate::services::plex::PlexDatabase;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Number of operations listed before the final confirmation.
const PREVIEW_LIMIT: usize = 10;

/// Run the interactive rename.
pub fn rename(database: &Path, args: &PlanArgs, dry_run: bool, yes: bool) -> Result<()> {
    println!("{}", "[RENAME] Plex file renamer".bold().cyan());
    println!();

    let settings = Settings::resolve(args, None)?;

    if dry_run {
        println!("{}", "[DRY-RUN] No files will be modified".bold().yellow());
        println!();
    }

    println!("[INFO] Opening database: {}", database.display());
    let db = PlexDatabase::open(database)?;

    println!("  {} {}", "Mode:".bold(), settings.kind);
    match &settings.output_dir {
        Some(dir) => println!("  {} {}", "Output:".bold(), dir.display()),
        None => println!("  {} {}", "Output:".bold(), "(library locations)".dimmed()),
    }
    if let Some(map) = &settings.path_map {
        println!("  {} {}", "Path map:".bold(), map);
    }

    let mut approver: Box<dyn Approver> = if yes || settings.auto_approve {
        Box::new(AutoApprover)
    } else {
        Box::new(TerminalPrompter::stdio())
    };

    let operations = collect_operations(&db, &settings, approver.as_mut())?;

    if operations.is_empty() {
        println!();
        println!("[INFO] No operations to perform.");
        return Ok(());
    }

    display::print_operation_preview(&operations, PREVIEW_LIMIT);

    if !approver.confirm(operations.len(), settings.kind, dry_run)? {
        println!("[INFO] Operation cancelled.");
        return Ok(());
    }

    println!();
    let runner = BatchRunner::new(Executor::new()).with_progress(true);
    let report = runner.run(&operations, dry_run);

    println!();
    report.print_summary();
    println!();

    if report.is_success() {
        if dry_run {
            println!("{}", "[OK] Dry run complete - no changes were made".green());
        } else {
            println!("{}", "[OK] All files processed".green());
        }
    } else {
        println!("{}", "[WARNING] Completed with errors".yellow());
        if report.partial() > 0 {
            println!(
                "  {}",
                "Partial moves left their source behind; delete those sources by hand.".yellow()
            );
        }
    }

    Ok(())
}
