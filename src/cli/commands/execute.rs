//! Execute command implementation.
//!
//! Reads a plan.json file and runs its operations through the direct
//! backend. Re-running a plan skips destinations that already exist.

use crate::core::batch::BatchRunner;
use crate::core::executor::Executor;
use crate::core::planner;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Execute a plan file.
pub fn execute_plan(plan_file: &Path, dry_run: bool) -> Result<()> {
    println!("{}", "[EXEC] Executing plan...".bold().cyan());
    println!();

    if !plan_file.exists() {
        return Err(crate::Error::PathNotFound(plan_file.display().to_string()));
    }

    println!("[INFO] Loading plan: {}", plan_file.display());
    let plan = planner::load_plan(plan_file)?;

    println!("  {} {}", "Plan ID:".bold(), plan.id);
    println!("  {} {}", "Created at:".bold(), plan.created_at);
    println!("  {} {}", "Mode:".bold(), plan.mode);
    if let Some(dir) = &plan.output_dir {
        println!("  {} {}", "Output:".bold(), dir.display());
    }
    if let Some(map) = &plan.path_map {
        println!("  {} {}", "Path map:".bold(), map);
    }
    println!("  {} {}", "Operations:".bold(), plan.operations.len());
    println!();

    if dry_run {
        println!("{}", "[DRY-RUN] Showing what would be done:".bold().yellow());
    } else {
        println!("{}", "[WARNING] This will move and modify files!".bold().yellow());
    }
    println!();

    let runner = BatchRunner::new(Executor::new()).with_progress(true);
    let report = runner.run(&plan.operations, dry_run);

    report.print_summary();
    println!();

    if report.is_success() {
        if dry_run {
            println!("{}", "[OK] Dry run complete - no changes were made".green());
            println!();
            println!("{}", "[Next Steps]".bold().cyan());
            println!("  To actually execute the plan:");
            println!(
                "     {}",
                format!("plex-renamer execute {}", plan_file.display()).bold()
            );
        } else {
            println!("{}", "[OK] Plan executed successfully!".green());
        }
    } else {
        println!("{}", "[WARNING] Plan completed with errors".yellow());
    }

    Ok(())
}
