//! Plan command implementation.
//!
//! Compiles every library without prompting and saves the operations as a
//! plan.json that `execute` can run later.

use crate::cli::args::PlanArgs;
use crate::cli::commands::collect_operations;
use crate::cli::prompt::AutoApprover;
use crate::cli::settings::Settings;
use crate::core::planner;
use crate::services::plex::PlexDatabase;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Compile and save a plan.
pub fn create_plan(database: &Path, args: &PlanArgs, plan_file: Option<&Path>) -> Result<()> {
    println!("{}", "[PLAN] Compiling plan...".bold().cyan());
    println!();

    let settings = Settings::resolve(args, None)?;

    println!("[INFO] Opening database: {}", database.display());
    let db = PlexDatabase::open(database)?;

    let operations = collect_operations(&db, &settings, &mut AutoApprover)?;
    let plan = planner::new_plan(operations, &settings.plan_options());

    println!();
    println!("{}", "Plan Summary".bold().green());
    println!("  {} {}", "Plan ID:".bold(), plan.id);
    println!("  {} {}", "Mode:".bold(), plan.mode);
    println!("  {} {}", "Operations:".bold(), plan.operations.len());
    println!();

    let output_path = match plan_file {
        Some(p) => p.to_path_buf(),
        None => planner::default_plan_path(&std::env::current_dir()?),
    };

    planner::save_plan(&plan, &output_path)?;
    println!(
        "{} {}",
        "[OK] Plan saved to:".bold().green(),
        output_path.display()
    );

    println!();
    println!("{}", "[Next Steps]".bold().yellow());
    println!(
        "  1. Review the plan: {}",
        format!("cat {}", output_path.display()).cyan()
    );
    println!(
        "  2. Execute the plan: {}",
        format!("plex-renamer execute {}", output_path.display()).cyan()
    );

    Ok(())
}
