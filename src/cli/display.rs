//! Terminal presentation helpers.

use crate::models::plan::PlannedOperation;
use colored::Colorize;

/// Print the first `limit` operations as From/To pairs.
pub fn print_operation_preview(operations: &[PlannedOperation], limit: usize) {
    println!();
    println!("{}", "Planned Operations".bold().cyan());
    println!();

    for op in operations.iter().take(limit) {
        println!("  {} {}", "From:".red(), op.source.display().to_string().dimmed());
        println!("  {} {}", "To:  ".green(), op.destination.display().to_string().cyan());
        println!();
    }

    if operations.len() > limit {
        println!(
            "  {}",
            format!("... and {} more operations", operations.len() - limit).dimmed()
        );
    }
}
