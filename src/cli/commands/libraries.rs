//! Libraries command implementation.
//!
//! Lists the library sections of a Plex database with their root locations.

use crate::services::plex::{MetadataProvider, PlexDatabase};
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// List library sections.
pub fn list_libraries(database: &Path) -> Result<()> {
    println!("[INFO] Opening database: {}", database.display());
    let db = PlexDatabase::open(database)?;

    let sections = db.library_sections()?;
    if sections.is_empty() {
        println!("{}", "[WARNING] No library sections found in database.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} library section(s)", sections.len()).green());
    println!();

    for section in &sections {
        println!(
            "{} {} {}",
            format!("[{}]", section.id).bold(),
            section.name.bold().cyan(),
            format!("({})", section.kind).dimmed()
        );

        match db.section_locations(section.id) {
            Ok(locations) => {
                for loc in locations {
                    let status = if loc.available {
                        "Online".green()
                    } else {
                        "Offline".red()
                    };
                    println!("    {} [{}]", loc.root_path, status);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to get locations for {}: {}", section.name, e);
            }
        }
        println!();
    }

    println!("{}", "[Next Steps]".bold().cyan());
    println!(
        "  Process a single library: {}",
        format!("plex-renamer rename {} --library <ID>", database.display()).cyan()
    );

    Ok(())
}
