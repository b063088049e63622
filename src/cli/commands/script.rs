//! Script command implementation.
//!
//! Compiles every library without prompting and writes a shell script (or a
//! dry-run preview) to a file or stdout. Status goes to stderr so stdout
//! stays a clean script.

use crate::cli::args::PlanArgs;
use crate::cli::commands::collect_operations;
use crate::cli::prompt::AutoApprover;
use crate::cli::settings::Settings;
use crate::core::batch::BatchRunner;
use crate::services::plex::PlexDatabase;
use crate::Result;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Emit a script for all planned operations.
pub fn generate_script(
    database: &Path,
    args: &PlanArgs,
    shell: Option<&str>,
    script_file: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let settings = Settings::resolve(args, shell)?;
    let db = PlexDatabase::open(database)?;

    let operations = collect_operations(&db, &settings, &mut AutoApprover)?;
    if operations.is_empty() {
        eprintln!("[INFO] No operations to perform.");
        return Ok(());
    }

    let text = BatchRunner::default().render_script(
        &operations,
        settings.shell,
        &settings.preview_info(),
        dry_run,
    );

    match script_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &text)?;
            eprintln!(
                "[OK] {} with {} operations written to {}",
                if dry_run { "Preview" } else { "Script" },
                operations.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    tracing::info!("Rendered {} operations for {}", operations.len(), settings.shell);
    Ok(())
}
