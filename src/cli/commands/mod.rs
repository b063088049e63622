//! CLI command implementations.

pub mod execute;
pub mod libraries;
pub mod plan;
pub mod rename;
pub mod script;

use crate::cli::prompt::{review, ApprovalSession, Approver, LibrarySelection};
use crate::cli::settings::Settings;
use crate::core::planner::{PlanOptions, Planner};
use crate::models::plan::PlannedOperation;
use crate::services::plex::MetadataProvider;
use crate::Result;

/// Walk every wanted library and collect approved operations, in order.
///
/// A library whose catalog cannot be read is reported and skipped; the
/// remaining libraries are still processed.
pub fn collect_operations<P, A>(
    provider: &P,
    settings: &Settings,
    approver: &mut A,
) -> Result<Vec<PlannedOperation>>
where
    P: MetadataProvider + ?Sized,
    A: Approver + ?Sized,
{
    let sections = provider.library_sections()?;
    let mut session = ApprovalSession::default();
    let mut operations = Vec::new();

    for section in sections.iter().filter(|s| settings.wants_library(s.id)) {
        let content = match provider.library_content(section) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to get content for library {}: {}", section.name, e);
                continue;
            }
        };

        let (selected_locations, overrides) =
            match approver.select_locations(section, &content.locations)? {
                LibrarySelection::Skip => {
                    tracing::debug!("Skipping library {}", section.name);
                    continue;
                }
                LibrarySelection::All => (Vec::new(), Vec::new()),
                LibrarySelection::Only(locations) => {
                    let overrides =
                        approver.location_outputs(&locations, settings.output_dir.as_deref())?;
                    (locations, overrides)
                }
            };

        let planner = Planner::new(
            settings.formatter.clone(),
            PlanOptions {
                selected_locations,
                overrides,
                ..settings.plan_options()
            },
        );

        for entity in planner.compile_entities(&content) {
            if review(approver, &mut session, &entity)? {
                operations.extend(entity.operations);
            }
        }
    }

    Ok(operations)
}
