//! Plan compilation module.
//!
//! Walks a library's catalog tree and turns every eligible media file into a
//! planned copy/move:
//! 1. Filter files by the selected locations
//! 2. Map the source path onto this machine
//! 3. Format the destination name from the templates
//! 4. Resolve the output directory
//!
//! Planning never touches the filesystem.

use crate::core::locations::{path_in_locations, LocationResolver};
use crate::generators::filename::NameFormatter;
use crate::models::catalog::{
    EntityKind, LibraryContent, Location, LocationOverride, MediaFile, MovieInfo, SectionKind,
    ShowInfo,
};
use crate::models::plan::{
    EntityPlan, EntitySummary, OperationKind, PathMapping, Plan, PlannedOperation,
};
use crate::utils::path::{apply_mapping, extension, join_under};
use crate::Result;
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Current plan file version.
pub const PLAN_VERSION: &str = "1.0";

/// Inputs that shape a compiled plan besides the catalog itself.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Copy or move, fixed for the whole batch.
    pub kind: OperationKind,
    /// Global output directory.
    pub output_dir: Option<PathBuf>,
    /// Source path prefix substitution.
    pub path_map: Option<PathMapping>,
    /// Only files under these locations are planned (empty = all).
    pub selected_locations: Vec<Location>,
    /// Per-location output directories.
    pub overrides: Vec<LocationOverride>,
}

/// Plan compiler.
#[derive(Debug, Clone)]
pub struct Planner {
    formatter: NameFormatter,
    options: PlanOptions,
}

impl Planner {
    /// Create a planner.
    pub fn new(formatter: NameFormatter, options: PlanOptions) -> Self {
        Self { formatter, options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Compile a library into per-entity operation groups, in catalog order.
    ///
    /// Entities left with no eligible files are omitted entirely.
    pub fn compile_entities(&self, content: &LibraryContent) -> Vec<EntityPlan> {
        let resolver = LocationResolver::new(
            &self.options.overrides,
            self.options.output_dir.as_deref(),
            &content.locations,
        )
        .with_mapping(self.options.path_map.as_ref());

        let entities: Vec<EntityPlan> = match content.section.kind {
            SectionKind::Movie => content
                .movies
                .iter()
                .filter_map(|movie| self.compile_movie(movie, &resolver))
                .collect(),
            SectionKind::Show => content
                .shows
                .iter()
                .filter_map(|show| self.compile_show(show, &resolver))
                .collect(),
            SectionKind::Unsupported(code) => {
                tracing::debug!(
                    "Skipping section {} with unsupported type {}",
                    content.section.name,
                    code
                );
                Vec::new()
            }
        };

        tracing::info!(
            "Compiled {} entities ({} operations) for library {}",
            entities.len(),
            entities.iter().map(|e| e.operations.len()).sum::<usize>(),
            content.section.name
        );
        entities
    }

    /// Compile a library into a flat, ordered operation list.
    pub fn compile(&self, content: &LibraryContent) -> Vec<PlannedOperation> {
        self.compile_entities(content)
            .into_iter()
            .flat_map(|e| e.operations)
            .collect()
    }

    fn compile_movie(&self, movie: &MovieInfo, resolver: &LocationResolver) -> Option<EntityPlan> {
        let operations: Vec<_> = movie
            .files
            .iter()
            .filter_map(|file| {
                self.plan_file(file, resolver, |ext| {
                    self.formatter.format_movie(&movie.metadata, ext)
                })
            })
            .collect();

        if operations.is_empty() {
            return None;
        }

        Some(EntityPlan {
            entity: EntitySummary {
                id: movie.metadata.id,
                kind: EntityKind::Movie,
                title: movie.metadata.title.clone(),
                year: movie.metadata.year,
                seasons: 0,
                episodes: 0,
            },
            operations,
        })
    }

    fn compile_show(&self, show: &ShowInfo, resolver: &LocationResolver) -> Option<EntityPlan> {
        let mut operations = Vec::new();
        let mut seasons = 0;
        let mut episodes = 0;

        for season in &show.seasons {
            let before_season = operations.len();
            for episode in &season.episodes {
                let before_episode = operations.len();
                operations.extend(episode.files.iter().filter_map(|file| {
                    self.plan_file(file, resolver, |ext| {
                        self.formatter.format_episode(
                            &show.metadata,
                            &season.metadata,
                            &episode.metadata,
                            ext,
                        )
                    })
                }));
                if operations.len() > before_episode {
                    episodes += 1;
                }
            }
            if operations.len() > before_season {
                seasons += 1;
            }
        }

        if operations.is_empty() {
            return None;
        }

        Some(EntityPlan {
            entity: EntitySummary {
                id: show.metadata.id,
                kind: EntityKind::Show,
                title: show.metadata.title.clone(),
                year: show.metadata.year,
                seasons,
                episodes,
            },
            operations,
        })
    }

    /// Plan one file, or `None` when it is filtered out or already in place.
    fn plan_file<F>(
        &self,
        file: &MediaFile,
        resolver: &LocationResolver,
        name: F,
    ) -> Option<PlannedOperation>
    where
        F: FnOnce(&str) -> String,
    {
        let selected = &self.options.selected_locations;
        if !selected.is_empty() && !path_in_locations(&file.path, selected) {
            return None;
        }

        let source = apply_mapping(&file.path, self.options.path_map.as_ref());
        let dest_name = name(extension(&source));
        let (output_dir, resolved_by) = resolver.resolve(&file.path);
        let destination = join_under(&output_dir, &dest_name);
        let source = PathBuf::from(source);

        if destination == source {
            tracing::debug!("Already in place: {:?}", source);
            return None;
        }

        tracing::debug!(
            "Planned {:?} -> {:?} (output from {:?})",
            source,
            destination,
            resolved_by
        );

        Some(PlannedOperation {
            source,
            destination,
            kind: self.options.kind,
        })
    }
}

/// Compile a library with the given formatter and options (convenience function).
pub fn compile(
    content: &LibraryContent,
    formatter: &NameFormatter,
    options: &PlanOptions,
) -> Vec<PlannedOperation> {
    Planner::new(formatter.clone(), options.clone()).compile(content)
}

/// Wrap compiled operations into a plan file structure.
pub fn new_plan(operations: Vec<PlannedOperation>, options: &PlanOptions) -> Plan {
    Plan {
        version: PLAN_VERSION.to_string(),
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339(),
        mode: options.kind,
        output_dir: options.output_dir.clone(),
        path_map: options.path_map.clone(),
        operations,
    }
}

/// Save a plan to a JSON file.
pub fn save_plan(plan: &Plan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}

/// Load a plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(path)?;
    let plan: Plan = serde_json::from_str(&content)?;
    Ok(plan)
}

/// Get the default plan output path in `dir`.
pub fn default_plan_path(dir: &Path) -> PathBuf {
    let filename = format!("plan_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    dir.join(filename)
}
