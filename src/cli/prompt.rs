//! Interactive selection and approval.
//!
//! The approval state ("approve everything from here on") lives in an
//! [`ApprovalSession`] owned by the caller, never inside the prompter.

use crate::models::catalog::{EntityKind, LibrarySection, Location, LocationOverride};
use crate::models::plan::{EntityPlan, OperationKind};
use crate::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Number of example paths shown per show.
const SHOW_PREVIEW_LIMIT: usize = 3;

/// Which locations of a library to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySelection {
    /// Leave the library alone.
    Skip,
    /// Every location, no filtering.
    All,
    /// Only these locations.
    Only(Vec<Location>),
}

/// Answer for one movie or show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
    /// Proceed with this and every remaining entity.
    ApproveRemaining,
}

/// Narrows the candidate set and approves what gets executed.
pub trait Approver {
    fn select_locations(
        &mut self,
        section: &LibrarySection,
        locations: &[Location],
    ) -> Result<LibrarySelection>;

    /// Per-location output directories. Locations left out keep the default.
    fn location_outputs(
        &mut self,
        locations: &[Location],
        default_output: Option<&Path>,
    ) -> Result<Vec<LocationOverride>>;

    fn review_entity(&mut self, entity: &EntityPlan) -> Result<Decision>;

    /// Final go/no-go for the whole batch.
    fn confirm(&mut self, count: usize, mode: OperationKind, dry_run: bool) -> Result<bool>;
}

/// Approval state carried across entity reviews.
#[derive(Debug, Clone, Default)]
pub struct ApprovalSession {
    pub approve_all: bool,
}

/// Ask about one entity unless the session already approves everything.
///
/// Returns whether the entity's operations should be kept.
pub fn review<A: Approver + ?Sized>(
    approver: &mut A,
    session: &mut ApprovalSession,
    entity: &EntityPlan,
) -> Result<bool> {
    if session.approve_all {
        return Ok(true);
    }
    match approver.review_entity(entity)? {
        Decision::Proceed => Ok(true),
        Decision::Skip => Ok(false),
        Decision::ApproveRemaining => {
            session.approve_all = true;
            Ok(true)
        }
    }
}

/// Approves everything and never overrides outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprover;

impl Approver for AutoApprover {
    fn select_locations(&mut self, _: &LibrarySection, _: &[Location]) -> Result<LibrarySelection> {
        Ok(LibrarySelection::All)
    }

    fn location_outputs(&mut self, _: &[Location], _: Option<&Path>) -> Result<Vec<LocationOverride>> {
        Ok(Vec::new())
    }

    fn review_entity(&mut self, _: &EntityPlan) -> Result<Decision> {
        Ok(Decision::Proceed)
    }

    fn confirm(&mut self, _: usize, _: OperationKind, _: bool) -> Result<bool> {
        Ok(true)
    }
}

/// Line-oriented prompter. End of input answers "no".
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompter and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} {}", prompt, "[y/n]: ".dimmed()))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn ask_yes_no_all(&mut self, prompt: &str) -> Result<Decision> {
        let answer = self.ask(&format!("{} {}", prompt, "[y/n/a(ll)]: ".dimmed()))?;
        Ok(match answer.to_lowercase().as_str() {
            "y" | "yes" => Decision::Proceed,
            "a" | "all" => Decision::ApproveRemaining,
            _ => Decision::Skip,
        })
    }

    fn loop_locations(&mut self, locations: &[Location]) -> Result<LibrarySelection> {
        let mut selected = Vec::new();
        let mut take_rest = false;

        for (i, loc) in locations.iter().enumerate() {
            if take_rest {
                selected.push(loc.clone());
                continue;
            }
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "  {} {}",
                format!("[{}/{}]", i + 1, locations.len()).dimmed(),
                loc.root_path.cyan()
            )?;
            match self.ask_yes_no_all("  Process this location?")? {
                Decision::Proceed => selected.push(loc.clone()),
                Decision::ApproveRemaining => {
                    take_rest = true;
                    selected.push(loc.clone());
                }
                Decision::Skip => {}
            }
        }

        Ok(if selected.is_empty() {
            LibrarySelection::Skip
        } else {
            LibrarySelection::Only(selected)
        })
    }
}

/// Parse a comma-separated list of 1-based location numbers.
///
/// Out-of-range and non-numeric entries are ignored.
pub fn parse_location_numbers(input: &str, locations: &[Location]) -> Vec<Location> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= locations.len())
        .map(|n| locations[n - 1].clone())
        .collect()
}

impl<R: BufRead, W: Write> Approver for TerminalPrompter<R, W> {
    fn select_locations(
        &mut self,
        section: &LibrarySection,
        locations: &[Location],
    ) -> Result<LibrarySelection> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", format!("== {} ==", section.name).bold().cyan())?;
        writeln!(self.writer, "  {} {}", "Type:".bold(), section.kind)?;
        writeln!(self.writer, "  {} {}", "Locations:".bold(), locations.len())?;
        writeln!(self.writer)?;
        for (i, loc) in locations.iter().enumerate() {
            writeln!(self.writer, "  {}. {}", i + 1, loc.root_path.cyan())?;
        }
        writeln!(self.writer)?;

        let answer = self.ask(&format!(
            "Process this library? {}",
            "[y/n/l(oop)/1-N]: ".dimmed()
        ))?;

        match answer.to_lowercase().as_str() {
            "y" | "yes" => Ok(LibrarySelection::All),
            "n" | "no" | "" => Ok(LibrarySelection::Skip),
            "l" | "loop" => self.loop_locations(locations),
            other => {
                let selected = parse_location_numbers(other, locations);
                Ok(if selected.is_empty() {
                    LibrarySelection::Skip
                } else {
                    LibrarySelection::Only(selected)
                })
            }
        }
    }

    fn location_outputs(
        &mut self,
        locations: &[Location],
        default_output: Option<&Path>,
    ) -> Result<Vec<LocationOverride>> {
        let default_label = match default_output {
            Some(dir) => dir.display().to_string(),
            None => "(library location)".to_string(),
        };

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Set output paths for each location".bold())?;
        writeln!(self.writer, "  {}", format!("Default output: {}", default_label).dimmed())?;
        writeln!(self.writer, "  {}", "Press Enter to use default, or type a custom path".dimmed())?;
        writeln!(self.writer)?;

        let mut overrides = Vec::new();
        for (i, loc) in locations.iter().enumerate() {
            writeln!(
                self.writer,
                "  {} {}",
                format!("[{}/{}]", i + 1, locations.len()).dimmed(),
                loc.root_path.cyan()
            )?;
            let answer = self.ask("  Output path: ")?;
            if answer.is_empty() {
                writeln!(self.writer, "    {} {}", "->".green(), default_label)?;
            } else {
                writeln!(self.writer, "    {} {}", "->".green(), answer.cyan())?;
                overrides.push(LocationOverride {
                    location: loc.clone(),
                    output_dir: answer,
                });
            }
            writeln!(self.writer)?;
        }
        Ok(overrides)
    }

    fn review_entity(&mut self, plan: &EntityPlan) -> Result<Decision> {
        let entity = &plan.entity;
        let (label, question) = match entity.kind {
            EntityKind::Show => ("TV Show", "Rename files for this show?"),
            _ => ("Movie", "Rename files for this movie?"),
        };

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", format!("{}: {}", label, entity.title).bold())?;
        if let Some(year) = entity.year {
            writeln!(self.writer, "  {} {}", "Year:".bold(), year)?;
        }
        if entity.kind == EntityKind::Show {
            writeln!(
                self.writer,
                "  {} {}  {} {}",
                "Seasons:".dimmed(),
                entity.seasons,
                "Episodes:".dimmed(),
                entity.episodes
            )?;
        } else {
            writeln!(self.writer, "  {} {}", "Files:".dimmed(), plan.operations.len())?;
        }

        let limit = match entity.kind {
            EntityKind::Show => SHOW_PREVIEW_LIMIT,
            _ => plan.operations.len(),
        };
        writeln!(self.writer)?;
        for op in plan.operations.iter().take(limit) {
            writeln!(self.writer, "  {} {}", "From:".red(), op.source.display().to_string().dimmed())?;
            writeln!(self.writer, "  {} {}", "To:  ".green(), op.destination.display().to_string().cyan())?;
        }
        if plan.operations.len() > limit {
            writeln!(
                self.writer,
                "  {}",
                format!("... and {} more files", plan.operations.len() - limit).dimmed()
            )?;
        }

        self.ask_yes_no_all(question)
    }

    fn confirm(&mut self, count: usize, mode: OperationKind, dry_run: bool) -> Result<bool> {
        writeln!(self.writer)?;
        if dry_run {
            writeln!(self.writer, "{} Would {} {} files", "[DRY-RUN]".yellow(), mode, count)?;
            return Ok(true);
        }
        writeln!(
            self.writer,
            "{}",
            format!("[WARNING] About to {} {} files. This cannot be undone.", mode, count)
                .bold()
                .yellow()
        )?;
        self.ask_yes_no("Proceed?")
    }
}
