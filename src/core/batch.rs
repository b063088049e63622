//! Batch driver.
//!
//! Runs a compiled operation list through a backend strictly in order. A
//! failing operation is recorded and the batch moves on; nothing aborts the
//! remaining list.

use crate::core::executor::Executor;
use crate::core::script::{emit, preview, PreviewInfo, ShellDialect};
use crate::models::plan::{OperationOutcome, OutcomeState, PlannedOperation};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Aggregated outcomes of one batch, in operation order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<OperationOutcome>,
}

impl BatchReport {
    fn count(&self, state: OutcomeState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(OutcomeState::Succeeded)
    }

    pub fn skipped(&self) -> usize {
        self.count(OutcomeState::SkippedExists)
    }

    pub fn partial(&self) -> usize {
        self.count(OutcomeState::PartiallySucceeded)
    }

    pub fn failed(&self) -> usize {
        self.count(OutcomeState::Failed)
    }

    /// True when every operation succeeded or was skipped.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_success())
    }

    /// Outcomes that need attention (failed or partial).
    pub fn problems(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Print summary.
    pub fn print_summary(&self) {
        println!("{}", "Results".bold().green());
        println!("  {} {}", "Succeeded:".bold(), self.succeeded());
        println!("  {} {}", "Skipped (exists):".bold(), self.skipped());
        if self.partial() > 0 {
            println!("  {} {}", "Partial:".bold(), self.partial().to_string().yellow());
        }
        println!("  {} {}", "Failed:".bold(), self.failed());

        let problems: Vec<_> = self.problems().collect();
        if !problems.is_empty() {
            println!();
            println!("{}", "Problems:".bold().red());
            for outcome in problems {
                let label = match outcome.state {
                    OutcomeState::PartiallySucceeded => "[PARTIAL]".yellow(),
                    _ => "[FAIL]".red(),
                };
                println!("  {} {}", label, outcome.operation.source.display());
                if let Some(msg) = &outcome.message {
                    println!("         {}", msg.dimmed());
                }
            }
        }
    }
}

/// Drives a backend over an operation list.
#[derive(Debug, Default)]
pub struct BatchRunner {
    executor: Executor,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            show_progress: false,
        }
    }

    /// Show an `indicatif` progress bar while running.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Execute every operation through the direct backend.
    pub fn run(&self, operations: &[PlannedOperation], dry_run: bool) -> BatchReport {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(operations.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("█▓░"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut report = BatchReport::default();
        for (i, op) in operations.iter().enumerate() {
            let name = op
                .destination
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            pb.set_message(name);

            let outcome = self.executor.execute(op, dry_run);
            tracing::debug!(
                index = i + 1,
                total = operations.len(),
                state = ?outcome.state,
                "Processed {:?}",
                op.source
            );
            report.outcomes.push(outcome);
            pb.inc(1);
        }
        pb.finish_and_clear();

        tracing::info!(
            "Batch finished: {} succeeded, {} skipped, {} partial, {} failed",
            report.succeeded(),
            report.skipped(),
            report.partial(),
            report.failed()
        );
        report
    }

    /// Render the list through the script backend, or a preview on dry run.
    pub fn render_script(
        &self,
        operations: &[PlannedOperation],
        dialect: ShellDialect,
        info: &PreviewInfo,
        dry_run: bool,
    ) -> String {
        if dry_run {
            preview(operations, info)
        } else {
            emit(operations, dialect, info.mode)
        }
    }
}

/// Run operations with the default executor and no progress bar (convenience function).
pub fn run_batch(operations: &[PlannedOperation], dry_run: bool) -> BatchReport {
    BatchRunner::default().run(operations, dry_run)
}
