//! Direct filesystem backend.
//!
//! Executes one planned operation at a time:
//! - never overwrites an existing destination (skip instead)
//! - copies stream into a fresh file and clean up after themselves on failure
//! - moves try an atomic no-replace rename, then fall back to copy + size
//!   check + delete
//!
//! The size check after a fallback copy is the only integrity check; contents
//! are not hashed.

use crate::models::plan::{OperationKind, OperationOutcome, PlannedOperation};
use crate::utils::fs::{copy_file, copy_permissions, file_size, occupied, rename_no_replace};
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Try `rename` before falling back to copy + delete for moves.
    pub allow_rename: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { allow_rename: true }
    }
}

/// How a move completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveStrategy {
    Rename,
    CopyDelete,
}

/// Operation executor.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    /// Create a new executor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new executor with custom configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Execute one operation.
    ///
    /// A dry run reports success without any filesystem access, not even
    /// existence checks.
    pub fn execute(&self, op: &PlannedOperation, dry_run: bool) -> OperationOutcome {
        if dry_run {
            return OperationOutcome::succeeded(op, "dry run - no changes made");
        }

        if !op.source.exists() {
            tracing::warn!("Source missing: {:?}", op.source);
            return OperationOutcome::failed(op, Error::SourceMissing(op.source.clone()));
        }

        if occupied(&op.destination) {
            tracing::debug!("Destination exists, skipping: {:?}", op.destination);
            return OperationOutcome::skipped(op);
        }

        if let Some(parent) = op.destination.parent() {
            if let Err(source) = fs::create_dir_all(parent) {
                return OperationOutcome::failed(
                    op,
                    Error::DirectoryCreateFailed {
                        path: parent.to_path_buf(),
                        source,
                    },
                );
            }
        }

        let result = match op.kind {
            OperationKind::Copy => self.copy(&op.source, &op.destination).map(|_| "copy completed"),
            OperationKind::Move => self.move_file(&op.source, &op.destination).map(|s| match s {
                MoveStrategy::Rename => "move completed (rename)",
                MoveStrategy::CopyDelete => "move completed (copy + delete)",
            }),
        };

        match result {
            Ok(message) => {
                tracing::info!(
                    from = %op.source.display(),
                    to = %op.destination.display(),
                    "{}",
                    message
                );
                OperationOutcome::succeeded(op, message)
            }
            Err(e) if lost_destination_race(&e) => {
                tracing::debug!("Destination appeared during transfer, skipping: {:?}", op.destination);
                OperationOutcome::skipped(op)
            }
            Err(e @ Error::SourceRemovalFailed { .. }) => {
                tracing::warn!("{}", e);
                OperationOutcome::partial(op, e)
            }
            Err(e) => {
                tracing::error!("Operation failed: {} - {}", op.destination.display(), e);
                OperationOutcome::failed(op, e)
            }
        }
    }

    /// Copy `src` to `dst`, then carry over permission bits.
    fn copy(&self, src: &Path, dst: &Path) -> Result<u64> {
        let bytes = copy_file(src, dst).map_err(|source| Error::CopyFailed {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        })?;
        copy_permissions(src, dst);
        Ok(bytes)
    }

    /// Move `src` to `dst`.
    fn move_file(&self, src: &Path, dst: &Path) -> Result<MoveStrategy> {
        if self.config.allow_rename {
            match rename_no_replace(src, dst) {
                Ok(()) => return Ok(MoveStrategy::Rename),
                Err(e) => {
                    tracing::debug!("Rename failed ({}), falling back to copy + delete", e);
                }
            }
        }

        self.copy(src, dst)?;
        verify_copy(src, dst)?;

        fs::remove_file(src).map_err(|source| Error::SourceRemovalFailed {
            path: src.to_path_buf(),
            source,
        })?;
        Ok(MoveStrategy::CopyDelete)
    }
}

/// The destination was created by someone else between the existence check
/// and the transfer. Neither rename nor copy replaces it.
fn lost_destination_race(error: &Error) -> bool {
    matches!(
        error,
        Error::CopyFailed { source, .. } if source.kind() == io::ErrorKind::AlreadyExists
    )
}

/// Compare byte sizes of `src` and `dst`.
///
/// On mismatch `dst` is removed and `src` is left untouched.
pub fn verify_copy(src: &Path, dst: &Path) -> Result<()> {
    let expected = file_size(src)?;
    let actual = file_size(dst)?;

    if expected != actual {
        if let Err(e) = fs::remove_file(dst) {
            tracing::warn!("Failed to remove unverified copy {:?}: {}", dst, e);
        }
        return Err(Error::CopyVerificationFailed {
            path: dst.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Execute one operation with the default executor (convenience function).
pub fn execute(op: &PlannedOperation, dry_run: bool) -> OperationOutcome {
    Executor::new().execute(op, dry_run)
}
