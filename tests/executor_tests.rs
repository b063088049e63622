//! Integration tests for the direct backend.
//!
//! Tests cover:
//! - Dry runs never touching the filesystem
//! - Move by rename and by copy + verify + delete
//! - Skip-on-exists and idempotent re-runs
//! - Partial success when the source cannot be removed

use plex_renamer::core::batch::{run_batch, BatchRunner};
use plex_renamer::core::executor::{Executor, ExecutorConfig};
use plex_renamer::models::plan::{OperationKind, OutcomeState, PlannedOperation};
use plex_renamer::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn op(source: &Path, destination: &Path, kind: OperationKind) -> PlannedOperation {
    PlannedOperation {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        kind,
    }
}

fn copy_delete_executor() -> Executor {
    Executor::with_config(ExecutorConfig {
        allow_rename: false,
    })
}

// ========== DRY RUN ==========

#[test]
fn test_dry_run_with_missing_source_succeeds() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("does-not-exist.mkv");
    let destination = dir.path().join("out").join("x.mkv");

    let outcome = Executor::new().execute(&op(&source, &destination, OperationKind::Move), true);
    assert_eq!(outcome.state, OutcomeState::Succeeded);
    assert!(!dir.path().join("out").exists());
}

// ========== MOVE ==========

#[test]
fn test_move_by_rename() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("ep1.mkv");
    let destination = dir.path().join("out/Show A/Season 1/S01E01 - Pilot.mkv");
    fs::write(&source, b"episode data").unwrap();

    let outcome = Executor::new().execute(&op(&source, &destination, OperationKind::Move), false);
    assert_eq!(outcome.state, OutcomeState::Succeeded);
    assert!(!source.exists());
    assert_eq!(fs::read(&destination).unwrap(), b"episode data");
}

#[test]
fn test_move_by_copy_and_delete() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("movie.mkv");
    let destination = dir.path().join("out/Movie (2000).mkv");
    let data = vec![7u8; 3 * 1024 * 1024 + 17];
    fs::write(&source, &data).unwrap();

    let outcome =
        copy_delete_executor().execute(&op(&source, &destination, OperationKind::Move), false);
    assert_eq!(outcome.state, OutcomeState::Succeeded);
    assert!(outcome.message.unwrap().contains("copy + delete"));
    assert!(!source.exists());
    assert_eq!(fs::metadata(&destination).unwrap().len(), data.len() as u64);
}

#[test]
fn test_move_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("gone.mkv");
    let destination = dir.path().join("out/gone.mkv");

    let outcome = Executor::new().execute(&op(&source, &destination, OperationKind::Move), false);
    assert_eq!(outcome.state, OutcomeState::Failed);
    assert!(matches!(outcome.error, Some(Error::SourceMissing(_))));
    assert!(!destination.exists());
}

// ========== SKIP ON EXISTS ==========

#[test]
fn test_existing_destination_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("new.mkv");
    let destination = dir.path().join("old.mkv");
    fs::write(&source, b"new").unwrap();
    fs::write(&destination, b"old").unwrap();

    for kind in [OperationKind::Copy, OperationKind::Move] {
        let outcome = Executor::new().execute(&op(&source, &destination, kind), false);
        assert_eq!(outcome.state, OutcomeState::SkippedExists);
        assert!(outcome.is_success());
    }
    assert_eq!(fs::read(&destination).unwrap(), b"old");
    assert!(source.exists());
}

#[test]
fn test_second_run_is_all_skipped() {
    let dir = TempDir::new().unwrap();
    let mut ops = Vec::new();
    for i in 0..3 {
        let source = dir.path().join(format!("src{}.mkv", i));
        fs::write(&source, format!("file {}", i)).unwrap();
        ops.push(op(
            &source,
            &dir.path().join(format!("out/dst{}.mkv", i)),
            OperationKind::Copy,
        ));
    }

    let first = run_batch(&ops, false);
    assert_eq!(first.succeeded(), 3);

    // Tamper with one destination; a re-run must leave it alone.
    fs::write(dir.path().join("out/dst1.mkv"), b"edited").unwrap();

    let second = run_batch(&ops, false);
    assert_eq!(second.skipped(), 3);
    assert_eq!(second.succeeded(), 0);
    assert!(second.is_success());
    assert_eq!(fs::read(dir.path().join("out/dst1.mkv")).unwrap(), b"edited");
}

#[test]
fn test_move_rerun_after_success_reports_missing_source() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.mkv");
    let destination = dir.path().join("b.mkv");
    fs::write(&source, b"x").unwrap();
    let ops = vec![op(&source, &destination, OperationKind::Move)];

    assert!(run_batch(&ops, false).is_success());
    let again = run_batch(&ops, false);
    assert_eq!(again.failed(), 1);
}

// ========== PARTIAL SUCCESS ==========

#[cfg(unix)]
#[test]
fn test_source_removal_failure_is_partial() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    let source = locked.join("movie.mkv");
    fs::write(&source, b"movie").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can still delete; nothing to observe then.
    let probe = locked.join(".probe");
    if fs::write(&probe, b"").is_ok() {
        let _ = fs::remove_file(&probe);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let destination = dir.path().join("out/movie.mkv");
    let outcome =
        copy_delete_executor().execute(&op(&source, &destination, OperationKind::Move), false);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(outcome.state, OutcomeState::PartiallySucceeded);
    assert!(!outcome.is_success());
    assert!(matches!(outcome.error, Some(Error::SourceRemovalFailed { .. })));
    assert!(outcome.message.unwrap().contains("manually"));
    assert!(source.exists());
    assert_eq!(fs::read(&destination).unwrap(), b"movie");
}

#[test]
fn test_runner_with_custom_executor() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.mkv");
    fs::write(&source, b"abc").unwrap();
    let ops = vec![op(&source, &dir.path().join("b/a.mkv"), OperationKind::Move)];

    let report = BatchRunner::new(copy_delete_executor()).run(&ops, false);
    assert_eq!(report.succeeded(), 1);
    assert!(!source.exists());
}
