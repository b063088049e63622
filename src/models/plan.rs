//! Plan data model.

use super::catalog::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a planned file is transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Copy,
    #[default]
    Move,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Copy => write!(f, "copy"),
            OperationKind::Move => write!(f, "move"),
        }
    }
}

impl std::str::FromStr for OperationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Ok(OperationKind::Copy),
            "move" => Ok(OperationKind::Move),
            other => Err(crate::Error::UnknownOperationKind(other.to_string())),
        }
    }
}

/// A single source -> destination file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOperation {
    /// Source path (after path mapping).
    pub source: PathBuf,
    /// Destination path.
    pub destination: PathBuf,
    /// Copy or move.
    pub kind: OperationKind,
}

/// Path prefix substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    /// Prefix as recorded by the metadata store.
    pub from: String,
    /// Locally reachable prefix.
    pub to: String,
}

impl std::fmt::Display for PathMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Short description of the catalog entity that produced a group of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Metadata item ID.
    pub id: i64,
    /// Movie or show.
    pub kind: EntityKind,
    /// Display title.
    pub title: String,
    /// Release year.
    pub year: Option<i32>,
    /// Number of seasons (shows only).
    pub seasons: usize,
    /// Number of episodes with at least one planned file (shows only).
    pub episodes: usize,
}

/// Operations compiled for one movie or show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPlan {
    pub entity: EntitySummary,
    pub operations: Vec<PlannedOperation>,
}

/// Terminal state of one executed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeState {
    /// Transfer completed (or dry run).
    Succeeded,
    /// Destination already existed; nothing was touched.
    SkippedExists,
    /// Destination is valid but the source could not be removed.
    PartiallySucceeded,
    /// Nothing usable was produced at the destination.
    Failed,
}

/// Result of executing one planned operation.
#[derive(Debug)]
pub struct OperationOutcome {
    /// The operation this outcome belongs to.
    pub operation: PlannedOperation,
    /// Terminal state.
    pub state: OutcomeState,
    /// Human-readable diagnostic.
    pub message: Option<String>,
    /// Typed error for failed or partial outcomes.
    pub error: Option<crate::Error>,
}

impl OperationOutcome {
    pub fn succeeded(operation: &PlannedOperation, message: impl Into<String>) -> Self {
        Self {
            operation: operation.clone(),
            state: OutcomeState::Succeeded,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn skipped(operation: &PlannedOperation) -> Self {
        Self {
            operation: operation.clone(),
            state: OutcomeState::SkippedExists,
            message: Some("destination already exists, skipped".to_string()),
            error: None,
        }
    }

    pub fn partial(operation: &PlannedOperation, error: crate::Error) -> Self {
        Self {
            operation: operation.clone(),
            state: OutcomeState::PartiallySucceeded,
            message: Some(error.to_string()),
            error: Some(error),
        }
    }

    pub fn failed(operation: &PlannedOperation, error: crate::Error) -> Self {
        Self {
            operation: operation.clone(),
            state: OutcomeState::Failed,
            message: Some(error.to_string()),
            error: Some(error),
        }
    }

    /// Skips count as success: the destination holds the file.
    pub fn is_success(&self) -> bool {
        matches!(
            self.state,
            OutcomeState::Succeeded | OutcomeState::SkippedExists
        )
    }
}

/// Plan file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Plan version.
    pub version: String,
    /// Plan ID.
    pub id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Operation kind for the whole batch.
    pub mode: OperationKind,
    /// Global output directory, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Path mapping applied to source paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_map: Option<PathMapping>,
    /// Operations in execution order.
    pub operations: Vec<PlannedOperation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!("copy".parse::<OperationKind>().unwrap(), OperationKind::Copy);
        assert_eq!(" MOVE ".parse::<OperationKind>().unwrap(), OperationKind::Move);
        assert!(matches!(
            "link".parse::<OperationKind>(),
            Err(crate::Error::UnknownOperationKind(_))
        ));
    }

    #[test]
    fn test_outcome_success_counts_skips() {
        let op = PlannedOperation {
            source: PathBuf::from("/a"),
            destination: PathBuf::from("/b"),
            kind: OperationKind::Copy,
        };
        assert!(OperationOutcome::skipped(&op).is_success());
        assert!(OperationOutcome::succeeded(&op, "done").is_success());
        assert!(!OperationOutcome::failed(&op, crate::Error::SourceMissing(op.source.clone()))
            .is_success());
    }

    #[test]
    fn test_operation_kind_serializes_lowercase() {
        let json = serde_json::to_string(&OperationKind::Move).unwrap();
        assert_eq!(json, "\"move\"");
    }
}
