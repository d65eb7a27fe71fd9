//! ofb-types - Shared result and error types for the OmniFocus bridge
//!
//! This crate provides the data shapes every bridge operation speaks:
//! - [`ExecutionOutcome`] - discriminated success/failure, never thrown
//! - [`StructuredError`] - closed error taxonomy with preserved diagnostics
//! - [`BatchResult`] - per-item aggregate for chunked batch mutations
//!
//! # Schema Singularity
//! Types derive `schemars::JsonSchema` so tool-invocation callers can
//! generate authoritative schemas from the Rust definitions.

mod error;
mod outcome;

pub use error::{ErrorKind, StructuredError};
pub use outcome::{BatchFailure, BatchResult, ExecutionOutcome};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four entity classes addressable through the scripting interface.
///
/// Used by validation (error messages) and by the diagnostic classifier
/// (mapping a failed lookup to the matching not-found kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A task (action) in any container.
    Task,
    /// A project.
    Project,
    /// A tag (context).
    Tag,
    /// A folder grouping projects.
    Folder,
}

impl EntityKind {
    /// Human label used in validation and error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::Tag => "tag",
            Self::Folder => "folder",
        }
    }

    /// The not-found error kind for this entity class.
    #[must_use]
    pub fn not_found_kind(self) -> ErrorKind {
        match self {
            Self::Task => ErrorKind::TaskNotFound,
            Self::Project => ErrorKind::ProjectNotFound,
            Self::Tag => ErrorKind::TagNotFound,
            Self::Folder => ErrorKind::FolderNotFound,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
