//! Application layer errors.
//!
//! These errors represent failures in orchestration, not in the model or the
//! templates. Those are `DomainError` and `RenderError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Project description file does not exist.
    #[error("Project file not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// Project description could not be read or decoded.
    #[error("Failed to load project {path}: {reason}")]
    ProjectLoad { path: PathBuf, reason: String },

    /// No skeleton with this name in the store.
    #[error("Skeleton not found: {name}")]
    SkeletonNotFound { name: String },

    /// A template override directory could not be read.
    #[error("Failed to load templates from {path}: {reason}")]
    TemplateDirectory { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Template store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotFound { path } => vec![
                format!("No such file: {}", path.display()),
                "Try: skelgen init to write an example project file".into(),
            ],
            Self::ProjectLoad { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
                "Project files are TOML (.toml) or JSON (.json)".into(),
            ],
            Self::SkeletonNotFound { name } => vec![
                format!("No skeleton named '{}'", name),
                "Try: skelgen list to see available skeletons".into(),
            ],
            Self::TemplateDirectory { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check the templates.dir setting or the --templates flag".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound { .. } | Self::SkeletonNotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectLoad { .. } => ErrorCategory::Validation,
            Self::TemplateDirectory { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
