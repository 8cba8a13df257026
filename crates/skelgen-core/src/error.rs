//! Unified error handling for skelgen core.
//!
//! This module provides a unified error type that wraps domain, render and
//! application errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, RenderError};

/// Root error type for skelgen core operations.
#[derive(Debug, Error, Clone)]
pub enum SkelgenError {
    /// Model validation failures.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A template failed to parse or render outside any skeleton.
    #[error("Template error: {0}")]
    Template(#[from] RenderError),

    /// A skeleton failed to render for a specific task.
    #[error("Rendering '{skeleton}' for {task} failed: {source}")]
    Generation {
        skeleton: String,
        task: String,
        #[source]
        source: RenderError,
    },

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SkelgenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Template(e) => e.suggestions(),
            Self::Generation { skeleton, source, .. } => {
                let mut suggestions = source.suggestions();
                suggestions.push(format!("The error is in skeleton '{}'", skeleton));
                suggestions
            }
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run: skelgen config list to inspect the effective configuration".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in skelgen".into(),
                "Please report it together with the project file and templates used".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Template(_) | Self::Generation { .. } => ErrorCategory::Template,
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The render failure underneath, if any.
    pub fn render_error(&self) -> Option<&RenderError> {
        match self {
            Self::Template(e) | Self::Generation { source: e, .. } => Some(e),
            Self::Domain(DomainError::InvalidSkeleton { source, .. }) => Some(source),
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type SkelgenResult<T> = Result<T, SkelgenError>;
