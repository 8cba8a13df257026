//! Application layer for skelgen.
//!
//! This layer contains:
//! - **Services**: the `render` entry point and `GenerateService`
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! rendering logic itself. Parsing and evaluation live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FileAction, FileOutcome, GenerateService, GenerationOptions, GenerationReport, SkeletonInfo,
    TaskModel, render, render_source,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ProjectLoader, TemplateStore};

pub use error::ApplicationError;
