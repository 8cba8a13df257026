//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `skelgen-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Component, Skeleton};
use crate::error::SkelgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `skelgen_adapters::filesystem::LocalFilesystem` (production)
/// - `skelgen_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SkelgenResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> SkelgenResult<()>;

    /// Read a file; `None` when it does not exist.
    fn read_file(&self, path: &Path) -> SkelgenResult<Option<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for skeleton storage and retrieval.
///
/// Implemented by:
/// - `skelgen_adapters::template_store::InMemoryStore` (built-ins plus overrides)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a skeleton by name.
    fn get(&self, name: &str) -> SkelgenResult<Skeleton>;

    /// List all skeletons, sorted by name.
    fn list(&self) -> SkelgenResult<Vec<Skeleton>>;

    /// Insert or replace a skeleton.
    fn insert(&self, skeleton: Skeleton) -> SkelgenResult<()>;
}

/// Port for reading a component description.
///
/// Implemented by:
/// - `skelgen_adapters::project_loader::ManifestProjectLoader` (TOML / JSON)
#[cfg_attr(test, mockall::automock)]
pub trait ProjectLoader: Send + Sync {
    /// Load the component described at `path`. The result is not yet validated.
    fn load(&self, path: &Path) -> SkelgenResult<Component>;
}
