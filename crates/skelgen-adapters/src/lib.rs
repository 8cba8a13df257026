//! Infrastructure adapters for skelgen.
//!
//! This crate implements the ports defined in `skelgen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod filesystem;
pub mod project_loader;
pub mod template_loader;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use project_loader::{EXAMPLE_MANIFEST, ManifestFormat, ManifestProjectLoader};
pub use template_loader::FilesystemTemplateLoader;
pub use template_store::InMemoryStore;
