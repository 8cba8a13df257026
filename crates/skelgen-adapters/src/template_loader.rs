//! Filesystem-based skeleton loader.
//!
//! Every regular file under the override directory becomes a skeleton. The
//! file's path relative to the directory is its output path, with one
//! substitution: a file stem of `Task` stands for the task being generated.
//!
//! # Directory layout expected
//!
//! ```text
//! skeletons/
//! └── tasks/
//!     ├── Task.cpp      ← skeleton `task.cpp`, output tasks/<basename>.cpp
//!     ├── Task.hpp      ← skeleton `task.hpp`, output tasks/<basename>.hpp
//!     └── README.md     ← skeleton `tasks/README.md`, output unchanged
//! ```
//!
//! A file named like a built-in skeleton replaces it. Files without the
//! `Task` stem render to the same path for every task, so they only make
//! sense for single-task components.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use skelgen_core::{
    application::ApplicationError,
    domain::Skeleton,
    error::{SkelgenError, SkelgenResult},
};

/// Placeholder file stem replaced by the task basename.
pub const TASK_PLACEHOLDER: &str = "Task";

const BASENAME_EXPR: &str = "<%= task.basename %>";

/// Loads skeletons from a directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLoader {
    root: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every skeleton under the root, sorted by relative path.
    ///
    /// Hidden files and directories are skipped. A file that fails to parse
    /// is an error; a partially loaded override set would generate a mix of
    /// built-in and custom files.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_all(&self) -> SkelgenResult<Vec<Skeleton>> {
        if !self.root.is_dir() {
            return Err(self.error(&self.root, "not a directory"));
        }

        let mut skeletons = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                self.error(&path, &e.to_string())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| self.error(entry.path(), &e.to_string()))?;
            let body = fs::read_to_string(entry.path())
                .map_err(|e| self.error(entry.path(), &e.to_string()))?;

            let (name, path) = skeleton_paths(relative);
            debug!(skeleton = %name, path = %path, "Loaded skeleton file");
            skeletons.push(Skeleton::new(name, path, &body)?);
        }

        if skeletons.is_empty() {
            warn!("Template directory contains no skeletons");
        }
        Ok(skeletons)
    }

    fn error(&self, path: &Path, reason: &str) -> SkelgenError {
        ApplicationError::TemplateDirectory {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
        .into()
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Skeleton name and output-path template for a file at `relative`.
///
/// `tasks/Task.cpp` becomes (`task.cpp`, `tasks/<%= task.basename %>.cpp`).
fn skeleton_paths(relative: &Path) -> (String, String) {
    let display = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let is_task_file = relative
        .file_stem()
        .is_some_and(|stem| stem == TASK_PLACEHOLDER);
    if !is_task_file {
        return (display.clone(), display);
    }

    let extension = relative
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = match display.rsplit_once('/') {
        Some((parent, _)) => format!("{parent}/"),
        None => String::new(),
    };

    (
        format!("{}{}", TASK_PLACEHOLDER.to_lowercase(), extension),
        format!("{parent}{BASENAME_EXPR}{extension}"),
    )
}
