use std::collections::HashSet;
use std::path::Path;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Directory, relative to the output root, that receives the pristine copy
/// of every generated file.
pub const PRISTINE_DIR: &str = "templates";

/// Every file a generation run will write, fully rendered.
///
/// Built in memory before the first write so that a render failure leaves
/// the output directory untouched.
#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    pub(crate) files: Vec<GeneratedFile>,
}

impl GenerationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn with_file(mut self, file: GeneratedFile) -> Self {
        self.add_file(file);
        self
    }

    /// Output paths must be unique across the plan.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One rendered skeleton for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
    /// Skeleton the file was rendered from.
    pub skeleton: String,
    /// Qualified name of the task it was rendered for.
    pub task: String,
}

impl GeneratedFile {
    /// Where the always-refreshed pristine copy goes.
    pub fn pristine_path(&self) -> RelativePath {
        self.path.under(PRISTINE_DIR)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}
