//! In-memory skeleton store with built-in skeletons.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, RwLock},
};

use tracing::info;

use skelgen_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::Skeleton,
    error::SkelgenResult,
};

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Thread-safe in-memory skeleton store, keyed by skeleton name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<String, Skeleton>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with built-in skeletons loaded.
    pub fn with_builtin() -> SkelgenResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load built-in skeletons.
    pub fn load_builtin(&self) -> SkelgenResult<()> {
        for skeleton in builtin_templates::all_skeletons()? {
            self.insert(skeleton)?;
        }
        Ok(())
    }

    /// Overlay the skeletons of an override directory. Same-named skeletons
    /// replace what is already stored.
    pub fn load_dir(&self, dir: &Path) -> SkelgenResult<usize> {
        let skeletons = FilesystemTemplateLoader::new(dir).load_all()?;
        let count = skeletons.len();
        for skeleton in skeletons {
            self.insert(skeleton)?;
        }
        info!(dir = %dir.display(), count, "Loaded template overrides");
        Ok(count)
    }

    /// Get the number of skeletons.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, name: &str) -> SkelgenResult<Skeleton> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::SkeletonNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> SkelgenResult<Vec<Skeleton>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, skeleton: Skeleton) -> SkelgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(skeleton.name().to_string(), skeleton);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use skelgen_core::error::SkelgenError;

    #[test]
    fn builtin_store_lists_sorted() {
        let store = InMemoryStore::with_builtin().unwrap();
        let names: Vec<_> = store
            .list()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["task.cpp", "task.hpp"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_skeleton_is_not_found() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert!(matches!(
            store.get("task.cpp"),
            Err(SkelgenError::Application(
                ApplicationError::SkeletonNotFound { .. }
            ))
        ));
    }

    #[test]
    fn override_directory_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tasks")).unwrap();
        fs::write(dir.path().join("tasks/Task.cpp"), "// custom <%= task.basename %>\n").unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "# build\n").unwrap();

        let store = InMemoryStore::with_builtin().unwrap();
        assert_eq!(store.load_dir(dir.path()).unwrap(), 2);

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get("task.cpp").unwrap().path_source(),
            "tasks/<%= task.basename %>.cpp"
        );
        assert!(store.get("CMakeLists.txt").is_ok());
        assert!(store.get("task.hpp").is_ok());
    }
}
