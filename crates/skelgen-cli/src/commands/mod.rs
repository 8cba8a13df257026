//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into calls on the core services and print
//! the results. Adapter wiring shared by several handlers lives here.

use std::path::{Path, PathBuf};

use tracing::debug;

use skelgen_adapters::{InMemoryStore, LocalFilesystem, ManifestProjectLoader};
use skelgen_core::application::GenerateService;

use crate::{config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod render;

/// Override directory looked up next to a project file.
pub const SKELETON_DIR: &str = "skeletons";

/// Pick the skeleton override directory.
///
/// `--templates` wins, then `templates.dir` from the configuration, then a
/// `skeletons/` directory beside the project file if there is one. The
/// first two must exist; the last one is optional.
pub fn templates_dir(
    flag: Option<&Path>,
    config: &AppConfig,
    project: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(dir) = flag.or(config.templates.dir.as_deref()) {
        return Some(dir.to_path_buf());
    }
    project
        .map(|p| project_dir(p).join(SKELETON_DIR))
        .filter(|dir| dir.is_dir())
}

/// Directory holding a project file; `.` for a bare file name.
pub fn project_dir(project: &Path) -> PathBuf {
    match project.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Built-in skeletons, replaced or extended by `templates`.
pub fn load_store(templates: Option<&Path>) -> CliResult<InMemoryStore> {
    let store = InMemoryStore::with_builtin()?;
    if let Some(dir) = templates {
        let count = store.load_dir(dir)?;
        debug!(dir = %dir.display(), count, "Loaded skeleton overrides");
    }
    Ok(store)
}

/// A service over the local disk and the given store.
pub fn service(store: InMemoryStore) -> GenerateService {
    GenerateService::new(
        Box::new(ManifestProjectLoader::new()),
        Box::new(store),
        Box::new(LocalFilesystem::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_dir_of_bare_file_is_cwd() {
        assert_eq!(project_dir(Path::new("nav.toml")), PathBuf::from("."));
        assert_eq!(project_dir(Path::new("nav/nav.toml")), PathBuf::from("nav"));
    }

    #[test]
    fn flag_beats_config() {
        let mut config = AppConfig::default();
        config.templates.dir = Some(PathBuf::from("from-config"));
        assert_eq!(
            templates_dir(Some(Path::new("from-flag")), &config, None),
            Some(PathBuf::from("from-flag"))
        );
        assert_eq!(
            templates_dir(None, &config, None),
            Some(PathBuf::from("from-config"))
        );
    }

    #[test]
    fn skeleton_dir_beside_project_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("nav.toml");
        let config = AppConfig::default();
        assert_eq!(templates_dir(None, &config, Some(&project)), None);

        std::fs::create_dir(dir.path().join(SKELETON_DIR)).unwrap();
        assert_eq!(
            templates_dir(None, &config, Some(&project)),
            Some(dir.path().join(SKELETON_DIR))
        );
    }

    #[test]
    fn missing_override_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_store(Some(&dir.path().join("absent"))).is_err());
    }
}
