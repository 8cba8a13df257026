//! Generate Service - main application orchestrator.
//!
//! This service coordinates a whole generation run:
//! 1. Load and validate the component description
//! 2. Render every skeleton for every selected task, in memory
//! 3. Write pristine copies and, where allowed, user copies
//!
//! Nothing is written unless every file rendered.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{Filesystem, ProjectLoader, TemplateStore},
        services::generator::{TaskModel, render},
    },
    domain::{
        Component, DomainValidator as validator, GeneratedFile, GenerationPlan, RelativePath,
        RenderError, Skeleton,
    },
    error::{SkelgenError, SkelgenResult},
};

/// Knobs for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Overwrite user copies that differ from the rendered output.
    pub force: bool,
    /// Render and compare, but write nothing.
    pub dry_run: bool,
    /// Restrict generation to one task (basename or qualified name).
    pub task: Option<String>,
}

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Created,
    Updated,
    Unchanged,
    /// A user copy that differs from the rendered output and was left alone.
    Kept,
}

impl FileAction {
    pub fn writes(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub pristine: bool,
    pub action: FileAction,
}

/// Per-file outcome of a run, in plan order (pristine copy first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
}

impl GenerationReport {
    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.action.writes()).count()
    }

    /// User copies that were left untouched although they differ.
    pub fn kept(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.action == FileAction::Kept)
    }
}

/// Information about a skeleton for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkeletonInfo {
    pub name: String,
    pub path: String,
}

/// Main generation service.
pub struct GenerateService {
    loader: Box<dyn ProjectLoader>,
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(
        loader: Box<dyn ProjectLoader>,
        store: Box<dyn TemplateStore>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            loader,
            store,
            filesystem,
        }
    }

    /// Load, render and write in one go.
    #[instrument(
        skip_all,
        fields(
            project = %project.display(),
            output = %output_root.display(),
            force = options.force,
            dry_run = options.dry_run
        )
    )]
    pub fn generate(
        &self,
        project: &Path,
        output_root: &Path,
        options: &GenerationOptions,
    ) -> SkelgenResult<GenerationReport> {
        let component = self.load(project)?;
        let plan = self.plan(&component, options)?;
        info!(files = plan.len(), "Rendered all skeletons");

        let report = self.write(&plan, output_root, options)?;
        info!(
            written = report.written(),
            kept = report.count(FileAction::Kept),
            "Generation completed"
        );
        Ok(report)
    }

    /// Load a project description and validate it.
    pub fn load(&self, project: &Path) -> SkelgenResult<Component> {
        let component = self.loader.load(project)?;
        validator::validate_component(&component)?;
        debug!(
            component = component.name(),
            tasks = component.tasks().len(),
            "Project loaded"
        );
        Ok(component)
    }

    /// Render every skeleton for every selected task.
    pub fn plan(
        &self,
        component: &Component,
        options: &GenerationOptions,
    ) -> SkelgenResult<GenerationPlan> {
        let models: Vec<_> = match options.task.as_deref() {
            Some(name) => vec![TaskModel::find(component, name)?],
            None => TaskModel::all(component).collect(),
        };
        let skeletons = self.store.list()?;

        let mut plan = GenerationPlan::new();
        for model in &models {
            for skeleton in &skeletons {
                plan.add_file(Self::render_file(skeleton, model)?);
            }
        }

        validator::validate_plan(&plan)?;
        Ok(plan)
    }

    /// Render one named skeleton for one task.
    pub fn render_skeleton(
        &self,
        component: &Component,
        task: &str,
        skeleton: &str,
    ) -> SkelgenResult<GeneratedFile> {
        let model = TaskModel::find(component, task)?;
        let skeleton = self.store.get(skeleton)?;
        Self::render_file(&skeleton, &model)
    }

    /// Write a rendered plan under `output_root`.
    ///
    /// Pristine copies are always brought up to date; user copies only when
    /// missing or when `force` is set. Identical files are never rewritten.
    pub fn write(
        &self,
        plan: &GenerationPlan,
        output_root: &Path,
        options: &GenerationOptions,
    ) -> SkelgenResult<GenerationReport> {
        validator::validate_plan(plan)?;

        let mut report = GenerationReport {
            dry_run: options.dry_run,
            files: Vec::with_capacity(plan.len() * 2),
        };
        for file in plan.files() {
            let pristine = output_root.join(file.pristine_path());
            let action = self.sync(&pristine, &file.content, true, options.dry_run)?;
            report.files.push(FileOutcome {
                path: pristine,
                pristine: true,
                action,
            });

            let user = output_root.join(file.path());
            let action = self.sync(&user, &file.content, options.force, options.dry_run)?;
            report.files.push(FileOutcome {
                path: user,
                pristine: false,
                action,
            });
        }
        Ok(report)
    }

    /// List all available skeletons.
    pub fn list_skeletons(&self) -> SkelgenResult<Vec<SkeletonInfo>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|s| SkeletonInfo {
                name: s.name().to_string(),
                path: s.path_source().to_string(),
            })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn render_file(skeleton: &Skeleton, model: &TaskModel<'_>) -> SkelgenResult<GeneratedFile> {
        let failed = |source: RenderError| SkelgenError::Generation {
            skeleton: skeleton.name().to_string(),
            task: model.qualified_name(),
            source,
        };

        let path = render(skeleton.path_template(), model).map_err(&failed)?;
        let content = render(skeleton.body_template(), model).map_err(&failed)?;
        debug!(skeleton = skeleton.name(), path = %path.trim(), "Rendered");

        Ok(GeneratedFile {
            path: RelativePath::try_new(path.trim())?,
            content,
            skeleton: skeleton.name().to_string(),
            task: model.qualified_name(),
        })
    }

    fn sync(
        &self,
        path: &Path,
        content: &str,
        overwrite: bool,
        dry_run: bool,
    ) -> SkelgenResult<FileAction> {
        let action = match self.filesystem.read_file(path)? {
            None => FileAction::Created,
            Some(existing) if existing == content => FileAction::Unchanged,
            Some(_) if overwrite => FileAction::Updated,
            Some(_) => FileAction::Kept,
        };

        if action.writes() && !dry_run {
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(path, content)?;
        }
        debug!(path = %path.display(), ?action, "Synced");
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::{
        ApplicationError,
        ports::{MockFilesystem, MockProjectLoader, MockTemplateStore},
    };
    use crate::domain::{DomainError, Operation, Task, TypeRef};

    fn nav() -> Component {
        Component::new("nav").with_task(
            Task::new("Controller")
                .with_operation(Operation::new("reset"))
                .with_operation(Operation::new("getStatus").returns(TypeRef::new("Status"))),
        )
    }

    fn skeletons() -> Vec<Skeleton> {
        vec![
            Skeleton::new(
                "task.cpp",
                "tasks/<%= task.basename %>.cpp",
                "#include \"<%= task.basename %>.hpp\"\n",
            )
            .unwrap(),
            Skeleton::new(
                "task.hpp",
                "tasks/<%= task.basename %>.hpp",
                "class <%= task.basename %>;\n",
            )
            .unwrap(),
        ]
    }

    fn loader(component: Component) -> MockProjectLoader {
        let mut loader = MockProjectLoader::new();
        loader
            .expect_load()
            .returning(move |_| Ok(component.clone()));
        loader
    }

    fn store(skeletons: Vec<Skeleton>) -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store.expect_list().returning(move || Ok(skeletons.clone()));
        store
    }

    /// A filesystem whose files all hold `existing` (or nothing), recording
    /// every write.
    fn recording_fs(
        existing: impl Fn(&Path) -> Option<String> + Send + Sync + 'static,
    ) -> (MockFilesystem, Arc<Mutex<Vec<PathBuf>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(move |path| Ok(existing(path)));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        let sink = Arc::clone(&written);
        fs.expect_write_file().returning(move |path, _| {
            sink.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });
        (fs, written)
    }

    fn service(component: Component, fs: MockFilesystem) -> GenerateService {
        GenerateService::new(
            Box::new(loader(component)),
            Box::new(store(skeletons())),
            Box::new(fs),
        )
    }

    #[test]
    fn fresh_output_writes_pristine_and_user_copies() {
        let (fs, written) = recording_fs(|_| None);
        let report = service(nav(), fs)
            .generate(
                Path::new("nav.toml"),
                Path::new("out"),
                &GenerationOptions::default(),
            )
            .unwrap();

        assert_eq!(report.count(FileAction::Created), 4);
        let written = written.lock().unwrap();
        assert_eq!(
            *written,
            [
                PathBuf::from("out/templates/tasks/Controller.cpp"),
                PathBuf::from("out/tasks/Controller.cpp"),
                PathBuf::from("out/templates/tasks/Controller.hpp"),
                PathBuf::from("out/tasks/Controller.hpp"),
            ]
        );
    }

    #[test]
    fn modified_user_copies_are_kept_without_force() {
        let (fs, written) = recording_fs(|_| Some("// edited by hand\n".into()));
        let report = service(nav(), fs)
            .generate(
                Path::new("nav.toml"),
                Path::new("out"),
                &GenerationOptions::default(),
            )
            .unwrap();

        assert_eq!(report.count(FileAction::Updated), 2);
        assert_eq!(report.count(FileAction::Kept), 2);
        assert!(report.kept().all(|f| !f.pristine));
        assert!(
            written
                .lock()
                .unwrap()
                .iter()
                .all(|p| p.starts_with("out/templates"))
        );
    }

    #[test]
    fn force_overwrites_user_copies() {
        let (fs, written) = recording_fs(|_| Some("// edited by hand\n".into()));
        let options = GenerationOptions {
            force: true,
            ..Default::default()
        };
        let report = service(nav(), fs)
            .generate(Path::new("nav.toml"), Path::new("out"), &options)
            .unwrap();

        assert_eq!(report.count(FileAction::Updated), 4);
        assert_eq!(written.lock().unwrap().len(), 4);
    }

    #[test]
    fn identical_files_are_not_rewritten() {
        let (fs, written) = recording_fs(|path| {
            Some(if path.extension().is_some_and(|e| e == "cpp") {
                "#include \"Controller.hpp\"\n".into()
            } else {
                "class Controller;\n".into()
            })
        });
        let options = GenerationOptions {
            force: true,
            ..Default::default()
        };
        let report = service(nav(), fs)
            .generate(Path::new("nav.toml"), Path::new("out"), &options)
            .unwrap();

        assert_eq!(report.count(FileAction::Unchanged), 4);
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|_| Ok(None));
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let options = GenerationOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = service(nav(), fs)
            .generate(Path::new("nav.toml"), Path::new("out"), &options)
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.count(FileAction::Created), 4);
    }

    #[test]
    fn render_failure_writes_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().never();
        fs.expect_write_file().never();

        let broken = vec![
            skeletons().remove(0),
            Skeleton::new("broken", "x.txt", "<%= task.no_such_accessor %>").unwrap(),
        ];
        let service = GenerateService::new(
            Box::new(loader(nav())),
            Box::new(store(broken)),
            Box::new(fs),
        );

        let err = service
            .generate(
                Path::new("nav.toml"),
                Path::new("out"),
                &GenerationOptions::default(),
            )
            .unwrap_err();
        match err {
            SkelgenError::Generation { skeleton, task, source } => {
                assert_eq!(skeleton, "broken");
                assert_eq!(task, "nav::Controller");
                assert_eq!(source.path(), Some("task.no_such_accessor"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_model_is_rejected_before_rendering() {
        let mut store = MockTemplateStore::new();
        store.expect_list().never();
        let service = GenerateService::new(
            Box::new(loader(Component::new("nav").with_task(Task::new("not valid")))),
            Box::new(store),
            Box::new(MockFilesystem::new()),
        );

        let err = service
            .generate(
                Path::new("nav.toml"),
                Path::new("out"),
                &GenerationOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SkelgenError::Domain(DomainError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn colliding_output_paths_are_rejected() {
        let same_path = vec![
            Skeleton::new("a", "out.txt", "a").unwrap(),
            Skeleton::new("b", "out.txt", "b").unwrap(),
        ];
        let service = GenerateService::new(
            Box::new(loader(nav())),
            Box::new(store(same_path)),
            Box::new(MockFilesystem::new()),
        );
        let err = service
            .plan(&nav(), &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SkelgenError::Domain(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn task_filter_selects_one_task() {
        let component = nav().with_task(Task::new("Planner"));
        let service = service(component.clone(), MockFilesystem::new());
        let options = GenerationOptions {
            task: Some("nav::Planner".into()),
            ..Default::default()
        };

        let plan = service.plan(&component, &options).unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.files().all(|f| f.task == "nav::Planner"));
    }

    #[test]
    fn render_skeleton_by_name() {
        let mut store = MockTemplateStore::new();
        store
            .expect_get()
            .withf(|name| name == "task.hpp")
            .returning(|_| Ok(skeletons().remove(1)));
        let service = GenerateService::new(
            Box::new(MockProjectLoader::new()),
            Box::new(store),
            Box::new(MockFilesystem::new()),
        );

        let file = service
            .render_skeleton(&nav(), "Controller", "task.hpp")
            .unwrap();
        assert_eq!(file.path(), Path::new("tasks/Controller.hpp"));
        assert_eq!(file.content, "class Controller;\n");
    }

    #[test]
    fn missing_project_propagates_loader_error() {
        let mut loader = MockProjectLoader::new();
        loader.expect_load().returning(|path| {
            Err(ApplicationError::ProjectNotFound {
                path: path.to_path_buf(),
            }
            .into())
        });
        let service = GenerateService::new(
            Box::new(loader),
            Box::new(MockTemplateStore::new()),
            Box::new(MockFilesystem::new()),
        );

        let err = service.load(Path::new("missing.toml")).unwrap_err();
        assert!(matches!(
            err,
            SkelgenError::Application(ApplicationError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn lists_skeletons_with_their_output_paths() {
        let service = service(nav(), MockFilesystem::new());
        let infos = service.list_skeletons().unwrap();
        assert_eq!(infos[0].name, "task.cpp");
        assert_eq!(infos[0].path, "tasks/<%= task.basename %>.cpp");
    }
}
