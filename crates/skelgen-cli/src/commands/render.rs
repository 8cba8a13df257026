//! Implementation of the `skelgen render` command.
//!
//! Renders one skeleton (or an arbitrary template file) for one task and
//! writes the text to stdout. Nothing touches the output tree.

use tracing::instrument;

use skelgen_adapters::LocalFilesystem;
use skelgen_core::{
    application::{TaskModel, ports::Filesystem},
    domain::Component,
    error::SkelgenError,
    render_source,
};

use crate::{
    cli::RenderArgs,
    commands::{load_store, service, templates_dir},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project.display()))]
pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = templates_dir(args.templates.as_deref(), &config, Some(&args.project));
    let service = service(load_store(templates.as_deref())?);
    let component = service.load(&args.project)?;
    let task = match args.task {
        Some(task) => task,
        None => only_task(&component)?,
    };

    let text = match (args.skeleton, args.template) {
        (_, Some(file)) => {
            let source = LocalFilesystem::new()
                .read_file(&file)?
                .ok_or_else(|| CliError::InvalidInput {
                    message: format!("template file '{}' does not exist", file.display()),
                })?;
            let model = TaskModel::find(&component, &task).map_err(SkelgenError::from)?;
            render_source(&source, &model).map_err(SkelgenError::from)?
        }
        (Some(skeleton), None) => service.render_skeleton(&component, &task, &skeleton)?.content,
        (None, None) => {
            return Err(CliError::InvalidInput {
                message: "pass --skeleton or --template".into(),
            });
        }
    };

    output.emit(&text)?;
    Ok(())
}

/// The basename of the component's single task.
fn only_task(component: &Component) -> CliResult<String> {
    match component.tasks() {
        [task] => Ok(task.basename().to_string()),
        tasks => Err(CliError::AmbiguousTask {
            available: tasks.iter().map(|t| t.qualified_name(component)).collect(),
        }),
    }
}
