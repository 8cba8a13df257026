//! Implementation of the `skelgen list` command.
//!
//! Without a project: the skeletons that `generate` would render. With a
//! project: its tasks and their operations in generation order.

use std::path::Path;

use skelgen_core::{application::GenerateService, domain::Component};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::{load_store, service, templates_dir},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let templates = templates_dir(
        args.templates.as_deref(),
        &config,
        args.project.as_deref(),
    );
    let service = service(load_store(templates.as_deref())?);
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match args.project {
        Some(project) => list_tasks(&service, &project, format, &output),
        None => list_skeletons(&service, format, &output),
    }
}

fn list_skeletons(
    service: &GenerateService,
    format: ListFormat,
    output: &OutputManager,
) -> CliResult<()> {
    let skeletons = service.list_skeletons()?;

    match format {
        ListFormat::Table => {
            output.header("Available skeletons:")?;
            let width = skeletons.iter().map(|s| s.name.len()).max().unwrap_or(0);
            for skeleton in &skeletons {
                output.print(&format!(
                    "  {:<width$}  {}",
                    skeleton.name,
                    output.dim(&skeleton.path)
                ))?;
            }
        }
        // JSON bypasses quiet mode; it must stay parseable in pipes.
        ListFormat::Json => output.json(&skeletons)?,
        ListFormat::List => {
            for skeleton in &skeletons {
                output.emit(&format!("{}\n", skeleton.name))?;
            }
        }
    }
    Ok(())
}

fn list_tasks(
    service: &GenerateService,
    project: &Path,
    format: ListFormat,
    output: &OutputManager,
) -> CliResult<()> {
    let component = service.load(project)?;

    match format {
        ListFormat::Table => {
            output.header(&format!("Component {}:", component.name()))?;
            for line in task_lines(&component) {
                output.print(&line)?;
            }
        }
        ListFormat::Json => output.json(&component)?,
        ListFormat::List => {
            for task in component.tasks() {
                output.emit(&format!("{}\n", task.qualified_name(&component)))?;
            }
        }
    }
    Ok(())
}

/// One line per task, then one indented line per operation signature.
fn task_lines(component: &Component) -> Vec<String> {
    let mut lines = Vec::new();
    for task in component.tasks() {
        let marker = if task.has_fixed_initial_state() {
            " (fixed initial state)"
        } else {
            ""
        };
        lines.push(format!("  {}{marker}", task.qualified_name(component)));
        for op in task.self_operations() {
            lines.push(format!("    {}", op.signature()));
        }
    }
    lines
}
