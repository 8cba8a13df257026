//! Implementation of the `skelgen generate` command.
//!
//! Responsibility: resolve paths and options from arguments and config,
//! call the core generate service, and display the per-file report. No
//! generation logic lives here.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use skelgen_core::application::{FileAction, FileOutcome, GenerationOptions, GenerationReport};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    commands::{load_store, project_dir, service, templates_dir},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `skelgen generate` command.
#[instrument(skip_all, fields(project = %args.project.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let output_root = output_root(&args, &config);
    let templates = templates_dir(args.templates.as_deref(), &config, Some(&args.project));
    let options = GenerationOptions {
        force: args.force || config.generation.force,
        dry_run: args.dry_run,
        task: args.task.clone(),
    };

    let service = service(load_store(templates.as_deref())?);
    info!(
        output = %output_root.display(),
        templates = ?templates,
        "Generation started"
    );
    let report = service.generate(&args.project, &output_root, &options)?;

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    print_report(&report, &output_root, global.verbose > 0, &output)
}

/// `--output`, then `generation.output_dir`, then the project's directory.
fn output_root(args: &GenerateArgs, config: &AppConfig) -> PathBuf {
    args.output
        .clone()
        .or_else(|| config.generation.output_dir.clone())
        .unwrap_or_else(|| project_dir(&args.project))
}

fn print_report(
    report: &GenerationReport,
    root: &Path,
    show_unchanged: bool,
    output: &OutputManager,
) -> CliResult<()> {
    for file in &report.files {
        if file.action == FileAction::Unchanged && !show_unchanged {
            continue;
        }
        output.print(&format!(
            "  {:<9} {}",
            label(file, report.dry_run),
            output.dim(&relative(&file.path, root))
        ))?;
    }

    for kept in report.kept() {
        output.warning(&format!(
            "{} differs from the generated version and was kept (use --force to overwrite)",
            relative(&kept.path, root)
        ))?;
    }

    let written = report.written();
    if report.dry_run {
        output.info(&format!("Dry run: {written} file(s) would be written"))?;
    } else if written == 0 {
        output.success("Everything is up to date")?;
    } else {
        output.success(&format!("Wrote {written} file(s) under {}", root.display()))?;
    }
    Ok(())
}

fn label(file: &FileOutcome, dry_run: bool) -> &'static str {
    match (file.action, dry_run) {
        (FileAction::Created, false) => "created",
        (FileAction::Created, true) => "create",
        (FileAction::Updated, false) => "updated",
        (FileAction::Updated, true) => "update",
        (FileAction::Unchanged, _) => "unchanged",
        (FileAction::Kept, _) => "kept",
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
