//! `skelgen init`: write an example project description.
//!
//! With `--with-templates` the built-in skeleton sources are copied into
//! `skeletons/` next to it, where `generate` picks them up as overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use skelgen_adapters::{EXAMPLE_MANIFEST, LocalFilesystem, builtin_templates::BUILTIN};
use skelgen_core::{application::ports::Filesystem, domain::is_identifier};

use crate::{
    cli::InitArgs,
    commands::SKELETON_DIR,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// File name of the example project description.
pub const PROJECT_FILE: &str = "skelgen.toml";

const EXAMPLE_NAME: &str = "nav";

#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let manifest = manifest(args.name.as_deref())?;
    let files = planned_files(&args.path, manifest, args.with_templates);
    let filesystem = LocalFilesystem::new();

    // Refuse before writing anything.
    if !args.force {
        if let Some((path, _)) = files.iter().find(|(path, _)| filesystem.exists(path)) {
            return Err(CliError::AlreadyExists { path: path.clone() });
        }
    }

    for (path, content) in &files {
        if let Some(parent) = path.parent() {
            filesystem.create_dir_all(parent)?;
        }
        filesystem.write_file(path, content)?;
        debug!(path = %path.display(), "Wrote file");
    }

    let project = args.path.join(PROJECT_FILE);
    output.success(&format!("Created {}", project.display()))?;
    if args.with_templates {
        output.info(&format!(
            "Skeletons copied to {} for editing",
            args.path.join(SKELETON_DIR).display()
        ))?;
    }
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  skelgen generate {}", project.display()))?;
    Ok(())
}

/// The example manifest, renamed to `name` when given.
fn manifest(name: Option<&str>) -> CliResult<String> {
    match name {
        None => Ok(EXAMPLE_MANIFEST.to_string()),
        Some(name) if is_identifier(name) => Ok(EXAMPLE_MANIFEST.replacen(
            &format!("name = \"{EXAMPLE_NAME}\""),
            &format!("name = \"{name}\""),
            1,
        )),
        Some(name) => Err(CliError::InvalidInput {
            message: format!("'{name}' is not a valid component name (expected an identifier)"),
        }),
    }
}

fn planned_files(root: &Path, manifest: String, with_templates: bool) -> Vec<(PathBuf, String)> {
    let mut files = vec![(root.join(PROJECT_FILE), manifest)];
    if with_templates {
        let dir = root.join(SKELETON_DIR);
        files.extend(
            BUILTIN
                .iter()
                .map(|source| (dir.join(source.file), source.body.to_string())),
        );
    }
    files
}
