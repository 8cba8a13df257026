//! Project description loader.
//!
//! Reads a component description from a TOML or JSON manifest, picked by
//! file extension. Both formats share one shape:
//!
//! ```toml
//! name = "nav"
//!
//! [[tasks]]
//! basename = "Controller"
//! fixed_initial_state = false
//!
//! [[tasks.operations]]
//! name = "getStatus"
//! returns = ["Status"]
//! doc = "current controller status"
//! arguments = [{ name = "verbose", type = "bool" }]
//! ```
//!
//! The loader only decodes; identifier and uniqueness checks happen in the
//! core when the generate service validates the component.

use std::{fs, io, path::Path};

use serde::Deserialize;
use tracing::{debug, instrument};

use skelgen_core::{
    application::{ApplicationError, ports::ProjectLoader},
    domain::{Component, Operation, Task, TypeRef},
    error::{SkelgenError, SkelgenResult},
};

/// The example written by `skelgen init`.
pub const EXAMPLE_MANIFEST: &str = r#"# skelgen project description
name = "nav"

[[tasks]]
basename = "Controller"
fixed_initial_state = false

[[tasks.operations]]
name = "reset"
doc = "drop the current goal and return to the idle state"

[[tasks.operations]]
name = "getStatus"
returns = ["Status"]
doc = "current controller status"
arguments = [{ name = "verbose", type = "bool" }]
"#;

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a project file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TaskEntry {
    pub basename: String,
    #[serde(default)]
    pub fixed_initial_state: bool,
    /// Declaration order is generation order.
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct OperationEntry {
    pub name: String,
    /// Only the first entry is used by generated bodies.
    #[serde(default)]
    pub returns: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentEntry>,
    pub doc: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ArgumentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl From<ProjectManifest> for Component {
    fn from(manifest: ProjectManifest) -> Self {
        manifest
            .tasks
            .into_iter()
            .fold(Component::new(manifest.name), |component, task| {
                component.with_task(task.into())
            })
    }
}

impl From<TaskEntry> for Task {
    fn from(entry: TaskEntry) -> Self {
        entry
            .operations
            .into_iter()
            .fold(
                Task::new(entry.basename).fixed_initial_state(entry.fixed_initial_state),
                |task, op| task.with_operation(op.into()),
            )
    }
}

impl From<OperationEntry> for Operation {
    fn from(entry: OperationEntry) -> Self {
        let mut op = Operation::new(entry.name);
        for ty in entry.returns {
            op = op.returns(TypeRef::new(ty));
        }
        for arg in entry.arguments {
            op = op.argument(arg.name, TypeRef::new(arg.ty));
        }
        match entry.doc {
            Some(doc) => op.doc(doc),
            None => op,
        }
    }
}

// ── Format detection ──────────────────────────────────────────────────────────

/// Supported manifest encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Decode `content` into a manifest; errors carry the decoder's message.
    pub fn parse(self, content: &str) -> Result<ProjectManifest, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Reads TOML / JSON project files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestProjectLoader;

impl ManifestProjectLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectLoader for ManifestProjectLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> SkelgenResult<Component> {
        let load_error = |reason: String| -> SkelgenError {
            ApplicationError::ProjectLoad {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        };

        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            load_error("unsupported extension, expected .toml or .json".into())
        })?;

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::ProjectNotFound {
                path: path.to_path_buf(),
            }
            .into(),
            _ => load_error(e.to_string()),
        })?;

        let manifest = format.parse(&content).map_err(load_error)?;
        debug!(
            component = %manifest.name,
            tasks = manifest.tasks.len(),
            ?format,
            "Decoded project manifest"
        );
        Ok(manifest.into())
    }
}
