//! Built-in skeletons.
//!
//! Two skeletons ship with skelgen, both rendered once per task:
//!
//! | Name       | Output path                         |
//! |------------|-------------------------------------|
//! | `task.cpp` | `tasks/<%= task.basename %>.cpp`    |
//! | `task.hpp` | `tasks/<%= task.basename %>.hpp`    |
//!
//! Their sources are embedded at compile time from `templates/tasks/` so the
//! binary needs no data files. An override directory (see
//! [`FilesystemTemplateLoader`](crate::template_loader::FilesystemTemplateLoader))
//! can replace either of them by name.

use tracing::{debug, instrument};

use skelgen_core::domain::{DomainError, Skeleton};

/// A built-in skeleton before parsing.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource {
    pub name: &'static str,
    /// Location relative to an override directory, e.g. `tasks/Task.cpp`.
    pub file: &'static str,
    pub path: &'static str,
    pub body: &'static str,
}

pub const BUILTIN: &[BuiltinSource] = &[
    BuiltinSource {
        name: "task.cpp",
        file: "tasks/Task.cpp",
        path: "tasks/<%= task.basename %>.cpp",
        body: include_str!("../templates/tasks/Task.cpp"),
    },
    BuiltinSource {
        name: "task.hpp",
        file: "tasks/Task.hpp",
        path: "tasks/<%= task.basename %>.hpp",
        body: include_str!("../templates/tasks/Task.hpp"),
    },
];

/// Parse every built-in skeleton.
#[instrument]
pub fn all_skeletons() -> Result<Vec<Skeleton>, DomainError> {
    let skeletons = BUILTIN
        .iter()
        .map(|source| Skeleton::new(source.name, source.path, source.body))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = skeletons.len(), "Loaded built-in skeletons");
    Ok(skeletons)
}
